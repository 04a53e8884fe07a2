use numpy::{IntoPyArray, PyArray2};
use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ortho;

/// `seed` 가 없으면 OS 엔트로피로 rng 를 만듭니다.
#[pyfunction]
#[pyo3(signature = (dim, seed=None))]
pub fn gen_ortho_matrix<'py>(
    py: Python<'py>,
    dim: usize,
    seed: Option<u64>,
) -> PyResult<&'py PyArray2<f64>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let result = py.allow_threads(|| ortho::gen_ortho_matrix(dim, &mut rng))?;
    Ok(result.into_pyarray(py))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(gen_ortho_matrix, m)?)?;
    Ok(())
}
