use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
use pyo3::prelude::*;

use crate::feed;

/// `multi` 인코딩으로 입력 `x [T, B, N_in]` 을 `[T, B, rule_start * n_rule]` 로 확장
#[pyfunction]
pub fn multi_feed_x<'py>(
    py: Python<'py>,
    x: PyReadonlyArray3<f32>,
    rule_start: usize,
    n_rule: usize,
) -> PyResult<&'py PyArray3<f32>> {
    let x_arr = x.as_array();
    let result = feed::expand_multi_input(&x_arr, rule_start, n_rule)?;
    Ok(result.into_pyarray(py))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(multi_feed_x, m)?)?;
    Ok(())
}
