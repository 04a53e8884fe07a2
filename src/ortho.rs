//! # 랜덤 직교 행렬 생성
//!
//! 순차 Householder 반사를 누적하여 `dim × dim` 직교 행렬을 샘플링합니다.
//! 각 단계의 반사에 무작위 부호를 곱하므로 결과는 직교군 위의 Haar 측도를 따릅니다.
//! (scipy.stats.ortho_group 과 같은 구성)

use crate::error::{Result, ToolsError};
use ndarray::{s, Array1, Array2, Axis};
use ndarray_rand::rand_distr::StandardNormal;
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `sign(0) = 0` 규약의 부호 함수. NaN 은 그대로 전파됩니다.
pub fn sign<F: Float>(v: F) -> F {
    if v > F::zero() {
        F::one()
    } else if v < F::zero() {
        -F::one()
    } else {
        v
    }
}

/// Householder 반사 `-D * (I - 2 x xᵀ / |x|²)` 를 만듭니다.
/// `x` 는 첫 성분이 이미 `D * |x|` 만큼 보정된 벡터여야 합니다.
fn householder(x: &Array1<f64>, d: f64) -> Array2<f64> {
    let k = x.len();
    let sq = x.dot(x);
    let col = x.view().insert_axis(Axis(1));
    let row = x.view().insert_axis(Axis(0));
    let outer = col.dot(&row);
    (Array2::<f64>::eye(k) - outer * (2.0 / sq)) * (-d)
}

/// 랜덤 직교 행렬 생성
///
/// `rng` 에서 표준 정규 벡터를 뽑아 `dim - 1` 개의 Householder 반사를 곱합니다.
/// 같은 상태의 `rng` 를 넘기면 같은 행렬이 나옵니다.
///
/// `dim == 0` 이면 `ToolsError::InvalidArgument` 를 반환합니다.
pub fn gen_ortho_matrix<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Result<Array2<f64>> {
    if dim == 0 {
        return Err(ToolsError::InvalidArgument(
            "orthogonal matrix dimension must be at least 1".to_string(),
        ));
    }

    let mut h = Array2::<f64>::eye(dim);
    for n in 1..dim {
        let k = dim - n + 1;
        let mut x: Array1<f64> = Array1::from_shape_fn(k, |_| rng.sample(StandardNormal));

        // 반올림 오차를 피하도록 x[0] 의 부호를 따라 보정
        let d = sign(x[0]);
        let norm = x.dot(&x).sqrt();
        x[0] += d * norm;

        let hx = householder(&x, d);

        // mat = I 에 trailing k×k 블록만 hx 로 바뀐 행렬이므로
        // H · mat 은 H 의 마지막 k 열만 바꾼다.
        let tail = h.slice(s![.., n - 1..]).dot(&hx);
        h.slice_mut(s![.., n - 1..]).assign(&tail);
    }

    Ok(h)
}

/// 시드로 `StdRng` 를 만들어 [`gen_ortho_matrix`] 를 호출합니다.
pub fn gen_ortho_matrix_seeded(dim: usize, seed: u64) -> Result<Array2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    gen_ortho_matrix(dim, &mut rng)
}
