mod feed;
mod ortho;
mod store;

use crate::error::ToolsError;
use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyModule;

impl From<ToolsError> for PyErr {
    fn from(err: ToolsError) -> PyErr {
        match err {
            ToolsError::Io { .. } => PyOSError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// 학습 스크립트용 유틸리티
#[pymodule]
pub fn train_tools(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    // 직교 행렬
    ortho::register(m)?;
    // 모델 디렉터리 / 로그 / 하이퍼파라미터
    store::register(m)?;
    // feed 배치
    feed::register(m)?;
    Ok(())
}
