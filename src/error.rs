use std::path::PathBuf;
use thiserror::Error;

/// 크레이트 전체에서 사용하는 에러 타입
#[derive(Debug, Error)]
pub enum ToolsError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to (de)serialize JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to (de)serialize training log in {path}: {source}")]
    Bincode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Hyperparameter `{0}` is missing or has the wrong type")]
    MissingField(&'static str),

    #[error("Shape mismatch: {0}")]
    Shape(String),
}

pub type Result<T> = std::result::Result<T, ToolsError>;

impl ToolsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolsError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ToolsError::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn bincode(path: impl Into<PathBuf>, source: bincode::Error) -> Self {
        ToolsError::Bincode {
            path: path.into(),
            source,
        }
    }
}
