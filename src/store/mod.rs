//! # 모델 디렉터리 저장소
//!
//! 학습된 모델 디렉터리의 레이아웃:
//!
//! ```text
//! <train_dir>/
//!     model.ckpt-*     체크포인트 (이름에 marker 포함)
//!     log.pkl          학습 로그 (bincode)
//!     hparams.json     하이퍼파라미터 (JSON)
//! ```

pub mod discovery;
pub mod hparams;
pub mod train_log;

pub use discovery::{
    contains_model_file, find_all_models, find_all_models_with, find_model, find_model_with,
    reached_target_perf, valid_model_dirs, valid_model_dirs_with, ModelMatch,
};
pub use hparams::{load_hparams, load_hparams_with, save_hparams, save_hparams_with, HParams};
pub use train_log::{load_log, load_log_with, save_log, save_log_with, TrainingLog};

use crate::error::{Result, ToolsError};
use std::fs;
use std::path::Path;

/// 모델 디렉터리 안의 파일 이름 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    /// 학습 로그 파일 이름
    pub log_file: String,

    /// 하이퍼파라미터 파일 이름
    pub hparams_file: String,

    /// 체크포인트 파일 이름에 포함되는 문자열
    pub checkpoint_marker: String,

    /// 로드 시 `seed` 에 더해 분석용 rng 를 만드는 오프셋
    pub analysis_seed_offset: u64,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            log_file: "log.pkl".to_string(),
            hparams_file: "hparams.json".to_string(),
            checkpoint_marker: "model.ckpt".to_string(),
            analysis_seed_offset: 1000,
        }
    }
}

/// Portable `mkdir -p`.
///
/// 이미 디렉터리가 있으면 성공. 같은 경로에 파일이 있거나 다른 OS 에러는 그대로 반환.
pub fn mkdir_p<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(ToolsError::io(path, e)),
    }
}

#[cfg(test)]
mod __test__;
