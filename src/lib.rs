//! Train Tools - filesystem, serialization and numeric helpers for RNN training pipelines
//!
//! - [`ortho`]: Householder 방식 랜덤 직교 행렬 (가중치 초기화)
//! - [`store`]: 모델 디렉터리 탐색, 학습 로그 / 하이퍼파라미터 저장, `mkdir -p`
//! - [`feed`]: `normal` / `multi` 입력 인코딩 배치 구성

pub mod error;
pub mod feed;
pub mod ortho;
pub mod store;

#[cfg(feature = "python")]
mod bindings;

pub use error::{Result, ToolsError};
pub use feed::{gen_feed_batch, gen_feed_dict, FeedBatch, FeedConfig, InputType, Trial};
pub use ortho::{gen_ortho_matrix, gen_ortho_matrix_seeded};
pub use store::{
    find_all_models, find_model, load_hparams, load_log, mkdir_p, save_hparams, save_log,
    valid_model_dirs, HParams, ModelMatch, StoreLayout, TrainingLog,
};
