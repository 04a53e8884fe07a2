use super::StoreLayout;
use crate::error::{Result, ToolsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// 학습 중 기록되는 로그
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingLog {
    /// 로그가 저장될 모델 디렉터리
    pub train_dir: PathBuf,

    /// 평가 시점까지 본 trial 수
    pub trials: Vec<u64>,

    /// 평가 시점의 경과 시간 (초)
    pub times: Vec<f64>,

    /// 평가 시점마다 모든 규칙에 대한 최저 성능
    pub perf_min: Vec<f64>,

    /// 평가 시점마다 모든 규칙에 대한 최대 비용
    pub cost_min: Vec<f64>,

    /// 그 밖의 시계열 (`perf_<rule>`, `cost_<rule>` 등)
    pub metrics: BTreeMap<String, Vec<f64>>,
}

impl TrainingLog {
    pub fn new<P: Into<PathBuf>>(train_dir: P) -> Self {
        Self {
            train_dir: train_dir.into(),
            ..Default::default()
        }
    }

    /// 마지막으로 기록된 `perf_min`
    pub fn last_perf_min(&self) -> Option<f64> {
        self.perf_min.last().copied()
    }

    /// 이름으로 시계열 조회. 고정 필드도 같은 이름으로 찾을 수 있습니다.
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        match name {
            "times" => Some(&self.times),
            "perf_min" => Some(&self.perf_min),
            "cost_min" => Some(&self.cost_min),
            _ => self.metrics.get(name).map(Vec::as_slice),
        }
    }

    pub fn push_metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }
}

pub fn load_log<P: AsRef<Path>>(train_dir: P) -> Result<Option<TrainingLog>> {
    load_log_with(&StoreLayout::default(), train_dir)
}

/// `<train_dir>/<layout.log_file>` 을 읽습니다. 파일이 없으면 `None`.
pub fn load_log_with<P: AsRef<Path>>(
    layout: &StoreLayout,
    train_dir: P,
) -> Result<Option<TrainingLog>> {
    let fname = train_dir.as_ref().join(&layout.log_file);
    if !fname.is_file() {
        return Ok(None);
    }

    let file = File::open(&fname).map_err(|e| ToolsError::io(&fname, e))?;
    let reader = BufReader::new(file);
    let log = bincode::deserialize_from(reader).map_err(|e| ToolsError::bincode(&fname, e))?;
    Ok(Some(log))
}

pub fn save_log(log: &TrainingLog) -> Result<()> {
    save_log_with(&StoreLayout::default(), log)
}

/// `log.train_dir` 안에 로그를 씁니다. 디렉터리는 이미 있어야 합니다.
pub fn save_log_with(layout: &StoreLayout, log: &TrainingLog) -> Result<()> {
    let fname = log.train_dir.join(&layout.log_file);
    let file = File::create(&fname).map_err(|e| ToolsError::io(&fname, e))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, log).map_err(|e| ToolsError::bincode(&fname, e))?;
    writer.flush().map_err(|e| ToolsError::io(&fname, e))?;
    ::log::debug!("saved training log to {}", fname.display());
    Ok(())
}
