use super::StoreLayout;
use crate::error::{Result, ToolsError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// 하이퍼파라미터 맵
///
/// JSON 으로 저장되는 평평한 `key -> value` 맵과, 직렬화되지 않는 rng 하나를 함께 들고 다닙니다.
/// 비교(`==`)는 값만 봅니다.
#[derive(Debug, Clone, Default)]
pub struct HParams {
    values: Map<String, Value>,
    rng: Option<StdRng>,
}

impl PartialEq for HParams {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl From<Map<String, Value>> for HParams {
    fn from(values: Map<String, Value>) -> Self {
        Self { values, rng: None }
    }
}

impl HParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert<V: Into<Value>>(&mut self, key: &str, value: V) -> Option<Value> {
        self.values.insert(key.to_string(), value.into())
    }

    pub fn rng(&self) -> Option<&StdRng> {
        self.rng.as_ref()
    }

    pub fn rng_mut(&mut self) -> Option<&mut StdRng> {
        self.rng.as_mut()
    }

    pub fn set_rng(&mut self, rng: StdRng) {
        self.rng = Some(rng);
    }

    pub fn take_rng(&mut self) -> Option<StdRng> {
        self.rng.take()
    }

    pub fn seed(&self) -> Result<u64> {
        self.get("seed")
            .and_then(Value::as_u64)
            .ok_or(ToolsError::MissingField("seed"))
    }

    pub fn target_perf(&self) -> Result<f64> {
        self.get("target_perf")
            .and_then(Value::as_f64)
            .ok_or(ToolsError::MissingField("target_perf"))
    }

    pub fn in_type(&self) -> Result<&str> {
        self.get("in_type")
            .and_then(Value::as_str)
            .ok_or(ToolsError::MissingField("in_type"))
    }

    pub fn rule_start(&self) -> Result<usize> {
        self.usize_field("rule_start")
    }

    pub fn n_rule(&self) -> Result<usize> {
        self.usize_field("n_rule")
    }

    fn usize_field(&self, key: &'static str) -> Result<usize> {
        self.get(key)
            .and_then(Value::as_u64)
            .and_then(|v| usize::try_from(v).ok())
            .ok_or(ToolsError::MissingField(key))
    }

    /// `target` 의 모든 항목이 저장된 값과 같으면 true.
    /// `target` 에 있는 키가 저장된 맵에 없으면 불일치입니다.
    pub fn matches(&self, target: &Map<String, Value>) -> bool {
        target
            .iter()
            .all(|(key, val)| self.values.get(key).is_some_and(|v| json_eq(v, val)))
    }
}

/// JSON 값 비교. 숫자는 정수/실수 표현에 관계없이 값으로 비교합니다 (`1 == 1.0`).
/// 불리언은 숫자 `1` / `0` 과도 같습니다 (`true == 1`).
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(flag), Value::Number(n)) | (Value::Number(n), Value::Bool(flag)) => {
            n.as_f64() == Some(if *flag { 1.0 } else { 0.0 })
        }
        (Value::Number(x), Value::Number(y)) => {
            if x.is_f64() || y.is_f64() {
                x.as_f64() == y.as_f64()
            } else {
                x == y
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

pub fn load_hparams<P: AsRef<Path>>(save_dir: P) -> Result<Option<HParams>> {
    load_hparams_with(&StoreLayout::default(), save_dir)
}

/// `<save_dir>/<layout.hparams_file>` 을 읽습니다. 파일이 없으면 `None`.
///
/// 로드는 보통 분석용이므로 학습 때와 다른 난수열을 쓰도록
/// `seed + analysis_seed_offset` 으로 rng 를 새로 붙입니다.
pub fn load_hparams_with<P: AsRef<Path>>(
    layout: &StoreLayout,
    save_dir: P,
) -> Result<Option<HParams>> {
    let fname = save_dir.as_ref().join(&layout.hparams_file);
    if !fname.is_file() {
        return Ok(None);
    }

    let file = File::open(&fname).map_err(|e| ToolsError::io(&fname, e))?;
    let reader = BufReader::new(file);
    let values: Map<String, Value> =
        serde_json::from_reader(reader).map_err(|e| ToolsError::json(&fname, e))?;

    let mut hparams = HParams::from(values);
    let seed = hparams.seed()?;
    hparams.set_rng(StdRng::seed_from_u64(
        seed.wrapping_add(layout.analysis_seed_offset),
    ));
    Ok(Some(hparams))
}

pub fn save_hparams<P: AsRef<Path>>(hparams: &HParams, save_dir: P) -> Result<()> {
    save_hparams_with(&StoreLayout::default(), hparams, save_dir)
}

/// 값만 JSON 으로 씁니다. rng 는 저장하지 않습니다.
pub fn save_hparams_with<P: AsRef<Path>>(
    layout: &StoreLayout,
    hparams: &HParams,
    save_dir: P,
) -> Result<()> {
    let fname = save_dir.as_ref().join(&layout.hparams_file);
    let file = File::create(&fname).map_err(|e| ToolsError::io(&fname, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, hparams.values())
        .map_err(|e| ToolsError::json(&fname, e))?;
    writer.flush().map_err(|e| ToolsError::io(&fname, e))?;
    log::debug!("saved hyperparameters to {}", fname.display());
    Ok(())
}
