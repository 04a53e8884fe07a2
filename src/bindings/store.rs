use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::store::{self, ModelMatch};

fn parse_target(target_json: &str) -> PyResult<Map<String, Value>> {
    serde_json::from_str(target_json).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn to_pair(found: ModelMatch) -> PyResult<(PathBuf, String)> {
    let json = serde_json::to_string(found.hparams.values())
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok((found.dir, json))
}

#[pyfunction]
pub fn mkdir_p(path: PathBuf) -> PyResult<()> {
    Ok(store::mkdir_p(path)?)
}

#[pyfunction]
pub fn valid_model_dirs(root: PathBuf) -> PyResult<Vec<PathBuf>> {
    Ok(store::valid_model_dirs(root)?)
}

/// 하이퍼파라미터는 JSON 문자열로 주고받습니다. (`json.dumps` / `json.loads`)
#[pyfunction]
pub fn find_all_models(root: PathBuf, target_json: &str) -> PyResult<Vec<(PathBuf, String)>> {
    let target = parse_target(target_json)?;
    store::find_all_models(root, &target)?
        .into_iter()
        .map(to_pair)
        .collect()
}

#[pyfunction]
pub fn find_model(root: PathBuf, target_json: &str) -> PyResult<Option<(PathBuf, String)>> {
    let target = parse_target(target_json)?;
    store::find_model(root, &target)?.map(to_pair).transpose()
}

#[pyfunction]
pub fn load_hparams_json(save_dir: PathBuf) -> PyResult<Option<String>> {
    match store::load_hparams(save_dir)? {
        Some(hp) => serde_json::to_string(hp.values())
            .map(Some)
            .map_err(|e| PyValueError::new_err(e.to_string())),
        None => Ok(None),
    }
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mkdir_p, m)?)?;
    m.add_function(wrap_pyfunction!(valid_model_dirs, m)?)?;
    m.add_function(wrap_pyfunction!(find_all_models, m)?)?;
    m.add_function(wrap_pyfunction!(find_model, m)?)?;
    m.add_function(wrap_pyfunction!(load_hparams_json, m)?)?;
    Ok(())
}
