use super::hparams::{load_hparams_with, HParams};
use super::train_log::load_log_with;
use super::StoreLayout;
use crate::error::{Result, ToolsError};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// 하이퍼파라미터 조건을 만족한 모델 디렉터리
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMatch {
    pub dir: PathBuf,
    pub hparams: HParams,
}

/// 디렉터리 한 층을 읽어 (체크포인트 여부, 하위 디렉터리 목록) 을 돌려줍니다.
fn scan_dir(dir: &Path, marker: &str) -> std::io::Result<(bool, Vec<PathBuf>)> {
    let mut subdirs = Vec::new();
    let mut has_ckpt = false;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().contains(marker) {
            has_ckpt = true;
        }
        if entry.file_type()?.is_dir() {
            subdirs.push(entry.path());
        }
    }
    subdirs.sort();
    Ok((has_ckpt, subdirs))
}

/// 디렉터리 안에 이름에 `marker` 가 들어간 파일이 있는지 확인
pub fn contains_model_file<P: AsRef<Path>>(dir: P, marker: &str) -> Result<bool> {
    let dir = dir.as_ref();
    scan_dir(dir, marker)
        .map(|(has_ckpt, _)| has_ckpt)
        .map_err(|e| ToolsError::io(dir, e))
}

pub fn valid_model_dirs<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    valid_model_dirs_with(&StoreLayout::default(), root)
}

/// `root` 아래(자기 자신 포함) 체크포인트 파일을 가진 모든 디렉터리.
///
/// 위에서 아래로 순회하며, 같은 층의 디렉터리는 이름 순입니다.
/// 심볼릭 링크된 디렉터리는 따라가지 않습니다. 읽을 수 없는 디렉터리(없는 `root` 포함)는
/// 건너뛰므로 그 경우 빈 목록이 됩니다.
pub fn valid_model_dirs_with<P: AsRef<Path>>(
    layout: &StoreLayout,
    root: P,
) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(root.as_ref(), &layout.checkpoint_marker, &mut found);
    Ok(found)
}

fn walk(dir: &Path, marker: &str, found: &mut Vec<PathBuf>) {
    let (has_ckpt, subdirs) = match scan_dir(dir, marker) {
        Ok(scanned) => scanned,
        Err(e) => {
            debug!("skipping unreadable directory {}: {}", dir.display(), e);
            return;
        }
    };

    if has_ckpt {
        found.push(dir.to_path_buf());
    }
    for sub in subdirs {
        walk(&sub, marker, found);
    }
}

pub fn find_all_models<P: AsRef<Path>>(
    root_dir: P,
    hp_target: &Map<String, Value>,
) -> Result<Vec<ModelMatch>> {
    find_all_models_with(&StoreLayout::default(), root_dir, hp_target)
}

/// `hp_target` 의 하이퍼파라미터를 모두 만족하는 모델을 찾습니다.
///
/// 결과 순서는 [`valid_model_dirs_with`] 의 순서를 따릅니다.
/// 하이퍼파라미터 파일이 없는 디렉터리는 건너뜁니다.
pub fn find_all_models_with<P: AsRef<Path>>(
    layout: &StoreLayout,
    root_dir: P,
    hp_target: &Map<String, Value>,
) -> Result<Vec<ModelMatch>> {
    let dirs = valid_model_dirs_with(layout, root_dir)?;

    let loaded: Vec<Option<ModelMatch>> = dirs
        .into_par_iter()
        .map(|dir| -> Result<Option<ModelMatch>> {
            let hp = match load_hparams_with(layout, &dir)? {
                Some(hp) => hp,
                None => {
                    debug!("no {} in {}, skipping", layout.hparams_file, dir.display());
                    return Ok(None);
                }
            };
            Ok(hp.matches(hp_target).then_some(ModelMatch { dir, hparams: hp }))
        })
        .collect::<Result<_>>()?;

    Ok(loaded.into_iter().flatten().collect())
}

pub fn find_model<P: AsRef<Path>>(
    root_dir: P,
    hp_target: &Map<String, Value>,
) -> Result<Option<ModelMatch>> {
    find_model_with(&StoreLayout::default(), root_dir, hp_target)
}

/// 조건을 만족하는 모델 하나를 찾습니다.
///
/// 후보가 여럿이면 순회 순서상 첫 번째를 고릅니다. 고른 모델의 마지막 `perf_min` 이
/// `target_perf` 에 못 미치면 경고만 남기고 그대로 반환합니다.
pub fn find_model_with<P: AsRef<Path>>(
    layout: &StoreLayout,
    root_dir: P,
    hp_target: &Map<String, Value>,
) -> Result<Option<ModelMatch>> {
    let matches = find_all_models_with(layout, root_dir, hp_target)?;
    if matches.len() > 1 {
        debug!("{} models match, using the first", matches.len());
    }

    let Some(found) = matches.into_iter().next() else {
        info!("Model not found");
        return Ok(None);
    };

    if reached_target_perf(layout, &found)? == Some(false) {
        warn!(
            "the network found in {} did not reach target performance",
            found.dir.display()
        );
    }
    Ok(Some(found))
}

/// 마지막 `perf_min` 이 `target_perf` 이상인지 확인합니다.
///
/// 로그나 `target_perf` 가 없거나 `perf_min` 이 비어 있으면 `None`.
pub fn reached_target_perf(layout: &StoreLayout, found: &ModelMatch) -> Result<Option<bool>> {
    let Some(log) = load_log_with(layout, &found.dir)? else {
        debug!("no training log in {}", found.dir.display());
        return Ok(None);
    };

    let Ok(target) = found.hparams.target_perf() else {
        debug!("no target_perf for {}", found.dir.display());
        return Ok(None);
    };

    Ok(log.last_perf_min().map(|perf| {
        debug!("{}: perf_min {} / target {}", found.dir.display(), perf, target);
        !(perf < target)
    }))
}
