//! # 입력 배치 구성
//!
//! trial 하나를 모델 평가 단계에 넣을 텐서 묶음으로 바꿉니다.
//! 입력 인코딩은 두 가지입니다.
//!
//! - `normal`: 배열을 그대로 전달
//! - `multi`: 규칙마다 `rule_start` 크기의 블록을 두고, 각 샘플의 입력을
//!   활성 규칙의 블록에만 복사

use crate::error::{Result, ToolsError};
use crate::store::HParams;
use ndarray::{s, Array2, Array3, ArrayView1, ArrayView3, Axis};
use rayon::prelude::*;
use std::str::FromStr;

/// 시간 축이 먼저 오는 trial 배열 묶음
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    /// 입력 `[T, B, N_in]`
    pub x: Array3<f32>,
    /// 목표 출력 `[T, B, N_out]`
    pub y: Array3<f32>,
    /// 비용 마스크
    pub c_mask: Array2<f32>,
}

impl Trial {
    /// `x` 와 `y` 의 `[T, B]` 가 다르면 에러
    pub fn new(x: Array3<f32>, y: Array3<f32>, c_mask: Array2<f32>) -> Result<Self> {
        let (tx, bx, _) = x.dim();
        let (ty, by, _) = y.dim();
        if (tx, bx) != (ty, by) {
            return Err(ToolsError::Shape(format!(
                "x is [{}, {}, _] but y is [{}, {}, _]",
                tx, bx, ty, by
            )));
        }
        Ok(Self { x, y, c_mask })
    }
}

/// 모델에 넣을 텐서 묶음
#[derive(Debug, Clone, PartialEq)]
pub struct FeedBatch {
    pub x: Array3<f32>,
    pub y: Array3<f32>,
    pub c_mask: Array2<f32>,
}

/// 입력 인코딩 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Normal,
    Multi,
}

impl FromStr for InputType {
    type Err = ToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(InputType::Normal),
            "multi" => Ok(InputType::Multi),
            other => Err(ToolsError::InvalidArgument(format!(
                "unknown in_type `{}`",
                other
            ))),
        }
    }
}

/// 배치 구성 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedConfig {
    Normal,
    Multi {
        /// 규칙 표시 구간이 시작하는 입력 인덱스 = 규칙 블록 크기
        rule_start: usize,
        /// 규칙 수
        n_rule: usize,
    },
}

impl FeedConfig {
    /// `in_type` 을 읽고, `multi` 일 때만 `rule_start`, `n_rule` 을 요구합니다.
    pub fn from_hparams(hparams: &HParams) -> Result<Self> {
        match hparams.in_type()?.parse::<InputType>()? {
            InputType::Normal => Ok(FeedConfig::Normal),
            InputType::Multi => Ok(FeedConfig::Multi {
                rule_start: hparams.rule_start()?,
                n_rule: hparams.n_rule()?,
            }),
        }
    }

    pub fn input_type(&self) -> InputType {
        match self {
            FeedConfig::Normal => InputType::Normal,
            FeedConfig::Multi { .. } => InputType::Multi,
        }
    }
}

/// hparams 의 설정에 따라 feed 텐서를 만듭니다.
pub fn gen_feed_dict(trial: &Trial, hparams: &HParams) -> Result<FeedBatch> {
    gen_feed_batch(trial, &FeedConfig::from_hparams(hparams)?)
}

pub fn gen_feed_batch(trial: &Trial, config: &FeedConfig) -> Result<FeedBatch> {
    let x = match *config {
        FeedConfig::Normal => trial.x.clone(),
        FeedConfig::Multi { rule_start, n_rule } => {
            expand_multi_input(&trial.x.view(), rule_start, n_rule)?
        }
    };

    Ok(FeedBatch {
        x,
        y: trial.y.clone(),
        c_mask: trial.c_mask.clone(),
    })
}

/// 첫 번째 최댓값의 인덱스. NaN 이 있으면 첫 NaN 의 인덱스.
fn argmax(v: &ArrayView1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &val) in v.iter().enumerate() {
        if val.is_nan() {
            return Some(i);
        }
        match best {
            Some((_, b)) if val <= b => {}
            _ => best = Some((i, val)),
        }
    }
    best.map(|(i, _)| i)
}

/// `multi` 인코딩
///
/// 입력 `[T, B, N_in]` 의 `[.., rule_start..]` 는 규칙 표시 구간입니다.
/// 샘플 `i` 의 규칙은 첫 시점 표시 구간의 argmax 이고, 출력 `[T, B, rule_start * n_rule]`
/// 에서 그 규칙의 블록에 `x[:, i, ..rule_start]` 를 복사합니다. 나머지는 0.
pub fn expand_multi_input(
    x: &ArrayView3<f32>,
    rule_start: usize,
    n_rule: usize,
) -> Result<Array3<f32>> {
    let (n_time, batch_size, n_input) = x.dim();
    if rule_start >= n_input {
        return Err(ToolsError::Shape(format!(
            "rule_start {} leaves no rule inputs in width {}",
            rule_start, n_input
        )));
    }
    if n_time == 0 && batch_size > 0 {
        return Err(ToolsError::Shape(
            "cannot infer rules from an empty time axis".to_string(),
        ));
    }

    let mut rules = Vec::with_capacity(batch_size);
    for i in 0..batch_size {
        let rule_part = x.slice(s![0, i, rule_start..]);
        let ind = argmax(&rule_part).unwrap_or(0);
        if ind >= n_rule {
            return Err(ToolsError::InvalidArgument(format!(
                "sample {} selects rule {} but n_rule is {}",
                i, ind, n_rule
            )));
        }
        rules.push(ind);
    }

    let width = rule_start.checked_mul(n_rule).ok_or_else(|| {
        ToolsError::Shape(format!(
            "rule_start {} * n_rule {} overflows",
            rule_start, n_rule
        ))
    })?;
    let mut out = Array3::<f32>::zeros((n_time, batch_size, width));
    out.axis_iter_mut(Axis(1))
        .into_par_iter()
        .zip(x.axis_iter(Axis(1)).into_par_iter())
        .zip(rules.par_iter())
        .for_each(|((mut dst, src), &ind)| {
            let start = ind * rule_start;
            dst.slice_mut(s![.., start..start + rule_start])
                .assign(&src.slice(s![.., ..rule_start]));
        });

    Ok(out)
}
