use crate::error::ToolsError;
use crate::store::*;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;


fn as_map(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(map) => map,
        _ => unreachable!("expected a JSON object"),
    }
}

/// `dir` 을 만들고 체크포인트 표시 파일과 hparams.json 을 씁니다.
pub(crate) fn make_model_dir(dir: &Path, hp: Value) -> HParams {
    mkdir_p(dir).unwrap();
    fs::write(dir.join("model.ckpt.index"), b"").unwrap();
    let hparams = HParams::from(as_map(hp));
    save_hparams(&hparams, dir).unwrap();
    hparams
}

#[test_log::test]
fn test_mkdir_p_creates_nested() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("a").join("b").join("c");
    mkdir_p(&path).unwrap();
    assert!(path.is_dir());
}

#[test_log::test]
fn test_mkdir_p_is_idempotent() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("exists");
    mkdir_p(&path).unwrap();
    mkdir_p(&path).unwrap();
    assert!(path.is_dir());
}

#[test_log::test]
fn test_mkdir_p_on_file_fails() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("file");
    fs::write(&path, b"x").unwrap();
    let err = mkdir_p(&path).unwrap_err();
    assert!(matches!(err, ToolsError::Io { .. }));
}

#[test_log::test]
fn test_load_missing_returns_none() {
    let tmp = tempdir().unwrap();
    assert!(load_log(tmp.path()).unwrap().is_none());
    assert!(load_hparams(tmp.path()).unwrap().is_none());
}

#[test_log::test]
fn test_log_round_trip() {
    let tmp = tempdir().unwrap();
    let mut log = TrainingLog::new(tmp.path());
    log.trials = vec![0, 640, 1280];
    log.times = vec![0.0, 12.5, 25.1];
    log.perf_min = vec![0.1, 0.55, 0.93];
    log.cost_min = vec![2.3, 0.8, 0.2];
    log.push_metric("perf_fdgo", 0.97);
    log.push_metric("perf_fdgo", 0.99);

    save_log(&log).unwrap();
    assert!(tmp.path().join("log.pkl").is_file());

    let loaded = load_log(tmp.path()).unwrap().unwrap();
    assert_eq!(loaded, log);
    assert_eq!(loaded.last_perf_min(), Some(0.93));
    assert_eq!(loaded.series("perf_fdgo"), Some(&[0.97, 0.99][..]));
    assert_eq!(loaded.series("perf_min"), Some(&[0.1, 0.55, 0.93][..]));
    assert_eq!(loaded.series("missing"), None);
}

#[test_log::test]
fn test_save_log_into_missing_dir_fails() {
    let tmp = tempdir().unwrap();
    let log = TrainingLog::new(tmp.path().join("nope"));
    assert!(matches!(save_log(&log), Err(ToolsError::Io { .. })));
}

#[test_log::test]
fn test_corrupt_log_is_error() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("log.pkl"), b"\x01").unwrap();
    assert!(matches!(
        load_log(tmp.path()),
        Err(ToolsError::Bincode { .. })
    ));
}

#[test_log::test]
fn test_hparams_round_trip_reseeds_rng() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let tmp = tempdir().unwrap();
    let mut hp = HParams::from(as_map(json!({
        "seed": 7,
        "target_perf": 0.9,
        "activation": "softplus",
        "n_rec": 256,
        "w_rec_init": "randortho",
        "rule_trains": ["fdgo", "reactgo"],
    })));
    hp.set_rng(StdRng::seed_from_u64(7));

    save_hparams(&hp, tmp.path()).unwrap();

    // rng 는 파일에 들어가지 않음
    let raw: Map<String, Value> =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("hparams.json")).unwrap())
            .unwrap();
    assert!(!raw.contains_key("rng"));
    assert_eq!(&raw, hp.values());

    let mut loaded = load_hparams(tmp.path()).unwrap().unwrap();
    assert_eq!(loaded, hp);

    let mut expected = StdRng::seed_from_u64(1007);
    let rng = loaded.rng_mut().expect("rng attached on load");
    assert_eq!(rng.gen::<u64>(), expected.gen::<u64>());
}

#[test_log::test]
fn test_custom_seed_offset() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let tmp = tempdir().unwrap();
    let layout = StoreLayout {
        analysis_seed_offset: 5,
        ..Default::default()
    };
    let hp = HParams::from(as_map(json!({"seed": 1})));
    save_hparams_with(&layout, &hp, tmp.path()).unwrap();

    let mut loaded = load_hparams_with(&layout, tmp.path()).unwrap().unwrap();
    let mut expected = StdRng::seed_from_u64(6);
    assert_eq!(
        loaded.rng_mut().unwrap().gen::<u64>(),
        expected.gen::<u64>()
    );
}

#[test_log::test]
fn test_load_hparams_without_seed_fails() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("hparams.json"), r#"{"n_rec": 64}"#).unwrap();
    assert!(matches!(
        load_hparams(tmp.path()),
        Err(ToolsError::MissingField("seed"))
    ));
}

#[test_log::test]
fn test_load_hparams_bad_json() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("hparams.json"), "{not json").unwrap();
    assert!(matches!(
        load_hparams(tmp.path()),
        Err(ToolsError::Json { .. })
    ));
}
