//! Run directory inspection

use std::fs;

use runscope::run::RunRecord;

#[test]
fn test_inspect_full_run_directory() {
    let dir = tempfile::tempdir().unwrap();
    let run_dir = dir.path().join("seed-00001-2025-11-19-13-26-03");
    fs::create_dir_all(run_dir.join("logs/agent0")).unwrap();
    fs::create_dir_all(run_dir.join("logs/critic")).unwrap();
    fs::create_dir_all(run_dir.join("models/actor_agent0")).unwrap();
    fs::write(run_dir.join("models/critic_agent.pt"), b"").unwrap();
    fs::write(
        run_dir.join("config.json"),
        r#"{
            "main_args": {"algo": "happo"},
            "env_args": {"num_envs": 500, "episode_length": 200},
            "algo_args": {"train": {"num_env_steps": 100000000}}
        }"#,
    )
    .unwrap();

    let run = RunRecord::inspect(&run_dir).unwrap().expect("run exists");

    assert_eq!(run.run_id(), "seed-00001-2025-11-19-13-26-03");
    assert_eq!(run.log_entries(), Some(&["agent0".to_string(), "critic".to_string()][..]));
    assert_eq!(run.checkpoint_count(), Some(2));
    assert_eq!(run.algorithm().and_then(|v| v.as_str()), Some("happo"));
    assert_eq!(run.num_envs().and_then(serde_json::Value::as_u64), Some(500));
    assert_eq!(run.episode_length().and_then(serde_json::Value::as_u64), Some(200));
    assert_eq!(
        run.total_steps().and_then(serde_json::Value::as_u64),
        Some(100_000_000)
    );
}

#[test]
fn test_inspect_bare_run_directory() {
    let dir = tempfile::tempdir().unwrap();

    let run = RunRecord::inspect(dir.path()).unwrap().unwrap();

    assert!(run.log_entries().is_none());
    assert!(run.checkpoint_count().is_none());
    assert!(run.config().is_none());
    assert!(run.algorithm().is_none());
}

#[test]
fn test_inspect_invalid_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    assert!(RunRecord::inspect(dir.path()).is_err());
}
