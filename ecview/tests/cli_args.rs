//! CLI tests for the ecview binary (paths that exit before the TUI starts).
use std::process::Command;

fn run_ecview(args: &[&str]) -> (Option<i32>, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_ecview"))
        .args(args)
        .output()
        .expect("run ecview");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.code(), text)
}

#[test]
fn test_help_mentions_flags() {
    let (code, text) = run_ecview(&["--help"]);
    assert_eq!(code, Some(0));
    assert!(
        text.contains("Usage:")
            && text.contains("--config")
            && text.contains("-c")
            && text.contains("--window")
            && text.contains("--demo"),
        "help text missing expected flags\n{text}"
    );
}

#[test]
fn test_bad_arguments_exit_2() {
    let (code, text) = run_ecview(&["--window", "lots"]);
    assert_eq!(code, Some(2), "{text}");
    let (code, _) = run_ecview(&["--bogus"]);
    assert_eq!(code, Some(2));
}

#[test]
fn test_init_config_writes_effective_values() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("ecview").join("config.json");
    let path_s = path.to_string_lossy().to_string();
    let (code, text) = run_ecview(&[
        "--config",
        &path_s,
        "--window",
        "42",
        "--interval-ms=500",
        "/tmp/some-feed",
        "--init-config",
    ]);
    assert_eq!(code, Some(0), "{text}");
    let data = std::fs::read_to_string(&path).expect("config written");
    let v: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(v["window"], 42);
    assert_eq!(v["interval_ms"], 500);
    assert_eq!(v["source"], "/tmp/some-feed");
    assert_eq!(v["display"]["series_names"][0], "WATTMETER");
}

#[test]
fn test_invalid_config_is_reported() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("config.json");
    std::fs::write(&path, r#"{"window": 0}"#).unwrap();
    let (code, text) = run_ecview(&["--config", &path.to_string_lossy(), "--init-config"]);
    assert_ne!(code, Some(0));
    assert!(text.contains("window"), "{text}");
}
