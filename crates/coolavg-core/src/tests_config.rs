use crate::config::{ConfigError, UnitConfig, DEFAULT_COOLDOWN_MS, DEFAULT_WINDOW_SIZE};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

// `load` reads the process environment; serialize every test that calls it.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn defaults_match_fixed_values() {
    let cfg = UnitConfig::default();
    assert_eq!(cfg.window_size, DEFAULT_WINDOW_SIZE);
    assert_eq!(cfg.window_size, 3);
    assert_eq!(cfg.cooldown_ms, DEFAULT_COOLDOWN_MS);
    assert_eq!(cfg.cooldown(), Duration::from_millis(1000));
}

#[test]
fn toml_partial_keeps_defaults() {
    let cfg = UnitConfig::from_toml_str("cooldown_ms = 250\n").unwrap();
    assert_eq!(cfg.cooldown_ms, 250);
    assert_eq!(cfg.window_size, 3);
}

#[test]
fn zero_window_rejected() {
    let err = UnitConfig::from_toml_str("window_size = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = UnitConfig::from_toml_str("window_size = \"three\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coolavg.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "window_size = 5").unwrap();
    writeln!(f, "cooldown_ms = 1500").unwrap();
    drop(f);

    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let cfg = UnitConfig::load(Some(&path)).unwrap();
    assert_eq!(cfg.window_size, 5);
    assert_eq!(cfg.cooldown_ms, 1500);
}

#[test]
fn load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let err = UnitConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coolavg.toml");
    std::fs::write(&path, "window_size = 4\ncooldown_ms = 1500\n").unwrap();

    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("COOLAVG_COOLDOWN_MS", "250");
    let with_file = UnitConfig::load(Some(&path));
    let env_only = UnitConfig::load(None);
    std::env::remove_var("COOLAVG_COOLDOWN_MS");

    let with_file = with_file.unwrap();
    assert_eq!(with_file.cooldown_ms, 250);
    assert_eq!(with_file.window_size, 4);
    let env_only = env_only.unwrap();
    assert_eq!(env_only.cooldown_ms, 250);
    assert_eq!(env_only.window_size, 3);
}
