use std::io::Write;
use std::path::PathBuf;

use lightlimit::config::{Config, LogTarget};
use lightlimit::Error;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.monitor.refresh_ms, 500);
    assert_eq!(config.monitor.max_processes, 500);
    assert_eq!(config.monitor.command_width, 50);
    assert_eq!(config.monitor.proc_root, PathBuf::from("/proc"));
    assert_eq!(config.limits.period_us, 100_000);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let toml_content = r#"
[monitor]
refresh_ms = 1000
high_threshold = 75.0

[logging]
file = "/tmp/lightlimit.log"
"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(toml_content.as_bytes()).unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.monitor.refresh_ms, 1000);
    assert_eq!(config.monitor.high_threshold, 75.0);
    assert_eq!(config.monitor.medium_threshold, 20.0);
    assert_eq!(config.monitor.max_processes, 500);
    assert_eq!(config.limits.cgroup_base, PathBuf::from("/sys/fs/cgroup/cpu/lightlimit"));
    assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/lightlimit.log")));
}

#[test]
fn test_invalid_toml_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[monitor]\nrefresh_ms = \"fast\"\n").unwrap();
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::resolve(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, Error::ConfigIo { .. }));
}

#[test]
fn test_round_trip_through_toml() {
    let config = Config::default();
    let text = toml::to_string_pretty(&config).unwrap();
    let loaded: Config = toml::from_str(&text).unwrap();
    assert_eq!(loaded.monitor.refresh_ms, config.monitor.refresh_ms);
    assert_eq!(loaded.limits.cgroup_base, config.limits.cgroup_base);
}

#[test]
fn test_cli_commands_log_to_stderr_even_with_file() {
    let mut config = Config::default();
    config.logging.file = Some(PathBuf::from("/tmp/lightlimit.log"));
    assert_eq!(config.logging.target(false), LogTarget::Stderr);
    assert_eq!(
        config.logging.target(true),
        LogTarget::File(PathBuf::from("/tmp/lightlimit.log"))
    );
}

#[test]
fn test_monitor_without_file_discards_logs() {
    let config = Config::default();
    assert_eq!(config.logging.target(true), LogTarget::Discard);
    assert_eq!(config.logging.target(false), LogTarget::Stderr);
}
