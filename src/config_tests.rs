//! Tests for config loading

use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_missing_file_returns_defaults_silently() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config_from(&dir.path().join("config.toml"));

    assert_eq!(result.config, Config::default());
    assert!(result.warning.is_none());
}

#[test]
fn test_valid_file_is_loaded() {
    let file = write_config(
        r#"
[generation]
endpoint = "http://localhost:3000/api/chat"

[history]
max_size = 20
"#,
    );
    let result = load_config_from(file.path());

    assert!(result.warning.is_none());
    assert!(result.config.generation.is_configured());
    assert_eq!(result.config.history.max_size, 20);
}

#[test]
fn test_malformed_file_returns_defaults_with_warning() {
    let file = write_config("[history\nmax_size = 5");
    let result = load_config_from(file.path());

    assert_eq!(result.config, Config::default());
    let warning = result.warning.unwrap();
    assert!(warning.starts_with("Invalid config:"), "got: {}", warning);
}

#[test]
fn test_unreadable_path_returns_defaults_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config_from(dir.path());

    assert_eq!(result.config, Config::default());
    assert!(result.warning.unwrap().starts_with("Failed to read config:"));
}

#[test]
fn test_config_path_is_stable() {
    let path = get_config_path();
    assert_eq!(path, get_config_path());
    assert!(path.ends_with(".config/draftwise/config.toml"));
}
