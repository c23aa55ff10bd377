//! Configuration resolution and graceful degradation
//!
//! Tests that manipulate TUNEFUL_ROOT_FOLDER are marked with #[serial]
//! so they run sequentially, not in parallel.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tuneful_common::config::{
    get_default_root_folder, load_toml_config, parse_toml_config, resolve_root_folder,
    ConfigSource, RootFolder, TomlConfig, DEFAULT_MAX_UPLOAD_BYTES, ROOT_FOLDER_ENV,
};
use tuneful_common::Error;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(root_folder, get_default_root_folder());
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/tuneful-test-env-folder");

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/tuneful-from-toml")),
        ..TomlConfig::default()
    };
    let root_folder = resolve_root_folder(None, &config);
    assert_eq!(root_folder, PathBuf::from("/tmp/tuneful-test-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_used_without_env() {
    env::remove_var(ROOT_FOLDER_ENV);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/tuneful-from-toml")),
        ..TomlConfig::default()
    };
    assert_eq!(
        resolve_root_folder(None, &config),
        PathBuf::from("/tmp/tuneful-from-toml")
    );
}

#[test]
fn test_missing_toml_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.toml");
    let (config, source) = load_toml_config(Some(&absent)).unwrap();

    assert!(config.root_folder.is_none());
    assert!(config.port.is_none());
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);

    // Reported to the caller so the warning can be logged after tracing starts
    assert_eq!(source, ConfigSource::Missing(absent));
    assert!(source.is_default());
}

#[test]
fn test_full_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/tuneful"
host = "127.0.0.1"
port = 9000
upload_folder = "media"
public_url = "https://music.example.com"
max_upload_bytes = 1024

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let (config, source) = load_toml_config(Some(&path)).unwrap();
    assert_eq!(source, ConfigSource::File(path.clone()));
    assert!(!source.is_default());
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/tuneful")));
    assert_eq!(config.host.as_deref(), Some("127.0.0.1"));
    assert_eq!(config.port, Some(9000));
    assert_eq!(config.public_url.as_deref(), Some("https://music.example.com"));
    assert_eq!(config.max_upload_bytes, 1024);
    assert_eq!(config.logging.level, "debug");

    let root = RootFolder::new(config.root_folder.clone().unwrap());
    assert_eq!(root.upload_path(&config), PathBuf::from("/srv/tuneful/media"));
    assert_eq!(root.database_path(), PathBuf::from("/srv/tuneful/tuneful.db"));
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = parse_toml_config("port = 8081\n").unwrap();
    assert_eq!(config.port, Some(8081));
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
}

#[test]
fn test_malformed_toml_is_config_error() {
    let result = parse_toml_config("port = \"not a number\"");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_malformed_toml_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = [").unwrap();

    let result = load_toml_config(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_root_folder_created() {
    let dir = tempfile::tempdir().unwrap();
    let root = RootFolder::new(dir.path().join("nested").join("root"));

    root.ensure_directory_exists().unwrap();
    assert!(root.path().is_dir());

    // Idempotent
    root.ensure_directory_exists().unwrap();
}
