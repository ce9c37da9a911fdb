//! Integration tests for layered Settings loading.
//!
//! These tests never read the real global config: the global layer is
//! either skipped or pointed at a temp file.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use taxotree::application::ApplicationError;
use taxotree::config::{local_config_path, Settings};

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "delimiter = \";\"\nhas_header = true\nlist_width = 42\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.delimiter, ';');
    assert!(settings.has_header);
    assert_eq!(settings.list_width, 42);
    assert_eq!(settings.table_format().delimiter, b';');
}

#[test]
fn given_global_and_local_when_load_then_local_wins_per_key() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("global.toml");
    fs::write(&global, "input = \"global.csv\"\nlist_width = 50\n").unwrap();
    fs::write(local_config_path(dir.path()), "input = \"local.csv\"\n").unwrap();

    let settings = Settings::load_from(Some(&global), Some(dir.path())).unwrap();

    assert_eq!(settings.input, Some(PathBuf::from("local.csv")));
    assert_eq!(settings.list_width, 50);
}

#[test]
fn given_missing_files_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("absent.toml");

    let settings = Settings::load_from(Some(&global), Some(dir.path())).unwrap();

    assert_eq!(settings.snapshot, Settings::default().snapshot);
    assert_eq!(settings.delimiter, ',');
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "list_width = [not toml").unwrap();

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_zero_width_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "list_width = 0\n").unwrap();

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

/// The only test in this binary touching TAXOTREE_* variables.
#[test]
fn given_env_var_when_load_then_overrides_files() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "list_height = 20\n").unwrap();
    std::env::set_var("TAXOTREE_LIST_HEIGHT", "7");

    let settings = Settings::load_from(None, Some(dir.path()));
    std::env::remove_var("TAXOTREE_LIST_HEIGHT");

    assert_eq!(settings.unwrap().list_height, 7);
}
