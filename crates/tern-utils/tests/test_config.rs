//! Tests for configuration handling.

use std::fs;
use tempfile::TempDir;
use tern_utils::{CONFIG_FILE, Config};

#[test]
fn test_config_new() {
    let config = Config::new("test-project");
    assert_eq!(config.package.name, "test-project");
    assert_eq!(config.package.version, "0.1.0");
    assert_eq!(config.package.edition, "2026");
    assert_eq!(config.lowering.literal_prefix, "gstr");
    assert!(config.lowering.verify);
}

#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(CONFIG_FILE);

    let mut config = Config::new("test-project");
    config.lowering.literal_prefix = "str".to_string();
    config.save(&config_path).unwrap();

    let loaded = Config::load(&config_path).unwrap();
    assert_eq!(loaded.package.name, "test-project");
    assert_eq!(loaded.package.edition, "2026");
    assert_eq!(loaded.lowering.literal_prefix, "str");
}

#[test]
fn test_lowering_section_is_optional() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(CONFIG_FILE);
    fs::write(
        &config_path,
        "[package]\nname = \"bare\"\nversion = \"1.0.0\"\n",
    )
    .unwrap();

    let loaded = Config::load(&config_path).unwrap();
    assert_eq!(loaded.package.edition, "2026");
    assert_eq!(loaded.lowering.literal_prefix, "gstr");
    assert!(loaded.lowering.verify);

    fs::write(
        &config_path,
        "[package]\nname = \"partial\"\nversion = \"1.0.0\"\n\n[lowering]\nverify = false\n",
    )
    .unwrap();
    let loaded = Config::load(&config_path).unwrap();
    assert!(!loaded.lowering.verify);
    assert_eq!(loaded.lowering.literal_prefix, "gstr");
}

#[test]
fn test_invalid_config_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(CONFIG_FILE);
    fs::write(&config_path, "[package\n").unwrap();

    let err = Config::load(&config_path).unwrap_err();
    assert!(err.to_string().contains(CONFIG_FILE));
}

#[test]
fn test_config_find_from_subdirectory() {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path();

    let config = Config::new("find-test");
    config.save(project_dir.join(CONFIG_FILE)).unwrap();

    let sub_dir = project_dir.join("src").join("nested");
    fs::create_dir_all(&sub_dir).unwrap();

    let (found_config, found_dir) = Config::find_from(&sub_dir).unwrap();
    assert_eq!(found_config.package.name, "find-test");
    assert_eq!(found_dir, project_dir);
}
