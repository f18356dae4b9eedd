use std::fs;

use spendlog_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_sensible_values() {
    let cfg = Config::default();

    assert_eq!(cfg.currency_symbol, "$");
    assert_eq!(cfg.store_file, "expenses.json");
    assert_eq!(cfg.dashboard_top_categories, 3);
    assert!(cfg.preview_rows > 0);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("cfg")).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(!manager.config_path().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.currency_symbol = "€".to_string();
    cfg.set("data_dir", "/srv/spendlog").expect("set");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "preview_rows": 12 }"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert_eq!(loaded.preview_rows, 12);
    assert_eq!(loaded.currency_symbol, "$");
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "[1, 2").expect("write");

    assert!(matches!(
        ConfigManager::new(path).load(),
        Err(ConfigError::Serde(_))
    ));
}
