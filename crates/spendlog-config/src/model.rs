use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

const APP_DIR: &str = "spendlog";

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub locale: String,
    pub ui_color_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Directory holding the expense store. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub store_file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Where exports are written. Defaults to the downloads folder.
    pub export_dir: Option<PathBuf>,
    pub export_file_prefix: String,

    pub dashboard_top_categories: usize,
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            locale: "en-US".into(),
            ui_color_enabled: true,
            data_dir: None,
            store_file: "expenses.json".into(),
            export_dir: None,
            export_file_prefix: "expenses".into(),
            dashboard_top_categories: 3,
            preview_rows: 10,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::get`] and [`Config::set`].
    pub const KEYS: [&'static str; 9] = [
        "currency_symbol",
        "locale",
        "ui_color_enabled",
        "data_dir",
        "store_file",
        "export_dir",
        "export_file_prefix",
        "dashboard_top_categories",
        "preview_rows",
    ];

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        dirs::data_dir()
            .map(|base| base.join(APP_DIR))
            .or_else(|| dirs::home_dir().map(|home| home.join(".spendlog")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn resolve_store_path(&self) -> PathBuf {
        self.resolve_data_dir().join(&self.store_file)
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }

        dirs::download_dir()
            .or_else(dirs::document_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "currency_symbol" => self.currency_symbol.clone(),
            "locale" => self.locale.clone(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "data_dir" => self.resolve_data_dir().display().to_string(),
            "store_file" => self.store_file.clone(),
            "export_dir" => self.resolve_export_dir().display().to_string(),
            "export_file_prefix" => self.export_file_prefix.clone(),
            "dashboard_top_categories" => self.dashboard_top_categories.to_string(),
            "preview_rows" => self.preview_rows.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Updates one setting from its textual form. Path settings accept
    /// `default` to fall back to the platform directory.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "locale" if !value.is_empty() => self.locale = value.to_string(),
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(invalid()),
                }
            }
            "data_dir" => self.data_dir = optional_path(value),
            "store_file" if !value.is_empty() => self.store_file = value.to_string(),
            "export_dir" => self.export_dir = optional_path(value),
            "export_file_prefix" if !value.is_empty() => {
                self.export_file_prefix = value.to_string()
            }
            "dashboard_top_categories" => {
                self.dashboard_top_categories = positive(value).ok_or_else(invalid)?
            }
            "preview_rows" => self.preview_rows = positive(value).ok_or_else(invalid)?,
            "locale" | "store_file" | "export_file_prefix" => return Err(invalid()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() || value.eq_ignore_ascii_case("default") {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn positive(value: &str) -> Option<usize> {
    value.parse::<usize>().ok().filter(|count| *count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_win_over_platform_dirs() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/ledger")),
            store_file: "mine.json".into(),
            ..Config::default()
        };
        assert_eq!(config.resolve_store_path(), PathBuf::from("/tmp/ledger/mine.json"));
    }

    #[test]
    fn set_parses_typed_values() {
        let mut config = Config::default();
        config.set("preview_rows", "8").unwrap();
        config.set("ui_color_enabled", "off").unwrap();
        config.set("export_dir", "/tmp/out").unwrap();
        assert_eq!(config.preview_rows, 8);
        assert!(!config.ui_color_enabled);
        assert_eq!(config.get("export_dir").as_deref(), Some("/tmp/out"));

        config.set("export_dir", "default").unwrap();
        assert_eq!(config.export_dir, None);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("preview_rows", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("store_file", "  "),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("theme", "dark"),
            Err(ConfigError::UnknownKey(key)) if key == "theme"
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn every_key_is_readable() {
        let config = Config::default();
        for key in Config::KEYS {
            assert!(config.get(key).is_some(), "{key}");
        }
    }
}
