//! Site configuration.
//!
//! Handles loading and validating `config.toml`. Stock defaults are
//! overridden by an optional `config.toml`, which in turn is overridden by
//! environment variables and command-line flags (see `main.rs`):
//!
//! ```text
//! CLI flag  >  env var  >  config.toml  >  stock defaults
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [source]
//! path = "wine.xlsx"            # Spreadsheet with the product list
//! sheet = "Лист1"               # Sheet to read
//! category_field = "Категория"  # Column the page is grouped by
//!
//! [site]
//! title = "Новое русское вино"
//! foundation_year = 1920        # "Уже N лет с вами" counts from here
//! output = "index.html"         # Generated page, overwritten on each build
//! images_dir = "images"         # Where `Картинка` file names are resolved
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where the product data comes from.
    pub source: SourceConfig,
    /// Page content and output location.
    pub site: PageConfig,
    /// Static file server settings.
    pub server: ServerConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.sheet.is_empty() {
            return Err(ConfigError::Validation("source.sheet must not be empty".into()));
        }
        if self.source.category_field.is_empty() {
            return Err(ConfigError::Validation("source.category_field must not be empty".into()));
        }
        if self.site.output.as_os_str().is_empty() {
            return Err(ConfigError::Validation("site.output must not be empty".into()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub sheet: String,
    pub category_field: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wine.xlsx"),
            sheet: "Лист1".to_string(),
            category_field: crate::types::CATEGORY_FIELD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub title: String,
    pub foundation_year: i32,
    pub output: PathBuf,
    /// Prefix for product image URLs. Relative to the served directory.
    pub images_dir: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Новое русское вино".to_string(),
            foundation_year: 1920,
            output: PathBuf::from("index.html"),
            images_dir: "images".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// `host:port` as accepted by `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load `config.toml` from `dir`, falling back to defaults for anything the
/// file leaves out.
///
/// Relative `source.path` and `site.output` values written in the file are
/// resolved against `dir`, so a config directory can carry its own
/// spreadsheet. Defaults stay relative to the working directory.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let table: toml::Table = toml::from_str(&content)?;
    let sets = |section: &str, key: &str| table.get(section).and_then(|s| s.get(key)).is_some();
    let (file_sets_source, file_sets_output) = (sets("source", "path"), sets("site", "output"));

    let mut config: SiteConfig = toml::Value::Table(table).try_into()?;
    if file_sets_source {
        config.source.path = dir.join(&config.source.path);
    }
    if file_sets_output {
        config.site.output = dir.join(&config.site.output);
    }
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# wine-site configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Precedence: command-line flag > environment variable > this file > defaults.
# Unknown keys will cause an error. Relative `path` and `output` values set
# here are resolved against the directory holding this file.

# ---------------------------------------------------------------------------
# Product data
# ---------------------------------------------------------------------------
[source]
# Spreadsheet (xlsx, xls, xlsb or ods). Env: WINE_DATA_PATH, flag: --file-path
path = "wine.xlsx"

# Sheet to read. Env: WINE_SHEET_NAME, flag: --sheet-name
sheet = "Лист1"

# Column the page is grouped by. Every row must have it.
category_field = "Категория"

# ---------------------------------------------------------------------------
# Generated page
# ---------------------------------------------------------------------------
[site]
title = "Новое русское вино"

# The headline counts whole years since this year.
foundation_year = 1920

# Output file, overwritten on every build.
output = "index.html"

# Directory holding the product images named in the `Картинка` column.
images_dir = "images"

# ---------------------------------------------------------------------------
# Static file server
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
# Flag: --port
port = 8000
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.source.path, PathBuf::from("wine.xlsx"));
        assert_eq!(config.source.sheet, "Лист1");
        assert_eq!(config.source.category_field, "Категория");
        assert_eq!(config.site.foundation_year, 1920);
        assert_eq!(config.site.output, PathBuf::from("index.html"));
        assert_eq!(config.server.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[source]
sheet = "Вина"
"#,
        )
        .unwrap();
        assert_eq!(config.source.sheet, "Вина");
        assert_eq!(config.source.path, PathBuf::from("wine.xlsx"));
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
foundation_year = 1995

[server]
port = 9090
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.foundation_year, 1995);
        assert_eq!(config.server.port, 9090);
        // Unspecified values keep their defaults
        assert_eq!(config.site.title, "Новое русское вино");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[server]\nport = 0\n").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_sheet_name_rejected() {
        let mut config = SiteConfig::default();
        config.source.sheet.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_paths_resolve_against_config_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("shop");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.toml"),
            "[source]\npath = \"data/wine.xlsx\"\n\n[site]\noutput = \"public/index.html\"\n",
        )
        .unwrap();

        let config = load_config(&dir).unwrap();
        assert_eq!(config.source.path, dir.join("data/wine.xlsx"));
        assert_eq!(config.site.output, dir.join("public/index.html"));
    }

    #[test]
    fn absolute_and_default_paths_are_not_rebased() {
        let tmp = TempDir::new().unwrap();
        let absolute = tmp.path().join("elsewhere.xlsx");
        fs::write(
            tmp.path().join("config.toml"),
            format!("[source]\npath = {:?}\n", absolute.to_str().unwrap()),
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.source.path, absolute);
        assert_eq!(config.site.output, PathBuf::from("index.html"));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[source]\nsheat = \"x\"\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[sorce]\npath = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[site]\ntitel = \"x\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }
}
