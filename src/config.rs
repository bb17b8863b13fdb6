// Runtime configuration
// Loaded from TOML. A missing file means defaults; a malformed one is an error.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at the config file.
pub const CONFIG_ENV: &str = "PERFUME_CATALOG_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

/// Where the base sequence comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Fixture,
    Csv,
    Sqlite,
}

/// What to show when the provider fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    Fixture,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceKind,
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub fallback: Fallback,
    pub server_addr: String,
    /// Directory served for image references such as `/amber-noir.jpg`.
    pub static_dir: PathBuf,
    pub log_level: String,
    /// Log destination for the TUI (the terminal is owned by the UI).
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: SourceKind::Fixture,
            csv_path: PathBuf::from("perfumes.csv"),
            db_path: PathBuf::from("catalog.db"),
            fallback: Fallback::Fixture,
            server_addr: "0.0.0.0:3000".to_string(),
            static_dir: PathBuf::from("public"),
            log_level: "info".to_string(),
            log_file: PathBuf::from("perfume-catalog.log"),
        }
    }
}

impl Config {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Resolves the config path from `PERFUME_CATALOG_CONFIG`, else `./catalog.toml`.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }
}
