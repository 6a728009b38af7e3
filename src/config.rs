//! critsql configuration.
//!
//! Read from TOML. Lookup order: `$CRITSQL_CONFIG`, `./critsql.toml`, then
//! `<config dir>/critsql/config.toml`. A missing file means defaults.
//!
//! ```toml
//! [types]
//! varchar_size = 255
//! numeric_precision = 18
//! numeric_scale = 2
//!
//! [output]
//! color = true
//! format = "sql"
//!
//! [log]
//! filter = "warn"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CritError, CritResult};
use crate::types::{DEFAULT_NUMERIC_PRECISION, DEFAULT_NUMERIC_SCALE, DEFAULT_VARCHAR_SIZE};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CRITSQL_CONFIG";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub types: TypeDefaults,
    pub output: OutputConfig,
    pub log: LogConfig,
}

/// Sizes used when a field declares none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDefaults {
    pub varchar_size: u32,
    pub numeric_precision: u32,
    pub numeric_scale: u32,
}

impl Default for TypeDefaults {
    fn default() -> Self {
        Self {
            varchar_size: DEFAULT_VARCHAR_SIZE,
            numeric_precision: DEFAULT_NUMERIC_PRECISION,
            numeric_scale: DEFAULT_NUMERIC_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Colorize terminal output
    pub color: bool,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Sql,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Sql,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` env-filter directive
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> CritResult<Self> {
        toml::from_str(content).map_err(|e| CritError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> CritResult<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CritError::Config(format!("{}: {}", path.display(), e)))
    }

    /// First config file that exists, following the lookup order.
    ///
    /// An explicit `$CRITSQL_CONFIG` is returned even if missing, so that
    /// loading it reports the error instead of silently using defaults.
    pub fn locate() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        let local = PathBuf::from("critsql.toml");
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("critsql").join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Load the located config file, or defaults when there is none.
    pub fn discover() -> CritResult<Self> {
        match Self::locate() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn with_types(mut self, types: TypeDefaults) -> Self {
        self.types = types;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }
}
