use crate::constants;
use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with binary-column values greater than 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOverflow {
    #[default]
    Zero,
    One,
}

impl BinaryOverflow {
    pub fn replacement(self) -> i64 {
        match self {
            BinaryOverflow::Zero => 0,
            BinaryOverflow::One => 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table_name: String,
    pub category_delimiter: char,
    pub binary_column: String,
    pub binary_overflow: BinaryOverflow,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directive: String,
    /// Directory for a daily-rotated JSON log; console only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: constants::DEFAULT_TABLE_NAME.to_string(),
            category_delimiter: constants::DEFAULT_CATEGORY_DELIMITER,
            binary_column: constants::DEFAULT_BINARY_COLUMN.to_string(),
            binary_overflow: BinaryOverflow::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directive: constants::DEFAULT_LOG_DIRECTIVE.to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load from a TOML file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(config_path) = path else {
            return Ok(Self::default());
        };
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        if config.table_name.trim().is_empty() {
            return Err(EtlError::Config("table_name must not be empty".into()));
        }
        Ok(config)
    }
}
