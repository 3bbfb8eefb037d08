//! Configuration for the ringlet binary.
//!
//! Supports YAML file and environment variable overrides.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

/// What to do with a name token longer than [`NAME_CAPACITY`].
///
/// [`NAME_CAPACITY`]: crate::NAME_CAPACITY
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Fail with `InputTooLong`.
    #[default]
    Reject,
    /// Keep the longest prefix that fits.
    Truncate,
}

impl FromStr for OverflowPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "truncate" => Ok(Self::Truncate),
            _ => Err(()),
        }
    }
}

/// Binary configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of companies to read before printing.
    pub records: usize,
    /// Handling of over-long names.
    pub name_overflow: OverflowPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records: 3,
            name_overflow: OverflowPolicy::Reject,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (`RINGLET_CONFIG`, default `ringlet.yaml`)
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("RINGLET_CONFIG").unwrap_or_else(|_| "ringlet.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(records) = lookup("RINGLET_RECORDS") {
            self.records = records
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("RINGLET_RECORDS", &records))?;
        }

        if let Some(policy) = lookup("RINGLET_NAME_OVERFLOW") {
            self.name_overflow = policy
                .parse()
                .map_err(|_| ConfigError::invalid("RINGLET_NAME_OVERFLOW", &policy))?;
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
        }
    }
}
