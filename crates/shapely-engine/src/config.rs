//! Analyzer configuration (shapely.toml)
//!
//! ```toml
//! [warnings]
//! disable = ["non-constant-keyword"]
//! enable = ["duplicate-annotation", "required-after-default"]
//! deny = ["required-after-default"]
//! strict = false
//! ```

use crate::checker::{WarningCode, WarningConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A warning name that does not exist
    #[error("Unknown warning '{0}'")]
    UnknownWarning(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub warnings: WarningSettings,
}

/// The `[warnings]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WarningSettings {
    /// Warnings to suppress
    #[serde(default)]
    pub disable: Vec<String>,

    /// Opt-in warnings to turn on
    #[serde(default)]
    pub enable: Vec<String>,

    /// Warnings to report as errors
    #[serde(default)]
    pub deny: Vec<String>,

    /// Enable every warning and report all of them as errors
    #[serde(default)]
    pub strict: bool,
}

impl AnalyzerConfig {
    /// Parse configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = toml::from_str(content)?;
        config.warning_config()?;
        Ok(config)
    }

    /// Build the warning configuration
    ///
    /// Starts from the defaults, then applies `enable`, `disable` and `deny`
    /// in that order.
    pub fn warning_config(&self) -> Result<WarningConfig, ConfigError> {
        let settings = &self.warnings;
        let mut config = if settings.strict {
            WarningConfig::strict()
        } else {
            WarningConfig::default()
        };

        for name in &settings.enable {
            config.disabled.remove(&parse_code(name)?);
        }
        for name in &settings.disable {
            config.disabled.insert(parse_code(name)?);
        }
        for name in &settings.deny {
            let code = parse_code(name)?;
            config.disabled.remove(&code);
            config.deny.insert(code);
        }

        Ok(config)
    }
}

fn parse_code(name: &str) -> Result<WarningCode, ConfigError> {
    WarningCode::from_name(name).ok_or_else(|| ConfigError::UnknownWarning(name.to_string()))
}
