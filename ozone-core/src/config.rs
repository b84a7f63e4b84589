//! Dashboard configuration, read from an optional TOML file.
//!
//! Every field has a default, so an absent file and an empty file behave the
//! same. Unknown keys are rejected so typos surface instead of silently
//! falling back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forecast::ProducerOptions;
use crate::rng::DEFAULT_SEED;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "ozone.toml";

/// Model artifact looked up in the working directory by default.
pub const DEFAULT_MODEL_PATH: &str = "modelo_03_prophet.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Serialized model, relative paths resolve against the working directory.
    pub model_path: PathBuf,
    /// Initial value of the horizon input.
    pub default_horizon_days: u32,
    /// Prepend fitted training values to model forecasts.
    pub include_history: bool,
    pub uncertainty: UncertaintyConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UncertaintyConfig {
    pub seed: u64,
    /// Overrides the model's `uncertainty_samples`.
    pub samples: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub title: String,
    pub units: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log file for the TUI. Without it TUI logs are discarded.
    pub file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            default_horizon_days: 3,
            include_history: false,
            uncertainty: UncertaintyConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            samples: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Ozone (O3) Level Forecast".into(),
            units: "µg/m³".into(),
        }
    }
}

impl DashboardConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// An explicit path must exist; otherwise `ozone.toml` in `dir` is used if present.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_horizon_days == 0 {
            return Err(ConfigError::Invalid(
                "default_horizon_days must be at least 1".into(),
            ));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("model_path must not be empty".into()));
        }
        Ok(())
    }

    pub fn producer_options(&self) -> ProducerOptions {
        ProducerOptions {
            include_history: self.include_history,
            seed: self.uncertainty.seed,
            samples: self.uncertainty.samples,
        }
    }
}
