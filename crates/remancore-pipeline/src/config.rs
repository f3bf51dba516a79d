//! Pipeline configuration.
//!
//! Layered: built-in defaults, then an optional TOML file, then environment
//! overrides.

use std::path::Path;
use std::time::Duration;

use remancore_core::FallbackPolicy;
use serde::{Deserialize, Serialize};

pub const STAGE_DELAY_ENV: &str = "REMANCORE_STAGE_DELAY_MS";
pub const FINALIZE_DELAY_ENV: &str = "REMANCORE_FINALIZE_DELAY_MS";
pub const FALLBACK_ENV: &str = "REMANCORE_FALLBACK";

/// Errors loading pipeline configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// Timing and policy for the diagnostic pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pause before each stage's progress event, in milliseconds.
    pub stage_delay_ms: u64,

    /// Pause between the last stage and classification, in milliseconds.
    pub finalize_delay_ms: u64,

    /// What to report for images no signature matches.
    pub fallback: FallbackPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_delay_ms: 700,
            finalize_delay_ms: 1500,
            fallback: FallbackPolicy::CoinFlip,
        }
    }
}

impl PipelineConfig {
    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms)
    }

    pub fn finalize_delay(&self) -> Duration {
        Duration::from_millis(self.finalize_delay_ms)
    }

    /// No delays. Useful for batch runs and tests.
    pub fn immediate() -> Self {
        Self {
            stage_delay_ms: 0,
            finalize_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply `REMANCORE_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(STAGE_DELAY_ENV) {
            self.stage_delay_ms = parse_millis(STAGE_DELAY_ENV, &value)?;
        }
        if let Some(value) = lookup(FINALIZE_DELAY_ENV) {
            self.finalize_delay_ms = parse_millis(FINALIZE_DELAY_ENV, &value)?;
        }
        if let Some(value) = lookup(FALLBACK_ENV) {
            self.fallback = value.parse().map_err(|_| ConfigError::Invalid {
                key: FALLBACK_ENV.to_string(),
                value,
            })?;
        }
        Ok(self)
    }

    /// Defaults, then the optional file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_toml_file(p)?,
            None => Self::default(),
        };
        base.apply_env()
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}
