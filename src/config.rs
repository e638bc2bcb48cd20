use std::path::PathBuf;

use thiserror::Error;

use crate::synthesis::DEFAULT_TEMPERATURE;

/// Application-level constants
pub const APP_NAME: &str = "ancillary-engine";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_LLM_URL: &str = "ANCILLARY_LLM_URL";
pub const ENV_LLM_MODEL: &str = "ANCILLARY_LLM_MODEL";
pub const ENV_LLM_TIMEOUT_SECS: &str = "ANCILLARY_LLM_TIMEOUT_SECS";
pub const ENV_LLM_TEMPERATURE: &str = "ANCILLARY_LLM_TEMPERATURE";
pub const ENV_CATALOG_PATH: &str = "ANCILLARY_CATALOG_PATH";

const DEFAULT_LLM_URL: &str = "http://localhost:11434";
const DEFAULT_LLM_MODEL: &str = "medgemma:latest";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const MAX_TEMPERATURE: f32 = 2.0;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,ancillary_engine=debug"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Engine settings, read once at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub temperature: f32,
    /// JSON catalog replacing the built-in table.
    pub catalog_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            llm_base_url: DEFAULT_LLM_URL.into(),
            llm_model: DEFAULT_LLM_MODEL.into(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
            catalog_path: None,
        }
    }
}

impl EngineConfig {
    /// Read from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read from an arbitrary key lookup. Unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(url) = get(ENV_LLM_URL) {
            config.llm_base_url = url;
        }
        if let Some(model) = get(ENV_LLM_MODEL) {
            config.llm_model = model;
        }
        if let Some(raw) = get(ENV_LLM_TIMEOUT_SECS) {
            config.llm_timeout_secs = match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => return Err(invalid(ENV_LLM_TIMEOUT_SECS, raw, "must be positive")),
                Err(e) => return Err(invalid(ENV_LLM_TIMEOUT_SECS, raw, &e.to_string())),
            };
        }
        if let Some(raw) = get(ENV_LLM_TEMPERATURE) {
            config.temperature = match raw.parse::<f32>() {
                Ok(t) if (0.0..=MAX_TEMPERATURE).contains(&t) => t,
                Ok(_) => return Err(invalid(ENV_LLM_TEMPERATURE, raw, "must be within 0..=2")),
                Err(e) => return Err(invalid(ENV_LLM_TEMPERATURE, raw, &e.to_string())),
            };
        }
        config.catalog_path = get(ENV_CATALOG_PATH).map(PathBuf::from);

        Ok(config)
    }
}

fn invalid(key: &'static str, value: String, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value,
        reason: reason.to_string(),
    }
}
