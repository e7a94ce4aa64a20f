// ABOUTME: Top-level environment configuration for the summary engine
// ABOUTME: Timeouts, local language model settings and the env parsing helpers shared by config modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::cache::{StalenessConfig, StorageConfig};
use crate::constants::timeouts::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MODEL_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Default base URL (Ollama)
pub const DEFAULT_LOCAL_LLM_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model for local inference
pub const DEFAULT_LOCAL_LLM_MODEL: &str = "qwen2.5:7b-instruct";

/// Bounds on health store and language model calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Per-fetch bound on a health store query set
    pub fetch_timeout_secs: u64,
    /// Per-call bound on language model generation
    pub model_timeout_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            model_timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }
}

impl TimeoutConfig {
    /// Load timeouts from environment
    ///
    /// # Errors
    ///
    /// Returns a config error for unparseable or zero values
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            fetch_timeout_secs: parse_env(
                "PULSEWISE_FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?,
            model_timeout_secs: parse_env(
                "PULSEWISE_MODEL_TIMEOUT_SECS",
                DEFAULT_MODEL_TIMEOUT_SECS,
            )?,
        };
        if config.fetch_timeout_secs == 0 || config.model_timeout_secs == 0 {
            return Err(AppError::config("Timeouts must be at least one second"));
        }
        Ok(config)
    }

    /// Fetch timeout as a [`Duration`]
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Model timeout as a [`Duration`]
    #[must_use]
    pub const fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }
}

/// Local OpenAI-compatible model server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalModelConfig {
    /// User-level switch; disabled maps to `ModelAvailability::DisabledByUser`
    pub enabled: bool,
    /// Base URL (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// Model name
    pub model: String,
    /// API key (optional for local servers)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_LOCAL_LLM_BASE_URL.to_owned(),
            model: DEFAULT_LOCAL_LLM_MODEL.to_owned(),
            api_key: None,
        }
    }
}

impl LocalModelConfig {
    /// Load local model settings from environment
    ///
    /// # Errors
    ///
    /// Returns a config error when `LOCAL_LLM_ENABLED` is not a boolean
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            enabled: parse_bool_env("LOCAL_LLM_ENABLED", true)?,
            base_url: env_var_or("LOCAL_LLM_BASE_URL", DEFAULT_LOCAL_LLM_BASE_URL),
            model: env_var_or("LOCAL_LLM_MODEL", DEFAULT_LOCAL_LLM_MODEL),
            api_key: env::var("LOCAL_LLM_API_KEY").ok().filter(|k| !k.is_empty()),
        })
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default)]
pub struct PulsewiseConfig {
    /// Summary store settings
    pub storage: StorageConfig,
    /// Staleness windows
    pub staleness: StalenessConfig,
    /// Fetch and model timeouts
    pub timeouts: TimeoutConfig,
    /// Local language model settings
    pub local_model: LocalModelConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl PulsewiseConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error naming the first invalid variable
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            storage: StorageConfig::from_env()?,
            staleness: StalenessConfig::from_env()?,
            timeouts: TimeoutConfig::from_env()?,
            local_model: LocalModelConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        };
        info!(
            store = ?config.storage.backend,
            database = %config.storage.database_url,
            fetch_timeout_secs = config.timeouts.fetch_timeout_secs,
            model_timeout_secs = config.timeouts.model_timeout_secs,
            local_model_enabled = config.local_model.enabled,
            "Loaded configuration from environment"
        );
        Ok(config)
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
pub(super) fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

fn parse_bool_env(key: &str, default: bool) -> AppResult<bool> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::config(format!("Invalid {key} value '{raw}'"))),
        },
        Err(_) => Ok(default),
    }
}
