//! Configuration management

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::errors::{Result, TranslationError};

/// Environment variable holding the provider credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Prefix for every environment override (`GEMINI_BASE_URL`, `GEMINI_MODEL`, ...)
pub const ENV_PREFIX: &str = "GEMINI";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;

/// Configuration for translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub session_idle_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

impl TranslatorConfig {
    /// Builder seeded with the built-in defaults only
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("model", DEFAULT_MODEL)?
            .set_default("session_idle_secs", DEFAULT_SESSION_IDLE_SECS as i64)?)
    }

    /// Defaults, then the optional file, then `GEMINI_*` environment variables
    pub fn builder(file: Option<&Path>) -> Result<ConfigBuilder<DefaultState>> {
        let mut builder = Self::defaults()?;

        if let Some(path) = file {
            debug!("Reading configuration file {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.add_source(Environment::with_prefix(ENV_PREFIX)))
    }

    /// Build the final configuration from a prepared builder
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Load configuration from the usual sources
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config = Self::from_builder(Self::builder(file)?)?;
        info!("Using model {} at {}", config.model, config.base_url);
        Ok(config)
    }

    /// Override the credential, e.g. from a CLI flag
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TranslationError::config(format!(
                "{} not found in environment or .env",
                API_KEY_ENV
            )));
        }

        if self.base_url.trim().is_empty() {
            return Err(TranslationError::config("base_url is required"));
        }

        if self.model.trim().is_empty() {
            return Err(TranslationError::config("model is required"));
        }

        Ok(())
    }

    /// Full URL of the chat-completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// How long an untouched web session is kept
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}
