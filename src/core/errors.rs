//! Custom error types for translation operations

use thiserror::Error;

/// Failures of the single round trip to the model provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// API request failed with a non-success status
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Network error
    #[error("Network error: {message}")]
    Network {
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponse {
        message: String,
    },
}

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Configuration error, fatal at startup
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    /// The remote call failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Input was empty after trimming whitespace
    #[error("Nothing to translate: input is empty")]
    EmptyInput,
}

impl TranslationError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        TranslationError::Config {
            message: message.into(),
        }
    }

    /// Whether the error came from the provider round trip
    pub fn is_provider(&self) -> bool {
        matches!(self, TranslationError::Provider(_))
    }
}

impl From<config::ConfigError> for TranslationError {
    fn from(err: config::ConfigError) -> Self {
        TranslationError::config(err.to_string())
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        TranslationError::Provider(ProviderError::Network {
            message: err.to_string(),
        })
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
