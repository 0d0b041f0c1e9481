//! English ↔ Roman Urdu translator
//!
//! This library forwards text to an OpenAI-compatible model with a fixed
//! translation prompt, caches the last result per session, and serves it
//! through a small web form, a JSON endpoint and a CLI.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    client::AsyncTranslator,
    config::TranslatorConfig,
    errors::{ProviderError, TranslationError},
    models::{Translation, TranslationRequest, TranslationResult, TRANSLATOR_INSTRUCTIONS},
    provider::{CompletionProvider, OpenAiCompatProvider},
    session::{SessionState, SessionStore},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
