//! Async translation client with per-session result caching

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Translation, TranslationRequest};
use crate::core::provider::{CompletionProvider, OpenAiCompatProvider};
use crate::core::session::SessionState;

/// Async translation client
///
/// Holds no state of its own; the caller passes the session whose cache it
/// should consult and update.
#[derive(Clone)]
pub struct AsyncTranslator {
    provider: Arc<dyn CompletionProvider>,
}

impl fmt::Debug for AsyncTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTranslator")
            .field("model", &self.provider.model())
            .finish()
    }
}

impl AsyncTranslator {
    /// Create a translator over any provider
    pub fn new(provider: impl CompletionProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Create a translator talking to the configured OpenAI-compatible endpoint
    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        Ok(Self::new(OpenAiCompatProvider::new(config)?))
    }

    /// Model identifier behind this translator
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Translate `text`, reusing the session's cached result when unchanged
    pub async fn translate(&self, session: &mut SessionState, text: &str) -> Result<Translation> {
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyInput);
        }

        if let Some(cached) = session.cached_for(text) {
            debug!("Cache hit for {} chars", text.len());
            return Ok(Translation {
                text: cached.to_string(),
                from_cache: true,
            });
        }

        let request = TranslationRequest::new(text);
        let result = self.provider.complete(&request).await.map_err(|e| {
            warn!("Translation failed: {}", e);
            e
        })?;

        info!(
            "Translated {} chars with {} ({} tokens)",
            text.len(),
            result.model_used,
            result.tokens_used
        );

        session.record(text, result.translation.clone());

        Ok(Translation {
            text: result.translation,
            from_cache: false,
        })
    }
}
