//! Core data models for translation

use serde::{Deserialize, Serialize};

/// Fixed instruction sent as the system message on every call
pub const TRANSLATOR_INSTRUCTIONS: &str = "\
You are a smart and accurate language translator.

- Detect if the input is in English or Roman Urdu (Urdu written in Latin script).
- If the input is in English, translate it into Roman Urdu, preserving correct **pronoun roles and tense**.
- If the input is in Roman Urdu, translate it into proper English.
- Only return the translation — no extra text or explanation.
";

/// Chat message role on the OpenAI-compatible wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Single chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Body of a `chat/completions` call
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// The parts of a `chat/completions` response we read
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<CompletionUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionUsage {
    #[serde(default)]
    pub total_tokens: usize,
}

/// Translation request: fixed instruction plus the raw user text
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub instructions: &'static str,
    pub text: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            instructions: TRANSLATOR_INSTRUCTIONS,
            text: text.into(),
        }
    }

    /// Build the wire body for the given model
    pub fn to_chat(&self, model: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: self.instructions.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: self.text.clone(),
                },
            ],
        }
    }
}

/// Translation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translation: String,
    pub tokens_used: usize,
    pub model_used: String,
    pub request_id: Option<String>,
}

/// What the client hands back to the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub from_cache: bool,
}
