//! Outbound call to an OpenAI-compatible chat-completions endpoint

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::config::TranslatorConfig;
use crate::core::errors::{ProviderError, Result};
use crate::core::models::{ChatCompletionResponse, TranslationRequest, TranslationResult};

/// A model that turns one instruction + user message into one completion
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the request and return the single final output
    async fn complete(&self, request: &TranslationRequest) -> Result<TranslationResult>;

    /// Model identifier used for every call
    fn model(&self) -> &str;
}

/// reqwest-backed provider for any OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatProvider {
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.chat_completions_url(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    async fn complete(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        let body = request.to_chat(&self.model);

        debug!("POST {} ({} chars)", self.endpoint, request.text.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();

            if status_code == 429 {
                return Err(ProviderError::RateLimited.into());
            }

            return Err(ProviderError::Api {
                status: status_code,
                message: error_text,
            }
            .into());
        }

        let parsed: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    message: e.to_string(),
                })?;

        parse_completion(parsed, &self.model)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pull the first choice's content out of a decoded response
pub(crate) fn parse_completion(
    response: ChatCompletionResponse,
    model: &str,
) -> Result<TranslationResult> {
    let translation = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::InvalidResponse {
            message: "No translation in response".to_string(),
        })?;

    // A blank completion would leave the session with an empty result
    if translation.trim().is_empty() {
        return Err(ProviderError::InvalidResponse {
            message: "Empty translation in response".to_string(),
        }
        .into());
    }

    Ok(TranslationResult {
        translation,
        tokens_used: response.usage.map(|u| u.total_tokens).unwrap_or(0),
        model_used: model.to_string(),
        request_id: response.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::TranslationError;
    use crate::core::models::TRANSLATOR_INSTRUCTIONS;
    use assert_json_diff::assert_json_include;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorded {
        bodies: Arc<Mutex<Vec<Value>>>,
        auth: Arc<Mutex<Vec<String>>>,
    }

    /// Serve a fake `chat/completions` that answers with `status` and `reply`
    async fn spawn_fake(status: StatusCode, reply: Value) -> (String, Recorded) {
        let recorded = Recorded::default();

        let app = Router::new()
            .route(
                "/v1beta/openai/chat/completions",
                post(
                    move |State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            rec.bodies.lock().unwrap().push(body);
                            if let Some(auth) = headers.get("authorization") {
                                rec.auth
                                    .lock()
                                    .unwrap()
                                    .push(auth.to_str().unwrap().to_string());
                            }
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v1beta/openai/", addr), recorded)
    }

    fn provider_for(base_url: String) -> OpenAiCompatProvider {
        let config = TranslatorConfig {
            base_url,
            ..Default::default()
        }
        .with_api_key("test_key");
        OpenAiCompatProvider::new(&config).unwrap()
    }

    #[test]
    fn test_provider_requires_credential() {
        let err = OpenAiCompatProvider::new(&TranslatorConfig::default()).unwrap_err();
        assert!(matches!(err, TranslationError::Config { .. }));
    }

    #[tokio::test]
    async fn test_sends_instruction_and_user_message() {
        let (base_url, recorded) = spawn_fake(
            StatusCode::OK,
            json!({
                "id": "chatcmpl-1",
                "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Aap kaisay hain?" } }],
                "usage": { "prompt_tokens": 40, "completion_tokens": 5, "total_tokens": 45 }
            }),
        )
        .await;

        let provider = provider_for(base_url);
        let result = provider
            .complete(&TranslationRequest::new("Hello, how are you?"))
            .await
            .unwrap();

        assert_eq!(result.translation, "Aap kaisay hain?");
        assert_eq!(result.tokens_used, 45);
        assert_eq!(result.model_used, "gemini-2.0-flash");
        assert_eq!(result.request_id.as_deref(), Some("chatcmpl-1"));

        let bodies = recorded.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_json_include!(
            actual: bodies[0].clone(),
            expected: json!({
                "model": "gemini-2.0-flash",
                "messages": [
                    { "role": "system", "content": TRANSLATOR_INSTRUCTIONS },
                    { "role": "user", "content": "Hello, how are you?" }
                ]
            })
        );
        assert_eq!(recorded.auth.lock().unwrap()[0], "Bearer test_key");
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_provider_error() {
        let (base_url, _) = spawn_fake(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "quota" } }),
        )
        .await;

        let err = provider_for(base_url)
            .complete(&TranslationRequest::new("Aap kaisay hain?"))
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::Provider(ProviderError::RateLimited)));
    }

    #[tokio::test]
    async fn test_auth_failure_keeps_status() {
        let (base_url, _) = spawn_fake(
            StatusCode::UNAUTHORIZED,
            json!({ "error": { "message": "API key not valid" } }),
        )
        .await;

        let err = provider_for(base_url)
            .complete(&TranslationRequest::new("Hello"))
            .await
            .unwrap_err();

        match err {
            TranslationError::Provider(ProviderError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider_for(format!("http://{}/", addr))
            .complete(&TranslationRequest::new("Hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::Provider(ProviderError::Network { .. })));
    }

    #[test]
    fn test_blank_completion_is_rejected() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "  \n" } }]
        }))
        .unwrap();

        let err = parse_completion(response, "m").unwrap_err();
        assert!(matches!(
            err,
            TranslationError::Provider(ProviderError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_missing_choices_is_rejected() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();

        assert!(parse_completion(response, "m").is_err());
    }
}
