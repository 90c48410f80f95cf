//! Anthropic API backend.

use super::{CompletionBackend, CompletionRequest};
use crate::config::{self, CompletionConfig};
use crate::message::Role;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Builder for creating an Anthropic backend.
#[derive(Debug, Clone)]
pub struct AnthropicBackendBuilder {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f64,
}

impl AnthropicBackendBuilder {
    /// Create a new builder with an API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: config::DEFAULT_BASE_URL.to_string(),
            max_tokens: config::DEFAULT_MAX_TOKENS,
            temperature: config::DEFAULT_TEMPERATURE,
        }
    }

    /// Set the maximum tokens for responses.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Point the backend at a different API host.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the backend.
    pub fn build(self) -> AnthropicBackend {
        let base_url = self.base_url.trim_end_matches('/');
        AnthropicBackend {
            client: reqwest::Client::new(),
            url: format!("{base_url}/v1/messages"),
            api_key: self.api_key,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Anthropic API backend.
pub struct AnthropicBackend {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl AnthropicBackend {
    /// Create a builder for the Anthropic backend.
    pub fn builder(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> AnthropicBackendBuilder {
        AnthropicBackendBuilder::new(api_key, model)
    }

    /// Build a backend from settings, failing if the API key is absent.
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let api_key = config::require(&config.api_key, "completion.api_key (ANTHROPIC_API_KEY)")?;
        Ok(Self::builder(api_key, &config.model)
            .base_url(&config.base_url)
            .max_tokens(config.max_tokens)
            .temperature(config.temperature)
            .build())
    }
}

impl std::fmt::Display for AnthropicBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anthropic({})", self.model)
    }
}

impl CompletionBackend for AnthropicBackend {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        let messages = request
            .history
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .chain(std::iter::once(ApiMessage {
                role: Role::User.as_str(),
                content: request.user_message,
            }))
            .collect();

        let api_request = ApiRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: request.system,
            messages,
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("{status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        if let Some(usage) = &api_response.usage {
            debug!(
                model = %self.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "completion received"
            );
        }

        let text = api_response
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(Error::Upstream("completion contained no text".into()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use axum::Json;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Option<(HeaderMap, Value)>>>;

    /// Serve `reply` from a local mock of the messages endpoint, recording
    /// the last request it received.
    async fn mock_api(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(
                "/v1/messages",
                post(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.lock().unwrap() = Some((headers, body));
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    fn backend(base_url: &str) -> AnthropicBackend {
        AnthropicBackend::builder("test-key", "test-model")
            .base_url(base_url)
            .max_tokens(128)
            .temperature(0.5)
            .build()
    }

    #[tokio::test]
    async fn sends_prompt_history_and_fixed_sampling() {
        let (url, captured) = mock_api(
            StatusCode::OK,
            json!({
                "content": [
                    {"type": "text", "text": "Hello"},
                    {"type": "text", "text": " there"}
                ],
                "usage": {"input_tokens": 10, "output_tokens": 2}
            }),
        )
        .await;

        let history = [Message::user("hi"), Message::assistant("hello!")];
        let text = backend(&url)
            .complete(CompletionRequest {
                system: "be brief",
                history: &history,
                user_message: "add Jane",
            })
            .await
            .unwrap();
        assert_eq!(text, "Hello there");

        let (headers, body) = captured.lock().unwrap().take().unwrap();
        assert_eq!(headers["x-api-key"], "test-key");
        assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 128);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["system"], "be brief");
        assert_eq!(
            body["messages"],
            json!([
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello!"},
                {"role": "user", "content": "add Jane"}
            ])
        );
    }

    #[tokio::test]
    async fn error_status_is_upstream() {
        let (url, _) = mock_api(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"type": "error", "error": {"type": "overloaded_error"}}),
        )
        .await;

        let err = backend(&url)
            .complete(CompletionRequest {
                system: "",
                history: &[],
                user_message: "hi",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn empty_completion_is_upstream() {
        let (url, _) = mock_api(StatusCode::OK, json!({"content": []})).await;

        let err = backend(&url)
            .complete(CompletionRequest {
                system: "",
                history: &[],
                user_message: "hi",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let config = CompletionConfig::default();
        assert!(matches!(
            AnthropicBackend::from_config(&config),
            Err(Error::Config(_))
        ));

        let config = CompletionConfig {
            api_key: Some("sk".into()),
            ..CompletionConfig::default()
        };
        let backend = AnthropicBackend::from_config(&config).unwrap();
        assert_eq!(backend.to_string(), format!("anthropic({})", config::DEFAULT_MODEL));
    }
}
