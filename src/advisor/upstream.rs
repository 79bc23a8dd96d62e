//! Upstream text generation.
//!
//! [`TextGenerator`] is the seam between the advisor and the paid LLM API.
//! [`OpenAiClient`] speaks the OpenAI-compatible chat completions protocol.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::error::UpstreamError;

/// Connection establishment bound; the overall call is bounded by the advisor.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest upstream error body echoed back to callers.
const MAX_ERROR_BODY: usize = 200;

// == Text Generator ==
/// Something that turns a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;

    fn name(&self) -> &str;
}

// == OpenAI Client ==
pub struct OpenAiClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            config.upstream_url.clone(),
            config.upstream_model.clone(),
            config.api_key.clone(),
        )
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.3
        })
    }

    /// Pulls `choices[0].message.content` out of a completion.
    pub fn extract_text(response: &Value) -> Option<String> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
    }

    /// Best-effort message from an error body.
    fn error_message(body: &str) -> String {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        message.chars().take(MAX_ERROR_BODY).collect()
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| UpstreamError::NotConfigured("OPENAI_API_KEY is not set".into()))?;

        debug!(model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        Self::extract_text(&json)
            .ok_or_else(|| UpstreamError::Malformed("missing choices[0].message.content".into()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    /// Serves `router` on an ephemeral local port and returns its URL.
    async fn stub_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn client(url: String) -> OpenAiClient {
        OpenAiClient::new(url, "test-model", Some("sk-test".to_string())).unwrap()
    }

    #[test]
    fn test_extract_text() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Fit score: 87" } }]
        });
        assert_eq!(
            OpenAiClient::extract_text(&response).as_deref(),
            Some("Fit score: 87")
        );
        assert_eq!(OpenAiClient::extract_text(&json!({ "choices": [] })), None);
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
        assert_eq!(OpenAiClient::error_message(body), "Rate limit reached");
        assert_eq!(OpenAiClient::error_message("  bad gateway \n"), "bad gateway");
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", client("http://localhost".into()));
        assert!(!rendered.contains("sk-test"));
    }

    #[tokio::test]
    async fn test_generate_without_key_is_not_configured() {
        let client = OpenAiClient::new("http://127.0.0.1:9", "m", None).unwrap();
        let result = client.generate("hi").await;
        assert!(matches!(result, Err(UpstreamError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "test-model");
                assert_eq!(body["messages"][0]["content"], "rate MIT");
                Json(json!({
                    "choices": [{ "message": { "content": "Fit score: 91/100" } }]
                }))
            }),
        );
        let url = stub_server(router).await;

        let text = client(url).generate("rate MIT").await.unwrap();
        assert_eq!(text, "Fit score: 91/100");
    }

    #[tokio::test]
    async fn test_generate_maps_error_status() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "error": { "message": "quota exceeded" } })),
                )
            }),
        );
        let url = stub_server(router).await;

        let result = client(url).generate("rate MIT").await;
        assert_eq!(
            result,
            Err(UpstreamError::Status {
                status: 429,
                message: "quota exceeded".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "unexpected": true })) }),
        );
        let url = stub_server(router).await;

        let result = client(url).generate("rate MIT").await;
        assert!(matches!(result, Err(UpstreamError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_generate_connection_refused_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(format!("http://{}/v1", addr)).generate("hi").await;
        assert!(matches!(result, Err(UpstreamError::Network(_))));
    }
}
