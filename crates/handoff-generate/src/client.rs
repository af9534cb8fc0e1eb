use crate::{GenerateError, GenerationRequest, Generator};
use async_trait::async_trait;

pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// [`Generator`] backed by the Anthropic Messages API
pub struct AnthropicGenerator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl AnthropicGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: ANTHROPIC_MESSAGES_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Generator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        tracing::debug!(
            model = %request.model,
            prompt_chars = request.prompt.len(),
            "calling messages API"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request.to_body())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        parse_response(status, &text)
    }
}

/// Map a Messages API response to its text. The status is checked before
/// the body is decoded, so non-JSON error pages keep their status code.
fn parse_response(status: reqwest::StatusCode, text: &str) -> Result<String, GenerateError> {
    if !status.is_success() {
        return Err(GenerateError::Api {
            status: status.as_u16(),
            message: error_message(text),
        });
    }

    let body: serde_json::Value = serde_json::from_str(text)?;
    extract_text(&body).ok_or(GenerateError::EmptyResponse)
}

/// Text of the first content block of a Messages API response
fn extract_text(body: &serde_json::Value) -> Option<String> {
    body.pointer("/content/0/text")
        .and_then(|t| t.as_str())
        .map(String::from)
}

/// `error.message` from an API error body, else the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
