use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// A single-turn generation request: one user message
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub max_tokens: u32,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            prompt: prompt.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Messages API request body
    pub fn to_body(&self) -> serde_json::Value {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [Message { role: "user", content: &self.prompt }],
        })
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response contained no text content")]
    EmptyResponse,
}

/// Text generation backend
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;
}
