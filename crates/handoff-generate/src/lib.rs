//! Text generation for handoff documents via the Anthropic Messages API

mod client;
mod types;

pub use client::{AnthropicGenerator, ANTHROPIC_MESSAGES_URL};
pub use types::{GenerateError, GenerationRequest, Generator, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
