//! AI provider abstractions and implementations.
//!
//! Handlers only ever talk to [`TextGenerator`], so the Gemini backend can be
//! swapped for the recording mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("{0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Response blocked: {0}")]
    Blocked(String),

    #[error("Provider returned no candidates")]
    EmptyResponse,
}

/// A single unit of model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerativePart {
    Text(String),
    InlineData(InlineData),
}

/// Binary payload carried inline as base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    pub data: String,
    pub mime_type: String,
}

impl GenerativePart {
    pub fn text(text: impl Into<String>) -> Self {
        GenerativePart::Text(text.into())
    }

    /// Base64-encode `bytes` into an inline part.
    pub fn inline(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        GenerativePart::InlineData(InlineData {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            GenerativePart::Text(text) => Some(text),
            GenerativePart::InlineData(_) => None,
        }
    }
}

/// Capability for single-shot text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation over `parts` and return the model's text.
    async fn generate(&self, parts: &[GenerativePart]) -> Result<String, ProviderError>;
}
