//! Mock provider implementation for testing.

use super::{GenerativePart, ProviderError, TextGenerator};
use async_trait::async_trait;
use std::sync::Mutex;

enum Outcome {
    Reply(String),
    Fail(String),
}

/// Mock text generator that records every call it receives.
pub struct MockTextGenerator {
    outcome: Outcome,
    calls: Mutex<Vec<Vec<GenerativePart>>>,
}

impl MockTextGenerator {
    /// Always answer with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Reply(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Parts passed to each `generate` call so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<GenerativePart>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, parts: &[GenerativePart]) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(parts.to_vec());
        }

        match &self.outcome {
            Outcome::Reply(reply) => Ok(reply.clone()),
            Outcome::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }
}
