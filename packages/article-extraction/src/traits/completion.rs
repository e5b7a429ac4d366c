//! Completion backend interface.
//!
//! Extracted article fields end up as variables in a prompt that is sent to a
//! hosted language model. This crate ships no backend; applications implement
//! [`CompletionClient`] against whichever API they use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// One system + user exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the temperature, clamped to `0.0..=1.0`.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A hosted model that turns a request into text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Generate a completion with surrounding whitespace and newlines removed.
    async fn complete_trimmed(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let text = self.complete(request).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = CompletionRequest::new("You are a helpful assistant.", "Hi");
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(request.max_tokens, 4000);
    }

    #[test]
    fn test_temperature_clamped() {
        let request = CompletionRequest::new("s", "u").with_temperature(1.7);
        assert_eq!(request.temperature, 1.0);
    }
}
