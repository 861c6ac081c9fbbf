//! Provider trait — the abstraction over the generation capability.
//!
//! A Provider knows how to send a fully-composed prompt to an LLM and get
//! the generated text back. The agent composes the prompt itself, so the
//! contract here is deliberately narrow: prompt in, text out, with a
//! maximum-output-length hint. The call is blocking from the turn's
//! perspective — no client-side timeout, retry, or cancellation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,

    /// The fully-composed prompt.
    pub prompt: String,

    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature (0.0 = deterministic, 1.0 = creative).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.7
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated text.
    pub text: String,

    /// Which model actually responded (may differ from requested).
    pub model: String,

    /// Token usage statistics, when the provider reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The agent controller calls `generate()` without knowing which backend
/// is configured. Failures surface as `ProviderError`; the caller decides
/// what a failed turn means (for deskwren: no exchange is recorded).
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a prompt and get the generated text.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_request_defaults() {
        let req: GenerationRequest =
            serde_json::from_str(r#"{"model":"claude-sonnet-4-20250514","prompt":"hi"}"#).unwrap();
        assert_eq!(req.max_tokens, 300);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn response_usage_is_optional() {
        let resp: GenerationResponse =
            serde_json::from_str(r#"{"text":"hello","model":"mock"}"#).unwrap();
        assert!(resp.usage.is_none());
        assert_eq!(resp.text, "hello");
    }
}
