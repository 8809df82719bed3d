/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for various LLM providers:
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 * - Ollama: Local LLM server
 * - Mock: Scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single translation request, independent of the provider wire format
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model name
    pub model: String,

    /// System instructions
    pub instructions: String,

    /// User message carrying the text to translate
    pub user_text: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens, if the provider needs one
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a new request
    pub fn new(
        model: impl Into<String>,
        instructions: impl Into<String>,
        user_text: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            model: model.into(),
            instructions: instructions.into(),
            user_text: user_text.into(),
            temperature,
            max_tokens: None,
        }
    }

    /// Set the token limit
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Text returned by a provider along with optional usage figures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// The generated text
    pub text: String,

    /// Prompt tokens reported by the provider
    pub prompt_tokens: Option<u64>,

    /// Completion tokens reported by the provider
    pub completion_tokens: Option<u64>,
}

impl CompletionResponse {
    /// Response carrying only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human readable provider name, used in logs
    fn name(&self) -> &str;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self, model: &str) -> Result<(), ProviderError>;
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;
