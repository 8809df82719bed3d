/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which sends a single
 * chunk of YAML to the configured provider with bounded retries.
 */

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::providers::anthropic::Anthropic;
use crate::providers::ollama::Ollama;
use crate::providers::openai::OpenAI;
use crate::providers::{CompletionRequest, Provider};

use super::formatting::strip_code_fences;
use super::prompts;

/// Main translation service for locale chunks
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Provider implementation
    provider: Arc<dyn Provider>,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let timeout_secs = config.get_timeout_secs();

        let provider: Arc<dyn Provider> = match config.provider {
            ConfigTranslationProvider::OpenAI => {
                Arc::new(OpenAI::new(config.get_api_key(), config.get_endpoint(), timeout_secs))
            }
            ConfigTranslationProvider::LMStudio => {
                // LM Studio often doesn't require an API key; use a default if empty
                let api_key = {
                    let k = config.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };
                Arc::new(
                    OpenAI::new(api_key, config.get_endpoint(), timeout_secs)
                        .with_display_name("LM Studio"),
                )
            }
            ConfigTranslationProvider::Anthropic => {
                Arc::new(Anthropic::new(config.get_api_key(), config.get_endpoint(), timeout_secs))
            }
            ConfigTranslationProvider::Ollama => {
                Arc::new(Ollama::new(&config.get_endpoint(), timeout_secs)?)
            }
        };

        Ok(Self { provider, config })
    }

    /// Create a service around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>, config: TranslationConfig) -> Self {
        Self { provider, config }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        debug!(
            "Testing connection to {} with model {}",
            self.provider.name(),
            self.config.get_model()
        );
        self.provider.test_connection(&self.config.get_model()).await
    }

    /// Translate one chunk of YAML.
    ///
    /// Fatal errors (quota, billing) are returned at once; other errors are
    /// retried up to `retry_count` attempts with a linear backoff. The response
    /// is stripped of an enclosing code fence.
    pub async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        instructions: &str,
    ) -> Result<String, ProviderError> {
        // Nothing to translate in whitespace-only text
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let model = self.config.get_model();
        let mut request = CompletionRequest::new(
            model.clone(),
            instructions,
            prompts::build_user_message(text, source_language, target_language),
            self.config.common.temperature,
        );
        if let Some(max_tokens) = max_tokens_for_model(&model) {
            request = request.max_tokens(max_tokens);
        }

        let max_attempts = self.config.common.retry_count.max(1);
        let mut attempt = 1;
        loop {
            let start_time = Instant::now();
            match self.provider.complete(request.clone()).await {
                Ok(response) => {
                    debug!(
                        "{} response received in {:?} (prompt tokens: {:?}, completion tokens: {:?})",
                        self.provider.name(),
                        start_time.elapsed(),
                        response.prompt_tokens,
                        response.completion_tokens
                    );
                    return Ok(strip_code_fences(&response.text));
                }
                Err(e) if e.is_fatal() => {
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        "{} request failed (attempt {}/{}): {}. Retrying in {:?}",
                        self.provider.name(),
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Delay before the attempt following `attempt`
    fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.config.common.retry_backoff_ms.saturating_mul(attempt as u64))
    }
}

/// Get the maximum number of tokens to request for a given model
fn max_tokens_for_model(model: &str) -> Option<u32> {
    match model {
        // OpenAI models
        "gpt-4" | "gpt-4-0613" => Some(8192),
        "gpt-4-32k" | "gpt-4-32k-0613" => Some(32768),
        "gpt-4-turbo" | "gpt-4-turbo-preview" | "gpt-4-0125-preview" => Some(4096),
        "gpt-3.5-turbo" | "gpt-3.5-turbo-0613" => Some(4096),
        "gpt-3.5-turbo-16k" | "gpt-3.5-turbo-16k-0613" => Some(16384),

        // Anthropic models
        "claude-3-opus-20240229" | "claude-3-sonnet-20240229" | "claude-3-haiku-20240307" => Some(4096),
        "claude-3-5-sonnet-20240620" | "claude-3-5-sonnet-20241022" => Some(8192),

        // Let the provider decide for unknown models
        _ => None,
    }
}
