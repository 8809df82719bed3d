/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::echo()` - Returns the submitted document unchanged
 * - `MockProvider::failing(error)` - Always fails with the given error
 * - `MockProvider::fail_first(n, error)` - Fails n times, then echoes
 * - `MockProvider::scripted(responses)` - Replays a fixed list of results
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};
use crate::translation::prompts;

/// Behavior mode for the mock provider
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Returns the document from the user message
    Echo,
    /// Returns the document wrapped in a ```yaml fence
    FencedEcho,
    /// Always fails with the given error
    Failing(ProviderError),
    /// Fails for the first `failures` requests, then echoes
    FailFirst { failures: usize, error: ProviderError },
    /// Replays results in order; echoes once the script runs out
    Scripted(Arc<Mutex<VecDeque<Result<String, ProviderError>>>>),
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Requests received, in order
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&CompletionRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a mock that returns its input unchanged
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a mock that wraps its input in a code fence
    pub fn fenced_echo() -> Self {
        Self::new(MockBehavior::FencedEcho)
    }

    /// Create a failing mock provider that always errors
    pub fn failing(error: ProviderError) -> Self {
        Self::new(MockBehavior::Failing(error))
    }

    /// Create a mock that fails `failures` times before succeeding
    pub fn fail_first(failures: usize, error: ProviderError) -> Self {
        Self::new(MockBehavior::FailFirst { failures, error })
    }

    /// Create a mock replaying the given results
    pub fn scripted(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self::new(MockBehavior::Scripted(Arc::new(Mutex::new(responses.into()))))
    }

    /// Set a custom response generator used instead of echoing
    pub fn with_custom_response(mut self, generator: fn(&CompletionRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    fn success_text(&self, request: &CompletionRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => prompts::document_from_user_message(&request.user_text).to_string(),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match &self.behavior {
            MockBehavior::Echo => Ok(CompletionResponse::text(self.success_text(&request))),

            MockBehavior::FencedEcho => {
                let document = self.success_text(&request);
                let separator = if document.ends_with('\n') { "" } else { "\n" };
                Ok(CompletionResponse::text(format!("```yaml\n{}{}```", document, separator)))
            }

            MockBehavior::Failing(error) => Err(error.clone()),

            MockBehavior::FailFirst { failures, error } => {
                if count < *failures {
                    Err(error.clone())
                } else {
                    Ok(CompletionResponse::text(self.success_text(&request)))
                }
            }

            MockBehavior::Scripted(script) => {
                let next = script.lock().pop_front();
                match next {
                    Some(Ok(text)) => Ok(CompletionResponse::text(text)),
                    Some(Err(error)) => Err(error),
                    None => Ok(CompletionResponse::text(self.success_text(&request))),
                }
            }
        }
    }

    async fn test_connection(&self, _model: &str) -> Result<(), ProviderError> {
        match &self.behavior {
            MockBehavior::Failing(error) => Err(error.clone()),
            _ => Ok(()),
        }
    }
}
