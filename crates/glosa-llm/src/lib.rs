//! Glosa LLM Provider Layer
//!
//! Pluggable completion backends for concept extraction.
//!
//! # Architecture
//!
//! This crate provides implementations of the `CompletionBackend` trait from
//! `glosa-domain`. Every backend is synchronous; the extractor schedules calls
//! on a blocking thread.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted responses for testing
//! - `OllamaProvider`: Local Ollama server through its OpenAI-compatible API
//!
//! # Examples
//!
//! ```
//! use glosa_llm::MockProvider;
//! use glosa_domain::traits::CompletionBackend;
//! use glosa_domain::{ChatMessage, GenerationParams};
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let messages = [ChatMessage::user("test prompt")];
//! let result = provider.complete(&messages, &GenerationParams::default()).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use glosa_domain::traits::CompletionBackend;
use glosa_domain::{ChatMessage, GenerationParams};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock completion backend for deterministic testing
///
/// Scripted outcomes are consumed in order, one per call. Once the script is
/// exhausted every call returns the default response. Clones share the script,
/// the call counter and the recorded prompts.
///
/// # Examples
///
/// ```
/// use glosa_llm::MockProvider;
/// use glosa_domain::traits::CompletionBackend;
/// use glosa_domain::{ChatMessage, GenerationParams};
///
/// let mut provider = MockProvider::new("fallback");
/// provider.push_error("backend down");
/// provider.push_response("first");
///
/// let messages = [ChatMessage::user("prompt")];
/// let params = GenerationParams::default();
/// assert!(provider.complete(&messages, &params).is_err());
/// assert_eq!(provider.complete(&messages, &params).unwrap(), "first");
/// assert_eq!(provider.complete(&messages, &params).unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
    prompts: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock".to_string(),
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful response for the next unscripted call
    pub fn push_response(&mut self, response: impl Into<String>) {
        lock(&self.script).push_back(Ok(response.into()));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_error(&mut self, message: impl Into<String>) {
        lock(&self.script).push_back(Err(message.into()));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Messages received by each call, in call order
    pub fn recorded_prompts(&self) -> Vec<Vec<ChatMessage>> {
        lock(&self.prompts).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionBackend for MockProvider {
    type Error = LlmError;

    fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;
        lock(&self.prompts).push(messages.to_vec());

        match lock(&self.script).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
