//! Ollama Provider Implementation
//!
//! Talks to a local Ollama server through its OpenAI-compatible
//! `/v1/chat/completions` API, so any server exposing that API works too.
//!
//! # Features
//!
//! - Async HTTP communication with the chat-completions API
//! - Configurable endpoint, model and optional bearer key
//! - Transport retry with exponential backoff
//! - Availability probe for degraded-mode startup
//!
//! # Examples
//!
//! ```no_run
//! use glosa_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434/v1", "llama3");
//!
//! // `chat` is async; the `CompletionBackend` impl is a blocking wrapper that
//! // must be called from a blocking thread, never from inside a runtime.
//! ```

use crate::LlmError;
use glosa_domain::traits::CompletionBackend;
use glosa_domain::{ChatMessage, GenerationParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI-compatible endpoint of a local Ollama server
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/v1";

/// Default model name
pub const DEFAULT_MODEL: &str = "llama3";

/// Default timeout for LLM requests (local inference can be slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of transport attempts per call
///
/// Prompt-level retries live in the extractor, so a single attempt is enough here.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Ollama provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OllamaProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base including the version prefix (e.g., "http://localhost:11434/v1")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a provider for the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Send a bearer key with every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Set the maximum number of transport attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// The configured endpoint, without a trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Generate a chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The server is not running
    /// - The model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let url = self.url("chat/completions");

        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: false,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .request(self.client.post(&url))
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    if response.status().is_success() {
                        let body = response.json::<ChatCompletionResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return first_choice_content(body);
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Completion request failed, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    /// Check whether the server answers on its model listing route
    pub async fn is_available(&self) -> bool {
        match self.request(self.client.get(self.url("models"))).send().await {
            Ok(response) => {
                debug!("Model listing answered with {}", response.status());
                response.status().is_success()
            }
            Err(e) => {
                debug!("Model listing failed: {}", e);
                false
            }
        }
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

fn first_choice_content(body: ChatCompletionResponse) -> Result<String, LlmError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
}

impl CompletionBackend for OllamaProvider {
    type Error = LlmError;

    fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, Self::Error> {
        // Pooled connections belong to the runtime that opened them, so reuse
        // the caller's runtime when called from `spawn_blocking`
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            return handle.block_on(self.chat(messages, params));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
        runtime.block_on(self.chat(messages, params))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
