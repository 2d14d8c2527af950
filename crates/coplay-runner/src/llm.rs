//! LLM backend abstraction and implementations.
//!
//! Defines an enum-based dispatch for LLM backends, avoiding the
//! dyn-compatibility issues with async trait methods. Concrete
//! implementations exist for OpenAI-compatible APIs, the Anthropic
//! Messages API, and the native Ollama chat API. All backends
//! communicate over HTTP via `reqwest`.
//!
//! Every call sends the entire conversation history; the backend is
//! stateless and the history is what carries session continuity.

use std::time::Duration;

use coplay_core::{ChatClient, ChatError};
use coplay_types::{ChatMessage, Role};

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::RunnerError;

// ---------------------------------------------------------------------------
// Unified backend enum (dyn-compatible alternative to async trait)
// ---------------------------------------------------------------------------

/// An LLM backend that completes a conversation.
///
/// Uses enum dispatch instead of trait objects because async methods
/// are not dyn-compatible in Rust.
pub enum LlmBackend {
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
    /// Native Ollama chat API of a local server.
    Ollama(OllamaBackend),
}

impl LlmBackend {
    /// Create a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::LlmBackend`] if the HTTP client cannot be
    /// built.
    pub fn from_config(
        config: &LlmBackendConfig,
        timeout: Duration,
    ) -> Result<Self, RunnerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RunnerError::LlmBackend(format!("HTTP client build failed: {e}")))?;
        Ok(match config.backend_type {
            BackendType::OpenAi => Self::OpenAi(OpenAiBackend::new(client, config)),
            BackendType::Anthropic => Self::Anthropic(AnthropicBackend::new(client, config)),
            BackendType::Ollama => Self::Ollama(OllamaBackend::new(client, config)),
        })
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
            Self::Ollama(_) => "ollama",
        }
    }

    /// Verify the backend is reachable before starting a session.
    ///
    /// Only Ollama exposes a cheap probe (`/api/tags`); the hosted APIs
    /// are taken on faith and fail on the first real call instead.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::LlmBackend`] if the probe fails.
    pub async fn health_check(&self) -> Result<(), RunnerError> {
        match self {
            Self::OpenAi(_) | Self::Anthropic(_) => Ok(()),
            Self::Ollama(backend) => backend.probe().await,
        }
    }
}

impl ChatClient for LlmBackend {
    async fn complete(&mut self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let result = match self {
            Self::OpenAi(backend) => backend.complete(messages).await,
            Self::Anthropic(backend) => backend.complete(messages).await,
            Self::Ollama(backend) => backend.complete(messages).await,
        };
        result.map_err(|e| ChatError(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Backend for OpenAI-compatible chat completions APIs.
///
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a new `OpenAI`-compatible backend.
    pub fn new(client: reqwest::Client, config: &LlmBackendConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send the conversation and return the response text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, RunnerError> {
        let url = format!("{}/chat/completions", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.7,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RunnerError::LlmBackend(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(RunnerError::LlmBackend(format!(
                "OpenAI returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RunnerError::LlmBackend(format!("OpenAI response parse failed: {e}")))?;

        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, RunnerError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            RunnerError::LlmBackend(
                "OpenAI response missing choices[0].message.content".to_owned(),
            )
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages API backend
// ---------------------------------------------------------------------------

/// Backend for the Anthropic Messages API.
///
/// Anthropic uses a different request format from `OpenAI`:
/// - Uses `x-api-key` header instead of `Authorization: Bearer`
/// - The system instruction is a top-level field, not a message
/// - Response structure differs: `content[0].text`
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    /// Create a new Anthropic Messages API backend.
    pub fn new(client: reqwest::Client, config: &LlmBackendConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send the conversation and return the response text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, RunnerError> {
        let url = format!("{}/messages", self.api_url);
        let (system, turns) = split_system(messages);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 1024,
            "system": system,
            "messages": turns,
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RunnerError::LlmBackend(format!("Anthropic request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(RunnerError::LlmBackend(format!(
                "Anthropic returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| {
                RunnerError::LlmBackend(format!("Anthropic response parse failed: {e}"))
            })?;

        extract_anthropic_content(&json)
    }
}

/// Pull the system instruction out of the history for Anthropic's
/// top-level `system` field.
fn split_system(messages: &[ChatMessage]) -> (String, Vec<&ChatMessage>) {
    let mut system = String::new();
    let mut turns = Vec::new();
    for message in messages {
        if message.role == Role::System {
            if !system.is_empty() {
                system.push('\n');
            }
            system.push_str(&message.content);
        } else {
            turns.push(message);
        }
    }
    (system, turns)
}

/// Extract the text content from an Anthropic Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, RunnerError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            RunnerError::LlmBackend("Anthropic response missing content[0].text".to_owned())
        })
}

// ---------------------------------------------------------------------------
// Native Ollama backend
// ---------------------------------------------------------------------------

/// Backend for the native Ollama chat API of a local server.
///
/// Sends requests to `{api_url}/api/chat` with streaming disabled and
/// probes `{api_url}/api/tags` for the health check.
pub struct OllamaBackend {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend.
    pub fn new(client: reqwest::Client, config: &LlmBackendConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        }
    }

    /// Send the conversation and return the response text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, RunnerError> {
        let url = format!("{}/api/chat", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RunnerError::LlmBackend(format!("Ollama request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(RunnerError::LlmBackend(format!(
                "Ollama returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RunnerError::LlmBackend(format!("Ollama response parse failed: {e}")))?;

        extract_ollama_content(&json)
    }

    /// Probe the server's model listing endpoint.
    async fn probe(&self) -> Result<(), RunnerError> {
        let url = format!("{}/api/tags", self.api_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RunnerError::LlmBackend(format!("Ollama unreachable: {e}")))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(RunnerError::LlmBackend(format!(
                "Ollama health check returned {}",
                response.status()
            )))
        }
    }
}

/// Extract the text content from a native Ollama chat response.
fn extract_ollama_content(json: &serde_json::Value) -> Result<String, RunnerError> {
    json.get("message")
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            RunnerError::LlmBackend("Ollama response missing message.content".to_owned())
        })
}
