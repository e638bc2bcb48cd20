use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{GenerationOptions, LlmClient};
use super::SynthesisError;
use crate::config::EngineConfig;

/// Ollama HTTP client using the role-tagged `/api/chat` endpoint.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a client for `model` at `base_url`.
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, SynthesisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SynthesisError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, SynthesisError> {
        Self::new(&config.llm_base_url, &config.llm_model, config.llm_timeout_secs)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_send_error(&self, e: reqwest::Error) -> SynthesisError {
        if e.is_timeout() {
            SynthesisError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            SynthesisError::LlmConnection(self.base_url.clone())
        } else {
            SynthesisError::HttpClient(e.to_string())
        }
    }
}

/// Request body for Ollama /api/chat
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Response body from Ollama /api/chat
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

fn chat_request<'a>(
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    options: &GenerationOptions,
) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        stream: false,
        format: options.json_response.then_some("json"),
        options: ChatOptions {
            temperature: options.temperature,
        },
    }
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, SynthesisError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = chat_request(&self.model, system, prompt, options);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SynthesisError::LlmError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| SynthesisError::ResponseParsing(e.to_string()))?;

        Ok(parsed.message.content)
    }
}

/// A recorded call to a [`MockLlmClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub options: GenerationOptions,
}

/// Mock LLM client for testing. Returns a configurable response and
/// records every call.
pub struct MockLlmClient {
    response: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, SynthesisError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system: system.to_string(),
                prompt: prompt.to_string(),
                options: *options,
            });
        }
        Ok(self.response.clone())
    }
}

/// LLM client that always fails, simulating an unreachable model.
pub struct FailingLlmClient {
    base_url: String,
}

impl FailingLlmClient {
    pub fn new() -> Self {
        Self {
            base_url: "http://unreachable.invalid".into(),
        }
    }
}

impl Default for FailingLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmClient for FailingLlmClient {
    fn generate(
        &self,
        _system: &str,
        _prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, SynthesisError> {
        Err(SynthesisError::LlmConnection(self.base_url.clone()))
    }
}
