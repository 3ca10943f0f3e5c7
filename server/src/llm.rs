//! Chat model integration.
//!
//! The query pipeline talks to the model through the [`ChatModel`] trait so
//! tests can swap in a deterministic stand-in. The production implementation
//! is [`OpenAiChatModel`], a thin client for OpenAI-style
//! `/v1/chat/completions` endpoints. A request runs once to completion or
//! failure; retry policy is left to the caller (currently: none).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum LlmError {
    /// Transport-level failure (connect, timeout, TLS).
    Http(reqwest::Error),
    /// The API answered with a non-success status.
    Status(u16),
    /// The response body didn't carry an answer where one was expected.
    Malformed(String),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "http: {err}"),
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::Malformed(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

// ---------------------------------------------------------------------------
// ChatModel trait
// ---------------------------------------------------------------------------

/// A model that completes a system + user message pair into answer text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// OpenAI-style client
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL without the `/v1/chat/completions` suffix.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: crate::config::DEFAULT_MODEL.to_string(),
            base_url: crate::config::DEFAULT_OPENAI_URL.to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiChatModel {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("failed to build http client");
        Self { config, client }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let endpoint = format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
        };

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Malformed("no choices[0].message.content".to_string()))
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

// ---------------------------------------------------------------------------
// Deterministic stand-in (tests and offline development)
// ---------------------------------------------------------------------------

/// A [`ChatModel`] that returns a canned answer, or a canned failure when
/// constructed with [`StubChatModel::failing`].
pub struct StubChatModel {
    answer: Option<String>,
}

impl StubChatModel {
    pub fn new(answer: impl Into<String>) -> Self {
        Self { answer: Some(answer.into()) }
    }

    pub fn failing() -> Self {
        Self { answer: None }
    }
}

#[async_trait]
impl ChatModel for StubChatModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
        match &self.answer {
            Some(answer) => Ok(answer.clone()),
            None => Err(LlmError::Status(503)),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_parses_answer_content() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "The rent is 950." }, "finish_reason": "stop" }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("The rent is 950.")
        );
    }

    #[test]
    fn chat_response_tolerates_missing_content() {
        let raw = r#"{ "choices": [ { "message": { "role": "assistant" } } ] }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn chat_request_serializes_system_then_user() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage { role: "system", content: "context" },
                ChatMessage { role: "user", content: "question" },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "question");
    }
}
