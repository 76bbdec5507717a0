//! Decision oracle - Client for the remote LLM decision endpoint
//!
//! One bounded chat-completions round trip per turn. Every failure mode
//! collapses to "no decision" upstream; this module only classifies it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, error, info};

/// Oracle call error
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("oracle returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure classes a turn report distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleFailure {
    /// Timeout, connection error or non-success status
    Transport,
    /// Body or answer not parseable per the expected schema
    Schema,
    /// Designation carried no usable tokens
    Empty,
}

impl OracleFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleFailure::Transport => "transport",
            OracleFailure::Schema => "schema",
            OracleFailure::Empty => "empty",
        }
    }
}

impl OracleError {
    /// Classify for the turn report
    pub fn failure(&self) -> OracleFailure {
        match self {
            OracleError::Http(e) if e.is_decode() => OracleFailure::Schema,
            OracleError::Http(_) | OracleError::Status(_) => OracleFailure::Transport,
            OracleError::InvalidResponse(_) => OracleFailure::Schema,
        }
    }
}

/// One chat message, in wire form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        ChatMessage {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }
}

/// Decision oracle trait
#[async_trait]
pub trait DecisionOracle: Send + Sync {
    /// One round trip: system prompt, prior exchanges, current prompt
    async fn invoke(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        user_prompt: &str,
    ) -> Result<String, OracleError>;
}

/// Chat-completions endpoint configuration
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://api.deepseek.com".to_string()),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "deepseek-chat".to_string()),
            api_key: std::env::var("LLM_API_KEY").ok(),
            timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            temperature: 0.4,
            max_tokens: 300,
        }
    }
}

/// Request body (OpenAI-compatible)
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

/// Live chat-completions oracle
pub struct ChatCompletionsOracle {
    client: Client,
    config: OracleConfig,
}

impl ChatCompletionsOracle {
    pub fn new(config: OracleConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            "ChatCompletionsOracle initialized: {} (model: {})",
            config.api_url, config.model
        );

        Self { client, config }
    }

    pub fn with_defaults() -> Self {
        Self::new(OracleConfig::default())
    }
}

#[async_trait]
impl DecisionOracle for ChatCompletionsOracle {
    async fn invoke(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        user_prompt: &str,
    ) -> Result<String, OracleError> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(user_prompt));

        let request = ChatRequest {
            model: &self.config.model,
            messages: &messages,
            response_format: ResponseFormat {
                format: "json_object",
            },
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Calling decision oracle: {}", url);
        let start = std::time::Instant::now();

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Oracle API error: {} - {}", status, body);
            return Err(OracleError::Status(status));
        }

        let result: ChatResponse = response.json().await?;
        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OracleError::InvalidResponse("no choices in response".to_string()))?;

        debug!(
            "Oracle reply received in {:?}: {} chars",
            start.elapsed(),
            content.len()
        );

        Ok(content)
    }
}

/// The oracle's answer, parsed from its JSON reply
#[derive(Debug, Clone, Deserialize)]
pub struct OracleDecision {
    pub cards: CardDesignation,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Cards field: either one token string or a token list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CardDesignation {
    Text(String),
    Tokens(Vec<String>),
}

impl CardDesignation {
    /// Flatten to one token string; lists join with single spaces
    pub fn as_text(&self) -> String {
        match self {
            CardDesignation::Text(s) => s.clone(),
            CardDesignation::Tokens(tokens) => tokens.join(" "),
        }
    }
}

/// Parse the oracle's raw reply against the answer schema
pub fn parse_decision(raw: &str) -> Result<OracleDecision, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

/// Mock oracle for testing
pub struct MockOracle {
    reply: String,
    calls: AtomicUsize,
}

impl MockOracle {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times invoke ran
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionOracle for MockOracle {
    async fn invoke(
        &self,
        _system_prompt: &str,
        _history: &[ChatMessage],
        _user_prompt: &str,
    ) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}
