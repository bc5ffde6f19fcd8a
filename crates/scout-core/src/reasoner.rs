//! The reasoning-service seam.
//!
//! A [`Reasoner`] turns a transcript (plus the set of available actions)
//! into either plain text or a selected action. Implementations live in
//! `scout-providers`; the agent crate only sees this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;
use crate::message::Message;
use crate::tool::ToolDefinition;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ReasoningRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningResponse {
    /// The response message; selected actions surface as `tool_calls`.
    pub message: Message,
    pub model: String,
}

#[async_trait]
pub trait Reasoner: Send + Sync {
    fn name(&self) -> &str;

    /// Default model, if one is configured.
    fn default_model(&self) -> Option<&str>;

    async fn complete(&self, request: ReasoningRequest) -> Result<ReasoningResponse, Error>;
}

/// Invoke the reasoner, retrying transient failures with identical input.
///
/// Non-retryable errors are returned as-is. When `max_attempts` transient
/// failures occur in a row the call escalates to [`Error::RetryExhausted`].
pub async fn complete_with_retry(
    reasoner: &dyn Reasoner,
    request: ReasoningRequest,
    max_attempts: u32,
) -> Result<ReasoningResponse, Error> {
    let attempts = max_attempts.max(1);
    let mut last_message = String::new();

    for attempt in 1..=attempts {
        match reasoner.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) if err.is_retryable() => {
                warn!(
                    reasoner = reasoner.name(),
                    attempt,
                    max_attempts = attempts,
                    error = %err,
                    "Transient reasoner failure"
                );
                last_message = err.to_string();
            }
            Err(err) => return Err(err),
        }
    }

    Err(Error::retry_exhausted(attempts, last_message))
}
