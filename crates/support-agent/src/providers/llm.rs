//! LLM provider trait for chat-style text generation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenerationSettings;
use crate::error::Result;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single role-tagged message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One generation call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Output cap in tokens
    pub max_tokens: u32,
    /// Ask the backend for a single JSON object
    pub json_output: bool,
}

impl CompletionRequest {
    /// System + user message pair with the given settings
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            json_output: false,
        }
    }

    /// Request a JSON object response
    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Content of the last user message
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Content of the system message
    pub fn system_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }
}

/// Trait for text-generation backends
///
/// Implementations:
/// - `OpenAiClient`: OpenAI-compatible chat completions API
/// - `ScriptedLlm`: deterministic queued replies
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a request.
    ///
    /// Any failure (network, quota, bad status, malformed body) is an error;
    /// implementations never substitute a default answer.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Check if the provider is reachable and accepts our credential
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
