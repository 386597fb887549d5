//! Response types for the HTTP surface

use serde::{Deserialize, Serialize};

/// Successful tool_agent answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub answer: String,
}

impl AgentResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// `GET /api/agents/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentHealth {
    pub status: String,
    pub openai_key_set: bool,
}

impl AgentHealth {
    pub fn new(openai_key_set: bool) -> Self {
        Self {
            status: "ok".to_string(),
            openai_key_set,
        }
    }
}
