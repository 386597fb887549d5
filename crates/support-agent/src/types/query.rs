//! Inbound request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Body of `POST /api/agents/tool_agent`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    /// The user's message
    pub query: String,
}

impl AgentRequest {
    /// Create a new request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Reject blank queries before any backend call is made
    pub fn validated(self) -> Result<Self> {
        if self.query.trim().is_empty() {
            return Err(Error::bad_request("query must not be empty"));
        }
        Ok(self)
    }
}
