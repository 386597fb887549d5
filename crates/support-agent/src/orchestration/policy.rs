//! Decision policies: what the orchestrator does next

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::responders::ResponderInfo;

use super::state::OrchestrationState;

/// Next step chosen by a decision policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Call a responder once with `input`
    Invoke {
        responder: String,
        #[serde(default)]
        input: String,
    },
    /// Stop and return `answer`
    Finalize { answer: String },
    /// Stop and ask the user (or a support employee) for more input
    AskUser { question: String },
}

impl Action {
    pub fn invoke(responder: impl Into<String>, input: impl Into<String>) -> Self {
        Action::Invoke {
            responder: responder.into(),
            input: input.into(),
        }
    }

    pub fn finalize(answer: impl Into<String>) -> Self {
        Action::Finalize {
            answer: answer.into(),
        }
    }

    pub fn ask_user(question: impl Into<String>) -> Self {
        Action::AskUser {
            question: question.into(),
        }
    }
}

/// Chooses the next action from the current state.
///
/// Implementations must not mutate anything shared; the orchestrator owns the
/// state and enforces the step budget regardless of what a policy returns.
#[async_trait]
pub trait DecisionPolicy: Send + Sync {
    async fn decide(&self, state: &OrchestrationState, catalog: &[ResponderInfo]) -> Result<Action>;

    /// Policy name for logging
    fn name(&self) -> &str;
}
