//! Prompt construction and structured reply parsing

pub mod prompt;
pub mod structured;

pub use prompt::{PromptBuilder, CLARIFICATION_REQUEST, ESCALATION_MESSAGE, NO_INFORMATION_ANSWER};
pub use structured::parse_json_reply;
