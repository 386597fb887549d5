//! Core data types for the support agent

pub mod document;
pub mod query;
pub mod response;

pub use document::{Document, RankedSnippet};
pub use query::AgentRequest;
pub use response::{AgentHealth, AgentResponse, HealthStatus};
