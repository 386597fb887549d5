//! support-agent: customer-support chat backend
//!
//! A step-bounded orchestrator lets a decision policy pick between a
//! small-talk responder and an FAQ responder grounded in a keyword-ranked
//! snippet index, with an optional verifier judging each candidate answer.
//! Everything is served over a small axum HTTP API.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod orchestration;
pub mod providers;
pub mod responders;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::AgentConfig;
pub use error::{Error, Result};
pub use orchestration::{Orchestrator, Outcome, OutcomeStatus};
pub use retrieval::SnippetIndex;
pub use types::{AgentRequest, AgentResponse};
