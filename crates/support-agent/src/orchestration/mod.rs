//! Orchestration: a decision policy selects responders until an answer is final
//!
//! The loop is bounded by `max_steps` responder invocations per query.

pub mod engine;
pub mod heuristic;
pub mod llm_policy;
pub mod policy;
pub mod state;

pub use engine::{Orchestrator, Outcome, OutcomeStatus};
pub use heuristic::HeuristicPolicy;
pub use llm_policy::LlmPolicy;
pub use policy::{Action, DecisionPolicy};
pub use state::{Attempt, OrchestrationState, Phase};
