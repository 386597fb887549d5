//! Responders: named capabilities that turn a message into a text answer
//!
//! Each responder performs exactly one backend call per invocation. Choosing
//! which responder to call is the orchestrator's job, so responders do no
//! gating of their own.

pub mod faq;
pub mod pool;
pub mod small_talk;
pub mod verify;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

pub use faq::FaqResponder;
pub use pool::ResponderPool;
pub use small_talk::SmallTalkResponder;
pub use verify::{Verdict, VerifyResponder};

/// A domain responder the controller can select by name
#[async_trait]
pub trait Responder: Send + Sync {
    /// Registry name, as the controller refers to it
    fn name(&self) -> &str;

    /// When to use this responder (shown to the controller)
    fn description(&self) -> &str;

    /// Produce a candidate answer for `input`
    async fn respond(&self, input: &str) -> Result<String>;
}

/// Name and description of a registered responder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponderInfo {
    pub name: String,
    pub description: String,
}

impl ResponderInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
