//! Deterministic backend that replays queued replies
//!
//! Used to exercise responders and the orchestration loop without network
//! access. Every request is recorded so callers can inspect prompts and
//! sampling settings afterwards.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::error::{Error, Result};

use super::llm::{CompletionRequest, LlmProvider};

enum Reply {
    Text(String),
    Fail(String),
}

/// Queued-reply backend
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that answers with `replies` in order
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let llm = Self::new();
        for reply in replies {
            llm.push_reply(reply);
        }
        llm
    }

    /// Queue a successful reply
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().push_back(Reply::Text(reply.into()));
    }

    /// Queue a backend failure
    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().push_back(Reply::Fail(message.into()));
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Replies still queued
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().push(request);

        match self.replies.lock().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(Error::llm(message)),
            None => Err(Error::llm("scripted backend has no reply queued")),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
