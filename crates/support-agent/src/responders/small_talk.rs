//! Small-talk responder for greetings and pleasantries

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::GenerationSettings;
use crate::error::Result;
use crate::generation::prompt::SMALL_TALK_SYSTEM;
use crate::providers::{CompletionRequest, LlmProvider};

use super::Responder;

pub const NAME: &str = "small_talk";

const DESCRIPTION: &str = "Handles simple conversational messages like greetings and small talk. \
Use it when the user says hi/hello/hey/good morning, asks how you are, thanks you, \
or otherwise starts casual chat.";

/// Forwards the raw message with a short, friendly persona
pub struct SmallTalkResponder {
    llm: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl SmallTalkResponder {
    pub fn new(llm: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self { llm, settings }
    }
}

#[async_trait]
impl Responder for SmallTalkResponder {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn respond(&self, input: &str) -> Result<String> {
        let request = CompletionRequest::new(SMALL_TALK_SYSTEM, input, self.settings);
        let answer = self.llm.complete(request).await?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Role, ScriptedLlm};

    #[tokio::test]
    async fn test_forwards_raw_message_with_persona() {
        let llm = Arc::new(ScriptedLlm::with_replies(["  Hi there! How can I help?  "]));
        let responder = SmallTalkResponder::new(llm.clone(), GenerationSettings::new(0.6, 80));

        let answer = responder.respond("hi there").await.unwrap();
        assert_eq!(answer, "Hi there! How can I help?");

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(requests[0].system_content(), Some(SMALL_TALK_SYSTEM));
        assert_eq!(requests[0].user_content(), Some("hi there"));
        assert_eq!(requests[0].temperature, 0.6);
        assert_eq!(requests[0].max_tokens, 80);
        assert!(!requests[0].json_output);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let llm = Arc::new(ScriptedLlm::new());
        llm.push_failure("insufficient_quota");
        let responder = SmallTalkResponder::new(llm, GenerationSettings::new(0.6, 80));

        let err = responder.respond("hello").await.unwrap_err();
        assert!(err.to_string().contains("insufficient_quota"));
    }
}
