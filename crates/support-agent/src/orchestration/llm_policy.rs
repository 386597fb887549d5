//! Controller policy backed by the text-generation model

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::GenerationSettings;
use crate::error::{Error, Result};
use crate::generation::prompt::{PromptBuilder, CONTROLLER_SYSTEM};
use crate::generation::parse_json_reply;
use crate::providers::{CompletionRequest, LlmProvider};
use crate::responders::ResponderInfo;

use super::policy::{Action, DecisionPolicy};
use super::state::OrchestrationState;

/// Lets the model act as meta-controller over the registered responders
pub struct LlmPolicy {
    llm: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
    max_steps: usize,
}

impl LlmPolicy {
    pub fn new(llm: Arc<dyn LlmProvider>, settings: GenerationSettings, max_steps: usize) -> Self {
        Self {
            llm,
            settings,
            max_steps,
        }
    }

    /// Parse a controller reply and check it against the catalog
    pub fn parse_action(raw: &str, catalog: &[ResponderInfo]) -> Result<Action> {
        let action: Action = parse_json_reply(raw, "controller action")?;

        match &action {
            Action::Invoke { responder, .. } if !catalog.iter().any(|r| &r.name == responder) => {
                Err(Error::UnknownResponder(responder.clone()))
            }
            Action::AskUser { question } if question.trim().is_empty() => {
                Err(Error::contract("ask_user action carries an empty question"))
            }
            _ => Ok(action),
        }
    }
}

#[async_trait]
impl DecisionPolicy for LlmPolicy {
    async fn decide(
        &self,
        state: &OrchestrationState,
        catalog: &[ResponderInfo],
    ) -> Result<Action> {
        let request = CompletionRequest::new(
            CONTROLLER_SYSTEM,
            PromptBuilder::build_controller_prompt(state, catalog, self.max_steps),
            self.settings,
        )
        .json();

        let raw = self.llm.complete(request).await?;
        let action = Self::parse_action(&raw, catalog)?;

        tracing::debug!("Controller chose {:?}", action);
        Ok(action)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ScriptedLlm;

    fn catalog() -> Vec<ResponderInfo> {
        vec![
            ResponderInfo::new("small_talk", "greetings"),
            ResponderInfo::new("faq", "policy questions"),
        ]
    }

    #[test]
    fn test_parse_valid_actions() {
        let invoke = r#"{"action":"invoke","responder":"faq","input":"refunds"}"#;
        assert_eq!(
            LlmPolicy::parse_action(invoke, &catalog()).unwrap(),
            Action::invoke("faq", "refunds")
        );

        let finalize = r#"{"action":"finalize","answer":"Hello!"}"#;
        assert_eq!(
            LlmPolicy::parse_action(finalize, &catalog()).unwrap(),
            Action::finalize("Hello!")
        );
    }

    #[test]
    fn test_unknown_responder_rejected() {
        let reply = r#"{"action":"invoke","responder":"weather","input":"x"}"#;
        let err = LlmPolicy::parse_action(reply, &catalog()).unwrap_err();
        assert!(matches!(err, Error::UnknownResponder(_)));
    }

    #[test]
    fn test_malformed_reply_rejected() {
        assert!(matches!(
            LlmPolicy::parse_action("Calling FAQTool now", &catalog()),
            Err(Error::Contract(_))
        ));
        assert!(matches!(
            LlmPolicy::parse_action(r#"{"action":"ask_user","question":""}"#, &catalog()),
            Err(Error::Contract(_))
        ));
    }

    #[tokio::test]
    async fn test_controller_prompt_carries_history_and_budget() {
        let llm = Arc::new(ScriptedLlm::with_replies([
            r#"{"action":"finalize","answer":"14 days."}"#,
        ]));
        let policy = LlmPolicy::new(llm.clone(), GenerationSettings::new(0.0, 200), 5);

        let mut state = OrchestrationState::new("how long do refunds take");
        state.record_attempt("faq", "refund time", "Refunds take 14 days.");
        state.reject_last("Missing payment method.");

        let action = policy.decide(&state, &catalog()).await.unwrap();
        assert_eq!(action, Action::finalize("14 days."));

        let request = &llm.requests()[0];
        assert!(request.json_output);
        assert_eq!(request.system_content(), Some(CONTROLLER_SYSTEM));
        let payload = request.user_content().unwrap();
        assert!(payload.contains("USER_MESSAGE:\nhow long do refunds take"));
        assert!(payload.contains("- faq: policy questions"));
        assert!(payload.contains("REJECTED by verifier: Missing payment method."));
        assert!(payload.contains("REMAINING_RESPONDER_CALLS: 4"));
    }
}
