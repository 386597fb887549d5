//! Verifier: judges whether a candidate answer is sufficient

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::GenerationSettings;
use crate::error::{Error, Result};
use crate::generation::prompt::{PromptBuilder, VERIFIER_SYSTEM};
use crate::generation::parse_json_reply;
use crate::providers::{CompletionRequest, LlmProvider};

/// Outcome of a sufficiency check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Verdict {
    /// The answer is sufficient and can be returned
    Finalize { answer: String },
    /// The answer is insufficient
    Continue { reason: String },
}

impl Verdict {
    /// Parse and validate a verifier reply
    pub fn parse(raw: &str) -> Result<Self> {
        let verdict: Verdict = parse_json_reply(raw, "verdict")?;
        match &verdict {
            Verdict::Finalize { answer } if answer.trim().is_empty() => {
                Err(Error::contract("verdict finalize carries an empty answer"))
            }
            _ => Ok(verdict),
        }
    }
}

/// Asks the backend to judge `(question, candidate)` pairs
pub struct VerifyResponder {
    llm: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl VerifyResponder {
    pub fn new(llm: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self { llm, settings }
    }

    /// Judge `candidate_answer` against `question`
    pub async fn verify(&self, question: &str, candidate_answer: &str) -> Result<Verdict> {
        let request = CompletionRequest::new(
            VERIFIER_SYSTEM,
            PromptBuilder::build_verify_prompt(question, candidate_answer),
            self.settings,
        )
        .json();

        let raw = self.llm.complete(request).await?;
        let verdict = Verdict::parse(&raw)?;

        tracing::debug!("Verifier verdict: {:?}", verdict);
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ScriptedLlm;

    #[test]
    fn test_parse_verdicts() {
        assert_eq!(
            Verdict::parse(r#"{"decision":"finalize","answer":"Refunds take 14 days."}"#).unwrap(),
            Verdict::Finalize { answer: "Refunds take 14 days.".into() }
        );
        assert_eq!(
            Verdict::parse(r#"{"decision":"continue","reason":"No timeframe given."}"#).unwrap(),
            Verdict::Continue { reason: "No timeframe given.".into() }
        );
    }

    #[test]
    fn test_prefix_format_is_rejected() {
        assert!(matches!(Verdict::parse("FINALIZE: yes"), Err(Error::Contract(_))));
        assert!(matches!(
            Verdict::parse(r#"{"decision":"maybe"}"#),
            Err(Error::Contract(_))
        ));
        assert!(matches!(
            Verdict::parse(r#"{"decision":"finalize","answer":"  "}"#),
            Err(Error::Contract(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_uses_json_mode_and_zero_temperature() {
        let llm = Arc::new(ScriptedLlm::with_replies([
            r#"{"decision":"continue","reason":"Answer does not mention fees."}"#,
        ]));
        let verifier = VerifyResponder::new(llm.clone(), GenerationSettings::new(0.0, 120));

        let verdict = verifier.verify("Are returns free?", "You can return items.").await.unwrap();
        assert!(matches!(verdict, Verdict::Continue { .. }));

        let request = &llm.requests()[0];
        assert!(request.json_output);
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, 120);
        let payload = request.user_content().unwrap();
        assert!(payload.contains("QUESTION:\nAre returns free?"));
        assert!(payload.contains("CANDIDATE_ANSWER:\nYou can return items."));
    }
}
