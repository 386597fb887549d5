//! Per-request orchestration state

use serde::Serialize;

use crate::generation::PromptBuilder;

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the policy to choose the next action
    SelectResponder,
    /// A candidate answer is being judged
    Evaluate,
    /// Candidate accepted; the loop has ended
    Finalize,
    /// Candidate judged insufficient; another step follows
    Continue,
    /// Ended without a finalized answer (clarification or budget exhausted)
    Terminated,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Finalize | Phase::Terminated)
    }
}

/// One responder invocation and how it was judged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// 1-based step number
    pub step: usize,
    pub responder: String,
    pub input: String,
    pub answer: String,
    /// Verifier's reason when the answer was judged insufficient
    pub rejection: Option<String>,
}

impl Attempt {
    /// Whether the answer carries content rather than a "no information" reply
    pub fn is_informative(&self) -> bool {
        !self.answer.trim().is_empty() && !PromptBuilder::is_no_information(&self.answer)
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Transient state for resolving one query
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationState {
    query: String,
    step: usize,
    phase: Phase,
    attempts: Vec<Attempt>,
}

impl OrchestrationState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            step: 0,
            phase: Phase::SelectResponder,
            attempts: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Responder invocations so far
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    /// Whether `responder` has been invoked already
    pub fn has_tried(&self, responder: &str) -> bool {
        self.attempts.iter().any(|a| a.responder == responder)
    }

    /// Move to `phase`
    pub fn enter(&mut self, phase: Phase) {
        tracing::debug!("Orchestration step {}: {:?} -> {:?}", self.step, self.phase, phase);
        self.phase = phase;
    }

    /// Record a responder invocation; advances the step counter
    pub fn record_attempt(
        &mut self,
        responder: impl Into<String>,
        input: impl Into<String>,
        answer: impl Into<String>,
    ) {
        self.step += 1;
        self.attempts.push(Attempt {
            step: self.step,
            responder: responder.into(),
            input: input.into(),
            answer: answer.into(),
            rejection: None,
        });
    }

    /// Mark the latest attempt as judged insufficient
    pub fn reject_last(&mut self, reason: impl Into<String>) {
        if let Some(last) = self.attempts.last_mut() {
            last.rejection = Some(reason.into());
        }
    }

    /// Consume the state, keeping the attempt trace
    pub fn into_attempts(self) -> Vec<Attempt> {
        self.attempts
    }

    /// Best answer collected so far, if any has content.
    ///
    /// Prefers the latest informative answer the verifier did not reject,
    /// then the latest informative answer at all.
    pub fn best_candidate(&self) -> Option<&Attempt> {
        self.attempts
            .iter()
            .rev()
            .find(|a| a.is_informative() && !a.is_rejected())
            .or_else(|| self.attempts.iter().rev().find(|a| a.is_informative()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::NO_INFORMATION_ANSWER;

    #[test]
    fn test_new_state() {
        let state = OrchestrationState::new("hi there");
        assert_eq!(state.step(), 0);
        assert_eq!(state.phase(), Phase::SelectResponder);
        assert!(state.attempts().is_empty());
        assert!(state.best_candidate().is_none());
    }

    #[test]
    fn test_record_and_reject() {
        let mut state = OrchestrationState::new("refund?");
        state.record_attempt("faq", "refund?", "Refunds take 14 days.");
        state.reject_last("Does not say how to request one.");

        assert_eq!(state.step(), 1);
        assert!(state.has_tried("faq"));
        assert!(!state.has_tried("small_talk"));
        assert_eq!(state.last_attempt().unwrap().step, 1);
        assert!(state.last_attempt().unwrap().is_rejected());
    }

    #[test]
    fn test_best_candidate_prefers_accepted_informative_answers() {
        let mut state = OrchestrationState::new("refund?");
        state.record_attempt("faq", "refund?", "Refunds take 14 days.");
        state.record_attempt("faq", "refund request", "Email support to request a refund.");
        state.reject_last("Too vague.");
        state.record_attempt("small_talk", "refund?", NO_INFORMATION_ANSWER);

        assert_eq!(state.best_candidate().unwrap().answer, "Refunds take 14 days.");
    }

    #[test]
    fn test_best_candidate_falls_back_to_rejected_informative() {
        let mut state = OrchestrationState::new("refund?");
        state.record_attempt("faq", "refund?", "Refunds take 14 days.");
        state.reject_last("Too vague.");
        state.record_attempt("faq", "refund?", NO_INFORMATION_ANSWER);

        assert_eq!(state.best_candidate().unwrap().step, 1);
    }

    #[test]
    fn test_no_informative_candidate() {
        let mut state = OrchestrationState::new("telescopes?");
        state.record_attempt("faq", "telescopes?", NO_INFORMATION_ANSWER);
        assert!(state.best_candidate().is_none());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(Phase::Finalize.is_terminal());
        assert!(Phase::Terminated.is_terminal());
        assert!(!Phase::Continue.is_terminal());
        assert!(!Phase::Evaluate.is_terminal());
    }
}
