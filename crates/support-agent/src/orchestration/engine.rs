//! Step-bounded orchestration loop

use serde::Serialize;
use std::sync::Arc;

use crate::config::{AgentConfig, PolicyKind};
use crate::error::{Error, Result};
use crate::generation::ESCALATION_MESSAGE;
use crate::providers::LlmProvider;
use crate::responders::{ResponderPool, Verdict};
use crate::retrieval::SnippetIndex;

use super::heuristic::HeuristicPolicy;
use super::llm_policy::LlmPolicy;
use super::policy::{Action, DecisionPolicy};
use super::state::{Attempt, OrchestrationState, Phase};

/// How a query was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// A candidate was accepted
    Finalized,
    /// The user was asked for more input
    ClarificationRequested,
    /// Budget ran out; best informative candidate returned
    BudgetExhausted,
    /// Budget ran out with nothing usable; handed to a human
    Escalated,
}

/// Final answer plus the trace that produced it
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub answer: String,
    pub status: OutcomeStatus,
    /// Responder invocations used
    pub steps: usize,
    pub attempts: Vec<Attempt>,
}

impl Outcome {
    fn new(answer: impl Into<String>, status: OutcomeStatus, state: OrchestrationState) -> Self {
        debug_assert!(
            state.phase().is_terminal(),
            "outcome built in non-terminal phase {:?}",
            state.phase()
        );
        Self {
            answer: answer.into(),
            status,
            steps: state.step(),
            attempts: state.into_attempts(),
        }
    }
}

/// Drives a decision policy over a responder pool until an answer is final
pub struct Orchestrator {
    pool: ResponderPool,
    policy: Arc<dyn DecisionPolicy>,
    max_steps: usize,
}

impl Orchestrator {
    pub fn new(pool: ResponderPool, policy: Arc<dyn DecisionPolicy>, max_steps: usize) -> Self {
        Self {
            pool,
            policy,
            max_steps: max_steps.max(1),
        }
    }

    /// Standard pool and the configured policy, all sharing one backend
    pub fn from_config(
        config: &AgentConfig,
        llm: Arc<dyn LlmProvider>,
        index: Arc<SnippetIndex>,
    ) -> Self {
        let max_steps = config.orchestration.max_steps;
        let pool = ResponderPool::standard(config, Arc::clone(&llm), index);

        let policy: Arc<dyn DecisionPolicy> = match config.orchestration.policy {
            PolicyKind::Llm => {
                Arc::new(LlmPolicy::new(llm, config.responders.controller, max_steps))
            }
            PolicyKind::Heuristic => Arc::new(HeuristicPolicy::new()),
        };

        tracing::info!(
            "Orchestrator ready: policy `{}`, {} responder(s), max {} step(s), verifier {}",
            policy.name(),
            pool.len(),
            max_steps,
            if pool.verifier().is_some() { "on" } else { "off" }
        );

        Self::new(pool, policy, max_steps)
    }

    pub fn pool(&self) -> &ResponderPool {
        &self.pool
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Resolve one user query
    pub async fn run(&self, query: &str) -> Result<Outcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::bad_request("query must not be empty"));
        }

        let catalog = self.pool.catalog();
        let mut state = OrchestrationState::new(query);

        loop {
            if state.step() >= self.max_steps {
                return Ok(self.exhausted(state));
            }

            state.enter(Phase::SelectResponder);
            let action = self.policy.decide(&state, &catalog).await?;

            match action {
                Action::Invoke { responder, input } => {
                    let input = if input.trim().is_empty() {
                        query.to_string()
                    } else {
                        input
                    };

                    let answer = self.pool.invoke(&responder, &input).await?;
                    state.record_attempt(responder, input, answer.clone());
                    state.enter(Phase::Evaluate);

                    let Some(verifier) = self.pool.verifier() else {
                        state.enter(Phase::Continue);
                        continue;
                    };

                    match verifier.verify(query, &answer).await? {
                        Verdict::Finalize { answer } => {
                            state.enter(Phase::Finalize);
                            return Ok(Outcome::new(answer, OutcomeStatus::Finalized, state));
                        }
                        Verdict::Continue { reason } => {
                            tracing::debug!(
                                "Candidate rejected at step {}: {}",
                                state.step(),
                                reason
                            );
                            state.reject_last(reason);
                            state.enter(Phase::Continue);
                        }
                    }
                }
                Action::Finalize { answer } => {
                    let answer = if answer.trim().is_empty() {
                        state
                            .best_candidate()
                            .or_else(|| state.last_attempt())
                            .map(|a| a.answer.clone())
                            .ok_or_else(|| {
                                Error::contract("finalize action without an answer or candidate")
                            })?
                    } else {
                        answer
                    };

                    state.enter(Phase::Finalize);
                    return Ok(Outcome::new(answer, OutcomeStatus::Finalized, state));
                }
                Action::AskUser { question } => {
                    state.enter(Phase::Terminated);
                    return Ok(Outcome::new(
                        question,
                        OutcomeStatus::ClarificationRequested,
                        state,
                    ));
                }
            }
        }
    }

    fn exhausted(&self, mut state: OrchestrationState) -> Outcome {
        state.enter(Phase::Terminated);

        match state.best_candidate().map(|a| a.answer.clone()) {
            Some(answer) => {
                tracing::warn!(
                    "Step budget of {} exhausted; returning best candidate",
                    self.max_steps
                );
                Outcome::new(answer, OutcomeStatus::BudgetExhausted, state)
            }
            None => {
                tracing::warn!(
                    "Step budget of {} exhausted with no usable answer; escalating",
                    self.max_steps
                );
                Outcome::new(ESCALATION_MESSAGE, OutcomeStatus::Escalated, state)
            }
        }
    }
}
