//! Fixed registry of named responders plus the verifier

use std::sync::Arc;

use crate::config::AgentConfig;
use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::retrieval::SnippetIndex;

use super::{FaqResponder, Responder, ResponderInfo, SmallTalkResponder, VerifyResponder};

/// Responders available to the orchestrator, in registration order
#[derive(Default)]
pub struct ResponderPool {
    responders: Vec<Arc<dyn Responder>>,
    verifier: Option<VerifyResponder>,
}

impl ResponderPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Small talk + FAQ responders, and the verifier when enabled in config
    pub fn standard(
        config: &AgentConfig,
        llm: Arc<dyn LlmProvider>,
        index: Arc<SnippetIndex>,
    ) -> Self {
        let mut pool = Self::new()
            .with_responder(Arc::new(SmallTalkResponder::new(
                Arc::clone(&llm),
                config.responders.small_talk,
            )))
            .with_responder(Arc::new(FaqResponder::new(
                Arc::clone(&llm),
                index,
                config.faq.max_snippets,
                config.responders.faq,
            )));

        if config.orchestration.verify_answers {
            pool = pool.with_verifier(VerifyResponder::new(llm, config.responders.verifier));
        }

        pool
    }

    /// Register a responder. A later responder with the same name replaces the earlier one.
    pub fn with_responder(mut self, responder: Arc<dyn Responder>) -> Self {
        self.responders.retain(|r| r.name() != responder.name());
        self.responders.push(responder);
        self
    }

    /// Attach the verifier used after each candidate answer
    pub fn with_verifier(mut self, verifier: VerifyResponder) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Look up a responder by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Responder>> {
        self.responders.iter().find(|r| r.name() == name)
    }

    /// Invoke the named responder once
    pub async fn invoke(&self, name: &str, input: &str) -> Result<String> {
        let responder = self
            .get(name)
            .ok_or_else(|| Error::UnknownResponder(name.to_string()))?;

        tracing::info!("Invoking responder `{}`", name);
        responder.respond(input).await
    }

    /// Names and descriptions, in registration order
    pub fn catalog(&self) -> Vec<ResponderInfo> {
        self.responders
            .iter()
            .map(|r| ResponderInfo::new(r.name(), r.description()))
            .collect()
    }

    pub fn verifier(&self) -> Option<&VerifyResponder> {
        self.verifier.as_ref()
    }

    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ScriptedLlm;
    use crate::responders::{faq, small_talk};

    fn build_pool(verify: bool) -> (Arc<ScriptedLlm>, ResponderPool) {
        let llm = Arc::new(ScriptedLlm::new());
        let mut config = AgentConfig::default();
        config.orchestration.verify_answers = verify;
        let pool = ResponderPool::standard(&config, llm.clone(), Arc::new(SnippetIndex::default()));
        (llm, pool)
    }

    #[test]
    fn test_standard_pool() {
        let (_, pool) = build_pool(true);
        let names: Vec<String> = pool.catalog().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec![small_talk::NAME.to_string(), faq::NAME.to_string()]);
        assert!(pool.verifier().is_some());

        let (_, pool) = build_pool(false);
        assert!(pool.verifier().is_none());
    }

    #[tokio::test]
    async fn test_unknown_responder() {
        let (llm, pool) = build_pool(true);
        let err = pool.invoke("weather", "rain?").await.unwrap_err();
        assert!(matches!(err, Error::UnknownResponder(name) if name == "weather"));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invoke_by_name() {
        let (llm, pool) = build_pool(true);
        llm.push_reply("Hello!");
        assert_eq!(pool.invoke(small_talk::NAME, "hey").await.unwrap(), "Hello!");
        assert_eq!(llm.call_count(), 1);
    }

    #[test]
    fn test_reregistering_replaces() {
        let llm: Arc<dyn LlmProvider> = Arc::new(ScriptedLlm::new());
        let settings = crate::config::GenerationSettings::new(0.6, 80);
        let pool = ResponderPool::new()
            .with_responder(Arc::new(SmallTalkResponder::new(Arc::clone(&llm), settings)))
            .with_responder(Arc::new(SmallTalkResponder::new(llm, settings)));
        assert_eq!(pool.len(), 1);
    }
}
