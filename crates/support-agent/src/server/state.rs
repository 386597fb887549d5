//! Application state for the support agent server

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AgentConfig, API_KEY_ENV};
use crate::error::{Error, Result};
use crate::orchestration::Orchestrator;
use crate::providers::{LlmProvider, OpenAiClient};
use crate::retrieval::SnippetIndex;

/// Upper bound on the startup health check
const STARTUP_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AgentConfig,
    /// FAQ snippets, loaded once at startup
    index: Arc<SnippetIndex>,
    /// Absent when no backend credential is configured
    orchestrator: Option<Arc<Orchestrator>>,
}

impl AppState {
    /// Load the FAQ document and wire the orchestrator.
    ///
    /// A missing or unreadable FAQ document aborts startup. A missing API key
    /// does not: the server comes up, reports `openai_key_set: false`, and
    /// answers tool_agent requests with a configuration error.
    pub async fn new(config: AgentConfig) -> Result<Self> {
        tracing::info!("Initializing support agent state...");

        let index = Arc::new(SnippetIndex::from_config(&config.faq)?);

        let orchestrator = if config.api_key_set() {
            let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiClient::new(&config.llm)?);
            tracing::info!("LLM backend: {} ({})", llm.name(), llm.model());

            match tokio::time::timeout(STARTUP_HEALTH_TIMEOUT, llm.health_check()).await {
                Ok(Ok(true)) => tracing::info!("LLM backend is reachable"),
                Ok(Ok(false)) => tracing::warn!(
                    "LLM backend at {} answered but reported unhealthy",
                    config.llm.base_url
                ),
                Ok(Err(e)) => {
                    tracing::warn!("LLM backend at {} not reachable: {}", config.llm.base_url, e)
                }
                Err(_) => tracing::warn!(
                    "LLM backend at {} did not answer within {:?}",
                    config.llm.base_url,
                    STARTUP_HEALTH_TIMEOUT
                ),
            }

            Some(Arc::new(Orchestrator::from_config(&config, llm, Arc::clone(&index))))
        } else {
            tracing::warn!(
                "{} is not set; tool_agent requests will fail until it is configured",
                API_KEY_ENV
            );
            None
        };

        Ok(Self::from_parts(config, index, orchestrator))
    }

    /// Assemble state from prebuilt parts
    pub fn from_parts(
        config: AgentConfig,
        index: Arc<SnippetIndex>,
        orchestrator: Option<Arc<Orchestrator>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                index,
                orchestrator,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.inner.config
    }

    /// Get the snippet index
    pub fn index(&self) -> &Arc<SnippetIndex> {
        &self.inner.index
    }

    /// Get the orchestrator, or a configuration error when none is wired
    pub fn orchestrator(&self) -> Result<&Arc<Orchestrator>> {
        self.inner.orchestrator.as_ref().ok_or_else(|| {
            Error::Config(format!(
                "{} is not set; the agent cannot call the LLM backend",
                API_KEY_ENV
            ))
        })
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        self.inner.orchestrator.is_some()
    }
}
