//! Configuration for the support agent
//!
//! Values come from, in order: built-in defaults, an optional TOML file, and
//! environment overrides. The resulting [`AgentConfig`] is passed explicitly to
//! every constructor; nothing else in the crate reads the environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable holding the backend API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Upper bound for `llm.max_retries`
pub const MAX_RETRIES: u32 = 10;

/// Main agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Text-generation backend configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// FAQ document configuration
    #[serde(default)]
    pub faq: FaqConfig,
    /// Per-responder generation settings
    #[serde(default)]
    pub responders: ResponderConfig,
    /// Orchestration loop configuration
    #[serde(default)]
    pub orchestration: OrchestrationConfig,
}

impl AgentConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = non_empty("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(path) = non_empty("SUPPORT_AGENT_FAQ_PATH") {
            self.faq.document_path = PathBuf::from(path);
        }
        if let Some(host) = non_empty("SUPPORT_AGENT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty("SUPPORT_AGENT_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid SUPPORT_AGENT_PORT: {}", port)))?;
        }
        Ok(())
    }

    /// Check invariants the rest of the crate relies on
    pub fn validate(&self) -> Result<()> {
        if self.orchestration.max_steps == 0 {
            return Err(Error::Config("orchestration.max_steps must be at least 1".into()));
        }
        if self.faq.merge_threshold == 0 {
            return Err(Error::Config("faq.merge_threshold must be positive".into()));
        }
        if self.faq.max_snippets == 0 {
            return Err(Error::Config("faq.max_snippets must be positive".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be at least 1".into()));
        }
        if self.llm.max_retries > MAX_RETRIES {
            return Err(Error::Config(format!(
                "llm.max_retries must be at most {}",
                MAX_RETRIES
            )));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(Error::Config("server.request_timeout_secs must be at least 1".into()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(Error::Config("llm.model must not be empty".into()));
        }
        Ok(())
    }

    /// Whether a backend credential is configured
    pub fn api_key_set(&self) -> bool {
        self.llm.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Upper bound for a whole tool_agent request in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            request_timeout_secs: 120,
        }
    }
}

/// Text-generation backend configuration (OpenAI-compatible)
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// API key; never serialized
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Transport retries per call (0 = fail on first error)
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
            max_retries: 0,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// FAQ document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqConfig {
    /// Path to the FAQ source (.docx, or plain text)
    pub document_path: PathBuf,
    /// Paragraph merge threshold in characters
    pub merge_threshold: usize,
    /// Maximum snippets handed to the FAQ responder
    pub max_snippets: usize,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from("general_faqs.docx"),
            merge_threshold: 300,
            max_snippets: 8,
        }
    }
}

/// Sampling settings for one backend call site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationSettings {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Per-responder generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    #[serde(default = "default_small_talk")]
    pub small_talk: GenerationSettings,
    #[serde(default = "default_faq")]
    pub faq: GenerationSettings,
    #[serde(default = "default_verifier")]
    pub verifier: GenerationSettings,
    #[serde(default = "default_controller")]
    pub controller: GenerationSettings,
}

fn default_small_talk() -> GenerationSettings {
    GenerationSettings::new(0.6, 80)
}

fn default_faq() -> GenerationSettings {
    GenerationSettings::new(0.2, 300)
}

fn default_verifier() -> GenerationSettings {
    GenerationSettings::new(0.0, 120)
}

fn default_controller() -> GenerationSettings {
    GenerationSettings::new(0.0, 200)
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            small_talk: default_small_talk(),
            faq: default_faq(),
            verifier: default_verifier(),
            controller: default_controller(),
        }
    }
}

/// Which decision procedure drives responder selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// The backend acts as meta-controller
    #[default]
    Llm,
    /// Deterministic keyword cues, no controller call
    Heuristic,
}

/// Orchestration loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Maximum responder invocations per query
    pub max_steps: usize,
    /// Run the verifier after every candidate answer
    pub verify_answers: bool,
    /// Decision policy
    #[serde(default)]
    pub policy: PolicyKind,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_steps: 5,
            verify_answers: true,
            policy: PolicyKind::Llm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_shipped_config_parses() {
        let raw = include_str!("../../../config/default.toml");
        let config = AgentConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.faq.document_path, PathBuf::from("data/general_faqs.txt"));
        assert_eq!(config.orchestration.policy, PolicyKind::Llm);
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.faq.merge_threshold, 300);
        assert_eq!(config.faq.max_snippets, 8);
        assert_eq!(config.orchestration.max_steps, 5);
        assert_eq!(config.responders.small_talk, GenerationSettings::new(0.6, 80));
        assert_eq!(config.responders.faq, GenerationSettings::new(0.2, 300));
        assert_eq!(config.responders.verifier.temperature, 0.0);
        assert!(!config.api_key_set());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml() {
        let config = AgentConfig::from_toml_str(
            r#"
            [orchestration]
            max_steps = 3
            verify_answers = false
            policy = "heuristic"

            [faq]
            document_path = "data/faq.txt"
            merge_threshold = 500
            max_snippets = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.orchestration.max_steps, 3);
        assert_eq!(config.orchestration.policy, PolicyKind::Heuristic);
        assert_eq!(config.faq.document_path, PathBuf::from("data/faq.txt"));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.responders.faq.max_tokens, 300);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("SUPPORT_AGENT_PORT", "9000"),
            ("SUPPORT_AGENT_FAQ_PATH", "  "),
        ]);
        let mut config = AgentConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert!(config.api_key_set());
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.faq.document_path, PathBuf::from("general_faqs.docx"));
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut config = AgentConfig::default();
        let err = config
            .apply_overrides(|k| (k == "SUPPORT_AGENT_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let mut config = AgentConfig::default();
        config.orchestration.max_steps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeouts_and_runaway_retries_rejected() {
        let mut config = AgentConfig::default();
        config.llm.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = AgentConfig::default();
        config.server.request_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = AgentConfig::default();
        config.llm.max_retries = 64;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.llm.max_retries = MAX_RETRIES;
        config.validate().unwrap();
    }

    #[test]
    fn test_api_key_not_leaked() {
        let mut config = AgentConfig::default();
        config.llm.api_key = Some("sk-secret".into());
        assert!(!format!("{:?}", config).contains("sk-secret"));
        assert!(!toml::to_string(&config).unwrap().contains("sk-secret"));
    }
}
