//! Text-generation backends
//!
//! Everything that talks to a model goes through [`LlmProvider`], so the
//! OpenAI client can be swapped for the scripted backend in tests.

pub mod llm;
pub mod openai;
pub mod scripted;

pub use llm::{ChatMessage, CompletionRequest, LlmProvider, Role};
pub use openai::OpenAiClient;
pub use scripted::ScriptedLlm;
