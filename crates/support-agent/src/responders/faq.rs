//! FAQ responder grounded in the snippet index

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::GenerationSettings;
use crate::error::Result;
use crate::generation::prompt::{PromptBuilder, FAQ_SYSTEM};
use crate::providers::{CompletionRequest, LlmProvider};
use crate::retrieval::SnippetIndex;

use super::Responder;

pub const NAME: &str = "faq";

const DESCRIPTION: &str = "Answers customer FAQ-style questions strictly from the company FAQ document. \
Use it for shipping, returns, refunds, warranties, hours, policies, pricing and similar questions.";

/// Answers from the top-ranked FAQ snippets only
pub struct FaqResponder {
    llm: Arc<dyn LlmProvider>,
    index: Arc<SnippetIndex>,
    max_snippets: usize,
    settings: GenerationSettings,
}

impl FaqResponder {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        index: Arc<SnippetIndex>,
        max_snippets: usize,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            llm,
            index,
            max_snippets,
            settings,
        }
    }

    /// Build the grounded user payload for `question`
    pub fn build_prompt(&self, question: &str) -> String {
        let snippets = self.index.select_top_k(question, self.max_snippets);

        tracing::debug!(
            "FAQ context: {} snippet(s), best score {}",
            snippets.len(),
            snippets.first().map(|s| s.score).unwrap_or(0)
        );

        let context = PromptBuilder::build_faq_context(&snippets);
        PromptBuilder::build_faq_prompt(question, &context)
    }
}

#[async_trait]
impl Responder for FaqResponder {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn respond(&self, input: &str) -> Result<String> {
        let request = CompletionRequest::new(FAQ_SYSTEM, self.build_prompt(input), self.settings);
        let answer = self.llm.complete(request).await?;
        Ok(answer.trim().to_string())
    }
}
