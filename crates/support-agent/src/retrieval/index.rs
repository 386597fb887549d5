//! In-memory snippet index with keyword-overlap ranking

use std::collections::HashSet;
use std::path::Path;

use crate::config::FaqConfig;
use crate::error::Result;
use crate::ingestion::{DocumentParser, ParagraphMerger};
use crate::types::{Document, RankedSnippet};

use super::keywords::{keywordize, overlap};

/// Read-only index over the FAQ document.
///
/// Keyword sets for every block are computed once at load time, so a query
/// only has to keywordize the question.
#[derive(Debug, Clone, Default)]
pub struct SnippetIndex {
    document: Document,
    keywords: Vec<HashSet<String>>,
}

impl SnippetIndex {
    /// Build an index over an already-loaded document
    pub fn new(document: Document) -> Self {
        let keywords = document.blocks().iter().map(|b| keywordize(b)).collect();
        Self { document, keywords }
    }

    /// Build an index from raw paragraphs
    pub fn from_paragraphs<I, S>(source: &str, paragraphs: I, merge_threshold: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocks = ParagraphMerger::new(merge_threshold).merge(paragraphs);
        Self::new(Document::new(source, blocks))
    }

    /// Load and merge a FAQ source from disk
    pub fn load(path: &Path, merge_threshold: usize) -> Result<Self> {
        let paragraphs = DocumentParser::paragraphs_from_path(path)?;
        let index =
            Self::from_paragraphs(&path.display().to_string(), &paragraphs, merge_threshold);

        tracing::info!(
            "Loaded FAQ document {} ({} paragraphs -> {} blocks)",
            index.document.source,
            paragraphs.len(),
            index.len()
        );

        Ok(index)
    }

    /// Load using FAQ configuration
    pub fn from_config(config: &FaqConfig) -> Result<Self> {
        Self::load(&config.document_path, config.merge_threshold)
    }

    /// The indexed document
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Score every block against `query`, best first.
    ///
    /// The sort is stable, so equal scores keep document order.
    pub fn rank(&self, query: &str) -> Vec<RankedSnippet<'_>> {
        let query_keywords = keywordize(query);

        let mut ranked: Vec<RankedSnippet<'_>> = self
            .document
            .blocks()
            .iter()
            .zip(&self.keywords)
            .enumerate()
            .map(|(position, (text, keywords))| RankedSnippet {
                position,
                score: overlap(keywords, &query_keywords),
                text: text.as_str(),
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Up to `k` matching blocks, best first.
    ///
    /// Blocks with no shared keyword are never returned, except that a
    /// non-empty document with no match at all yields its first block with
    /// score 0 so the generator always gets some grounding text.
    pub fn select_top_k(&self, query: &str, k: usize) -> Vec<RankedSnippet<'_>> {
        let top: Vec<RankedSnippet<'_>> = self
            .rank(query)
            .into_iter()
            .take(k)
            .filter(|s| s.score > 0)
            .collect();

        if top.is_empty() {
            if let Some(first) = self.document.first() {
                tracing::debug!("No keyword overlap for query, falling back to first block");
                return vec![RankedSnippet {
                    position: 0,
                    score: 0,
                    text: first,
                }];
            }
        }

        top
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn faq() -> SnippetIndex {
        SnippetIndex::new(Document::new(
            "faq",
            vec![
                "Store hours: we are open Monday to Friday, 9am to 5pm.".to_string(),
                "Refund policy: refunds are issued to the original payment method within 14 days of receiving the return.".to_string(),
                "Shipping: standard shipping takes 3-5 business days. International shipping may incur customs duty.".to_string(),
                "Returns: items can be returned within 30 days for a refund or exchange.".to_string(),
            ],
        ))
    }

    #[test]
    fn test_refund_question_ranks_refund_block_first() {
        let index = faq();
        let top = index.select_top_k("what is your refund policy", 8);

        assert_eq!(top[0].position, 1);
        assert!(top[0].text.starts_with("Refund policy"));
        assert!(top.iter().all(|s| s.score > 0));
        // "refund" also appears in the returns block
        assert!(top.iter().any(|s| s.position == 3));
    }

    #[test]
    fn test_ties_keep_document_order() {
        let index = SnippetIndex::new(Document::new(
            "faq",
            vec![
                "alpha shipping".to_string(),
                "beta".to_string(),
                "gamma shipping".to_string(),
                "delta shipping".to_string(),
            ],
        ));
        let positions: Vec<usize> = index
            .select_top_k("shipping", 8)
            .iter()
            .map(|s| s.position)
            .collect();
        assert_eq!(positions, vec![0, 2, 3]);
    }

    #[test]
    fn test_k_limits_results() {
        let index = faq();
        assert_eq!(index.select_top_k("refund shipping hours returned", 2).len(), 2);
    }

    #[test]
    fn test_no_match_falls_back_to_first_block() {
        let index = faq();
        let top = index.select_top_k("quantum chromodynamics", 8);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].score, 0);
        assert_eq!(top[0].position, 0);
        assert!(top[0].text.starts_with("Store hours"));
    }

    #[test]
    fn test_empty_document_returns_nothing() {
        let index = SnippetIndex::default();
        assert!(index.select_top_k("refund", 8).is_empty());
    }

    #[test]
    fn test_load_merges_paragraphs() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Q: Do you ship abroad?").unwrap();
        writeln!(file, "A: Yes, to 40 countries.").unwrap();
        writeln!(file, "{}", "Long warranty paragraph. ".repeat(20)).unwrap();

        let index = SnippetIndex::load(file.path(), 300).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.document().blocks()[0].starts_with("Q: Do you ship abroad? A: Yes"));
    }

    fn doc_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-e ]{1,30}", 0..12)
    }

    proptest! {
        #[test]
        fn prop_top_k_bounded_and_sorted(
            blocks in doc_strategy(),
            query in "[a-e ]{0,20}",
            k in 1usize..6
        ) {
            let index = SnippetIndex::new(Document::new("p", blocks));
            let top = index.select_top_k(&query, k);

            prop_assert!(top.len() <= k);
            for pair in top.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }

            // Nothing excluded scores higher than the lowest included entry
            if let Some(min) = top.iter().map(|s| s.score).min() {
                let included: HashSet<usize> = top.iter().map(|s| s.position).collect();
                for r in index.rank(&query) {
                    if !included.contains(&r.position) {
                        prop_assert!(r.score <= min);
                    }
                }
            }
        }

        #[test]
        fn prop_non_empty_document_never_returns_empty(
            blocks in prop::collection::vec("[a-e]{1,10}", 1..8),
            query in "[v-z ]{0,20}"
        ) {
            let index = SnippetIndex::new(Document::new("p", blocks));
            let top = index.select_top_k(&query, 8);
            prop_assert_eq!(top.len(), 1);
            prop_assert_eq!(top[0].score, 0);
            prop_assert_eq!(top[0].position, 0);
        }
    }
}
