//! FAQ document and ranked snippet types

use serde::Serialize;

/// A loaded FAQ document: an ordered list of merged text blocks.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Where the document was loaded from (for logging)
    pub source: String,
    blocks: Vec<String>,
}

impl Document {
    /// Create a document from already-merged blocks, dropping blank ones
    pub fn new(source: impl Into<String>, blocks: Vec<String>) -> Self {
        Self {
            source: source.into(),
            blocks: blocks
                .into_iter()
                .filter(|b| !b.trim().is_empty())
                .collect(),
        }
    }

    /// Blocks in document order
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// First block, if any
    pub fn first(&self) -> Option<&str> {
        self.blocks.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A block paired with its keyword-overlap score against a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedSnippet<'a> {
    /// 0-based index of the block in the document
    pub position: usize,
    /// Number of keyword tokens shared with the query
    pub score: usize,
    /// Block text
    pub text: &'a str,
}
