//! Keyword-overlap retrieval over the FAQ document

pub mod index;
pub mod keywords;

pub use index::SnippetIndex;
pub use keywords::{keywordize, score, STOPWORDS};
