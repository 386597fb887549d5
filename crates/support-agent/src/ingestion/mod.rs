//! FAQ document ingestion: parsing and paragraph merging

pub mod chunker;
pub mod parser;

pub use chunker::ParagraphMerger;
pub use parser::{DocumentParser, SourceFormat};
