//! FAQ source parsing: .docx paragraphs or plain-text lines

use std::path::Path;

use crate::error::{Error, Result};

/// Source format, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Word document; each `w:p` is a paragraph
    Docx,
    /// UTF-8 text; each line is a paragraph
    Text,
}

impl SourceFormat {
    /// Detect format from a path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("docx") => Self::Docx,
            _ => Self::Text,
        }
    }
}

/// Reads a document source into trimmed, non-empty paragraphs
pub struct DocumentParser;

impl DocumentParser {
    /// Read paragraphs from a file on disk
    pub fn paragraphs_from_path(path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            let shown = std::fs::canonicalize(path)
                .unwrap_or_else(|_| path.to_path_buf())
                .display()
                .to_string();
            return Err(Error::DocumentNotFound(shown));
        }

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let data = std::fs::read(path)?;
        Self::paragraphs_from_bytes(&data, SourceFormat::from_path(path), &filename)
    }

    /// Parse paragraphs from raw bytes
    pub fn paragraphs_from_bytes(
        data: &[u8],
        format: SourceFormat,
        filename: &str,
    ) -> Result<Vec<String>> {
        let paragraphs = match format {
            SourceFormat::Docx => Self::parse_docx(data, filename)?,
            SourceFormat::Text => Self::parse_text(data, filename)?,
        };

        Ok(paragraphs
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect())
    }

    fn parse_docx(data: &[u8], filename: &str) -> Result<Vec<String>> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut paragraphs = Vec::new();

        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut text = String::new();
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                paragraphs.push(text);
            }
            // Tables and section properties carry no FAQ prose
        }

        Ok(paragraphs)
    }

    fn parse_text(data: &[u8], filename: &str) -> Result<Vec<String>> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::file_parse(filename, format!("not valid UTF-8: {}", e)))?;
        Ok(text.lines().map(str::to_string).collect())
    }
}
