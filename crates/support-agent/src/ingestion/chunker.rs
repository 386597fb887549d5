//! Paragraph merging into bounded blocks

/// Merges consecutive paragraphs into blocks.
///
/// Paragraphs accumulate in a buffer; once the space-joined buffer is longer
/// than `threshold` characters it is emitted as a block. Whatever is left at
/// the end becomes a final, possibly short, block.
pub struct ParagraphMerger {
    /// Merge threshold in characters
    threshold: usize,
}

impl ParagraphMerger {
    /// Create a merger with the given threshold
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Merge paragraphs, skipping blank ones
    pub fn merge<I, S>(&self, paragraphs: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocks = Vec::new();
        let mut buffer = String::new();
        // Character length of `buffer`, tracked so we never rescan it
        let mut buffer_chars = 0usize;

        for paragraph in paragraphs {
            let paragraph = paragraph.as_ref().trim();
            if paragraph.is_empty() {
                continue;
            }

            if !buffer.is_empty() {
                buffer.push(' ');
                buffer_chars += 1;
            }
            buffer.push_str(paragraph);
            buffer_chars += paragraph.chars().count();

            if buffer_chars > self.threshold {
                blocks.push(std::mem::take(&mut buffer));
                buffer_chars = 0;
            }
        }

        if !buffer.is_empty() {
            blocks.push(buffer);
        }

        blocks
    }
}

impl Default for ParagraphMerger {
    fn default() -> Self {
        Self::new(300)
    }
}
