//! Keyword extraction and overlap scoring

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Words ignored when comparing a question to a snippet
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "is", "are", "be", "for", "on", "in",
    "at", "by", "with", "from", "as", "that", "this", "it", "we", "you", "your",
    "our", "us", "i",
];

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9]+").expect("token pattern is valid"));

/// Lowercased alphanumeric tokens of `text`, minus stopwords
pub fn keywordize(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Number of keywords shared by `snippet` and `query`
pub fn score(snippet: &str, query: &str) -> usize {
    overlap(&keywordize(snippet), &keywordize(query))
}

/// Size of the intersection of two keyword sets
pub(crate) fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> usize {
    // Iterate the smaller set
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|t| large.contains(*t)).count()
}
