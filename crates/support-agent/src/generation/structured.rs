//! Parsing of structured (JSON) backend replies

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Parse a backend reply that must be a single JSON object.
///
/// A surrounding markdown code fence is tolerated; any other extra text is a
/// contract violation. `what` names the expected object in error messages.
pub fn parse_json_reply<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(Error::contract(format!("empty {} reply", what)));
    }

    serde_json::from_str(body).map_err(|e| {
        Error::contract(format!("invalid {} reply ({}): {}", what, e, truncate(raw, 200)))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence, with or without a newline after it
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
