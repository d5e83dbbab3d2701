//! Normalize the free-text drug name before it is embedded in a prompt.
//! Strips invisible Unicode, collapses whitespace, caps the length.

use serde::Serialize;

use super::types::{Language, Region};

/// Maximum drug name length sent to the completion service (characters).
pub const MAX_QUERY_CHARS: usize = 120;

/// A normalized, non-empty lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugQuery {
    pub drug_name: String,
    pub language: Language,
    pub region: Region,
}

impl DrugQuery {
    /// Normalize raw user input. Returns `None` when nothing is left, in
    /// which case the pipeline must not run.
    pub fn normalize(raw: &str, language: Language, region: Region) -> Option<Self> {
        let drug_name = normalize_drug_name(raw);
        if drug_name.is_empty() {
            return None;
        }
        Some(Self {
            drug_name,
            language,
            region,
        })
    }
}

/// Clean a drug name: drop invisible and control characters, collapse all
/// whitespace runs (including newlines) to one space, trim, cap the length.
pub fn normalize_drug_name(raw: &str) -> String {
    let visible = remove_invisible_chars(raw);
    let collapsed = visible.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_QUERY_CHARS)
}

/// Remove zero-width, bidi-control and other format characters that could
/// hide text from the user while still reaching the model.
fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if c.is_whitespace() {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'..='\u{200F}'
                    | '\u{202A}'..='\u{202E}'
                    | '\u{2060}'..='\u{2064}'
                    | '\u{FEFF}'
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

/// Truncate to `max` characters, preferring the last word boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    match cut.rfind(' ') {
        Some(pos) if pos > 0 => cut[..pos].to_string(),
        _ => cut,
    }
}
