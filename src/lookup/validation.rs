//! Non-fatal convention checks on a decoded Drug. Structural problems are
//! rejected by the decoder; these only produce warnings.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Drug, SERIOUS_GLYPH};

/// Quick warnings beyond this count are not meant for a summary card.
const MAX_QUICK_WARNINGS: usize = 3;

static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/]+").expect("valid regex"));

/// Check `drug` against the content conventions requested in the prompt.
///
/// Returns human-readable warnings; an empty list means the monograph
/// follows every convention.
pub fn check_drug_content(drug: &Drug) -> Vec<String> {
    let mut warnings = Vec::new();

    if drug.quick_warnings.len() > MAX_QUICK_WARNINGS {
        warnings.push(format!(
            "quick_warnings has {} items, expected at most {MAX_QUICK_WARNINGS}",
            drug.quick_warnings.len()
        ));
    }

    let unmarked = drug
        .adverse_effects
        .serious
        .iter()
        .filter(|effect| !effect.trim_start().starts_with('\u{26A0}'))
        .count();
    if unmarked > 0 {
        warnings.push(format!(
            "{unmarked} serious adverse effect(s) missing the {SERIOUS_GLYPH} prefix"
        ));
    }

    if drug.indications.is_empty() {
        warnings.push("indications is empty".to_string());
    }
    if drug.dosing_adult.is_empty() {
        warnings.push("dosing_adult is empty".to_string());
    }

    for reference in &drug.references {
        if let Some(url) = reference.url.as_deref() {
            if !HTTP_URL.is_match(url.trim()) {
                warnings.push(format!(
                    "reference {:?} has a non-http(s) url",
                    reference.source
                ));
            }
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            drug_id = %drug.id,
            warning_count = warnings.len(),
            "Drug content convention warnings detected"
        );
    }

    warnings
}
