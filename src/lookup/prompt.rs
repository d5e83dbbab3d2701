use super::query::DrugQuery;
use super::types::Region;

/// Build the extraction instruction block for one drug query.
///
/// Pure and deterministic: the same query always yields the same text.
pub fn build_drug_prompt(query: &DrugQuery) -> String {
    let drug_name = &query.drug_name;
    let language = query.language.display_name();
    let region = query.region.as_str();
    let sources = query.region.source_hint();
    let region_map = region_source_map();

    format!(
        r#"You are a trusted medical information API. Produce ONE JSON object describing the drug below that conforms exactly to the provided response schema.

REQUEST:
Drug name: "{drug_name}"
Region for source prioritization: {region} (prefer {sources}; mapping: {region_map})
Language for all text content: {language}

RULES:
1. Fill every required field of the schema with accurate, concise, current information.
2. Prioritize the official regulatory body of region {region} ({sources}). Fall back to global sources only when regional data is unavailable.
3. `mechanism_of_action`: a simplified explanation of 2 to 4 lines that a patient can follow while staying medically accurate.
4. `adverse_effects.serious`: start every item with the '⚠️ ' emoji.
5. `alternatives.therapeutic_alternatives`: drugs from the same ATC class, each with its key difference from {drug_name}.
6. `references`: name the concrete sources used, e.g. "FDA Drug Label (2023)" or "NHS UK (2024)".
7. `identifiers`: plausible, illustrative codes (rxCui, atc, cas, emaId, sfdaRegNo).
8. `boxed_warning`: populate ONLY if the drug carries a boxed ("black box") warning in region {region}; otherwise omit it.
9. `quick_warnings`: at most the three most critical risks.
10. `availability`: exactly "Rx" for prescription-only or "OTC" for over-the-counter.
11. Write every free-text value in {language}. Field names stay in English.
12. Output ONLY the JSON object. No explanatory text, no markdown, no code fences.
"#
    )
}

/// `US -> FDA, SA -> SFDA, ...` for all supported regions.
fn region_source_map() -> String {
    Region::ALL
        .iter()
        .map(|r| format!("{} -> {}", r.as_str(), r.source_hint()))
        .collect::<Vec<_>>()
        .join(", ")
}
