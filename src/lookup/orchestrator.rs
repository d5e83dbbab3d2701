use serde::Serialize;

use super::decoder::decode_drug_response;
use super::prompt::build_drug_prompt;
use super::query::DrugQuery;
use super::schema::DRUG_SCHEMA;
use super::types::{CompletionClient, CompletionRequest, Drug, Language, Region};
use super::validation::check_drug_content;
use super::LookupError;

/// A decoded drug together with the content warnings and the model that
/// produced it.
///
/// `boxed_warning_alert`, `serious_plain` and `regions` are derived from
/// `drug` for renderers: the alert flag switches the detail view to alert
/// styling, `serious_plain` drops the warning glyph and `regions` keeps only
/// the tags that name a known region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugReport {
    pub drug: Drug,
    pub warnings: Vec<String>,
    pub model: String,
    pub language: Language,
    pub region: Region,
    pub boxed_warning_alert: bool,
    pub serious_plain: Vec<String>,
    pub regions: Vec<Region>,
}

impl DrugReport {
    pub fn new(drug: Drug, warnings: Vec<String>, model: &str, query: &DrugQuery) -> Self {
        let boxed_warning_alert = drug.has_boxed_warning();
        let serious_plain = drug
            .adverse_effects
            .serious_stripped()
            .map(str::to_string)
            .collect();
        let regions = drug.known_regions();
        Self {
            drug,
            warnings,
            model: model.to_string(),
            language: query.language,
            region: query.region,
            boxed_warning_alert,
            serious_plain,
            regions,
        }
    }
}

/// Runs the lookup pipeline:
/// normalize → prompt → complete → decode → content checks
pub struct DrugLookup {
    client: Box<dyn CompletionClient + Send + Sync>,
    max_retries: usize,
}

impl DrugLookup {
    pub fn new(client: Box<dyn CompletionClient + Send + Sync>) -> Self {
        Self {
            client,
            max_retries: 0,
        }
    }

    /// Allow up to `max_retries` extra calls after a `FetchFailed`.
    /// Decode failures are never retried.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Normalize `text` and look it up. An empty query returns `Ok(None)`
    /// without contacting the completion service.
    pub fn lookup_raw(
        &self,
        text: &str,
        language: Language,
        region: Region,
    ) -> Result<Option<DrugReport>, LookupError> {
        match DrugQuery::normalize(text, language, region) {
            Some(query) => self.lookup(&query).map(Some),
            None => {
                tracing::debug!("Empty drug query ignored");
                Ok(None)
            }
        }
    }

    pub fn lookup(&self, query: &DrugQuery) -> Result<DrugReport, LookupError> {
        let _span = tracing::info_span!(
            "drug_lookup",
            query_len = query.drug_name.chars().count(),
            language = %query.language,
            region = %query.region,
            model = %self.client.model(),
        )
        .entered();

        let prompt = build_drug_prompt(query);
        let raw = self.complete_with_retry(&prompt)?;

        let drug = decode_drug_response(&raw).inspect_err(|e| {
            tracing::warn!(error = %e, response_len = raw.len(), "Completion response rejected");
        })?;
        let warnings = check_drug_content(&drug);

        tracing::info!(
            drug_id = %drug.id,
            warning_count = warnings.len(),
            "Drug lookup complete"
        );

        Ok(DrugReport::new(drug, warnings, self.client.model(), query))
    }

    fn complete_with_retry(&self, prompt: &str) -> Result<String, LookupError> {
        let request = CompletionRequest {
            prompt,
            schema: &DRUG_SCHEMA,
        };

        let mut attempt = 0;
        loop {
            match self.client.complete(&request) {
                Ok(text) => return Ok(text),
                Err(e) if e.is_fetch_failure() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "Completion call failed, retrying");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Completion call failed");
                    return Err(e);
                }
            }
        }
    }
}
