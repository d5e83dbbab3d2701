use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{status_failure, transport_failure};
use super::types::{CompletionClient, CompletionRequest};
use super::LookupError;

/// Local Ollama instance.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Model used when none is configured.
pub const DEFAULT_OLLAMA_MODEL: &str = "medgemma";

/// Ollama HTTP client for local inference with schema-constrained output.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LookupError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    /// Names of the models pulled into the local instance.
    pub fn list_models(&self) -> Result<Vec<String>, LookupError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| transport_failure(&e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_failure(status, &body));
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| LookupError::FetchFailed(format!("invalid tags response: {e}")))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model (any tag) is present locally.
    pub fn is_model_available(&self) -> Result<bool, LookupError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(&self.model)))
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: Value,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl CompletionClient for OllamaClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LookupError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt: request.prompt,
            stream: false,
            format: request.schema.to_json_schema(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| transport_failure(&e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_failure(status, &body));
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| LookupError::FetchFailed(format!("invalid generate response: {e}")))?;

        Ok(parsed.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
