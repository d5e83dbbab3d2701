use std::collections::VecDeque;
use std::sync::Mutex;

use super::gemini::GeminiClient;
use super::ollama::OllamaClient;
use super::types::{CompletionClient, CompletionRequest};
use super::LookupError;
use crate::config::{CompletionConfig, CompletionProvider};

/// Longest service error body kept in a `FetchFailed` detail.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Build the configured completion client.
///
/// Must run outside the async runtime: both providers use a blocking HTTP
/// client. Callers on a tokio worker use `spawn_blocking`.
pub fn build_completion_client(
    config: &CompletionConfig,
) -> Result<Box<dyn CompletionClient + Send + Sync>, LookupError> {
    match config.provider {
        CompletionProvider::Gemini => {
            let api_key = config.api_key.as_deref().ok_or_else(|| {
                LookupError::Config("API_KEY environment variable not set".into())
            })?;
            Ok(Box::new(GeminiClient::new(
                &config.base_url,
                api_key,
                &config.model,
                config.timeout_secs,
            )?))
        }
        CompletionProvider::Ollama => {
            let client = OllamaClient::new(&config.base_url, &config.model, config.timeout_secs)?;
            check_local_model(&client);
            Ok(Box::new(client))
        }
    }
}

/// Log whether the configured model has been pulled. A missing model or an
/// unreachable instance is not fatal: lookups report `FetchFailed` until
/// the model is available.
fn check_local_model(client: &OllamaClient) -> bool {
    match client.is_model_available() {
        Ok(true) => {
            tracing::info!(model = %client.model(), "Local model available");
            true
        }
        Ok(false) => {
            tracing::warn!(model = %client.model(), "Local model not pulled");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "Cannot list local models");
            false
        }
    }
}

/// Collapse a reqwest transport error into `FetchFailed`.
pub(crate) fn transport_failure(
    err: &reqwest::Error,
    base_url: &str,
    timeout_secs: u64,
) -> LookupError {
    if err.is_connect() {
        LookupError::FetchFailed(format!("cannot reach completion service at {base_url}"))
    } else if err.is_timeout() {
        LookupError::FetchFailed(format!("request timed out after {timeout_secs}s"))
    } else {
        LookupError::FetchFailed(err.to_string())
    }
}

/// Collapse a non-success HTTP status into `FetchFailed`.
pub(crate) fn status_failure(status: reqwest::StatusCode, body: &str) -> LookupError {
    let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    LookupError::FetchFailed(format!("service returned status {}: {body}", status.as_u16()))
}

/// Scripted completion client for tests. Records every prompt it receives.
pub struct MockCompletionClient {
    model: String,
    scripted: Mutex<VecDeque<Result<String, String>>>,
    fallback: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletionClient {
    /// Always answer with `response`.
    pub fn new(response: &str) -> Self {
        Self {
            model: "mock-model".to_string(),
            scripted: Mutex::new(VecDeque::new()),
            fallback: Ok(response.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `FetchFailed(detail)`.
    pub fn failing(detail: &str) -> Self {
        Self {
            fallback: Err(detail.to_string()),
            ..Self::new("")
        }
    }

    /// Answer with the scripted results in order, then fall back.
    pub fn with_sequence(mut self, results: Vec<Result<String, String>>) -> Self {
        self.scripted = Mutex::new(results.into());
        self
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Every prompt received, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LookupError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.to_string());
        }
        let next = self
            .scripted
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| self.fallback.clone());
        next.map_err(LookupError::FetchFailed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
