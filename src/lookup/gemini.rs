use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{status_failure, transport_failure};
use super::types::{CompletionClient, CompletionRequest};
use super::LookupError;

/// Public Gemini API endpoint.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini `generateContent` client constrained to JSON output.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LookupError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Concatenated text of the first candidate.
fn first_candidate_text(response: GenerateContentResponse) -> Result<String, LookupError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LookupError::FetchFailed(format!("prompt blocked: {reason}")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::FetchFailed("response has no candidates".into()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(LookupError::FetchFailed(format!(
            "candidate has no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}

impl CompletionClient for GeminiClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LookupError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.schema.to_gemini_schema(),
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| transport_failure(&e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_failure(status, &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| LookupError::FetchFailed(format!("invalid response envelope: {e}")))?;

        first_candidate_text(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::lookup::schema::DRUG_SCHEMA;
    use crate::test_support::spawn_stub;

    #[derive(Clone, Default)]
    struct Captured {
        inner: Arc<Mutex<Option<(String, String, Value)>>>,
    }

    fn ok_router(captured: Captured, reply: Value) -> Router {
        Router::new()
            .route(
                "/v1beta/models/:call",
                post(
                    move |State(c): State<Captured>,
                          Path(call): Path<String>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let key = headers
                                .get("x-goog-api-key")
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or_default()
                                .to_string();
                            *c.inner.lock().unwrap() = Some((call, key, body));
                            Json(reply)
                        }
                    },
                ),
            )
            .with_state(captured)
    }

    fn request() -> CompletionRequest<'static> {
        CompletionRequest {
            prompt: "Drug name: \"Aspirin\"",
            schema: &DRUG_SCHEMA,
        }
    }

    #[test]
    fn sends_json_constrained_request_and_returns_text() {
        let captured = Captured::default();
        let reply = json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"generic_name\":"}, {"text": "\"Aspirin\"}"}]},
                "finishReason": "STOP"
            }]
        });
        let base = spawn_stub(ok_router(captured.clone(), reply));
        let client = GeminiClient::new(&base, "secret-key", "gemini-2.5-flash", 10).unwrap();

        let text = client.complete(&request()).unwrap();
        assert_eq!(text, "{\"generic_name\":\"Aspirin\"}");

        let (call, key, body) = captured.inner.lock().unwrap().clone().unwrap();
        assert_eq!(call, "gemini-2.5-flash:generateContent");
        assert_eq!(key, "secret-key");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Drug name: \"Aspirin\"");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn error_status_collapses_to_fetch_failed() {
        let router = Router::new().route(
            "/v1beta/models/:call",
            post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let base = spawn_stub(router);
        let client = GeminiClient::new(&base, "bad", "gemini-2.5-flash", 10).unwrap();

        let err = client.complete(&request()).unwrap_err();
        assert!(matches!(err, LookupError::FetchFailed(ref d) if d.contains("403")));
    }

    #[test]
    fn blocked_prompt_is_fetch_failure() {
        let captured = Captured::default();
        let reply = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let base = spawn_stub(ok_router(captured, reply));
        let client = GeminiClient::new(&base, "k", "gemini-2.5-flash", 10).unwrap();

        let err = client.complete(&request()).unwrap_err();
        assert!(matches!(err, LookupError::FetchFailed(ref d) if d.contains("SAFETY")));
    }

    #[test]
    fn empty_candidate_is_fetch_failure() {
        let captured = Captured::default();
        let reply = json!({"candidates": [{"finishReason": "MAX_TOKENS"}]});
        let base = spawn_stub(ok_router(captured, reply));
        let client = GeminiClient::new(&base, "k", "gemini-2.5-flash", 10).unwrap();

        let err = client.complete(&request()).unwrap_err();
        assert!(matches!(err, LookupError::FetchFailed(ref d) if d.contains("MAX_TOKENS")));
    }

    #[test]
    fn unreachable_service_is_fetch_failure() {
        let client = GeminiClient::new("http://127.0.0.1:9", "k", "m", 2).unwrap();
        let err = client.complete(&request()).unwrap_err();
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = GeminiClient::new("https://example.test/", "k", "gemini-2.5-flash", 30).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.model(), "gemini-2.5-flash");
    }
}
