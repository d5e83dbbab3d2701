//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub lookup_available: bool,
    pub model: Option<String>,
    pub market_source: String,
    pub open_sessions: usize,
    pub uptime_secs: i64,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        name: crate::config::APP_NAME,
        version: crate::config::APP_VERSION,
        lookup_available: ctx.lookup.is_some(),
        model: ctx.lookup.as_ref().map(|l| l.model().to_string()),
        market_source: ctx.market.describe(),
        open_sessions: ctx.sessions.len(),
        uptime_secs: (Utc::now() - ctx.started_at).num_seconds(),
    })
}
