//! Lookup session endpoints.
//!
//! - `POST /api/sessions`: open a session
//! - `GET /api/sessions/:id`: current state
//! - `DELETE /api/sessions/:id`
//! - `PUT /api/sessions/:id/settings`: language, region, search text
//! - `POST /api/sessions/:id/search`: run a lookup in the session

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{lookup_blocking, parse_language, parse_region, ApiContext};
use crate::lookup::{Language, Region};
use crate::session::LookupSession;

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    pub language: Option<String>,
    pub region: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SettingsRequest {
    pub language: Option<String>,
    pub region: Option<String>,
    pub search_text: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SearchRequest {
    pub query: Option<String>,
}

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid session id".into()))
}

/// `POST /api/sessions`
pub async fn create(
    State(ctx): State<ApiContext>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<LookupSession>), ApiError> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let language = parse_language(req.language.as_deref())?;
    let region = parse_region(req.region.as_deref())?;
    let session = ctx.sessions.create(language, region)?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `GET /api/sessions/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<LookupSession>, ApiError> {
    let id = parse_session_id(&id)?;
    Ok(Json(ctx.sessions.get(&id)?))
}

/// `DELETE /api/sessions/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    ctx.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/sessions/:id/settings`
pub async fn update_settings(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(req): Json<SettingsRequest>,
) -> Result<Json<LookupSession>, ApiError> {
    let id = parse_session_id(&id)?;
    let language: Option<Language> = req
        .language
        .as_deref()
        .map(|l| parse_language(Some(l)))
        .transpose()?;
    let region: Option<Region> = req
        .region
        .as_deref()
        .map(|r| parse_region(Some(r)))
        .transpose()?;

    let session = ctx.sessions.update(&id, |session| {
        if let Some(language) = language {
            session.set_language(language);
        }
        if let Some(region) = region {
            session.set_region(region);
        }
        if let Some(text) = req.search_text.as_deref() {
            session.set_search_text(text);
        }
        session.clone()
    })?;
    Ok(Json(session))
}

/// `POST /api/sessions/:id/search`
///
/// Uses `query` when given, else the session's search text. An empty
/// effective query returns the session unchanged. The lookup runs outside
/// the registry lock; if another search started meanwhile, this result is
/// dropped and the newer state is returned.
pub async fn search(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Option<Json<SearchRequest>>,
) -> Result<Json<LookupSession>, ApiError> {
    let id = parse_session_id(&id)?;
    let req = body.map(|Json(b)| b).unwrap_or_default();

    // An empty effective query is a no-op, with or without a backend.
    if ctx.sessions.update(&id, |s| s.effective_query(req.query.as_deref()).is_none())? {
        return Ok(Json(ctx.sessions.get(&id)?));
    }
    let lookup = ctx.lookup()?;

    let Some(ticket) = ctx.sessions.update(&id, |s| s.begin(req.query.as_deref()))? else {
        return Ok(Json(ctx.sessions.get(&id)?));
    };

    let result = lookup_blocking(lookup, ticket.query.clone()).await?;

    let session = ctx.sessions.update(&id, |session| {
        session.complete(&ticket, result);
        session.clone()
    })?;
    Ok(Json(session))
}
