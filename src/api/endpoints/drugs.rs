//! Stateless drug lookup endpoints.
//!
//! - `GET /api/drugs/options?lang=`: screen texts, regions, example drugs
//! - `POST /api/drugs/lookup`: one lookup, no session

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{lookup_blocking, parse_language, parse_region, ApiContext};
use crate::lookup::DrugQuery;
use crate::session::LookupState;
use crate::texts::{ui_texts, LookupOptions};

#[derive(Deserialize)]
pub struct OptionsQuery {
    pub lang: Option<String>,
}

/// `GET /api/drugs/options`
pub async fn options(Query(query): Query<OptionsQuery>) -> Result<Json<LookupOptions>, ApiError> {
    let language = parse_language(query.lang.as_deref())?;
    Ok(Json(LookupOptions::for_language(language)))
}

#[derive(Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub query: String,
    pub language: Option<String>,
    pub region: Option<String>,
}

/// `POST /api/drugs/lookup`
///
/// An empty query answers `{"state": "idle"}` without calling the
/// completion service. Any lookup failure answers 502 with the localized
/// generic message.
pub async fn lookup(
    State(ctx): State<ApiContext>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<LookupState>, ApiError> {
    let language = parse_language(req.language.as_deref())?;
    let region = parse_region(req.region.as_deref())?;

    let Some(query) = DrugQuery::normalize(&req.query, language, region) else {
        return Ok(Json(LookupState::Idle));
    };

    let lookup = ctx.lookup()?;
    match lookup_blocking(lookup, query).await? {
        Ok(report) => Ok(Json(LookupState::Success { report })),
        Err(e) => {
            tracing::warn!(error = %e, "Stateless drug lookup failed");
            Err(ApiError::LookupFailed {
                message: ui_texts(language).error.to_string(),
            })
        }
    }
}
