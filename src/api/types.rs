//! Shared state for the API router.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::error::ApiError;
use crate::lookup::{DrugLookup, DrugQuery, DrugReport, Language, LookupError, Region};
use crate::market::{MarketCatalog, MarketClient, MarketSource};
use crate::session::SessionRegistry;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    /// `None` when no completion backend could be configured.
    pub lookup: Option<Arc<DrugLookup>>,
    pub sessions: Arc<SessionRegistry>,
    /// Fixtures served by the plain collection endpoints.
    pub catalog: Arc<MarketCatalog>,
    /// Source for the composed marketplace pages.
    pub market: Arc<MarketSource>,
    pub started_at: DateTime<Utc>,
}

impl ApiContext {
    /// Composed pages come from `remote` when given, otherwise from `catalog`.
    pub fn new(
        lookup: Option<DrugLookup>,
        catalog: MarketCatalog,
        remote: Option<MarketClient>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let market = match remote {
            Some(client) => MarketSource::Remote(client),
            None => MarketSource::Local(catalog.clone()),
        };
        Self {
            lookup: lookup.map(Arc::new),
            sessions: Arc::new(SessionRegistry::new()),
            catalog,
            market: Arc::new(market),
            started_at: Utc::now(),
        }
    }

    pub fn lookup(&self) -> Result<Arc<DrugLookup>, ApiError> {
        self.lookup.clone().ok_or(ApiError::LookupUnavailable)
    }
}

/// Run a lookup on the blocking pool. The outer error is a join failure;
/// the inner one is the lookup outcome.
pub async fn lookup_blocking(
    lookup: Arc<DrugLookup>,
    query: DrugQuery,
) -> Result<Result<DrugReport, LookupError>, ApiError> {
    tokio::task::spawn_blocking(move || lookup.lookup(&query))
        .await
        .map_err(|e| ApiError::Internal(format!("lookup task failed: {e}")))
}

/// Parse an optional language parameter, defaulting to Arabic.
pub fn parse_language(raw: Option<&str>) -> Result<Language, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map_err(|e: LookupError| ApiError::BadRequest(e.to_string())),
        None => Ok(Language::Ar),
    }
}

/// Parse an optional region parameter, defaulting to US.
pub fn parse_region(raw: Option<&str>) -> Result<Region, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map_err(|e: LookupError| ApiError::BadRequest(e.to_string())),
        None => Ok(Region::Us),
    }
}

#[cfg(test)]
pub(crate) mod test_context {
    use super::*;
    use crate::lookup::MockCompletionClient;

    /// Embedded fixtures with offer activity judged on a fixed date.
    pub fn catalog() -> MarketCatalog {
        MarketCatalog::embedded()
            .unwrap()
            .pinned_to(chrono::NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    /// Context with a mock completion client and the embedded fixtures.
    pub fn with_mock(mock: MockCompletionClient) -> ApiContext {
        let lookup = DrugLookup::new(Box::new(mock));
        ApiContext::new(Some(lookup), catalog(), None)
    }

    pub fn without_lookup() -> ApiContext {
        ApiContext::new(None, catalog(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_and_region_defaults() {
        assert_eq!(parse_language(None).unwrap(), Language::Ar);
        assert_eq!(parse_language(Some("  ")).unwrap(), Language::Ar);
        assert_eq!(parse_language(Some("EN")).unwrap(), Language::En);
        assert_eq!(parse_region(None).unwrap(), Region::Us);
        assert_eq!(parse_region(Some("sa")).unwrap(), Region::Sa);
    }

    #[test]
    fn invalid_options_are_bad_requests() {
        assert!(matches!(parse_language(Some("fr")), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_region(Some("CN")), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn context_without_remote_uses_local_pages() {
        let ctx = test_context::without_lookup();
        assert!(matches!(*ctx.market, MarketSource::Local(_)));
        assert!(matches!(ctx.lookup(), Err(ApiError::LookupUnavailable)));
    }
}
