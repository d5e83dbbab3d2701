//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        // Drug lookup
        .route("/drugs/options", get(endpoints::drugs::options))
        .route("/drugs/lookup", post(endpoints::drugs::lookup))
        .route("/sessions", post(endpoints::sessions::create))
        .route(
            "/sessions/:id",
            get(endpoints::sessions::get).delete(endpoints::sessions::delete),
        )
        .route(
            "/sessions/:id/settings",
            put(endpoints::sessions::update_settings),
        )
        .route("/sessions/:id/search", post(endpoints::sessions::search))
        // Marketplace collections
        .route("/products", get(endpoints::catalog::products))
        .route("/products/:id", get(endpoints::catalog::product))
        .route("/vendors", get(endpoints::catalog::vendors))
        .route("/vendors/:id", get(endpoints::catalog::vendor))
        .route("/offers/active", get(endpoints::catalog::active_offers))
        // Marketplace pages
        .route("/market/home", get(endpoints::pages::home))
        .route("/market/products/:id", get(endpoints::pages::product))
        .route("/market/vendors/:id", get(endpoints::pages::vendor))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(CorsLayer::permissive())
}
