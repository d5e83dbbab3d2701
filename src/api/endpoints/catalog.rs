//! Marketplace collection endpoints backed by the fixture catalog.
//!
//! These are the reads the composed pages are built from; a remote
//! marketplace exposes the same paths.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::market::{Offer, Product, Vendor};

/// `GET /api/products`
pub async fn products(State(ctx): State<ApiContext>) -> Json<Vec<Product>> {
    Json(ctx.catalog.products().to_vec())
}

/// `GET /api/products/:id`
pub async fn product(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    ctx.catalog
        .product(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Not found".into()))
}

/// `GET /api/vendors`
pub async fn vendors(State(ctx): State<ApiContext>) -> Json<Vec<Vendor>> {
    Json(ctx.catalog.vendors().to_vec())
}

/// `GET /api/vendors/:id`
pub async fn vendor(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Vendor>, ApiError> {
    ctx.catalog
        .vendor(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Not found".into()))
}

/// `GET /api/offers/active`
pub async fn active_offers(State(ctx): State<ApiContext>) -> Json<Vec<Offer>> {
    Json(ctx.catalog.active_offers(ctx.catalog.today()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::api::endpoints::test_util::send;
    use crate::api::router::api_router;
    use crate::api::types::test_context;

    #[tokio::test]
    async fn lists_products_and_vendors() {
        let ctx = test_context::without_lookup();
        let (status, json) = send(api_router(ctx.clone()), "GET", "/api/products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 6);
        assert_eq!(json[0]["vendorId"], "v1");

        let (status, json) = send(api_router(ctx), "GET", "/api/vendors", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn single_records_and_404() {
        let ctx = test_context::without_lookup();
        let (status, json) = send(api_router(ctx.clone()), "GET", "/api/products/p2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "p2");
        assert_eq!(json["unit"], "1 لتر");

        let (status, json) = send(api_router(ctx.clone()), "GET", "/api/vendors/v3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["city"], "جدة");

        let (status, _) = send(api_router(ctx.clone()), "GET", "/api/products/p404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(api_router(ctx), "GET", "/api/vendors/v404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn active_offers_exclude_disabled() {
        let (status, json) =
            send(api_router(test_context::without_lookup()), "GET", "/api/offers/active", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_str().unwrap().to_string())
            .collect();
        assert!(ids.contains(&"o1".to_string()));
        assert!(!ids.contains(&"o3".to_string()));
        assert!(!ids.contains(&"o4".to_string()));
    }
}
