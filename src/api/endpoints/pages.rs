//! Composed marketplace pages.
//!
//! - `GET /api/market/home`: every product with vendor and offer
//! - `GET /api/market/products/:id`
//! - `GET /api/market/vendors/:id`: vendor and its products

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::market::{ProductView, VendorPage};

/// `GET /api/market/home`
pub async fn home(State(ctx): State<ApiContext>) -> Result<Json<Vec<ProductView>>, ApiError> {
    Ok(Json(ctx.market.home().await?))
}

/// `GET /api/market/products/:id`
pub async fn product(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>, ApiError> {
    Ok(Json(ctx.market.product_page(&id).await?))
}

/// `GET /api/market/vendors/:id`
pub async fn vendor(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<VendorPage>, ApiError> {
    Ok(Json(ctx.market.vendor_page(&id).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::api::endpoints::test_util::send;
    use crate::api::router::api_router;
    use crate::api::types::{test_context, ApiContext};
    use crate::market::{format_sar, MarketClient};
    use crate::test_support::spawn_stub;

    #[tokio::test]
    async fn home_page_from_fixtures() {
        let (status, json) =
            send(api_router(test_context::without_lookup()), "GET", "/api/market/home", None).await;
        assert_eq!(status, StatusCode::OK);
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0]["vendor"]["id"], "v1");
        assert_eq!(items[0]["offer"]["id"], "o1");
        assert_eq!(items[0]["priceDisplay"], format_sar(185.0));
        assert!(items[1]["offer"].is_null());
    }

    #[tokio::test]
    async fn product_page_and_missing_product() {
        let ctx = test_context::without_lookup();
        let (status, json) =
            send(api_router(ctx.clone()), "GET", "/api/market/products/p6", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["vendor"]["name"], "صيدلية الشفاء");

        let (status, json) = send(api_router(ctx), "GET", "/api/market/products/p404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "المنتج غير موجود");
    }

    #[tokio::test]
    async fn vendor_page_and_missing_vendor() {
        let ctx = test_context::without_lookup();
        let (status, json) = send(api_router(ctx.clone()), "GET", "/api/market/vendors/v2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["vendor"]["id"], "v2");
        assert_eq!(json["products"].as_array().unwrap().len(), 2);

        let (status, json) = send(api_router(ctx), "GET", "/api/market/vendors/v404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "المورد غير موجود");
    }

    #[tokio::test]
    async fn remote_failure_fails_the_page() {
        let broken = Router::new()
            .route("/api/products", get(|| async { Json(json!([])) }))
            .route("/api/vendors", get(|| async { Json(json!([])) }))
            .route(
                "/api/offers/active",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
            );
        let client = MarketClient::new(&spawn_stub(broken)).unwrap();
        let ctx = ApiContext::new(None, test_context::catalog(), Some(client));

        let (status, json) = send(api_router(ctx), "GET", "/api/market/home", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM");
    }
}
