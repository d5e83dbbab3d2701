use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::compose::{compose_home, compose_product_page, compose_vendor_page};
use super::models::{Offer, Product, ProductView, Vendor, VendorPage};
use super::MarketError;

const MARKET_TIMEOUT_SECS: u64 = 10;

/// Async HTTP client for a remote marketplace exposing
/// `/api/products`, `/api/vendors` and `/api/offers/active`.
///
/// Each composed page issues its three reads concurrently; any failure
/// other than a missing record fails the whole page.
#[derive(Debug, Clone)]
pub struct MarketClient {
    base_url: String,
    client: reqwest::Client,
}

impl MarketClient {
    pub fn new(base_url: &str) -> Result<Self, MarketError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(MARKET_TIMEOUT_SECS))
            .build()
            .map_err(|e| MarketError::Upstream(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn products(&self) -> Result<Vec<Product>, MarketError> {
        self.get_json("/api/products").await
    }

    pub async fn vendors(&self) -> Result<Vec<Vendor>, MarketError> {
        self.get_json("/api/vendors").await
    }

    pub async fn active_offers(&self) -> Result<Vec<Offer>, MarketError> {
        self.get_json("/api/offers/active").await
    }

    /// `None` when the collaborator does not answer 200.
    pub async fn product(&self, id: &str) -> Result<Option<Product>, MarketError> {
        if !is_safe_id(id) {
            return Ok(None);
        }
        self.get_optional(&format!("/api/products/{id}")).await
    }

    /// `None` when the collaborator does not answer 200.
    pub async fn vendor(&self, id: &str) -> Result<Option<Vendor>, MarketError> {
        if !is_safe_id(id) {
            return Ok(None);
        }
        self.get_optional(&format!("/api/vendors/{id}")).await
    }

    pub async fn home(&self) -> Result<Vec<ProductView>, MarketError> {
        let (products, vendors, offers) =
            tokio::try_join!(self.products(), self.vendors(), self.active_offers())?;
        Ok(compose_home(products, &vendors, &offers))
    }

    pub async fn product_page(&self, id: &str) -> Result<ProductView, MarketError> {
        let (product, vendors, offers) =
            tokio::try_join!(self.product(id), self.vendors(), self.active_offers())?;
        compose_product_page(id, product, &vendors, &offers)
    }

    pub async fn vendor_page(&self, id: &str) -> Result<VendorPage, MarketError> {
        let (vendor, products, offers) =
            tokio::try_join!(self.vendor(id), self.products(), self.active_offers())?;
        compose_vendor_page(id, vendor, products, &offers)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, MarketError> {
        let response = self.send(path).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Upstream(format!(
                "GET {path} returned status {}",
                status.as_u16()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| MarketError::Upstream(format!("GET {path}: invalid body: {e}")))
    }

    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, MarketError> {
        let response = self.send(path).await?;
        if response.status() != StatusCode::OK {
            tracing::debug!(path, status = response.status().as_u16(), "Marketplace record not found");
            return Ok(None);
        }
        response
            .json()
            .await
            .map(Some)
            .map_err(|e| MarketError::Upstream(format!("GET {path}: invalid body: {e}")))
    }

    async fn send(&self, path: &str) -> Result<reqwest::Response, MarketError> {
        let url = format!("{}{path}", self.base_url);
        self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "Marketplace request failed");
            if e.is_connect() {
                MarketError::Upstream(format!("cannot reach marketplace at {}", self.base_url))
            } else if e.is_timeout() {
                MarketError::Upstream(format!("GET {path} timed out"))
            } else {
                MarketError::Upstream(format!("GET {path}: {e}"))
            }
        })
    }
}

/// Ids are interpolated into request paths; only plain tokens are sent.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
