use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;

use super::models::{Offer, Product, Vendor};
use super::MarketError;

const PRODUCTS_FILE: &str = "products.json";
const VENDORS_FILE: &str = "vendors.json";
const OFFERS_FILE: &str = "offers.json";

const EMBEDDED_PRODUCTS: &str = include_str!("../../resources/market/products.json");
const EMBEDDED_VENDORS: &str = include_str!("../../resources/market/vendors.json");
const EMBEDDED_OFFERS: &str = include_str!("../../resources/market/offers.json");

/// Read-only marketplace data held in memory.
///
/// Offer activity is judged against the current UTC date unless a date is
/// pinned with [`MarketCatalog::pinned_to`].
#[derive(Debug, Clone, Default)]
pub struct MarketCatalog {
    products: Vec<Product>,
    vendors: Vec<Vendor>,
    offers: Vec<Offer>,
    pinned_date: Option<NaiveDate>,
}

impl MarketCatalog {
    pub fn new(products: Vec<Product>, vendors: Vec<Vendor>, offers: Vec<Offer>) -> Self {
        Self {
            products,
            vendors,
            offers,
            pinned_date: None,
        }
    }

    pub fn pinned_to(mut self, date: NaiveDate) -> Self {
        self.pinned_date = Some(date);
        self
    }

    /// Date offers are checked against.
    pub fn today(&self) -> NaiveDate {
        self.pinned_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Catalog compiled into the binary.
    pub fn embedded() -> Result<Self, MarketError> {
        Ok(Self::new(
            parse_fixture(PRODUCTS_FILE, EMBEDDED_PRODUCTS)?,
            parse_fixture(VENDORS_FILE, EMBEDDED_VENDORS)?,
            parse_fixture(OFFERS_FILE, EMBEDDED_OFFERS)?,
        ))
    }

    /// Load `products.json`, `vendors.json` and `offers.json` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, MarketError> {
        let catalog = Self::new(
            read_fixture(dir, PRODUCTS_FILE)?,
            read_fixture(dir, VENDORS_FILE)?,
            read_fixture(dir, OFFERS_FILE)?,
        );
        tracing::info!(
            dir = %dir.display(),
            products = catalog.products.len(),
            vendors = catalog.vendors.len(),
            offers = catalog.offers.len(),
            "Marketplace fixtures loaded"
        );
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn vendor(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    /// Offers running on `today`, in fixture order.
    pub fn active_offers(&self, today: NaiveDate) -> Vec<Offer> {
        self.offers
            .iter()
            .filter(|o| o.is_active_on(today))
            .cloned()
            .collect()
    }
}

fn parse_fixture<T: DeserializeOwned>(name: &str, raw: &str) -> Result<Vec<T>, MarketError> {
    serde_json::from_str(raw).map_err(|e| MarketError::Fixture(format!("{name}: {e}")))
}

fn read_fixture<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>, MarketError> {
    let path = dir.join(name);
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| MarketError::Fixture(format!("{}: {e}", path.display())))?;
    parse_fixture(name, &raw)
}
