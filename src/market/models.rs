use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A listed product. Fields beyond the ones used for joins are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub vendor_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A promotion attached to one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub product_id: String,
    pub title: String,
    /// Absent means active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Last day the offer runs (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Offer {
    /// Active unless explicitly switched off or past its end date.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.active != Some(false) && self.ends_at.map_or(true, |end| end >= today)
    }
}

/// A product joined with its vendor and first active offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// `None` when the product names a vendor that does not exist.
    pub vendor: Option<Vendor>,
    pub offer: Option<Offer>,
    pub price_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorPage {
    pub vendor: Vendor,
    pub products: Vec<ProductView>,
}
