//! Marketplace read side: products, vendors and offers from fixture files or
//! a remote collaborator, joined into listing pages.

pub mod client;
pub mod compose;
pub mod fixtures;
pub mod models;
pub mod money;
pub mod source;

pub use client::MarketClient;
pub use compose::*;
pub use fixtures::MarketCatalog;
pub use models::*;
pub use money::format_sar;
pub use source::MarketSource;

use thiserror::Error;

/// Kind of record a lookup by id can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketEntity {
    Product,
    Vendor,
}

impl MarketEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketEntity::Product => "product",
            MarketEntity::Vendor => "vendor",
        }
    }

    /// Text shown on a composed page when the record does not exist.
    pub fn not_found_message(&self) -> &'static str {
        match self {
            MarketEntity::Product => "المنتج غير موجود",
            MarketEntity::Vendor => "المورد غير موجود",
        }
    }
}

impl std::fmt::Display for MarketEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: MarketEntity, id: String },

    /// The remote collaborator failed or answered with something unreadable.
    #[error("Marketplace upstream error: {0}")]
    Upstream(String),

    #[error("Fixture error: {0}")]
    Fixture(String),
}

impl MarketError {
    pub fn product_not_found(id: &str) -> Self {
        MarketError::NotFound {
            entity: MarketEntity::Product,
            id: id.to_string(),
        }
    }

    pub fn vendor_not_found(id: &str) -> Self {
        MarketError::NotFound {
            entity: MarketEntity::Vendor,
            id: id.to_string(),
        }
    }
}
