use std::sync::Arc;

use super::client::MarketClient;
use super::compose::{compose_home, compose_product_page, compose_vendor_page};
use super::fixtures::MarketCatalog;
use super::models::{ProductView, VendorPage};
use super::MarketError;

/// Where composed pages read their data from.
#[derive(Debug, Clone)]
pub enum MarketSource {
    /// In-process fixtures.
    Local(Arc<MarketCatalog>),
    /// A remote marketplace collaborator.
    Remote(MarketClient),
}

impl MarketSource {
    pub fn describe(&self) -> String {
        match self {
            MarketSource::Local(_) => "local fixtures".to_string(),
            MarketSource::Remote(client) => format!("remote {}", client.base_url()),
        }
    }

    pub async fn home(&self) -> Result<Vec<ProductView>, MarketError> {
        match self {
            MarketSource::Local(catalog) => {
                let offers = catalog.active_offers(catalog.today());
                Ok(compose_home(
                    catalog.products().to_vec(),
                    catalog.vendors(),
                    &offers,
                ))
            }
            MarketSource::Remote(client) => client.home().await,
        }
    }

    pub async fn product_page(&self, id: &str) -> Result<ProductView, MarketError> {
        match self {
            MarketSource::Local(catalog) => {
                let offers = catalog.active_offers(catalog.today());
                compose_product_page(id, catalog.product(id).cloned(), catalog.vendors(), &offers)
            }
            MarketSource::Remote(client) => client.product_page(id).await,
        }
    }

    pub async fn vendor_page(&self, id: &str) -> Result<VendorPage, MarketError> {
        match self {
            MarketSource::Local(catalog) => {
                let offers = catalog.active_offers(catalog.today());
                compose_vendor_page(
                    id,
                    catalog.vendor(id).cloned(),
                    catalog.products().to_vec(),
                    &offers,
                )
            }
            MarketSource::Remote(client) => client.vendor_page(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MarketEntity;

    fn local() -> MarketSource {
        local_on("2026-10-16")
    }

    fn local_on(date: &str) -> MarketSource {
        let catalog = MarketCatalog::embedded()
            .unwrap()
            .pinned_to(date.parse().unwrap());
        MarketSource::Local(Arc::new(catalog))
    }

    #[tokio::test]
    async fn local_home_lists_every_product() {
        let views = local().home().await.unwrap();
        assert_eq!(views.len(), 6);
        assert!(views.iter().all(|v| v.vendor.is_some()));
        // Disabled offer on p2 is not attached.
        let p2 = views.iter().find(|v| v.product.id == "p2").unwrap();
        assert!(p2.offer.is_none());
    }

    #[tokio::test]
    async fn local_pages() {
        let source = local();
        let view = source.product_page("p3").await.unwrap();
        assert_eq!(view.vendor.unwrap().id, "v2");
        assert_eq!(view.offer.unwrap().id, "o2");

        let page = source.vendor_page("v3").await.unwrap();
        let ids: Vec<_> = page.products.iter().map(|p| p.product.id.as_str()).collect();
        assert_eq!(ids, vec!["p5", "p6"]);

        let err = source.product_page("nope").await.unwrap_err();
        assert!(matches!(
            err,
            MarketError::NotFound { entity: MarketEntity::Product, .. }
        ));
    }

    #[tokio::test]
    async fn offers_follow_the_catalog_date() {
        let before = local_on("2030-12-31").product_page("p1").await.unwrap();
        assert_eq!(before.offer.unwrap().id, "o1");
        let after = local_on("2031-01-01").product_page("p1").await.unwrap();
        assert!(after.offer.is_none());
    }

    #[test]
    fn describe_names_the_source() {
        assert_eq!(local().describe(), "local fixtures");
        let remote = MarketSource::Remote(MarketClient::new("http://market.test/").unwrap());
        assert_eq!(remote.describe(), "remote http://market.test");
    }
}
