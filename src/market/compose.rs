//! Joins products with their vendor and offer for the listing pages.
//! A product whose vendor or offer is missing is still listed.

use super::models::{Offer, Product, ProductView, Vendor, VendorPage};
use super::money::format_sar;
use super::MarketError;

/// Attach the vendor named by `vendorId` and the first offer for the
/// product. Either side is `None` when nothing matches.
pub fn join_product(product: Product, vendors: &[Vendor], offers: &[Offer]) -> ProductView {
    let vendor = vendors.iter().find(|v| v.id == product.vendor_id).cloned();
    let offer = offers.iter().find(|o| o.product_id == product.id).cloned();
    let price_display = format_sar(product.price);
    ProductView {
        product,
        vendor,
        offer,
        price_display,
    }
}

/// Home page: every product, in catalog order.
pub fn compose_home(products: Vec<Product>, vendors: &[Vendor], offers: &[Offer]) -> Vec<ProductView> {
    products
        .into_iter()
        .map(|p| join_product(p, vendors, offers))
        .collect()
}

/// Product page for `id`; `product` is the result of the lookup by id.
pub fn compose_product_page(
    id: &str,
    product: Option<Product>,
    vendors: &[Vendor],
    offers: &[Offer],
) -> Result<ProductView, MarketError> {
    let product = product.ok_or_else(|| MarketError::product_not_found(id))?;
    Ok(join_product(product, vendors, offers))
}

/// Vendor page for `id`: the vendor and all of its products.
pub fn compose_vendor_page(
    id: &str,
    vendor: Option<Vendor>,
    products: Vec<Product>,
    offers: &[Offer],
) -> Result<VendorPage, MarketError> {
    let vendor = vendor.ok_or_else(|| MarketError::vendor_not_found(id))?;
    let vendors = std::slice::from_ref(&vendor);
    let products = products
        .into_iter()
        .filter(|p| p.vendor_id == vendor.id)
        .map(|p| join_product(p, vendors, offers))
        .collect();
    Ok(VendorPage { vendor, products })
}
