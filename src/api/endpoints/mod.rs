//! API endpoint handlers.
//!
//! `health`, `drugs` and `sessions` serve the drug lookup screen;
//! `catalog` and `pages` serve the marketplace.

pub mod catalog;
pub mod drugs;
pub mod health;
pub mod pages;
pub mod sessions;
