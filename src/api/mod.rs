//! HTTP API for the drug lookup screen and the marketplace.
//!
//! Routes are nested under `/api/`. Errors are returned as
//! `{"error": {"code", "message"}}` with matching HTTP statuses.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
