pub mod types;
pub mod query;
pub mod prompt;
pub mod schema;
pub mod client;
pub mod gemini;
pub mod ollama;
pub mod decoder;
pub mod validation;
pub mod orchestrator;

pub use types::*;
pub use query::*;
pub use prompt::*;
pub use schema::*;
pub use client::*;
pub use gemini::*;
pub use ollama::*;
pub use decoder::*;
pub use validation::*;
pub use orchestrator::*;

use thiserror::Error;

/// Failures of the drug lookup pipeline.
///
/// An empty query is not represented here: it is a silent no-op
/// (`DrugLookup::lookup_raw` returns `Ok(None)`).
#[derive(Error, Debug)]
pub enum LookupError {
    /// Any transport, status, authentication, quota or envelope failure of
    /// the completion service. The detail is for logs, never for users.
    #[error("Failed to fetch drug information: {0}")]
    FetchFailed(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion response is missing required field `{0}`")]
    MissingField(String),

    #[error("Completion response field `{path}` should be {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("Completion response field `{path}` has unsupported value {value:?}")]
    InvalidValue { path: String, value: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Completion client configuration error: {0}")]
    Config(String),
}

impl LookupError {
    /// Whether the failure happened before a response was received.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, LookupError::FetchFailed(_))
    }

    /// Whether the service answered but the answer could not be decoded.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            LookupError::MalformedResponse(_)
                | LookupError::MissingField(_)
                | LookupError::WrongType { .. }
                | LookupError::InvalidValue { .. }
        )
    }
}
