//! Store error types.

use balanza_shared::AppError;
use thiserror::Error;

/// Errors that can occur while talking to the remote data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error calling {rpc}: {source}")]
    Http {
        /// Remote procedure name.
        rpc: &'static str,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The store answered with a non-success status.
    #[error("{rpc} returned status {status}: {body}")]
    Status {
        /// Remote procedure name.
        rpc: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response body did not match the expected row shape.
    #[error("Could not decode {rpc} response: {source}")]
    Decode {
        /// Remote procedure name.
        rpc: &'static str,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A row carried an account type label the reports cannot place.
    #[error("Unknown account type '{label}' for account '{account}'")]
    UnknownAccountType {
        /// Account name.
        account: String,
        /// Type label as returned.
        label: String,
    },

    /// The HTTP client could not be built.
    #[error("Invalid store client configuration: {0}")]
    Configuration(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownAccountType { .. } => Self::Validation(err.to_string()),
            StoreError::Configuration(msg) => Self::Configuration(msg),
            StoreError::Http { .. } | StoreError::Status { .. } | StoreError::Decode { .. } => {
                Self::ExternalService(err.to_string())
            }
        }
    }
}
