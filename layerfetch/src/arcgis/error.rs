//! Errors talking to a FeatureServer.

use thiserror::Error;

use super::http::HttpError;

/// A failed request against the REST service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Transport-level failure (connection, timeout, non-2xx status).
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The service answered 200 with an `{"error": {...}}` envelope.
    #[error("service error {code}: {message}")]
    Remote { code: i64, message: String },

    /// Body was not the JSON document we asked for.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A request URL could not be assembled from the endpoint.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ServiceError {
    /// Whether the failure is a malformed payload rather than a transport or
    /// service failure.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ServiceError::Malformed(_))
    }
}
