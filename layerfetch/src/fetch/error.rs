//! Fetch error types.

use thiserror::Error;

use crate::arcgis::ServiceError;

/// A page payload that does not have the expected structure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed page at offset {offset} of {endpoint}: {reason}")]
pub struct ParseError {
    pub endpoint: String,
    pub offset: usize,
    pub reason: String,
}

/// Errors that end a paged fetch.
///
/// Every variant raised while paging carries the offset of the failing page
/// so a caller can resume from there instead of starting over.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// Layer description or record count could not be read.
    #[error("failed to read layer metadata from {endpoint}: {source}")]
    Metadata {
        endpoint: String,
        source: ServiceError,
    },

    /// Network or service failure on one page.
    #[error("page at offset {offset} of {endpoint} failed: {source}")]
    Page {
        endpoint: String,
        offset: usize,
        source: ServiceError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FetchError {
    /// Offset at which a resumed fetch should restart.
    pub fn offset(&self) -> Option<usize> {
        match self {
            FetchError::InvalidPageSize => None,
            FetchError::Metadata { .. } => Some(0),
            FetchError::Page { offset, .. } => Some(*offset),
            FetchError::Parse(e) => Some(e.offset),
        }
    }
}
