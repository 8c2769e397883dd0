//! HTTP client abstraction for testability

use std::fmt;
use std::time::Duration;

use tracing::{debug, trace, warn};

/// Default per-request timeout. A page that takes longer fails like any
/// other page-level transport error.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised by an [`HttpClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection or request construction failed
    Request(String),
    /// The request exceeded the client timeout
    Timeout(String),
    /// Server answered with a non-success status
    Status { status: u16, url: String },
    /// Response body could not be read
    Body(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::Request(msg) => write!(f, "Request failed: {}", msg),
            HttpError::Timeout(url) => write!(f, "Request timed out: {}", url),
            HttpError::Status { status, url } => write!(f, "HTTP {} from {}", status, url),
            HttpError::Body(msg) => write!(f, "Failed to read response: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for blocking HTTP GET operations.
///
/// The fetcher and catalog only ever need GET; keeping the seam this narrow
/// lets tests stand in a scripted FeatureServer.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        (**self).get(url)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        (**self).get(url)
    }
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

const USER_AGENT: &str = concat!("layerfetch/", env!("CARGO_PKG_VERSION"));

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a new ReqwestClient with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HttpError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send() {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                if e.is_timeout() {
                    return Err(HttpError::Timeout(url.to_string()));
                }
                return Err(HttpError::Request(e.to_string()));
            }
        };

        if !response.status().is_success() {
            warn!(
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(HttpError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        match response.bytes() {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                if e.is_timeout() {
                    Err(HttpError::Timeout(url.to_string()))
                } else {
                    Err(HttpError::Body(e.to_string()))
                }
            }
        }
    }
}
