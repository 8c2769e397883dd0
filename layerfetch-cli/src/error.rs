//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use layerfetch::arcgis::{HttpError, ServiceError};
use layerfetch::clip::ClipError;
use layerfetch::config::ConfigFileError;
use layerfetch::download::OrchestratorError;
use layerfetch::fetch::FetchError;
use layerfetch::store::PersistenceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// No FeatureServer URL on the command line or in config
    MissingServiceUrl,
    /// Failed to create the HTTP client
    HttpClient(HttpError),
    /// Failed to read the service description
    Catalog(ServiceError),
    /// A layer download failed
    Download(OrchestratorError),
    /// Boundary could not be loaded
    Clip(ClipError),
    /// Failed to read or write a shapefile bundle
    Store(PersistenceError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::MissingServiceUrl => {
                eprintln!();
                eprintln!("Pass --url or store it in the config file:");
                eprintln!("  layerfetch config set service.url <FeatureServer URL>");
            }
            CliError::Download(OrchestratorError::UnknownLayers(_)) => {
                eprintln!();
                eprintln!("Use 'layerfetch layers' to see the layer ids the service publishes.");
            }
            CliError::Download(OrchestratorError::Fetch { source, .. }) => {
                if let Some(offset) = source.offset() {
                    eprintln!();
                    eprintln!("The layer failed at record offset {}.", offset);
                    if matches!(source, FetchError::Page { .. }) {
                        eprintln!("Common issues:");
                        eprintln!("  1. Server busy: retry later or raise --retries");
                        eprintln!("  2. Slow responses: raise --timeout");
                        eprintln!("  3. Large records: lower --page-size");
                    }
                }
            }
            CliError::Catalog(_) => {
                eprintln!();
                eprintln!("Make sure the URL is the FeatureServer root, e.g.");
                eprintln!("  https://host/arcgis/rest/services/<name>/FeatureServer");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::MissingServiceUrl => write!(f, "No FeatureServer URL configured"),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Catalog(e) => write!(f, "Failed to list layers: {}", e),
            CliError::Download(e) => write!(f, "Download failed: {}", e),
            CliError::Clip(e) => write!(f, "Clip failed: {}", e),
            CliError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::HttpClient(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Download(e) => Some(e),
            CliError::Clip(e) => Some(e),
            CliError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<HttpError> for CliError {
    fn from(e: HttpError) -> Self {
        CliError::HttpClient(e)
    }
}

impl From<OrchestratorError> for CliError {
    fn from(e: OrchestratorError) -> Self {
        CliError::Download(e)
    }
}

impl From<ClipError> for CliError {
    fn from(e: ClipError) -> Self {
        CliError::Clip(e)
    }
}

impl From<PersistenceError> for CliError {
    fn from(e: PersistenceError) -> Self {
        CliError::Store(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            CliError::MissingServiceUrl.to_string(),
            "No FeatureServer URL configured"
        );
        assert_eq!(
            CliError::Config("bad".to_string()).to_string(),
            "Configuration error: bad"
        );
        let e = CliError::from(OrchestratorError::UnknownLayers(vec![7]));
        assert_eq!(
            e.to_string(),
            "Download failed: service does not publish layer(s) 7"
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let e = CliError::Catalog(ServiceError::Malformed("no layers".to_string()));
        assert!(e.source().is_some());
        assert!(CliError::MissingServiceUrl.source().is_none());
    }
}
