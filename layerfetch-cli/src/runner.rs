//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and HTTP client
//! creation to reduce duplication across command handlers.

use std::time::Duration;

use tracing::info;

use layerfetch::arcgis::ReqwestClient;
use layerfetch::config::ConfigFile;
use layerfetch::logging::{init_logging, LogOptions, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `verbose` - Enables debug-level logging (unless RUST_LOG is set) and
    ///   mirrors log output to stdout
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let options = LogOptions {
            verbose,
            stdout: verbose,
        };
        let logging_guard = init_logging(&config.logging.file, options)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("layerfetch v{}", layerfetch::VERSION);
        info!(
            log_file = %self.logging_guard.path().display(),
            "layerfetch CLI: {} command", command
        );
    }

    /// Create the blocking HTTP client with the given per-request timeout.
    pub fn http_client(&self, timeout_secs: u64) -> Result<ReqwestClient, CliError> {
        let client = ReqwestClient::with_timeout(Duration::from_secs(timeout_secs))?;
        info!(timeout_secs, "HTTP client created");
        Ok(client)
    }
}
