//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;

// =============================================================================
// Download defaults
// =============================================================================

/// Default records per page.
pub const DEFAULT_PAGE_SIZE: usize = crate::fetch::DEFAULT_PAGE_SIZE;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Default retries of a failed page.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Name of the download directory inside the config directory.
pub const DEFAULT_DOWNLOAD_DIR_NAME: &str = "downloads";

// =============================================================================
// Logging defaults
// =============================================================================

/// Name of the log file inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "layerfetch.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            service: ServiceSettings { url: None },
            download: DownloadSettings {
                directory: config_dir.join(DEFAULT_DOWNLOAD_DIR_NAME),
                page_size: DEFAULT_PAGE_SIZE,
                timeout: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
                max_retries: DEFAULT_MAX_RETRIES,
                out_sr: None,
                layers: Vec::new(),
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}

/// Default log file (`~/.layerfetch/layerfetch.log`).
pub fn default_log_file() -> PathBuf {
    super::file::config_directory().join(DEFAULT_LOG_FILE_NAME)
}
