//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Remote service settings
    pub service: ServiceSettings,
    /// Download settings
    pub download: DownloadSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Remote FeatureServer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// FeatureServer root URL, e.g. `https://host/arcgis/rest/services/Hydro/FeatureServer`.
    /// Must be supplied here or on the command line.
    pub url: Option<String>,
}

/// Download configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    /// Directory that receives one bundle directory per layer.
    pub directory: PathBuf,
    /// Records requested per page.
    pub page_size: usize,
    /// Timeout in seconds for each HTTP request.
    pub timeout: u64,
    /// Retries of a failed page before the layer is abandoned.
    pub max_retries: u32,
    /// Output spatial reference WKID requested from the server.
    /// `None` keeps the layer's native reference.
    pub out_sr: Option<u32>,
    /// Layer ids to download. Empty means every layer of the service.
    pub layers: Vec<u32>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
