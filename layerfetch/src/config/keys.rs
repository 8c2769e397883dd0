//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with validation via the Specification Pattern.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use super::settings::ConfigFile;
use super::parser::{expand_tilde, parse_layer_list};

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Service settings
    ServiceUrl,

    // Download settings
    DownloadDirectory,
    DownloadPageSize,
    DownloadTimeout,
    DownloadMaxRetries,
    DownloadOutSr,
    DownloadLayers,

    // Logging settings
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "service.url" => Ok(ConfigKey::ServiceUrl),

            "download.directory" => Ok(ConfigKey::DownloadDirectory),
            "download.page_size" => Ok(ConfigKey::DownloadPageSize),
            "download.timeout" => Ok(ConfigKey::DownloadTimeout),
            "download.max_retries" => Ok(ConfigKey::DownloadMaxRetries),
            "download.out_sr" => Ok(ConfigKey::DownloadOutSr),
            "download.layers" => Ok(ConfigKey::DownloadLayers),

            "logging.file" => Ok(ConfigKey::LoggingFile),

            _ => Err(ConfigKeyError::UnknownKey(s.to_string())),
        }
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "download.page_size").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ServiceUrl => "service.url",
            ConfigKey::DownloadDirectory => "download.directory",
            ConfigKey::DownloadPageSize => "download.page_size",
            ConfigKey::DownloadTimeout => "download.timeout",
            ConfigKey::DownloadMaxRetries => "download.max_retries",
            ConfigKey::DownloadOutSr => "download.out_sr",
            ConfigKey::DownloadLayers => "download.layers",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "download").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "page_size").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ServiceUrl => config.service.url.clone().unwrap_or_default(),
            ConfigKey::DownloadDirectory => path_to_display(&config.download.directory),
            ConfigKey::DownloadPageSize => config.download.page_size.to_string(),
            ConfigKey::DownloadTimeout => config.download.timeout.to_string(),
            ConfigKey::DownloadMaxRetries => config.download.max_retries.to_string(),
            ConfigKey::DownloadOutSr => config
                .download
                .out_sr
                .map(|w| w.to_string())
                .unwrap_or_default(),
            ConfigKey::DownloadLayers => config
                .download
                .layers
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(","),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    /// On error the config is left unchanged.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        let value = value.trim();
        let failed = |reason: String| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        };

        match self {
            ConfigKey::ServiceUrl => {
                config.service.url = optional_string(value.trim_end_matches('/'));
            }
            ConfigKey::DownloadDirectory => {
                config.download.directory = expand_tilde(value);
            }
            ConfigKey::DownloadPageSize => {
                config.download.page_size = value.parse().map_err(|e| failed(format!("{}", e)))?;
            }
            ConfigKey::DownloadTimeout => {
                config.download.timeout = value.parse().map_err(|e| failed(format!("{}", e)))?;
            }
            ConfigKey::DownloadMaxRetries => {
                config.download.max_retries = value.parse().map_err(|e| failed(format!("{}", e)))?;
            }
            ConfigKey::DownloadOutSr => {
                config.download.out_sr = match optional_string(value) {
                    Some(v) => Some(v.parse().map_err(|e| failed(format!("{}", e)))?),
                    None => None,
                };
            }
            ConfigKey::DownloadLayers => {
                config.download.layers = parse_layer_list(value).map_err(failed)?;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = expand_tilde(value);
            }
        }
        Ok(())
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the validation specification for this key.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::ServiceUrl => Box::new(OptionalUrlSpec),
            ConfigKey::DownloadDirectory => Box::new(PathSpec),
            ConfigKey::DownloadPageSize => Box::new(NonZeroIntegerSpec),
            ConfigKey::DownloadTimeout => Box::new(NonZeroIntegerSpec),
            ConfigKey::DownloadMaxRetries => Box::new(PositiveIntegerSpec),
            ConfigKey::DownloadOutSr => Box::new(OptionalWkidSpec),
            ConfigKey::DownloadLayers => Box::new(LayerListSpec),
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ServiceUrl,
            ConfigKey::DownloadDirectory,
            ConfigKey::DownloadPageSize,
            ConfigKey::DownloadTimeout,
            ConfigKey::DownloadMaxRetries,
            ConfigKey::DownloadOutSr,
            ConfigKey::DownloadLayers,
            ConfigKey::LoggingFile,
        ]
    }
}

// ============================================================================
// Value Specifications (Specification Pattern)
// ============================================================================

/// Trait for value validation specifications.
trait ValueSpecification {
    /// Check if the value satisfies this specification.
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Specification for positive integer values.
struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<u32>()
            .map(|_| ())
            .map_err(|_| "must be a positive integer".to_string())
    }
}

/// Specification for integers greater than zero.
struct NonZeroIntegerSpec;

impl ValueSpecification for NonZeroIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<usize>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be an integer greater than zero".to_string()),
        }
    }
}

/// Specification for an optional spatial reference WKID (empty allowed).
struct OptionalWkidSpec;

impl ValueSpecification for OptionalWkidSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Ok(());
        }
        value
            .parse::<u32>()
            .map(|_| ())
            .map_err(|_| "must be a spatial reference WKID such as 4326, or empty".to_string())
    }
}

/// Specification for a comma-separated list of layer ids.
struct LayerListSpec;

impl ValueSpecification for LayerListSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        parse_layer_list(value).map(|_| ())
    }
}

/// Specification for path values (non-empty).
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}

/// Specification for optional URL values.
struct OptionalUrlSpec;

impl ValueSpecification for OptionalUrlSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Ok(());
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err("must be a URL starting with 'http://' or 'https://'".to_string())
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert path to display string, collapsing home dir to ~.
fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Convert empty string to None, non-empty to Some.
fn optional_string(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
