//! User configuration (`~/.layerfetch/config.ini`).
//!
//! Settings structs live in `settings`, constants and `Default` in `defaults`,
//! INI parsing in `parser` and serialization in `writer`. [`ConfigKey`] gives
//! typed access by dotted key name for `layerfetch config get|set`.
//!
//! # Example
//!
//! ```
//! use layerfetch::config::{ConfigFile, ConfigKey};
//!
//! let mut config = ConfigFile::default();
//! let key: ConfigKey = "download.page_size".parse().unwrap();
//! key.set(&mut config, "1000").unwrap();
//! assert_eq!(config.download.page_size, 1000);
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_log_file, DEFAULT_DOWNLOAD_DIR_NAME, DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_LOG_FILE_NAME,
    DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{ConfigFile, DownloadSettings, LoggingSettings, ServiceSettings};
