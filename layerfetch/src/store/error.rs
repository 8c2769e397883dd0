//! Persistence error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors writing or reading a shapefile bundle.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("shapefile error on {path}: {source}")]
    Shapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("attribute table error on {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: shapefile::dbase::Error,
    },

    /// Content that cannot be represented in, or read from, a shapefile.
    #[error("cannot store {path}: {reason}")]
    Format { path: PathBuf, reason: String },
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn shapefile(path: impl Into<PathBuf>, source: shapefile::Error) -> Self {
        Self::Shapefile {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
