//! Logging infrastructure for layerfetch.
//!
//! Provides structured logging with file output and optional console output:
//! - Writes to `~/.layerfetch/layerfetch.log` by default (cleared on session start)
//! - Optionally mirrors to stdout for CLI tailing
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    path: PathBuf,
}

impl LoggingGuard {
    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Output options for [`init_logging`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Default to `debug` instead of `info` when RUST_LOG is unset.
    pub verbose: bool,
    /// Mirror log events to stdout.
    pub stdout: bool,
}

/// Initialize logging system.
///
/// Creates the log file's directory if needed, clears the previous log file,
/// and installs the global subscriber.
///
/// # Returns
///
/// LoggingGuard that must be kept alive for logging to work
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file cannot be cleared
pub fn init_logging(log_path: &Path, options: LogOptions) -> Result<LoggingGuard, io::Error> {
    let (log_dir, log_file) = prepare_log_file(log_path)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false) // No ANSI colors in file
        .with_span_events(FmtSpan::CLOSE)
        .pretty();

    let stdout_layer = options.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter(options.verbose))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
        path: log_path.to_path_buf(),
    })
}

/// RUST_LOG when set, otherwise `info` (or `debug` when verbose).
fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Create the parent directory and truncate the file.
///
/// Returns the directory and file name the appender writes to.
fn prepare_log_file(log_path: &Path) -> Result<(PathBuf, String), io::Error> {
    let log_file = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("log path has no file name: {}", log_path.display()),
            )
        })?
        .to_string();
    let log_dir = match log_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&log_dir)?;
    fs::write(log_path, "")?;

    Ok((log_dir, log_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("deep").join("nested").join("layerfetch.log");

        let (dir, file) = prepare_log_file(&log_path).unwrap();

        assert_eq!(dir, temp.path().join("deep").join("nested"));
        assert_eq!(file, "layerfetch.log");
        assert!(log_path.exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_prepare_clears_existing_file() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("layerfetch.log");
        fs::write(&log_path, "old log data").unwrap();

        prepare_log_file(&log_path).unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_prepare_rejects_path_without_file_name() {
        let err = prepare_log_file(Path::new("/")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_bare_file_name_uses_current_directory() {
        let log_path = Path::new("layerfetch-test-bare.log");
        let (dir, _) = prepare_log_file(log_path).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        fs::remove_file(log_path).unwrap();
    }

    #[test]
    fn test_guard_structure() {
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let logging_guard = LoggingGuard {
            _file_guard: guard,
            path: PathBuf::from("x.log"),
        };
        assert_eq!(logging_guard.path(), Path::new("x.log"));
    }

    // Installing the subscriber is global and can only happen once per
    // process, so init_logging itself is exercised by the CLI.
}
