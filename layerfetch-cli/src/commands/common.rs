//! Common utilities shared across CLI commands.

use layerfetch::config::ConfigFile;

use crate::error::CliError;

/// Resolve the FeatureServer URL from CLI args and config.
///
/// CLI takes precedence, then config. A trailing `/` is dropped.
pub fn resolve_service_url(cli_url: Option<String>, config: &ConfigFile) -> Result<String, CliError> {
    let url = cli_url
        .or_else(|| config.service.url.clone())
        .ok_or(CliError::MissingServiceUrl)?;

    let url = url.trim().trim_end_matches('/').to_string();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CliError::Config(format!(
            "'{}' is not an http(s) URL",
            url
        )));
    }
    Ok(url)
}

/// Resolve the request timeout from CLI args and config.
pub fn resolve_timeout(cli_timeout: Option<u64>, config: &ConfigFile) -> Result<u64, CliError> {
    match cli_timeout.unwrap_or(config.download.timeout) {
        0 => Err(CliError::Config(
            "timeout must be at least 1 second".to_string(),
        )),
        secs => Ok(secs),
    }
}
