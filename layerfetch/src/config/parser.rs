//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [service] section
    if let Some(section) = ini.section(Some("service")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !v.is_empty() {
                if !(v.starts_with("http://") || v.starts_with("https://")) {
                    return Err(invalid("service", "url", v, "must start with http:// or https://"));
                }
                config.service.url = Some(v.trim_end_matches('/').to_string());
            }
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.download.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("page_size") {
            config.download.page_size = match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(invalid(
                        "download",
                        "page_size",
                        v,
                        "must be an integer greater than zero",
                    ))
                }
            };
        }
        if let Some(v) = section.get("timeout") {
            config.download.timeout = match v.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(invalid(
                        "download",
                        "timeout",
                        v,
                        "must be a positive integer (seconds)",
                    ))
                }
            };
        }
        if let Some(v) = section.get("max_retries") {
            config.download.max_retries = v
                .trim()
                .parse()
                .map_err(|_| invalid("download", "max_retries", v, "must be a positive integer"))?;
        }
        if let Some(v) = section.get("out_sr") {
            let v = v.trim();
            config.download.out_sr = if v.is_empty() {
                None
            } else {
                Some(v.parse().map_err(|_| {
                    invalid("download", "out_sr", v, "must be a spatial reference WKID such as 4326")
                })?)
            };
        }
        if let Some(v) = section.get("layers") {
            config.download.layers = parse_layer_list(v)
                .map_err(|reason| invalid("download", "layers", v, &reason))?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a comma-separated list of layer ids. Empty input is an empty list.
pub(super) fn parse_layer_list(value: &str) -> Result<Vec<u32>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| format!("'{}' is not a layer id; expected e.g. '0, 3, 7'", s))
        })
        .collect()
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::config::settings::ConfigFile;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = load("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[service]
url = https://services.example.com/arcgis/rest/services/Hydro/FeatureServer/

[download]
directory = /data/layers
page_size = 1000
timeout = 90
max_retries = 5
out_sr = 4326
layers = 0, 3,7

[logging]
file = /var/log/layerfetch.log
"#,
        )
        .unwrap();

        assert_eq!(
            config.service.url.as_deref(),
            Some("https://services.example.com/arcgis/rest/services/Hydro/FeatureServer")
        );
        assert_eq!(config.download.directory, PathBuf::from("/data/layers"));
        assert_eq!(config.download.page_size, 1000);
        assert_eq!(config.download.timeout, 90);
        assert_eq!(config.download.max_retries, 5);
        assert_eq!(config.download.out_sr, Some(4326));
        assert_eq!(config.download.layers, vec![0, 3, 7]);
        assert_eq!(config.logging.file, PathBuf::from("/var/log/layerfetch.log"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = load("[download]\ntimeout = 5\n").unwrap();
        assert_eq!(config.download.timeout, 5);
        assert_eq!(config.download.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.download.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.service.url.is_none());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        match load("[download]\npage_size = 0\n") {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "download");
                assert_eq!(key, "page_size");
            }
            other => panic!("expected invalid value, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_url_rejected() {
        assert!(matches!(
            load("[service]\nurl = ftp://example.com\n"),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bad_layer_list_rejected() {
        assert!(matches!(
            load("[download]\nlayers = 1, two\n"),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_empty_out_sr_means_native() {
        let config = load("[download]\nout_sr =\n").unwrap();
        assert_eq!(config.download.out_sr, None);
    }

    #[test]
    fn test_parse_layer_list() {
        assert_eq!(parse_layer_list(""), Ok(vec![]));
        assert_eq!(parse_layer_list(" 4 ,, 2 "), Ok(vec![4, 2]));
        assert!(parse_layer_list("-1").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~/layers"), home.join("layers"));
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
