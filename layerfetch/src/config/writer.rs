//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let url = config.service.url.as_deref().unwrap_or("");
    let out_sr = config
        .download
        .out_sr
        .map(|w| w.to_string())
        .unwrap_or_default();
    let layers = config
        .download
        .layers
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"[service]
; ArcGIS FeatureServer root URL (the URL that lists the layers)
; Example: url = https://services.example.com/arcgis/rest/services/Hydro/FeatureServer
url = {}

[download]
; Directory that receives one shapefile bundle directory per layer
directory = {}
; Records requested per page (default: 500)
; Clamped to the server's maxRecordCount when that is lower
page_size = {}
; Timeout in seconds for each HTTP request (default: 30)
timeout = {}
; Retries of a failed page before the layer is abandoned (default: 3)
max_retries = {}
; Output spatial reference WKID, e.g. 4326 for WGS84
; If empty, layers are downloaded in their native spatial reference
out_sr = {}
; Comma-separated layer ids to download, e.g. 0, 3, 7
; If empty, every layer of the service is downloaded
layers = {}

[logging]
; Log file path (cleared at the start of each run)
file = {}
"#,
        url,
        path_to_string(&config.download.directory),
        config.download.page_size,
        config.download.timeout,
        config.download.max_retries,
        out_sr,
        layers,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
