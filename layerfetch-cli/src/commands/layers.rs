//! Layers command - list the layers of a FeatureServer.

use layerfetch::arcgis::FeatureService;

use super::common::{resolve_service_url, resolve_timeout};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the layers command.
pub struct LayersArgs {
    pub url: Option<String>,
    pub timeout: Option<u64>,
}

/// Run the layers command.
pub fn run(args: LayersArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("layers");
    let config = runner.config();

    let url = resolve_service_url(args.url, config)?;
    let client = runner.http_client(resolve_timeout(args.timeout, config)?)?;

    let layers = FeatureService::new(&client, url.as_str())
        .layers()
        .map_err(CliError::Catalog)?;

    println!("{}", url);
    if layers.is_empty() {
        println!("  (no layers)");
        return Ok(());
    }
    for layer in &layers {
        if layer.geometry_type.is_some() {
            println!("  {}", layer);
        } else {
            println!("  {} (group layer, not downloadable)", layer);
        }
    }

    Ok(())
}
