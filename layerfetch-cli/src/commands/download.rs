//! Download command - fetch layers of a FeatureServer into shapefile bundles.

use std::path::PathBuf;

use layerfetch::config::ConfigFile;
use layerfetch::download::{DownloadOrchestrator, DownloadPlan, LayerFilter};
use layerfetch::fetch::FetchOptions;

use super::common::{resolve_service_url, resolve_timeout};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the download command.
pub struct DownloadArgs {
    pub url: Option<String>,
    pub layers: Vec<u32>,
    pub page_size: Option<usize>,
    pub output: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub out_sr: Option<u32>,
}

/// Run the download command.
pub fn run(args: DownloadArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("download");
    let config = runner.config();

    let client = runner.http_client(resolve_timeout(args.timeout, config)?)?;
    let plan = build_plan(args, config)?;

    println!("Downloading from {}", plan.service_url);
    println!("  Output: {}", plan.directory.display());
    println!("  Page size: {}", plan.options.page_size);
    if !plan.filter.is_all() {
        let ids: Vec<String> = plan.filter.ids().iter().map(|id| id.to_string()).collect();
        println!("  Layers: {}", ids.join(", "));
    }
    println!();

    let start = std::time::Instant::now();
    let report = DownloadOrchestrator::new(client, plan).run()?;

    for outcome in &report.downloaded {
        println!(
            "✓ {} - {} record(s) in {} page(s) → {}",
            outcome.layer,
            outcome.bundle.records,
            outcome.pages,
            outcome.bundle.directory.display()
        );
        if outcome.bundle.skipped > 0 {
            println!(
                "    {} record(s) without geometry not written",
                outcome.bundle.skipped
            );
        }
    }
    for layer in &report.skipped {
        println!("- {} skipped (no geometry)", layer);
    }

    println!();
    println!(
        "Downloaded {} layer(s), {} record(s) in {:.2}s",
        report.downloaded.len(),
        report.total_records(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Merge CLI args over config settings. CLI takes precedence.
fn build_plan(args: DownloadArgs, config: &ConfigFile) -> Result<DownloadPlan, CliError> {
    let url = resolve_service_url(args.url, config)?;
    let download = &config.download;

    let page_size = args.page_size.unwrap_or(download.page_size);
    if page_size == 0 {
        return Err(CliError::Config(
            "page size must be greater than zero".to_string(),
        ));
    }

    let filter = if args.layers.is_empty() {
        LayerFilter::only(download.layers.iter().copied())
    } else {
        LayerFilter::only(args.layers)
    };

    Ok(
        DownloadPlan::new(url, args.output.unwrap_or_else(|| download.directory.clone()))
            .with_options(
                FetchOptions::new(page_size).with_out_sr(args.out_sr.or(download.out_sr)),
            )
            .with_max_retries(args.retries.unwrap_or(download.max_retries))
            .with_filter(filter),
    )
}
