//! Clip command - subset a stored layer to a boundary polygon.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use layerfetch::clip::{clip_with_report, load_boundary};
use layerfetch::feature::FeatureCollection;
use layerfetch::store::{
    load_collection, sanitize_name, staging_dir, write_collection, PersistenceError, WrittenBundle,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the clip command.
pub struct ClipArgs {
    pub input: PathBuf,
    pub boundary: PathBuf,
    pub output: PathBuf,
    pub name: Option<String>,
}

/// Run the clip command.
pub fn run(args: ClipArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("clip");

    let stem = output_stem(&args.input, args.name.as_deref());

    println!("Loading {}", args.input.display());
    let features = load_collection(&args.input)?;
    let boundary = load_boundary(&args.boundary)?;
    info!(
        boundary = %args.boundary.display(),
        area = boundary.area(),
        "boundary loaded"
    );

    let (clipped, stats) = clip_with_report(&features, &boundary);
    let bundle = write_clipped(&clipped, &args.output, &stem)?;

    println!(
        "✓ {} of {} feature(s) within boundary ({} bounding-box candidate(s))",
        stats.kept, stats.input, stats.candidates
    );
    println!("  Saved: {}", bundle.shp_path.display());

    Ok(())
}

/// Write the clipped bundle, removing the staging directory if the write fails.
fn write_clipped(
    clipped: &FeatureCollection,
    root: &Path,
    stem: &str,
) -> Result<WrittenBundle, PersistenceError> {
    write_collection(clipped, root, stem).map_err(|e| {
        let staging = staging_dir(root, stem);
        if staging.exists() {
            if let Err(cleanup) = std::fs::remove_dir_all(&staging) {
                warn!(
                    path = %staging.display(),
                    error = %cleanup,
                    "failed to remove staging directory"
                );
            }
        }
        e
    })
}

/// Bundle name for the clipped output.
///
/// An explicit name is sanitized; otherwise the input's file stem (or
/// directory name) gets a `_clipped` suffix.
fn output_stem(input: &Path, name: Option<&str>) -> String {
    match name {
        Some(name) => sanitize_name(name, 0),
        None => {
            let base = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("layer");
            format!("{}_clipped", sanitize_name(base, 0))
        }
    }
}
