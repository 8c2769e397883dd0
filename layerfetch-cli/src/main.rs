//! layerfetch CLI - Command-line interface
//!
//! This binary provides a command-line interface to the layerfetch library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "layerfetch")]
#[command(version = layerfetch::VERSION)]
#[command(about = "Download ArcGIS FeatureServer layers as shapefiles", long_about = None)]
struct Cli {
    /// Enable debug logging and mirror log output to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the layers a FeatureServer publishes
    Layers {
        /// FeatureServer root URL (default: service.url from config)
        #[arg(long)]
        url: Option<String>,

        /// Request timeout in seconds (default: download.timeout from config)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Download layers to shapefile bundles
    Download {
        /// FeatureServer root URL (default: service.url from config)
        #[arg(long)]
        url: Option<String>,

        /// Layer id to download; repeat for several (default: download.layers, else all)
        #[arg(long = "layer", value_name = "ID")]
        layers: Vec<u32>,

        /// Records requested per page
        #[arg(long)]
        page_size: Option<usize>,

        /// Output directory (default: download.directory from config)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Retries of a failed page before giving up
        #[arg(long)]
        retries: Option<u32>,

        /// Output spatial reference WKID, e.g. 4326
        #[arg(long)]
        out_sr: Option<u32>,
    },

    /// Keep only the features of a shapefile that lie within a boundary polygon
    Clip {
        /// Shapefile (.shp or bundle directory) to subset
        #[arg(long, short)]
        input: PathBuf,

        /// Shapefile whose first polygon is the boundary
        #[arg(long, short)]
        boundary: PathBuf,

        /// Directory that receives the clipped bundle
        #[arg(long, short)]
        output: PathBuf,

        /// Bundle name (default: input name with a `_clipped` suffix)
        #[arg(long)]
        name: Option<String>,
    },

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Layers { url, timeout } => {
            commands::layers::run(commands::layers::LayersArgs { url, timeout }, cli.verbose)
        }
        Commands::Download {
            url,
            layers,
            page_size,
            output,
            timeout,
            retries,
            out_sr,
        } => commands::download::run(
            commands::download::DownloadArgs {
                url,
                layers,
                page_size,
                output,
                timeout,
                retries,
                out_sr,
            },
            cli.verbose,
        ),
        Commands::Clip {
            input,
            boundary,
            output,
            name,
        } => commands::clip::run(
            commands::clip::ClipArgs {
                input,
                boundary,
                output,
                name,
            },
            cli.verbose,
        ),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
