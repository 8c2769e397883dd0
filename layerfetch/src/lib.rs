//! layerfetch - ArcGIS FeatureServer layer downloader
//!
//! Downloads every record of a FeatureServer layer through the service's
//! paged query interface, stores layers as shapefile bundles, and subsets a
//! stored layer to the features lying strictly within a boundary polygon.
//!
//! # High-Level API
//!
//! ```ignore
//! use layerfetch::arcgis::ReqwestClient;
//! use layerfetch::clip::{clip, load_boundary};
//! use layerfetch::fetch::fetch_all;
//! use layerfetch::store::write_collection;
//!
//! let client = ReqwestClient::new()?;
//! let wells = fetch_all(&client, "https://host/arcgis/rest/services/Hydro/FeatureServer/0", 1000)?;
//! let boundary = load_boundary("county.shp".as_ref())?;
//! let inside = clip(&wells, &boundary);
//! write_collection(&inside, "out".as_ref(), "wells_in_county")?;
//! ```
//!
//! The [`download`] module drives whole services: layer selection, page
//! retries and one bundle per layer.

pub mod arcgis;
pub mod clip;
pub mod config;
pub mod download;
pub mod feature;
pub mod fetch;
pub mod logging;
pub mod store;

/// Version of the layerfetch library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
