//! Whole-service download: catalog, filter, paged fetch with retries, bundles.
//!
//! ```ignore
//! use layerfetch::arcgis::ReqwestClient;
//! use layerfetch::download::{DownloadOrchestrator, DownloadPlan, LayerFilter};
//!
//! let plan = DownloadPlan::new("https://host/arcgis/rest/services/Hydro/FeatureServer", "downloads")
//!     .with_filter(LayerFilter::only([0, 3]));
//! let report = DownloadOrchestrator::new(ReqwestClient::new()?, plan).run()?;
//! println!("{} records", report.total_records());
//! ```

mod orchestrator;
mod types;

pub use orchestrator::{unique_stems, DownloadOrchestrator};
pub use types::{
    DownloadPlan, DownloadReport, LayerFilter, LayerOutcome, OrchestratorError,
    DEFAULT_RETRY_DELAY,
};
