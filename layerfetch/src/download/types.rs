//! Download plan, layer selection and run results.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::arcgis::{LayerDescriptor, ServiceError};
use crate::config::ConfigFile;
use crate::fetch::{FetchError, FetchOptions};
use crate::store::{PersistenceError, WrittenBundle};

/// Delay before the first page retry; doubles on each further attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Allow-list of layer ids. Empty means every layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerFilter {
    ids: Vec<u32>,
}

impl LayerFilter {
    /// Accept every layer.
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only the given layer ids.
    pub fn only(ids: impl IntoIterator<Item = u32>) -> Self {
        let mut ids: Vec<u32> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    pub fn is_all(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn allows(&self, id: u32) -> bool {
        self.ids.is_empty() || self.ids.binary_search(&id).is_ok()
    }

    /// Layers passing the filter, in service order.
    pub fn select(&self, layers: &[LayerDescriptor]) -> Vec<LayerDescriptor> {
        layers.iter().filter(|l| self.allows(l.id)).cloned().collect()
    }

    /// Requested ids the service does not publish.
    pub fn missing(&self, layers: &[LayerDescriptor]) -> Vec<u32> {
        self.ids
            .iter()
            .copied()
            .filter(|id| !layers.iter().any(|l| l.id == *id))
            .collect()
    }
}

/// Everything a download run needs, passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    /// FeatureServer root URL.
    pub service_url: String,
    /// Directory receiving one bundle per layer.
    pub directory: PathBuf,
    pub options: FetchOptions,
    /// Retries of one failed page before the layer is abandoned.
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub filter: LayerFilter,
}

impl DownloadPlan {
    pub fn new(service_url: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            service_url: service_url.into().trim_end_matches('/').to_string(),
            directory: directory.into(),
            options: FetchOptions::default(),
            max_retries: crate::config::DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            filter: LayerFilter::all(),
        }
    }

    /// Plan from config file settings. `None` when no service URL is configured.
    pub fn from_config(config: &ConfigFile) -> Option<Self> {
        let url = config.service.url.as_deref()?;
        let download = &config.download;
        Some(
            Self::new(url, download.directory.clone())
                .with_options(
                    FetchOptions::new(download.page_size).with_out_sr(download.out_sr),
                )
                .with_max_retries(download.max_retries)
                .with_filter(LayerFilter::only(download.layers.iter().copied())),
        )
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_filter(mut self, filter: LayerFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// One layer downloaded and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerOutcome {
    pub layer: LayerDescriptor,
    pub bundle: WrittenBundle,
    /// Pages fetched, not counting failed attempts.
    pub pages: usize,
    /// Failed attempts that were retried.
    pub retries: u32,
}

/// Result of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: Vec<LayerOutcome>,
    /// Layers without a geometry type (group layers), which hold no features.
    pub skipped: Vec<LayerDescriptor>,
}

impl DownloadReport {
    /// Records written across all layers.
    pub fn total_records(&self) -> usize {
        self.downloaded.iter().map(|o| o.bundle.records).sum()
    }
}

/// Errors that abort a download run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("failed to read service description from {url}: {source}")]
    Catalog { url: String, source: ServiceError },

    #[error("service does not publish layer(s) {}", join_ids(.0))]
    UnknownLayers(Vec<u32>),

    #[error("download of layer {layer_id} ({name}) failed: {source}")]
    Fetch {
        layer_id: u32,
        name: String,
        source: FetchError,
    },

    #[error("saving layer {layer_id} ({name}) failed: {source}")]
    Persist {
        layer_id: u32,
        name: String,
        source: PersistenceError,
    },
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
