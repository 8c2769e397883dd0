//! Layer download loop.
//!
//! [`DownloadOrchestrator`] walks the service's layers one at a time:
//!
//! ```text
//! service description ──► filter ──► for each layer:
//!                                      open cursor ─► pages (retry) ─► write bundle
//! ```
//!
//! A failed page is retried from the offset that failed, up to
//! `max_retries` times with exponential backoff. Malformed pages are not
//! retried; the same request would return the same payload.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::arcgis::{FeatureService, HttpClient, LayerDescriptor};
use crate::fetch::{FetchError, PageCursor};
use crate::store::{sanitize_name, write_collection};

use super::types::{DownloadPlan, DownloadReport, LayerOutcome, OrchestratorError};

/// Downloads the layers of one FeatureServer into shapefile bundles.
pub struct DownloadOrchestrator<C: HttpClient> {
    client: C,
    plan: DownloadPlan,
}

impl<C: HttpClient> DownloadOrchestrator<C> {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for every request of the run
    /// * `plan` - Service URL, output directory, paging and retry settings
    pub fn new(client: C, plan: DownloadPlan) -> Self {
        Self { client, plan }
    }

    pub fn plan(&self) -> &DownloadPlan {
        &self.plan
    }

    /// Layers the run would download, after filtering.
    ///
    /// Fails with [`OrchestratorError::UnknownLayers`] when the allow-list
    /// names ids the service does not publish.
    pub fn selected_layers(&self) -> Result<Vec<LayerDescriptor>, OrchestratorError> {
        let layers = FeatureService::new(&self.client, self.plan.service_url.as_str())
            .layers()
            .map_err(|source| OrchestratorError::Catalog {
                url: self.plan.service_url.clone(),
                source,
            })?;

        let missing = self.plan.filter.missing(&layers);
        if !missing.is_empty() {
            return Err(OrchestratorError::UnknownLayers(missing));
        }
        Ok(self.plan.filter.select(&layers))
    }

    /// Download every selected layer.
    ///
    /// Stops at the first layer that cannot be fetched or saved. Bundles
    /// written before the failure stay in place.
    pub fn run(&self) -> Result<DownloadReport, OrchestratorError> {
        let layers = self.selected_layers()?;
        let stems = unique_stems(&layers);
        let mut report = DownloadReport::default();

        info!(
            service = %self.plan.service_url,
            layers = layers.len(),
            directory = %self.plan.directory.display(),
            "starting download"
        );

        for (layer, stem) in layers.into_iter().zip(stems) {
            if layer.geometry_type.is_none() {
                warn!(layer_id = layer.id, name = %layer.name, "layer has no geometry type, skipping");
                report.skipped.push(layer);
                continue;
            }
            let outcome = self.download_layer(&layer, &stem)?;
            report.downloaded.push(outcome);
        }

        info!(
            layers = report.downloaded.len(),
            skipped = report.skipped.len(),
            records = report.total_records(),
            "download finished"
        );
        Ok(report)
    }

    /// Fetch one layer completely and write it to `<directory>/<stem>`.
    pub fn download_layer(
        &self,
        layer: &LayerDescriptor,
        stem: &str,
    ) -> Result<LayerOutcome, OrchestratorError> {
        let endpoint = FeatureService::new(&self.client, self.plan.service_url.as_str())
            .layer_url(layer.id);
        let fetch_error = |source: FetchError| OrchestratorError::Fetch {
            layer_id: layer.id,
            name: layer.name.clone(),
            source,
        };

        info!(layer_id = layer.id, name = %layer.name, "downloading layer");

        let mut retries = 0u32;
        let mut cursor = self
            .with_retries(&mut retries, || {
                PageCursor::open(&self.client, &endpoint, &self.plan.options)
            })
            .map_err(fetch_error)?;

        while self
            .with_retries(&mut retries, || cursor.next_page())
            .map_err(fetch_error)?
            .is_some()
        {
            debug!(
                layer_id = layer.id,
                fetched = cursor.fetched(),
                total = cursor.total(),
                "layer progress"
            );
        }

        let pages = cursor.pages();
        let collection = cursor.into_collection();
        let bundle = write_collection(&collection, &self.plan.directory, stem).map_err(|source| {
            OrchestratorError::Persist {
                layer_id: layer.id,
                name: layer.name.clone(),
                source,
            }
        })?;

        info!(
            layer_id = layer.id,
            records = bundle.records,
            pages,
            retries,
            path = %bundle.shp_path.display(),
            "layer saved"
        );

        Ok(LayerOutcome {
            layer: layer.clone(),
            bundle,
            pages,
            retries,
        })
    }

    /// Run `op` until it succeeds, fails permanently, or runs out of attempts.
    ///
    /// The attempt budget is per call; `total` accumulates retries across calls.
    fn with_retries<T>(
        &self,
        total: &mut u32,
        mut op: impl FnMut() -> Result<T, FetchError>,
    ) -> Result<T, FetchError> {
        let mut attempt = 0u32;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if is_retryable(&e) && attempt < self.plan.max_retries => {
                    attempt += 1;
                    *total += 1;
                    let delay = backoff(self.plan.retry_delay, attempt);
                    warn!(
                        offset = ?e.offset(),
                        attempt,
                        max_retries = self.plan.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "request failed, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Transport and service failures may succeed on a second attempt.
fn is_retryable(error: &FetchError) -> bool {
    matches!(error, FetchError::Page { .. } | FetchError::Metadata { .. })
}

/// `base * 2^(attempt-1)`, capped at 64x.
fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1 << attempt.saturating_sub(1).min(6))
}

/// Bundle stems for `layers`, disambiguated by layer id where names collide.
pub fn unique_stems(layers: &[LayerDescriptor]) -> Vec<String> {
    let mut stems: Vec<String> = Vec::with_capacity(layers.len());
    for layer in layers {
        let base = sanitize_name(&layer.name, layer.id);
        let taken = |candidate: &str| stems.iter().any(|s| s.eq_ignore_ascii_case(candidate));

        let mut stem = base.clone();
        let mut n = 1;
        while taken(&stem) {
            stem = if n == 1 {
                format!("{}_{}", base, layer.id)
            } else {
                format!("{}_{}_{}", base, layer.id, n)
            };
            n += 1;
        }
        stems.push(stem);
    }
    stems
}
