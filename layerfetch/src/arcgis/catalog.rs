//! FeatureServer service description access.

use tracing::{debug, info};

use super::error::ServiceError;
use super::esri::{LayerInfo, ServiceInfo};
use super::http::HttpClient;
use super::layer::{LayerDescriptor, LayerMetadata};
use super::query;

/// A FeatureServer root, e.g. `https://host/arcgis/rest/services/Hydro/FeatureServer`.
pub struct FeatureService<'a, C: HttpClient + ?Sized> {
    client: &'a C,
    url: String,
}

impl<'a, C: HttpClient + ?Sized> FeatureService<'a, C> {
    pub fn new(client: &'a C, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// List the layers the service publishes, in service order.
    pub fn layers(&self) -> Result<Vec<LayerDescriptor>, ServiceError> {
        let url = query::service_info_url(&self.url)?;
        let info: ServiceInfo = query::get_json(self.client, &url)?;
        let layers: Vec<LayerDescriptor> =
            info.layers.into_iter().map(LayerDescriptor::from).collect();
        info!(service = %self.url, layers = layers.len(), "service description loaded");
        Ok(layers)
    }

    /// Endpoint URL of one layer.
    pub fn layer_url(&self, layer_id: u32) -> String {
        query::layer_url(&self.url, layer_id)
    }
}

/// Read a layer's metadata document.
pub fn layer_metadata<C: HttpClient + ?Sized>(
    client: &C,
    layer_url: &str,
) -> Result<LayerMetadata, ServiceError> {
    let url = query::layer_info_url(layer_url)?;
    let info: LayerInfo = query::get_json(client, &url)?;
    let metadata = LayerMetadata::from(info);
    debug!(
        layer = layer_url,
        oid = %metadata.object_id_field,
        max_record_count = ?metadata.max_record_count,
        "layer metadata loaded"
    );
    Ok(metadata)
}
