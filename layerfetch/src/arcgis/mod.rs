//! ArcGIS FeatureServer REST access.
//!
//! The service is treated as a black-box paged collection endpoint. This
//! module owns everything that knows about its wire format: URL parameters,
//! Esri JSON documents and geometry encoding. Network I/O goes through the
//! [`HttpClient`] trait so tests can stand in a scripted server.
//!
//! ```ignore
//! use layerfetch::arcgis::{FeatureService, ReqwestClient};
//!
//! let client = ReqwestClient::new()?;
//! let service = FeatureService::new(&client, "https://host/arcgis/rest/services/Hydro/FeatureServer");
//! for layer in service.layers()? {
//!     println!("{}", layer);
//! }
//! ```

mod catalog;
mod error;
pub mod esri;
mod http;
mod layer;
pub mod query;

pub use catalog::{layer_metadata, FeatureService};
pub use error::ServiceError;
pub use http::{HttpClient, HttpError, ReqwestClient, DEFAULT_REQUEST_TIMEOUT};
pub use layer::{schema_from_esri, LayerDescriptor, LayerMetadata, DEFAULT_OBJECT_ID_FIELD};

#[cfg(test)]
pub(crate) mod mock;
