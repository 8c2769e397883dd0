//! Scripted FeatureServer shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use layerfetch::arcgis::{HttpClient, HttpError};
use reqwest::Url;
use serde_json::{json, Value};

pub const SERVICE_URL: &str = "https://gis.example.com/arcgis/rest/services/Hydro/FeatureServer";

/// One layer of a [`ScriptedService`].
pub struct ScriptedLayer {
    pub id: u32,
    pub name: String,
    geometry_type: Option<&'static str>,
    features: Vec<Value>,
    max_record_count: Option<usize>,
    server_cap: Option<usize>,
    fail_once: Mutex<Vec<usize>>,
}

impl ScriptedLayer {
    /// Point layer with `total` wells on a 10-column grid, ids `1..=total`.
    pub fn wells(id: u32, total: usize) -> Self {
        let features = (0..total)
            .map(|i| {
                let oid = i + 1;
                json!({
                    "attributes": {
                        "OBJECTID": oid,
                        "NAME": format!("Well {}", oid),
                        "DEPTH": oid as f64 + 0.5
                    },
                    "geometry": {"x": (i % 10) as f64, "y": (i / 10) as f64}
                })
            })
            .collect();
        Self {
            id,
            name: "Water Wells".to_string(),
            geometry_type: Some("esriGeometryPoint"),
            features,
            max_record_count: None,
            server_cap: None,
            fail_once: Mutex::new(Vec::new()),
        }
    }

    /// Polygon layer of unit squares along the x axis, ids `1..=total`.
    pub fn parcels(id: u32, total: usize) -> Self {
        let features = (0..total)
            .map(|i| {
                let x = i as f64 * 2.0;
                json!({
                    "attributes": {
                        "OBJECTID": i + 1,
                        "NAME": format!("Parcel {}", i + 1),
                        "DEPTH": null
                    },
                    // clockwise exterior
                    "geometry": {"rings": [[
                        [x, 0.0], [x, 1.0], [x + 1.0, 1.0], [x + 1.0, 0.0], [x, 0.0]
                    ]]}
                })
            })
            .collect();
        Self {
            id,
            name: "Parcels".to_string(),
            geometry_type: Some("esriGeometryPolygon"),
            features,
            max_record_count: None,
            server_cap: None,
            fail_once: Mutex::new(Vec::new()),
        }
    }

    /// Group layer: listed by the service, holds no features.
    pub fn group(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            geometry_type: None,
            features: Vec::new(),
            max_record_count: None,
            server_cap: None,
            fail_once: Mutex::new(Vec::new()),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_max_record_count(mut self, max: usize) -> Self {
        self.max_record_count = Some(max);
        self
    }

    /// Truncate every page to `cap` records and flag `exceededTransferLimit`.
    pub fn with_server_cap(mut self, cap: usize) -> Self {
        self.server_cap = Some(cap);
        self
    }

    /// Fail the first request for the page at `offset` with a 502.
    pub fn failing_once_at(self, offset: usize) -> Self {
        self.fail_once.lock().unwrap().push(offset);
        self
    }

    fn description(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "geometryType": self.geometry_type,
            "objectIdField": "OBJECTID",
            "maxRecordCount": self.max_record_count,
            "extent": {"spatialReference": {"wkid": 4326}},
            "fields": fields()
        })
    }

    fn page(&self, offset: usize, count: usize) -> Value {
        let limit = self.server_cap.map_or(count, |cap| count.min(cap));
        let start = offset.min(self.features.len());
        let end = offset.saturating_add(limit).min(self.features.len());
        json!({
            "objectIdFieldName": "OBJECTID",
            "geometryType": self.geometry_type,
            "spatialReference": {"wkid": 4326},
            "fields": fields(),
            "features": &self.features[start..end],
            "exceededTransferLimit": end < self.features.len()
        })
    }
}

fn fields() -> Value {
    json!([
        {"name": "OBJECTID", "type": "esriFieldTypeOID"},
        {"name": "NAME", "type": "esriFieldTypeString"},
        {"name": "DEPTH", "type": "esriFieldTypeDouble"}
    ])
}

/// A FeatureServer serving a fixed set of layers over [`HttpClient`].
pub struct ScriptedService {
    layers: Vec<ScriptedLayer>,
    page_requests: Mutex<Vec<(u32, usize, usize)>>,
}

impl ScriptedService {
    pub fn new(layers: Vec<ScriptedLayer>) -> Self {
        Self {
            layers,
            page_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn layer_url(&self, id: u32) -> String {
        format!("{}/{}", SERVICE_URL, id)
    }

    /// `(offset, count)` of every page query made against layer `id`.
    pub fn page_requests(&self, id: u32) -> Vec<(usize, usize)> {
        self.page_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(layer, _, _)| *layer == id)
            .map(|(_, offset, count)| (*offset, *count))
            .collect()
    }

    fn respond(&self, url: &str) -> Result<Value, HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::Request(e.to_string()))?;
        let rest = parsed
            .path()
            .split_once("/FeatureServer")
            .map(|(_, rest)| rest.trim_matches('/'))
            .ok_or_else(|| HttpError::Request(format!("not a FeatureServer URL: {}", url)))?;
        let param = |name: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };

        if rest.is_empty() {
            let entries: Vec<Value> = self
                .layers
                .iter()
                .map(|l| json!({"id": l.id, "name": l.name, "geometryType": l.geometry_type}))
                .collect();
            return Ok(json!({ "layers": entries }));
        }

        let mut segments = rest.split('/');
        let id: Option<u32> = segments.next().and_then(|s| s.parse().ok());
        let layer = match id.and_then(|id| self.layers.iter().find(|l| l.id == id)) {
            Some(layer) => layer,
            None => {
                return Ok(json!({"error": {"code": 400, "message": "Invalid layer"}}));
            }
        };

        match segments.next() {
            None => Ok(layer.description()),
            Some("query") if param("returnCountOnly").as_deref() == Some("true") => {
                Ok(json!({ "count": layer.features.len() }))
            }
            Some("query") => {
                let offset: usize = param("resultOffset").and_then(|v| v.parse().ok()).unwrap_or(0);
                let count: usize = param("resultRecordCount")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(usize::MAX);
                self.page_requests
                    .lock()
                    .unwrap()
                    .push((layer.id, offset, count));

                let mut fail_once = layer.fail_once.lock().unwrap();
                if let Some(pos) = fail_once.iter().position(|o| *o == offset) {
                    fail_once.remove(pos);
                    return Err(HttpError::Status {
                        status: 502,
                        url: url.to_string(),
                    });
                }
                Ok(layer.page(offset, count))
            }
            Some(other) => Err(HttpError::Request(format!("unexpected path segment {}", other))),
        }
    }
}

impl HttpClient for ScriptedService {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let body = self.respond(url)?;
        serde_json::to_vec(&body).map_err(|e| HttpError::Request(e.to_string()))
    }
}
