//! Scripted FeatureServer for unit tests.

use std::sync::Mutex;

use reqwest::Url;
use serde_json::json;

use super::http::{HttpClient, HttpError};

/// Emulates one point layer whose records have ids `1..=total`.
pub(crate) struct MockFeatureServer {
    total: usize,
    server_cap: Option<usize>,
    flag_cap: bool,
    served: Option<usize>,
    advertised_max: Option<usize>,
    fail_once_at: Mutex<Option<usize>>,
    fail_always_at: Option<usize>,
    malformed_at: Option<usize>,
    overlap_at: Option<usize>,
    requests: Mutex<Vec<String>>,
}

impl MockFeatureServer {
    pub(crate) const URL: &'static str = "https://example.com/FeatureServer/0";

    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            server_cap: None,
            flag_cap: true,
            served: None,
            advertised_max: None,
            fail_once_at: Mutex::new(None),
            fail_always_at: None,
            malformed_at: None,
            overlap_at: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Silently truncate pages to `cap` records, flagging `exceededTransferLimit`.
    pub(crate) fn with_server_cap(mut self, cap: usize) -> Self {
        self.server_cap = Some(cap);
        self
    }

    /// Truncate pages to `cap` records without flagging `exceededTransferLimit`.
    pub(crate) fn with_unflagged_server_cap(mut self, cap: usize) -> Self {
        self.server_cap = Some(cap);
        self.flag_cap = false;
        self
    }

    /// Report `total` records but serve only the first `served`.
    pub(crate) fn serving_only(mut self, served: usize) -> Self {
        self.served = Some(served);
        self
    }

    /// Advertise `maxRecordCount` in the layer metadata.
    pub(crate) fn with_max_record_count(mut self, max: usize) -> Self {
        self.advertised_max = Some(max);
        self
    }

    pub(crate) fn failing_once_at(self, offset: usize) -> Self {
        *self.fail_once_at.lock().unwrap() = Some(offset);
        self
    }

    pub(crate) fn failing_at(mut self, offset: usize) -> Self {
        self.fail_always_at = Some(offset);
        self
    }

    pub(crate) fn malformed_at(mut self, offset: usize) -> Self {
        self.malformed_at = Some(offset);
        self
    }

    /// Serve the page at `offset` starting one record early.
    pub(crate) fn overlapping_at(mut self, offset: usize) -> Self {
        self.overlap_at = Some(offset);
        self
    }

    /// `(offset, count)` of every page query received, in order.
    pub(crate) fn page_requests(&self) -> Vec<(usize, usize)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|url| {
                let url = Url::parse(url).ok()?;
                let mut offset = None;
                let mut count = None;
                for (k, v) in url.query_pairs() {
                    match k.as_ref() {
                        "resultOffset" => offset = v.parse().ok(),
                        "resultRecordCount" => count = v.parse().ok(),
                        _ => {}
                    }
                }
                Some((offset?, count?))
            })
            .collect()
    }

    fn page(&self, offset: usize, count: usize) -> serde_json::Value {
        let start = match self.overlap_at {
            Some(at) if at == offset && offset > 0 => offset - 1,
            _ => offset,
        };
        let available = self.served.map_or(self.total, |served| served.min(self.total));
        let limit = self.server_cap.map_or(count, |cap| count.min(cap));
        let start = start.min(available);
        let end = start.saturating_add(limit).min(available);
        let features: Vec<serde_json::Value> = (start..end)
            .map(|i| {
                let id = i + 1;
                json!({
                    "attributes": {"OBJECTID": id, "NAME": format!("feature {}", id)},
                    "geometry": {"x": id as f64, "y": -(id as f64)}
                })
            })
            .collect();
        json!({
            "objectIdFieldName": "OBJECTID",
            "geometryType": "esriGeometryPoint",
            "spatialReference": {"wkid": 4326},
            "fields": [
                {"name": "OBJECTID", "type": "esriFieldTypeOID"},
                {"name": "NAME", "type": "esriFieldTypeString"}
            ],
            "features": features,
            "exceededTransferLimit": self.flag_cap && end < available
        })
    }
}

impl HttpClient for MockFeatureServer {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::Request(e.to_string()))?;
        let params: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let param = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };

        let body = if parsed.path().ends_with("/query") {
            if param("returnCountOnly").as_deref() == Some("true") {
                json!({ "count": self.total })
            } else {
                self.requests.lock().unwrap().push(url.to_string());
                let offset: usize = param("resultOffset")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                let count: usize = param("resultRecordCount")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(self.total);

                let mut fail_once = self.fail_once_at.lock().unwrap();
                if *fail_once == Some(offset) {
                    *fail_once = None;
                    return Err(HttpError::Timeout(url.to_string()));
                }
                if self.fail_always_at == Some(offset) {
                    return Err(HttpError::Status {
                        status: 500,
                        url: url.to_string(),
                    });
                }
                if self.malformed_at == Some(offset) {
                    json!({ "fields": [] })
                } else {
                    self.page(offset, count)
                }
            }
        } else {
            json!({
                "name": "Mock layer",
                "geometryType": "esriGeometryPoint",
                "objectIdField": "OBJECTID",
                "maxRecordCount": self.advertised_max,
                "extent": {"spatialReference": {"wkid": 4326}},
                "fields": [
                    {"name": "OBJECTID", "type": "esriFieldTypeOID"},
                    {"name": "NAME", "type": "esriFieldTypeString"}
                ]
            })
        };

        Ok(serde_json::to_vec(&body).unwrap())
    }
}
