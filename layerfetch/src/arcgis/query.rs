//! REST URL construction and JSON retrieval.

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::trace;

use super::error::ServiceError;
use super::http::HttpClient;

/// Parameters of one bounded page query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Object-id column used for deterministic ordering.
    pub order_by: String,
    /// Zero-based record offset.
    pub offset: usize,
    /// Maximum records requested.
    pub count: usize,
    /// Output spatial reference WKID; `None` keeps the layer's native CRS.
    pub out_sr: Option<u32>,
}

fn trimmed(endpoint: &str) -> &str {
    endpoint.trim_end_matches('/')
}

fn build(base: String, params: &[(&str, String)]) -> Result<String, ServiceError> {
    Url::parse_with_params(&base, params)
        .map(|url| url.to_string())
        .map_err(|e| ServiceError::InvalidUrl {
            url: base,
            reason: e.to_string(),
        })
}

/// `{service}?f=json`
pub fn service_info_url(service: &str) -> Result<String, ServiceError> {
    build(trimmed(service).to_string(), &[("f", "json".to_string())])
}

/// `{service}/{id}` for a layer of a service.
pub fn layer_url(service: &str, layer_id: u32) -> String {
    format!("{}/{}", trimmed(service), layer_id)
}

/// `{layer}?f=json`
pub fn layer_info_url(layer: &str) -> Result<String, ServiceError> {
    build(trimmed(layer).to_string(), &[("f", "json".to_string())])
}

/// Count-only query returning the server-side total.
pub fn count_url(layer: &str) -> Result<String, ServiceError> {
    build(
        format!("{}/query", trimmed(layer)),
        &[
            ("where", "1=1".to_string()),
            ("returnCountOnly", "true".to_string()),
            ("f", "json".to_string()),
        ],
    )
}

/// All-records query bounded to one page, ordered ascending by object id.
pub fn page_url(layer: &str, page: &PageRequest) -> Result<String, ServiceError> {
    let mut params = vec![
        ("where", "1=1".to_string()),
        ("outFields", "*".to_string()),
        ("returnGeometry", "true".to_string()),
        ("orderByFields", format!("{} ASC", page.order_by)),
        ("resultOffset", page.offset.to_string()),
        ("resultRecordCount", page.count.to_string()),
    ];
    if let Some(wkid) = page.out_sr {
        params.push(("outSR", wkid.to_string()));
    }
    params.push(("f", "json".to_string()));
    build(format!("{}/query", trimmed(layer)), &params)
}

/// GET a URL and decode the JSON body, surfacing `{"error": ...}` envelopes
/// as [`ServiceError::Remote`].
pub fn get_json<C, T>(client: &C, url: &str) -> Result<T, ServiceError>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let body = client.get(url)?;
    trace!(url = url, bytes = body.len(), "decoding JSON response");

    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::Malformed(format!("invalid JSON: {}", e)))?;

    if let Some(error) = value.get("error") {
        let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error")
            .to_string();
        return Err(ServiceError::Remote { code, message });
    }

    serde_json::from_value(value).map_err(|e| ServiceError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcgis::http::HttpError;

    fn query_pairs(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_page_url_parameters() {
        let url = page_url(
            "https://example.com/arcgis/rest/services/Hydro/FeatureServer/3/",
            &PageRequest {
                order_by: "OBJECTID".to_string(),
                offset: 2000,
                count: 1000,
                out_sr: Some(4326),
            },
        )
        .unwrap();

        assert!(url.starts_with("https://example.com/arcgis/rest/services/Hydro/FeatureServer/3/query?"));
        let pairs = query_pairs(&url);
        assert!(pairs.contains(&("where".into(), "1=1".into())));
        assert!(pairs.contains(&("outFields".into(), "*".into())));
        assert!(pairs.contains(&("orderByFields".into(), "OBJECTID ASC".into())));
        assert!(pairs.contains(&("resultOffset".into(), "2000".into())));
        assert!(pairs.contains(&("resultRecordCount".into(), "1000".into())));
        assert!(pairs.contains(&("outSR".into(), "4326".into())));
        assert!(pairs.contains(&("f".into(), "json".into())));
    }

    #[test]
    fn test_page_url_without_out_sr() {
        let url = page_url(
            "https://example.com/FeatureServer/0",
            &PageRequest {
                order_by: "FID".to_string(),
                offset: 0,
                count: 10,
                out_sr: None,
            },
        )
        .unwrap();
        assert!(!query_pairs(&url).iter().any(|(k, _)| k == "outSR"));
    }

    #[test]
    fn test_count_and_info_urls() {
        let count = count_url("https://example.com/FeatureServer/1").unwrap();
        assert!(query_pairs(&count).contains(&("returnCountOnly".into(), "true".into())));

        assert_eq!(
            layer_url("https://example.com/FeatureServer/", 7),
            "https://example.com/FeatureServer/7"
        );
        assert_eq!(
            service_info_url("https://example.com/FeatureServer").unwrap(),
            "https://example.com/FeatureServer?f=json"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = count_url("not a url").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidUrl { .. }));
    }

    struct Body(&'static str);

    impl HttpClient for Body {
        fn get(&self, _url: &str) -> Result<Vec<u8>, HttpError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[derive(Debug, serde::Deserialize)]
    struct Count {
        count: usize,
    }

    #[test]
    fn test_get_json_decodes() {
        let count: Count = get_json(&Body(r#"{"count": 12}"#), "http://x").unwrap();
        assert_eq!(count.count, 12);
    }

    #[test]
    fn test_get_json_error_envelope() {
        let err = get_json::<_, Count>(
            &Body(r#"{"error": {"code": 400, "message": "Invalid query", "details": []}}"#),
            "http://x",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Remote {
                code: 400,
                message: "Invalid query".to_string()
            }
        );
    }

    #[test]
    fn test_get_json_malformed() {
        let err = get_json::<_, Count>(&Body("<html>"), "http://x").unwrap_err();
        assert!(err.is_malformed());

        let err = get_json::<_, Count>(&Body(r#"{"total": 3}"#), "http://x").unwrap_err();
        assert!(err.is_malformed());
    }
}
