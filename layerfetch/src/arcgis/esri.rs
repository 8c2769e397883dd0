//! Esri JSON response documents and geometry decoding.
//!
//! Only the parts of the REST responses the fetcher relies on are modelled;
//! unknown members are ignored.

use geo::{
    Coord, Geometry, Intersects, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Winding,
};
use indexmap::IndexMap;
use serde::Deserialize;

/// Service description (`{service}?f=json`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    #[serde(default)]
    pub layers: Vec<ServiceLayerEntry>,
}

/// One entry of a service description's `layers` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLayerEntry {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub geometry_type: Option<String>,
}

/// Layer description (`{layer}?f=json`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub object_id_field: Option<String>,
    #[serde(default)]
    pub max_record_count: Option<usize>,
    #[serde(default)]
    pub fields: Vec<EsriField>,
    #[serde(default)]
    pub extent: Option<Extent>,
}

/// Layer extent, used for its spatial reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsriField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default)]
    pub wkid: Option<u32>,
    #[serde(default)]
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    /// Preferred identifier: `latestWkid` when present, else `wkid`.
    pub fn code(&self) -> Option<u32> {
        self.latest_wkid.or(self.wkid)
    }
}

/// `returnCountOnly=true` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// One page of a feature query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(default)]
    pub fields: Vec<EsriField>,
    pub features: Vec<EsriFeature>,
    /// Set when the server truncated the page below what was asked for.
    #[serde(default)]
    pub exceeded_transfer_limit: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsriFeature {
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
}

// Untagged variants are tried in order; `Point` goes last since its members
// are the least specific.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EsriGeometry {
    Polygon { rings: Vec<Vec<Vec<f64>>> },
    Polyline { paths: Vec<Vec<Vec<f64>>> },
    Multipoint { points: Vec<Vec<f64>> },
    Point {
        x: serde_json::Value,
        y: serde_json::Value,
    },
}

/// Decode an Esri JSON geometry into a `geo` geometry.
///
/// Polygons always decode to `MultiPolygon` and polylines to
/// `MultiLineString`, matching how shapefiles store them. A point whose
/// coordinates are null or `"NaN"` is an empty geometry and yields `None`.
pub fn decode_geometry(value: &serde_json::Value) -> Result<Option<Geometry<f64>>, String> {
    if value.is_null() {
        return Ok(None);
    }
    let geometry: EsriGeometry = serde_json::from_value(value.clone())
        .map_err(|_| format!("unrecognised geometry object: {}", value))?;

    match geometry {
        EsriGeometry::Point { x, y } => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => Ok(Some(Geometry::Point(Point::new(x, y)))),
            _ => Ok(None),
        },
        EsriGeometry::Multipoint { points } => {
            let points = points
                .iter()
                .map(|p| to_coord(p).map(Point::from))
                .collect::<Result<Vec<_>, _>>()?;
            if points.is_empty() {
                return Ok(None);
            }
            Ok(Some(Geometry::MultiPoint(MultiPoint::new(points))))
        }
        EsriGeometry::Polyline { paths } => {
            let lines = paths
                .iter()
                .map(|path| to_line_string(path))
                .collect::<Result<Vec<_>, _>>()?;
            if lines.is_empty() {
                return Ok(None);
            }
            Ok(Some(Geometry::MultiLineString(MultiLineString::new(lines))))
        }
        EsriGeometry::Polygon { rings } => {
            let rings = rings
                .iter()
                .map(|ring| {
                    let mut ls = to_line_string(ring)?;
                    ls.close();
                    Ok(ls)
                })
                .collect::<Result<Vec<_>, String>>()?;
            if rings.is_empty() {
                return Ok(None);
            }
            Ok(Some(Geometry::MultiPolygon(assemble_rings(rings))))
        }
    }
}

fn to_coord(raw: &[f64]) -> Result<Coord<f64>, String> {
    match raw {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(format!("coordinate needs at least 2 values, got {}", raw.len())),
    }
}

fn to_line_string(raw: &[Vec<f64>]) -> Result<LineString<f64>, String> {
    raw.iter()
        .map(|c| to_coord(c))
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// Group rings into polygons.
///
/// Esri JSON and shapefiles share the winding convention. Clockwise rings are exteriors; counter-clockwise rings are holes and belong
/// to the first exterior that contains their first vertex. When a service
/// sends no clockwise ring at all, every ring is treated as an exterior.
pub(crate) fn assemble_rings(rings: Vec<LineString<f64>>) -> MultiPolygon<f64> {
    let (exteriors, holes): (Vec<_>, Vec<_>) = rings.into_iter().partition(|r| r.is_cw());

    if exteriors.is_empty() {
        return MultiPolygon::new(holes.into_iter().map(|r| Polygon::new(r, vec![])).collect());
    }

    let mut interiors: Vec<Vec<LineString<f64>>> = vec![Vec::new(); exteriors.len()];
    for hole in holes {
        let Some(first) = hole.0.first().copied() else {
            continue;
        };
        let probe = Point::from(first);
        let owner = exteriors
            .iter()
            .position(|ext| Polygon::new(ext.clone(), vec![]).intersects(&probe))
            .unwrap_or(exteriors.len() - 1);
        interiors[owner].push(hole);
    }

    MultiPolygon::new(
        exteriors
            .into_iter()
            .zip(interiors)
            .map(|(ext, holes)| Polygon::new(ext, holes))
            .collect(),
    )
}
