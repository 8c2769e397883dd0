//! Clip boundary.

use geo::{Area, BoundingRect, Geometry, MultiPolygon, Polygon, Rect};
use thiserror::Error;

/// Boundary geometry that is missing or not a polygon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid boundary: {reason}")]
pub struct InvalidBoundaryError {
    pub reason: String,
}

impl InvalidBoundaryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Immutable clip region.
///
/// Held as a multipolygon because a single shapefile polygon record may carry
/// several outer rings. A boundary may have zero area; clipping against it
/// simply keeps nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    shape: MultiPolygon<f64>,
    bbox: Rect<f64>,
}

impl BoundaryPolygon {
    pub fn new(shape: MultiPolygon<f64>) -> Result<Self, InvalidBoundaryError> {
        if shape.0.is_empty() {
            return Err(InvalidBoundaryError::new("boundary has no polygons"));
        }
        if shape.0.iter().any(|p| p.exterior().0.is_empty()) {
            return Err(InvalidBoundaryError::new("boundary polygon has an empty exterior ring"));
        }
        let bbox = shape
            .bounding_rect()
            .ok_or_else(|| InvalidBoundaryError::new("boundary has no extent"))?;
        Ok(Self { shape, bbox })
    }

    pub fn from_polygon(polygon: Polygon<f64>) -> Result<Self, InvalidBoundaryError> {
        Self::new(MultiPolygon::new(vec![polygon]))
    }

    /// Accept polygonal geometries; anything else is not a usable boundary.
    pub fn from_geometry(geometry: Option<Geometry<f64>>) -> Result<Self, InvalidBoundaryError> {
        match geometry {
            None => Err(InvalidBoundaryError::new("boundary geometry is missing")),
            Some(Geometry::Polygon(p)) => Self::from_polygon(p),
            Some(Geometry::MultiPolygon(mp)) => Self::new(mp),
            Some(Geometry::Rect(r)) => Self::from_polygon(r.to_polygon()),
            Some(other) => Err(InvalidBoundaryError::new(format!(
                "boundary must be a polygon, got {}",
                geometry_kind(&other)
            ))),
        }
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    pub fn bbox(&self) -> Rect<f64> {
        self.bbox
    }

    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    /// Zero-area boundaries contain nothing.
    pub fn is_degenerate(&self) -> bool {
        self.area() == 0.0
    }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "point",
        Geometry::Line(_) => "line",
        Geometry::LineString(_) => "linestring",
        Geometry::Polygon(_) => "polygon",
        Geometry::MultiPoint(_) => "multipoint",
        Geometry::MultiLineString(_) => "multilinestring",
        Geometry::MultiPolygon(_) => "multipolygon",
        Geometry::GeometryCollection(_) => "geometry collection",
        Geometry::Rect(_) => "rect",
        Geometry::Triangle(_) => "triangle",
    }
}
