//! Features and feature collections.

use std::fmt;
use std::str::FromStr;

use geo::{BoundingRect, Geometry, Rect};
use indexmap::IndexMap;

use super::attribute::{AttributeValue, FieldDef};

/// Geometry class shared by every feature of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    Multipoint,
    Polyline,
    Polygon,
}

impl GeometryType {
    /// The Esri REST name, e.g. `esriGeometryPolygon`.
    pub fn esri_name(&self) -> &'static str {
        match self {
            GeometryType::Point => "esriGeometryPoint",
            GeometryType::Multipoint => "esriGeometryMultipoint",
            GeometryType::Polyline => "esriGeometryPolyline",
            GeometryType::Polygon => "esriGeometryPolygon",
        }
    }

    /// Parse an Esri REST geometry type name.
    pub fn from_esri(name: &str) -> Option<Self> {
        match name {
            "esriGeometryPoint" => Some(GeometryType::Point),
            "esriGeometryMultipoint" => Some(GeometryType::Multipoint),
            "esriGeometryPolyline" => Some(GeometryType::Polyline),
            "esriGeometryPolygon" => Some(GeometryType::Polygon),
            _ => None,
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryType::Point => "point",
            GeometryType::Multipoint => "multipoint",
            GeometryType::Polyline => "polyline",
            GeometryType::Polygon => "polygon",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for GeometryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(t) = GeometryType::from_esri(s) {
            return Ok(t);
        }
        match s.to_lowercase().as_str() {
            "point" => Ok(GeometryType::Point),
            "multipoint" => Ok(GeometryType::Multipoint),
            "polyline" | "line" => Ok(GeometryType::Polyline),
            "polygon" => Ok(GeometryType::Polygon),
            _ => Err(format!("unknown geometry type '{}'", s)),
        }
    }
}

/// A single record: server-assigned identifier, geometry, and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: u64,
    /// `None` when the service returned a null geometry.
    pub geometry: Option<Geometry<f64>>,
    pub attributes: IndexMap<String, AttributeValue>,
}

impl Feature {
    pub fn new(id: u64, geometry: Option<Geometry<f64>>) -> Self {
        Self {
            id,
            geometry,
            attributes: IndexMap::new(),
        }
    }

    /// Builder-style attribute insertion, preserving insertion order.
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Axis-aligned bounding rectangle, or `None` for null or empty geometry.
    pub fn bbox(&self) -> Option<Rect<f64>> {
        self.geometry.as_ref().and_then(|g| g.bounding_rect())
    }
}

/// An ordered sequence of features sharing one geometry type and schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub geometry_type: GeometryType,
    pub fields: Vec<FieldDef>,
    /// Well-known ID of the coordinate reference system, when known.
    pub spatial_reference: Option<u32>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create an empty collection with no schema.
    pub fn new(geometry_type: GeometryType) -> Self {
        Self {
            geometry_type,
            fields: Vec::new(),
            spatial_reference: None,
            features: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDef>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_spatial_reference(mut self, wkid: Option<u32>) -> Self {
        self.spatial_reference = wkid;
        self
    }

    /// An empty collection with the same geometry type, schema and CRS.
    pub fn empty_like(&self) -> Self {
        Self {
            geometry_type: self.geometry_type,
            fields: self.fields.clone(),
            spatial_reference: self.spatial_reference,
            features: Vec::new(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Identifiers in collection order.
    pub fn ids(&self) -> Vec<u64> {
        self.features.iter().map(|f| f.id).collect()
    }

    /// Identifier of the last feature, if any.
    pub fn last_id(&self) -> Option<u64> {
        self.features.last().map(|f| f.id)
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
