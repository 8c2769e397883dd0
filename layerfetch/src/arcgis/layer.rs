//! Layer descriptors and per-layer metadata.

use std::fmt;

use crate::feature::{FieldDef, FieldKind, GeometryType};

use super::esri::{EsriField, LayerInfo, ServiceLayerEntry};

/// Object-id column name assumed when a layer does not advertise one.
pub const DEFAULT_OBJECT_ID_FIELD: &str = "OBJECTID";

/// One layer listed in a service description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDescriptor {
    pub id: u32,
    pub name: String,
    pub geometry_type: Option<GeometryType>,
}

impl LayerDescriptor {
    pub fn new(id: u32, name: impl Into<String>, geometry_type: Option<GeometryType>) -> Self {
        Self {
            id,
            name: name.into(),
            geometry_type,
        }
    }
}

impl From<ServiceLayerEntry> for LayerDescriptor {
    fn from(entry: ServiceLayerEntry) -> Self {
        Self {
            id: entry.id,
            geometry_type: entry
                .geometry_type
                .as_deref()
                .and_then(GeometryType::from_esri),
            name: entry.name,
        }
    }
}

impl fmt::Display for LayerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.geometry_type {
            Some(t) => write!(f, "[{}] {} ({})", self.id, self.name, t),
            None => write!(f, "[{}] {}", self.id, self.name),
        }
    }
}

/// What the fetcher needs to know about a layer before paging through it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerMetadata {
    pub name: Option<String>,
    pub geometry_type: Option<GeometryType>,
    pub object_id_field: String,
    /// Server cap on records per query, when advertised.
    pub max_record_count: Option<usize>,
    pub fields: Vec<FieldDef>,
    pub spatial_reference: Option<u32>,
}

impl Default for LayerMetadata {
    fn default() -> Self {
        Self {
            name: None,
            geometry_type: None,
            object_id_field: DEFAULT_OBJECT_ID_FIELD.to_string(),
            max_record_count: None,
            fields: Vec::new(),
            spatial_reference: None,
        }
    }
}

impl From<LayerInfo> for LayerMetadata {
    fn from(info: LayerInfo) -> Self {
        let fields = schema_from_esri(&info.fields);
        // Prefer the advertised OID column; fall back to the schema, then the default.
        let object_id_field = info
            .object_id_field
            .filter(|name| !name.is_empty())
            .or_else(|| {
                fields
                    .iter()
                    .find(|f| f.kind == FieldKind::ObjectId)
                    .map(|f| f.name.clone())
            })
            .unwrap_or_else(|| DEFAULT_OBJECT_ID_FIELD.to_string());

        Self {
            name: info.name,
            geometry_type: info
                .geometry_type
                .as_deref()
                .and_then(GeometryType::from_esri),
            object_id_field,
            max_record_count: info.max_record_count.filter(|n| *n > 0),
            spatial_reference: info
                .extent
                .and_then(|e| e.spatial_reference)
                .and_then(|sr| sr.code()),
            fields,
        }
    }
}

/// Convert an Esri `fields` array into a schema, dropping non-scalar columns.
pub fn schema_from_esri(fields: &[EsriField]) -> Vec<FieldDef> {
    fields
        .iter()
        .filter_map(|f| FieldKind::from_esri(&f.field_type).map(|k| FieldDef::new(&f.name, k)))
        .collect()
}
