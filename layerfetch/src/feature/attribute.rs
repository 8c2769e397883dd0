//! Attribute values and schema.

use std::fmt;

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Convert a JSON scalar into an attribute value.
    ///
    /// Returns `None` for arrays and objects, which are not scalar.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Self::Null),
            serde_json::Value::Bool(b) => Some(Self::Text(b.to_string())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Integer(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Returns `true` for [`AttributeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer view of the value, accepting integral floats.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Storage class of an attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Object identifier column.
    ObjectId,
    Integer,
    Float,
    Text,
    /// Milliseconds since the Unix epoch, as served by ArcGIS.
    Date,
}

impl FieldKind {
    /// Map an Esri field type name (`esriFieldTypeString`, ...) to a kind.
    ///
    /// Types with no scalar representation (blobs, rasters, geometry) map to
    /// `None` and are dropped from the schema.
    pub fn from_esri(type_name: &str) -> Option<Self> {
        match type_name {
            "esriFieldTypeOID" => Some(Self::ObjectId),
            "esriFieldTypeSmallInteger" | "esriFieldTypeInteger" | "esriFieldTypeBigInteger" => {
                Some(Self::Integer)
            }
            "esriFieldTypeSingle" | "esriFieldTypeDouble" => Some(Self::Float),
            "esriFieldTypeString" | "esriFieldTypeGUID" | "esriFieldTypeGlobalID"
            | "esriFieldTypeXML" => Some(Self::Text),
            "esriFieldTypeDate" | "esriFieldTypeDateOnly" | "esriFieldTypeTimestampOffset" => {
                Some(Self::Date)
            }
            _ => None,
        }
    }
}

/// One column of a collection's attribute schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(AttributeValue::from_json(&json!(null)), Some(AttributeValue::Null));
        assert_eq!(AttributeValue::from_json(&json!(42)), Some(AttributeValue::Integer(42)));
        assert_eq!(AttributeValue::from_json(&json!(1.5)), Some(AttributeValue::Float(1.5)));
        assert_eq!(
            AttributeValue::from_json(&json!("abc")),
            Some(AttributeValue::Text("abc".to_string()))
        );
        assert_eq!(
            AttributeValue::from_json(&json!(true)),
            Some(AttributeValue::Text("true".to_string()))
        );
    }

    #[test]
    fn test_from_json_rejects_compound_values() {
        assert_eq!(AttributeValue::from_json(&json!([1, 2])), None);
        assert_eq!(AttributeValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(AttributeValue::Integer(7).as_i64(), Some(7));
        assert_eq!(AttributeValue::Float(7.0).as_i64(), Some(7));
        assert_eq!(AttributeValue::Float(7.5).as_i64(), None);
        assert_eq!(AttributeValue::Text("7".into()).as_i64(), None);
    }

    #[test]
    fn test_field_kind_from_esri() {
        assert_eq!(FieldKind::from_esri("esriFieldTypeOID"), Some(FieldKind::ObjectId));
        assert_eq!(
            FieldKind::from_esri("esriFieldTypeSmallInteger"),
            Some(FieldKind::Integer)
        );
        assert_eq!(FieldKind::from_esri("esriFieldTypeDouble"), Some(FieldKind::Float));
        assert_eq!(FieldKind::from_esri("esriFieldTypeDate"), Some(FieldKind::Date));
        assert_eq!(FieldKind::from_esri("esriFieldTypeGeometry"), None);
        assert_eq!(FieldKind::from_esri("esriFieldTypeBlob"), None);
    }
}
