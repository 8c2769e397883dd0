//! In-memory feature model.
//!
//! A [`FeatureCollection`] is what the paged fetcher produces and what the
//! subsetter and shapefile store consume. Geometries are plain `geo` types so
//! the spatial predicates in [`crate::clip`] work on them directly.
//!
//! ```
//! use layerfetch::feature::{AttributeValue, Feature, FeatureCollection, GeometryType};
//! use geo::{point, Geometry};
//!
//! let mut collection = FeatureCollection::new(GeometryType::Point);
//! collection.push(
//!     Feature::new(1, Some(Geometry::Point(point!(x: 1.0, y: 2.0))))
//!         .with_attribute("NAME", AttributeValue::Text("Well 1".into())),
//! );
//!
//! assert_eq!(collection.len(), 1);
//! assert_eq!(collection.ids(), vec![1]);
//! ```

mod attribute;
mod collection;

pub use attribute::{AttributeValue, FieldDef, FieldKind};
pub use collection::{Feature, FeatureCollection, GeometryType};
