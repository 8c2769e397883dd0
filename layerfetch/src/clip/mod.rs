//! Spatial subsetting of a feature collection against a boundary polygon.
//!
//! Two passes:
//!
//! 1. **Pre-filter** - an R-tree of feature bounding rectangles is queried
//!    with the boundary's bounding rectangle. Cheap, and discards everything
//!    that cannot possibly be inside.
//! 2. **Exact test** - each candidate geometry is tested with DE-9IM
//!    `within` against the boundary. A feature that only touches the boundary
//!    line is not within it.
//!
//! Survivors keep their input order.
//!
//! ```
//! use geo::{point, polygon, Geometry};
//! use layerfetch::clip::{clip, BoundaryPolygon};
//! use layerfetch::feature::{Feature, FeatureCollection, GeometryType};
//!
//! let boundary = BoundaryPolygon::from_polygon(
//!     polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
//! ).unwrap();
//!
//! let mut features = FeatureCollection::new(GeometryType::Point);
//! features.push(Feature::new(1, Some(Geometry::Point(point!(x: 5.0, y: 5.0)))));
//! features.push(Feature::new(2, Some(Geometry::Point(point!(x: 50.0, y: 5.0)))));
//!
//! let inside = clip(&features, &boundary);
//! assert_eq!(inside.ids(), vec![1]);
//! ```

mod boundary;
mod index;

pub use boundary::{BoundaryPolygon, InvalidBoundaryError};
pub use index::FeatureIndex;

use std::path::Path;

use geo::Within;
use thiserror::Error;
use tracing::{debug, info};

use crate::feature::FeatureCollection;
use crate::store::{self, PersistenceError};

/// Errors obtaining a usable boundary.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error(transparent)]
    InvalidBoundary(#[from] InvalidBoundaryError),

    #[error("failed to read boundary: {0}")]
    Source(#[from] PersistenceError),
}

/// Counts from one clip run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipStats {
    /// Features in the input collection.
    pub input: usize,
    /// Features surviving the bounding-box pre-filter.
    pub candidates: usize,
    /// Features within the boundary.
    pub kept: usize,
}

/// Features of `features` lying within `boundary`, in input order.
pub fn clip(features: &FeatureCollection, boundary: &BoundaryPolygon) -> FeatureCollection {
    clip_with_report(features, boundary).0
}

/// [`clip`], also returning pass counts.
pub fn clip_with_report(
    features: &FeatureCollection,
    boundary: &BoundaryPolygon,
) -> (FeatureCollection, ClipStats) {
    let mut stats = ClipStats {
        input: features.len(),
        ..ClipStats::default()
    };
    let mut output = features.empty_like();

    if boundary.is_degenerate() {
        debug!("boundary has zero area, nothing can be within it");
        return (output, stats);
    }

    let index = FeatureIndex::build(features);
    let candidates = index.candidates(&boundary.bbox());
    stats.candidates = candidates.len();

    for position in candidates {
        let feature = &features.features[position];
        let inside = feature
            .geometry
            .as_ref()
            .is_some_and(|geometry| geometry.is_within(boundary.shape()));
        if inside {
            output.push(feature.clone());
        }
    }
    stats.kept = output.len();

    info!(
        input = stats.input,
        candidates = stats.candidates,
        kept = stats.kept,
        "clip complete"
    );

    (output, stats)
}

/// Read the first record of the shapefile at `path` as a boundary.
pub fn load_boundary(path: &Path) -> Result<BoundaryPolygon, ClipError> {
    let geometry = store::first_geometry(path)?;
    Ok(BoundaryPolygon::from_geometry(geometry)?)
}
