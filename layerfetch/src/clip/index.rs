//! Bounding-box index over a feature collection.

use geo::Rect;
use rstar::{RTree, RTreeObject, AABB};

use crate::feature::FeatureCollection;

/// Envelope of one feature, keyed by its position in the collection.
#[derive(Debug, Clone)]
struct FeatureBox {
    position: usize,
    env: AABB<[f64; 2]>,
}

impl RTreeObject for FeatureBox {
    type Envelope = AABB<[f64; 2]>;

    #[inline]
    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

/// R-tree of feature bounding rectangles.
///
/// Features without geometry have no envelope and are never indexed.
pub struct FeatureIndex {
    tree: RTree<FeatureBox>,
}

impl FeatureIndex {
    /// Bulk-load the index for `collection`.
    pub fn build(collection: &FeatureCollection) -> Self {
        let boxes: Vec<FeatureBox> = collection
            .iter()
            .enumerate()
            .filter_map(|(position, feature)| {
                feature.bbox().map(|bbox| FeatureBox {
                    position,
                    env: to_envelope(&bbox),
                })
            })
            .collect();

        Self {
            tree: RTree::bulk_load(boxes),
        }
    }

    /// Number of indexed features.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions of features whose envelope intersects `bbox`, ascending.
    ///
    /// Touching envelopes count as intersecting.
    pub fn candidates(&self, bbox: &Rect<f64>) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&to_envelope(bbox))
            .map(|fb| fb.position)
            .collect();
        positions.sort_unstable();
        positions
    }
}

fn to_envelope(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}
