use rstar::{Envelope, RTree, RTreeObject, SelectionFunction, AABB};

use crate::geometry::{BBox, Point};

/// Kind of conductive board feature held in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Pad,
    Track,
    Via,
}

/// An entry in the R-tree spatial index, referencing a board feature by kind and index.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub kind: FeatureKind,
    /// Index into the board's collection for `kind`.
    pub index: usize,
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.left, self.bbox.bottom],
            [self.bbox.right, self.bbox.top],
        )
    }
}

/// Selects entries whose envelope contains a point, edges included.
struct ContainsPoint([i64; 2]);

impl SelectionFunction<SpatialEntry> for ContainsPoint {
    fn should_unpack_parent(&self, envelope: &AABB<[i64; 2]>) -> bool {
        envelope.contains_point(&self.0)
    }

    fn should_unpack_leaf(&self, leaf: &SpatialEntry) -> bool {
        leaf.envelope().contains_point(&self.0)
    }
}

/// Spatial index for fast point queries against board features.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    /// Build the index from a list of feature bounding boxes.
    pub fn build(entries: Vec<SpatialEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Find all entries whose bounding box contains the given point.
    pub fn query_point(&self, point: &Point) -> Vec<&SpatialEntry> {
        self.tree
            .locate_with_selection_function(ContainsPoint([point.x, point.y]))
            .collect()
    }

    pub fn contains_any(&self, point: &Point) -> bool {
        self.tree
            .locate_with_selection_function(ContainsPoint([point.x, point.y]))
            .next()
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
