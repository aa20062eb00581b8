//! Exclusion predicates deciding whether a grid point may receive a via.

use crate::error::{Result, StitchError};
use crate::geometry::{BBox, Coord, Point};
use crate::spatial::{FeatureKind, SpatialEntry, SpatialIndex};

/// Answers whether a point is far enough from existing features to place a via.
///
/// Implementations must be pure: the same point always gets the same answer.
/// Any `Fn(Point) -> bool` closure is a predicate.
pub trait ExclusionPredicate {
    fn accept(&self, point: Point) -> bool;
}

impl<F> ExclusionPredicate for F
where
    F: Fn(Point) -> bool,
{
    fn accept(&self, point: Point) -> bool {
        self(point)
    }
}

/// Accepts every point.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ExclusionPredicate for AcceptAll {
    fn accept(&self, _point: Point) -> bool {
        true
    }
}

/// Rejects every point.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAll;

impl ExclusionPredicate for RejectAll {
    fn accept(&self, _point: Point) -> bool {
        false
    }
}

/// Rejects points inside the bounding box of any conductive feature,
/// inflated by a clearance distance.
pub struct ClearanceCheck {
    index: SpatialIndex,
    clearance: Coord,
}

impl ClearanceCheck {
    pub fn new<I>(features: I, clearance: Coord) -> Result<Self>
    where
        I: IntoIterator<Item = (FeatureKind, usize, BBox)>,
    {
        if clearance < 0 {
            return Err(StitchError::InvalidClearance(clearance));
        }
        let entries = features
            .into_iter()
            .map(|(kind, index, bbox)| SpatialEntry {
                kind,
                index,
                bbox: bbox.inflated(clearance),
            })
            .collect();
        Ok(Self {
            index: SpatialIndex::build(entries),
            clearance,
        })
    }

    pub fn clearance(&self) -> Coord {
        self.clearance
    }

    pub fn feature_count(&self) -> usize {
        self.index.len()
    }

    /// Features whose inflated bounding box contains `point`.
    pub fn conflicts(&self, point: &Point) -> Vec<&SpatialEntry> {
        self.index.query_point(point)
    }
}

impl ExclusionPredicate for ClearanceCheck {
    fn accept(&self, point: Point) -> bool {
        !self.index.contains_any(&point)
    }
}
