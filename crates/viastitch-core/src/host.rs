//! Interfaces a host board editor exposes to the stitcher.
//!
//! The in-memory [`Board`](crate::Board) implements all of them; an editor
//! integration implements them over its own board object.

use crate::error::Result;
use crate::geometry::{BBox, Via};
use crate::spatial::FeatureKind;
use crate::NetCode;

pub trait BoardOutline {
    /// Bounding box of the board's edge cuts.
    fn edges_bounding_box(&self) -> Result<BBox>;
}

pub trait NetLookup {
    /// Resolve a net name. `Ok(None)` means the board has no such net.
    fn netcode_from_name(&self, name: &str) -> Result<Option<NetCode>>;
}

pub trait BoardFeatures {
    /// Bounding boxes of every conductive feature (pads, tracks, vias),
    /// tagged with kind and index for diagnostics.
    fn conductive_features(&self) -> Vec<(FeatureKind, usize, BBox)>;
}

pub trait PlacementSink {
    fn add_via(&mut self, via: Via) -> Result<()>;

    /// Called once after a stitching pass so the host can redraw.
    fn refresh(&mut self);
}

/// Everything a full stitching pass needs from its host.
pub trait StitchHost: BoardOutline + NetLookup + BoardFeatures + PlacementSink {}

impl<T> StitchHost for T where T: BoardOutline + NetLookup + BoardFeatures + PlacementSink + ?Sized {}
