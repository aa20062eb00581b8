//! # viastitch Core
//!
//! Board model, grid point generation, clearance predicates backed by an
//! R-tree, undo/redo via a command journal, and the via stitching pass that
//! ties them together.
//!
//! The stitcher only talks to a board through the traits in [`host`], so it
//! can drive an editor's board object as well as the in-memory [`Board`].

pub mod geometry;
pub mod units;
pub mod layer;
pub mod board;
pub mod grid;
pub mod clearance;
pub mod spatial;
pub mod commands;
pub mod host;
pub mod stitch;
pub mod error;

/// Integer net identifier; 0 is the unconnected net.
pub type NetCode = u32;

pub use board::{Board, Net, UNCONNECTED};
pub use clearance::{AcceptAll, ClearanceCheck, ExclusionPredicate, RejectAll};
pub use error::{Result, StitchError};
pub use geometry::{BBox, Coord, Pad, Point, Track, Via, ViaTemplate};
pub use grid::{generate, GridBounds, GridPoints, GridSpec};
pub use layer::{CopperLayer, LayerPair};
pub use stitch::{stitch, StitchPlan, StitchReport, StitchSettings, MAX_CANDIDATES};
