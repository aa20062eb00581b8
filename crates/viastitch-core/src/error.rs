use thiserror::Error;

use crate::geometry::Coord;

/// Errors raised by grid generation, board access and stitching.
#[derive(Error, Debug)]
pub enum StitchError {
    #[error("Grid step must be positive, got {0} nm")]
    InvalidStep(Coord),

    #[error("Invalid bounding box: left {left} > right {right} or bottom {bottom} > top {top}")]
    InvalidBox {
        left: Coord,
        bottom: Coord,
        right: Coord,
        top: Coord,
    },

    #[error("Board has no edge cuts outline")]
    MissingOutline,

    #[error("Net lookup for '{name}' failed: {reason}")]
    NetLookup { name: String, reason: String },

    #[error("Invalid via geometry: {message}")]
    InvalidVia { message: String },

    #[error("Clearance must not be negative, got {0} nm")]
    InvalidClearance(Coord),

    #[error("Unknown copper layer '{0}'")]
    UnknownLayer(String),

    #[error("Grid has {candidates} points, more than the limit of {limit}")]
    TooManyCandidates { candidates: u64, limit: u64 },

    #[error("Placement rejected: {0}")]
    Placement(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StitchError>;
