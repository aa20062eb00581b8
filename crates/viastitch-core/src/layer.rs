use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StitchError};

/// A copper layer, named the way board editors name them (`F.Cu`, `In1.Cu`, `B.Cu`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CopperLayer {
    Front,
    /// Inner layer, numbered from 1 below the front layer.
    Inner(u8),
    Back,
}

impl fmt::Display for CopperLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopperLayer::Front => write!(f, "F.Cu"),
            CopperLayer::Inner(n) => write!(f, "In{n}.Cu"),
            CopperLayer::Back => write!(f, "B.Cu"),
        }
    }
}

impl FromStr for CopperLayer {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "F.Cu" => Ok(CopperLayer::Front),
            "B.Cu" => Ok(CopperLayer::Back),
            _ => s
                .strip_prefix("In")
                .and_then(|rest| rest.strip_suffix(".Cu"))
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|&n| n > 0)
                .map(CopperLayer::Inner)
                .ok_or_else(|| StitchError::UnknownLayer(s.to_string())),
        }
    }
}

impl TryFrom<String> for CopperLayer {
    type Error = StitchError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CopperLayer> for String {
    fn from(layer: CopperLayer) -> Self {
        layer.to_string()
    }
}

impl CopperLayer {
    /// Whether this layer exists on a board with `copper_layers` copper layers.
    pub fn exists_in(&self, copper_layers: u8) -> bool {
        match self {
            CopperLayer::Front | CopperLayer::Back => copper_layers >= 1,
            CopperLayer::Inner(n) => *n >= 1 && (*n as u16) + 2 <= copper_layers as u16,
        }
    }
}

/// The pair of copper layers a via spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerPair {
    pub start: CopperLayer,
    pub end: CopperLayer,
}

impl LayerPair {
    pub fn new(start: CopperLayer, end: CopperLayer) -> Result<Self> {
        if start == end {
            return Err(StitchError::InvalidVia {
                message: format!("via must span two different layers, got {start} twice"),
            });
        }
        Ok(Self { start, end })
    }

    /// Whether both ends exist on a board with `copper_layers` copper layers.
    pub fn exists_in(&self, copper_layers: u8) -> bool {
        self.start.exists_in(copper_layers) && self.end.exists_in(copper_layers)
    }
}

impl Default for LayerPair {
    /// Through via, front to back.
    fn default() -> Self {
        Self {
            start: CopperLayer::Front,
            end: CopperLayer::Back,
        }
    }
}
