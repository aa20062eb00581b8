use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StitchError};
use crate::layer::{CopperLayer, LayerPair};
use crate::units::from_mm;
use crate::NetCode;

/// A length in board units (nanometers).
pub type Coord = i64;

/// A 2D point in board coordinates (nanometers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Offset the point, clamping at the coordinate range.
    pub fn translate(&self, dx: Coord, dy: Coord) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// An axis-aligned bounding box with `left <= right` and `bottom <= top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub left: Coord,
    pub bottom: Coord,
    pub right: Coord,
    pub top: Coord,
}

impl BBox {
    /// Build a box from its four edges, rejecting inverted edges.
    pub fn new(left: Coord, bottom: Coord, right: Coord, top: Coord) -> Result<Self> {
        if left > right || bottom > top {
            return Err(StitchError::InvalidBox {
                left,
                bottom,
                right,
                top,
            });
        }
        Ok(Self {
            left,
            bottom,
            right,
            top,
        })
    }

    /// Build a box spanning two opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            bottom: a.y.min(b.y),
            right: a.x.max(b.x),
            top: a.y.max(b.y),
        }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(
            rest.iter()
                .fold(Self::from_corners(*first, *first), |bb, p| {
                    bb.union(&Self::from_corners(*p, *p))
                }),
        )
    }

    pub fn width(&self) -> Coord {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> Coord {
        self.top.saturating_sub(self.bottom)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left.saturating_add(self.width() / 2),
            self.bottom.saturating_add(self.height() / 2),
        )
    }

    /// Edge-inclusive containment test.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }

    /// Grow the box by `amount` on every side. A negative amount shrinks it,
    /// collapsing an axis onto its centre rather than inverting it. Edges
    /// clamp at the coordinate range.
    pub fn inflated(&self, amount: Coord) -> Self {
        let center = self.center();
        let growth = amount.saturating_mul(2);
        let (left, right) = if self.width().saturating_add(growth) < 0 {
            (center.x, center.x)
        } else {
            (self.left.saturating_sub(amount), self.right.saturating_add(amount))
        };
        let (bottom, top) = if self.height().saturating_add(growth) < 0 {
            (center.y, center.y)
        } else {
            (self.bottom.saturating_sub(amount), self.top.saturating_add(amount))
        };
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.left <= other.right
            && self.right >= other.left
            && self.bottom <= other.top
            && self.top >= other.bottom
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }
}

/// A footprint pad, approximated by its rectangular extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    /// Owning footprint reference and pad number, e.g. `U1-3`.
    pub name: String,
    pub position: Point,
    pub width: Coord,
    pub height: Coord,
    pub net: NetCode,
}

impl Pad {
    pub fn new(name: &str, position: Point, width: Coord, height: Coord, net: NetCode) -> Self {
        Self {
            name: name.to_string(),
            position,
            width,
            height,
            net,
        }
    }

    pub fn bbox(&self) -> BBox {
        let half_w = self.width / 2;
        let half_h = self.height / 2;
        BBox::from_corners(
            self.position.translate(-half_w, -half_h),
            self.position.translate(half_w, half_h),
        )
    }
}

/// A straight copper track segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub start: Point,
    pub end: Point,
    pub width: Coord,
    pub layer: CopperLayer,
    pub net: NetCode,
}

impl Track {
    pub fn new(start: Point, end: Point, width: Coord, layer: CopperLayer, net: NetCode) -> Self {
        Self {
            start,
            end,
            width,
            layer,
            net,
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::from_corners(self.start, self.end).inflated(self.width / 2)
    }
}

/// A through or blind via connecting two copper layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub id: Uuid,
    pub position: Point,
    pub diameter: Coord,
    pub drill: Coord,
    pub layers: LayerPair,
    pub net: NetCode,
}

impl Via {
    pub fn bbox(&self) -> BBox {
        let half = self.diameter / 2;
        BBox::from_corners(
            self.position.translate(-half, -half),
            self.position.translate(half, half),
        )
    }
}

/// Size and layer span shared by every via of a stitching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViaTemplate {
    diameter: Coord,
    drill: Coord,
    layers: LayerPair,
}

impl ViaTemplate {
    pub fn new(diameter: Coord, drill: Coord, layers: LayerPair) -> Result<Self> {
        if drill <= 0 || diameter <= 0 {
            return Err(StitchError::InvalidVia {
                message: format!("diameter {diameter} nm and drill {drill} nm must be positive"),
            });
        }
        if drill >= diameter {
            return Err(StitchError::InvalidVia {
                message: format!("drill {drill} nm leaves no annular ring on a {diameter} nm via"),
            });
        }
        Ok(Self {
            diameter,
            drill,
            layers,
        })
    }

    pub fn diameter(&self) -> Coord {
        self.diameter
    }

    pub fn drill(&self) -> Coord {
        self.drill
    }

    pub fn layers(&self) -> LayerPair {
        self.layers
    }

    /// Create a placeable via at `position` on `net` with a fresh id.
    ///
    /// Ids are random, so two templates produce distinct vias even at the
    /// same position.
    pub fn instantiate(&self, position: Point, net: NetCode) -> Via {
        Via {
            id: Uuid::new_v4(),
            position,
            diameter: self.diameter,
            drill: self.drill,
            layers: self.layers,
            net,
        }
    }
}

impl Default for ViaTemplate {
    /// 0.5 mm through via with a 0.4 mm drill.
    fn default() -> Self {
        Self {
            diameter: from_mm(0.5),
            drill: from_mm(0.4),
            layers: LayerPair::default(),
        }
    }
}
