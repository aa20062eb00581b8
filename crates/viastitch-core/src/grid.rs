//! Grid point generation over a bounding box.
//!
//! Points are visited column by column: x ascending from the box's left
//! edge, and for each x, y ascending from its bottom edge. With the default
//! half-open bounds the right and top edges are never visited;
//! [`GridBounds::Inclusive`] visits them when they fall on a grid line.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::clearance::{AcceptAll, ExclusionPredicate};
use crate::error::{Result, StitchError};
use crate::geometry::{BBox, Coord, Point};

/// Whether the far edges of the box are part of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridBounds {
    /// `[left, right) x [bottom, top)`.
    #[default]
    HalfOpen,
    /// `[left, right] x [bottom, top]`.
    Inclusive,
}

impl GridBounds {
    fn admits(self, value: Coord, limit: Coord) -> bool {
        match self {
            GridBounds::HalfOpen => value < limit,
            GridBounds::Inclusive => value <= limit,
        }
    }

    fn axis_count(self, from: Coord, to: Coord, step: Coord) -> u64 {
        let span = to as i128 - from as i128;
        let step = step as i128;
        let count = match self {
            GridBounds::HalfOpen if span <= 0 => 0,
            GridBounds::HalfOpen => (span + step - 1) / step,
            GridBounds::Inclusive if span < 0 => 0,
            GridBounds::Inclusive => span / step + 1,
        };
        count as u64
    }
}

/// A validated grid: a positive step tiling a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    bbox: BBox,
    step: Coord,
    bounds: GridBounds,
}

impl GridSpec {
    pub fn new(bbox: BBox, step: Coord) -> Result<Self> {
        if step <= 0 {
            return Err(StitchError::InvalidStep(step));
        }
        Ok(Self {
            bbox,
            step,
            bounds: GridBounds::HalfOpen,
        })
    }

    pub fn with_bounds(mut self, bounds: GridBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Number of grid points before any filtering.
    pub fn candidate_count(&self) -> u64 {
        let columns = self
            .bounds
            .axis_count(self.bbox.left, self.bbox.right, self.step);
        let rows = self
            .bounds
            .axis_count(self.bbox.bottom, self.bbox.top, self.step);
        columns.saturating_mul(rows)
    }

    /// Lazily enumerate the grid points `accept` lets through.
    ///
    /// `self` is not consumed, so calling this again restarts the sequence.
    pub fn points<P: ExclusionPredicate>(&self, accept: P) -> GridPoints<P> {
        let has_row = self.bounds.admits(self.bbox.bottom, self.bbox.top);
        let x = Some(self.bbox.left)
            .filter(|&x| has_row && self.bounds.admits(x, self.bbox.right));
        GridPoints {
            spec: *self,
            accept,
            x,
            y: Some(self.bbox.bottom),
        }
    }

    /// Every grid point, unfiltered.
    pub fn candidates(&self) -> GridPoints<AcceptAll> {
        self.points(AcceptAll)
    }
}

/// Enumerate the points of `bbox` on a `step` grid that `accept` lets through.
pub fn generate<P: ExclusionPredicate>(bbox: BBox, step: Coord, accept: P) -> Result<GridPoints<P>> {
    Ok(GridSpec::new(bbox, step)?.points(accept))
}

/// Iterator over accepted grid points, x outer and y inner.
#[derive(Clone)]
pub struct GridPoints<P> {
    spec: GridSpec,
    accept: P,
    /// Current column; `None` once the grid is exhausted.
    x: Option<Coord>,
    /// Next row in the current column; `None` once the column is exhausted.
    y: Option<Coord>,
}

impl<P> GridPoints<P> {
    fn advance_column(&mut self, x: Coord) {
        let bounds = self.spec.bounds;
        let right = self.spec.bbox.right;
        self.x = x
            .checked_add(self.spec.step)
            .filter(|&next| bounds.admits(next, right));
        self.y = Some(self.spec.bbox.bottom);
    }
}

impl<P: ExclusionPredicate> Iterator for GridPoints<P> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        loop {
            let x = self.x?;
            let top = self.spec.bbox.top;
            let bounds = self.spec.bounds;
            let Some(y) = self.y.filter(|&y| bounds.admits(y, top)) else {
                self.advance_column(x);
                continue;
            };
            // Overflow ends the column instead of wrapping.
            self.y = y.checked_add(self.spec.step);

            let point = Point::new(x, y);
            if self.accept.accept(point) {
                return Some(point);
            }
            log::debug!("Grid point ({}, {}) rejected", x, y);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.x.is_none() {
            (0, Some(0))
        } else {
            (0, usize::try_from(self.spec.candidate_count()).ok())
        }
    }
}

impl<P: ExclusionPredicate> FusedIterator for GridPoints<P> {}
