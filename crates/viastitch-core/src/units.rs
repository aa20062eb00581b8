//! Conversions between millimetres and internal nanometre units.

use crate::geometry::Coord;

/// Internal units per millimetre.
pub const NM_PER_MM: f64 = 1_000_000.0;

/// Convert millimetres to internal units, rounding to the nearest nanometre.
pub fn from_mm(mm: f64) -> Coord {
    (mm * NM_PER_MM).round() as Coord
}

pub fn to_mm(value: Coord) -> f64 {
    value as f64 / NM_PER_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mm_rounds() {
        assert_eq!(from_mm(2.54), 2_540_000);
        assert_eq!(from_mm(0.4), 400_000);
        assert_eq!(from_mm(-1.0), -1_000_000);
        assert_eq!(from_mm(0.000_000_6), 1);
    }

    #[test]
    fn test_to_mm() {
        assert!((to_mm(250_000) - 0.25).abs() < 1e-12);
    }
}
