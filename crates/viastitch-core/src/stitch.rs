//! Ground-via stitching: tile the board outline with vias on a named net.

use serde::Serialize;

use crate::board::UNCONNECTED;
use crate::clearance::{ClearanceCheck, ExclusionPredicate};
use crate::error::{Result, StitchError};
use crate::geometry::{BBox, Coord, Via, ViaTemplate};
use crate::grid::{GridBounds, GridPoints, GridSpec};
use crate::host::{BoardFeatures, BoardOutline, NetLookup, StitchHost};
use crate::units::{from_mm, to_mm};
use crate::NetCode;

/// Largest grid a single pass will instantiate vias for.
pub const MAX_CANDIDATES: u64 = 1_000_000;

/// Parameters of a stitching pass, in board units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchSettings {
    pub net_name: String,
    pub grid_step: Coord,
    pub via: ViaTemplate,
    pub clearance: Coord,
    /// Reject grid points near existing copper. Off by default: every grid
    /// point receives a via.
    pub check_clearance: bool,
    pub bounds: GridBounds,
}

impl Default for StitchSettings {
    fn default() -> Self {
        Self {
            net_name: "GND".to_string(),
            grid_step: from_mm(2.54),
            via: ViaTemplate::default(),
            clearance: from_mm(0.25),
            check_clearance: false,
            bounds: GridBounds::HalfOpen,
        }
    }
}

impl StitchSettings {
    pub fn validate(&self) -> Result<()> {
        if self.grid_step <= 0 {
            return Err(StitchError::InvalidStep(self.grid_step));
        }
        if self.clearance < 0 {
            return Err(StitchError::InvalidClearance(self.clearance));
        }
        Ok(())
    }
}

/// Outcome of a stitching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StitchReport {
    pub bbox: BBox,
    pub net_code: NetCode,
    /// Grid points before filtering.
    pub candidates: u64,
    pub placed: usize,
}

impl StitchReport {
    /// Grid points the exclusion predicate rejected.
    pub fn skipped(&self) -> u64 {
        self.candidates.saturating_sub(self.placed as u64)
    }
}

/// Vias a stitching pass would place, not yet added to any board.
#[derive(Debug, Clone)]
pub struct StitchPlan {
    pub report: StitchReport,
    pub vias: Vec<Via>,
}

/// Resolve `name` to a net code, falling back to the unconnected net when
/// the net is missing or the lookup fails.
pub fn resolve_net<H>(host: &H, name: &str) -> NetCode
where
    H: NetLookup + ?Sized,
{
    match host.netcode_from_name(name) {
        Ok(Some(code)) => {
            log::info!("Using net '{}' (code {})", name, code);
            code
        }
        Ok(None) => {
            log::warn!(
                "Net '{}' not found, falling back to net code {}",
                name,
                UNCONNECTED
            );
            UNCONNECTED
        }
        Err(err) => {
            log::warn!("{}; falling back to net code {}", err, UNCONNECTED);
            UNCONNECTED
        }
    }
}

/// Compute the vias a stitching pass would place, without touching the board.
pub fn plan<H>(host: &H, settings: &StitchSettings) -> Result<StitchPlan>
where
    H: BoardOutline + NetLookup + BoardFeatures + ?Sized,
{
    settings.validate()?;
    let bbox = host.edges_bounding_box()?;
    log::info!(
        "Board bounding box (mm): {} {} {} {}",
        to_mm(bbox.left),
        to_mm(bbox.bottom),
        to_mm(bbox.right),
        to_mm(bbox.top)
    );

    let net_code = resolve_net(host, &settings.net_name);
    let spec = GridSpec::new(bbox, settings.grid_step)?.with_bounds(settings.bounds);
    let candidates = spec.candidate_count();
    if candidates > MAX_CANDIDATES {
        return Err(StitchError::TooManyCandidates {
            candidates,
            limit: MAX_CANDIDATES,
        });
    }

    let vias = if settings.check_clearance {
        // Features that cannot reach the outline never reject a grid point.
        let nearby = host
            .conductive_features()
            .into_iter()
            .filter(|(_, _, feature)| feature.inflated(settings.clearance).intersects(&bbox));
        let check = ClearanceCheck::new(nearby, settings.clearance)?;
        log::debug!(
            "Checking {} nm clearance against {} features",
            check.clearance(),
            check.feature_count()
        );
        instantiate_all(spec.points(check), &settings.via, net_code)
    } else {
        instantiate_all(spec.candidates(), &settings.via, net_code)
    };

    let report = StitchReport {
        bbox,
        net_code,
        candidates,
        placed: vias.len(),
    };
    log::debug!(
        "{} of {} grid points accepted",
        report.placed,
        report.candidates
    );
    Ok(StitchPlan { report, vias })
}

fn instantiate_all<P: ExclusionPredicate>(
    points: GridPoints<P>,
    template: &ViaTemplate,
    net: NetCode,
) -> Vec<Via> {
    points.map(|p| template.instantiate(p, net)).collect()
}

/// Place a via at every accepted grid point of the host board, then refresh it once.
pub fn stitch<H>(host: &mut H, settings: &StitchSettings) -> Result<StitchReport>
where
    H: StitchHost + ?Sized,
{
    let StitchPlan { report, vias } = plan(&*host, settings)?;
    for via in vias {
        host.add_via(via)?;
    }
    host.refresh();
    log::info!("Placed {} vias", report.placed);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::geometry::{Pad, Point, Track};
    use crate::host::PlacementSink;
    use crate::layer::CopperLayer;
    use crate::spatial::FeatureKind;

    const MM: Coord = 1_000_000;

    fn board_10x5() -> Board {
        let mut board = Board::with_rect_outline("stitch", BBox::new(0, 0, 10 * MM, 5 * MM).unwrap());
        board.add_net("GND");
        board
    }

    /// Host whose net lookup always fails and which records every call.
    #[derive(Default)]
    struct FlakyHost {
        placed: Vec<Via>,
        refreshes: usize,
    }

    impl BoardOutline for FlakyHost {
        fn edges_bounding_box(&self) -> Result<BBox> {
            BBox::new(0, 0, 10, 10)
        }
    }

    impl NetLookup for FlakyHost {
        fn netcode_from_name(&self, name: &str) -> Result<Option<NetCode>> {
            Err(StitchError::NetLookup {
                name: name.to_string(),
                reason: "board not loaded".to_string(),
            })
        }
    }

    impl BoardFeatures for FlakyHost {
        fn conductive_features(&self) -> Vec<(FeatureKind, usize, BBox)> {
            Vec::new()
        }
    }

    impl PlacementSink for FlakyHost {
        fn add_via(&mut self, via: Via) -> Result<()> {
            self.placed.push(via);
            Ok(())
        }

        fn refresh(&mut self) {
            self.refreshes += 1;
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = StitchSettings::default();
        assert_eq!(settings.net_name, "GND");
        assert_eq!(settings.grid_step, 2_540_000);
        assert_eq!(settings.via.diameter(), 500_000);
        assert_eq!(settings.via.drill(), 400_000);
        assert_eq!(settings.clearance, 250_000);
        assert!(!settings.check_clearance);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_stitch_places_full_grid() {
        let mut board = board_10x5();
        let gnd = board.find_net("GND").unwrap().code;
        let report = stitch(&mut board, &StitchSettings::default()).unwrap();

        // Columns at 0, 2.54, 5.08, 7.62 mm; rows at 0, 2.54 mm.
        assert_eq!(report.candidates, 8);
        assert_eq!(report.placed, 8);
        assert_eq!(report.skipped(), 0);
        assert_eq!(report.net_code, gnd);
        assert_eq!(board.vias().len(), 8);
        assert!(board.vias().iter().all(|v| v.net == gnd));
        assert_eq!(board.vias()[1].position, Point::new(0, 2_540_000));
        assert_eq!(board.revision(), 1);
    }

    #[test]
    fn test_net_lookup_failure_falls_back_to_unconnected() {
        let mut host = FlakyHost::default();
        let settings = StitchSettings {
            grid_step: 5,
            via: ViaTemplate::new(2, 1, Default::default()).unwrap(),
            ..Default::default()
        };
        let report = stitch(&mut host, &settings).unwrap();
        assert_eq!(report.net_code, UNCONNECTED);
        assert_eq!(host.placed.len(), 4);
        assert!(host.placed.iter().all(|v| v.net == UNCONNECTED));
        assert_eq!(host.refreshes, 1);
    }

    #[test]
    fn test_missing_net_falls_back_to_unconnected() {
        let mut board = board_10x5();
        let settings = StitchSettings {
            net_name: "AGND".to_string(),
            ..Default::default()
        };
        let report = stitch(&mut board, &settings).unwrap();
        assert_eq!(report.net_code, UNCONNECTED);
        assert_eq!(board.vias_on_net(UNCONNECTED).count(), 8);
    }

    #[test]
    fn test_clearance_check_skips_occupied_points() {
        let mut board = board_10x5();
        // Pad centred on the (2.54, 2.54) grid point.
        board.add_pad(Pad::new("U1-1", Point::new(2_540_000, 2_540_000), MM, MM, 0));
        // Track along y = 0 from x = 4 to 6 mm covers the 5.08 mm column's first point.
        board.add_track(Track::new(
            Point::new(4 * MM, 0),
            Point::new(6 * MM, 0),
            200_000,
            CopperLayer::Front,
            0,
        ));
        let settings = StitchSettings {
            check_clearance: true,
            ..Default::default()
        };
        let stitch_plan = plan(&board, &settings).unwrap();
        assert_eq!(stitch_plan.report.candidates, 8);
        assert_eq!(stitch_plan.report.placed, 6);
        assert_eq!(stitch_plan.report.skipped(), 2);
        let positions: Vec<Point> = stitch_plan.vias.iter().map(|v| v.position).collect();
        assert!(!positions.contains(&Point::new(2_540_000, 2_540_000)));
        assert!(!positions.contains(&Point::new(5_080_000, 0)));

        // Without the check every point is used.
        let unchecked = plan(&board, &StitchSettings::default()).unwrap();
        assert_eq!(unchecked.report.placed, 8);
    }

    #[test]
    fn test_clearance_distance_is_respected() {
        let mut board = board_10x5();
        // Pad edge 0.2 mm from the origin grid point: inside a 0.25 mm clearance.
        board.add_pad(Pad::new("J1-1", Point::new(700_000, 0), MM, MM, 0));
        let mut settings = StitchSettings {
            check_clearance: true,
            ..Default::default()
        };
        assert_eq!(plan(&board, &settings).unwrap().report.placed, 7);
        settings.clearance = 100_000;
        assert_eq!(plan(&board, &settings).unwrap().report.placed, 8);
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let board = board_10x5();
        let stitch_plan = plan(&board, &StitchSettings::default()).unwrap();
        assert_eq!(stitch_plan.vias.len(), 8);
        assert!(board.vias().is_empty());
        assert_eq!(board.revision(), 0);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut board = board_10x5();
        let settings = StitchSettings {
            grid_step: 0,
            ..Default::default()
        };
        assert!(matches!(
            stitch(&mut board, &settings),
            Err(StitchError::InvalidStep(0))
        ));
        let settings = StitchSettings {
            clearance: -1,
            ..Default::default()
        };
        assert!(matches!(
            stitch(&mut board, &settings),
            Err(StitchError::InvalidClearance(-1))
        ));
        assert!(board.vias().is_empty());
    }

    #[test]
    fn test_missing_outline() {
        let mut board = Board::new("empty");
        assert!(matches!(
            stitch(&mut board, &StitchSettings::default()),
            Err(StitchError::MissingOutline)
        ));
    }

    #[test]
    fn test_board_stitch_is_undoable() {
        let mut board = board_10x5();
        let mut settings = StitchSettings::default();
        let report = board.stitch(&settings).unwrap();
        assert_eq!(report.placed, 8);
        assert_eq!(board.undo_description(), Some("Stitch vias"));
        assert_eq!(board.redo_description(), None);

        // A second pass with clearance on finds every point taken.
        settings.check_clearance = true;
        let second = board.stitch(&settings).unwrap();
        assert_eq!(second.placed, 0);
        assert_eq!(board.vias().len(), 8);

        assert!(board.undo());
        assert!(board.undo());
        assert!(board.vias().is_empty());
        assert_eq!(board.redo_description(), Some("Stitch vias"));
        assert!(board.redo());
        assert_eq!(board.vias().len(), 8);
    }

    #[test]
    fn test_oversized_grid_rejected_before_placement() {
        // 10 x 5 mm at 1 um is 50 million points.
        let mut board = board_10x5();
        let settings = StitchSettings {
            grid_step: 1_000,
            via: ViaTemplate::new(500, 400, Default::default()).unwrap(),
            ..Default::default()
        };
        assert!(matches!(
            stitch(&mut board, &settings),
            Err(StitchError::TooManyCandidates {
                candidates: 50_000_000,
                limit: MAX_CANDIDATES,
            })
        ));
        assert!(board.vias().is_empty());
        assert_eq!(board.revision(), 0);
    }

    #[test]
    fn test_huge_clearance_does_not_overflow() {
        let mut board = board_10x5();
        board.add_pad(Pad::new("TP1", Point::new(MM, MM), MM, MM, 0));
        let settings = StitchSettings {
            check_clearance: true,
            clearance: Coord::MAX / 2,
            ..Default::default()
        };
        let stitch_plan = plan(&board, &settings).unwrap();
        assert_eq!(stitch_plan.report.candidates, 8);
        assert_eq!(stitch_plan.report.placed, 0);
    }

    #[test]
    fn test_features_outside_outline_are_ignored() {
        let mut board = board_10x5();
        board.add_pad(Pad::new("FAR", Point::new(50 * MM, 50 * MM), MM, MM, 0));
        let settings = StitchSettings {
            check_clearance: true,
            ..Default::default()
        };
        assert_eq!(plan(&board, &settings).unwrap().report.placed, 8);
    }

    #[test]
    fn test_inclusive_bounds_reach_far_edges() {
        let mut board = Board::with_rect_outline("edge", BBox::new(0, 0, 5_080_000, 2_540_000).unwrap());
        let settings = StitchSettings {
            bounds: GridBounds::Inclusive,
            ..Default::default()
        };
        let report = stitch(&mut board, &settings).unwrap();
        assert_eq!(report.placed, 6);
        assert!(board
            .vias()
            .iter()
            .any(|v| v.position == Point::new(5_080_000, 2_540_000)));
    }
}
