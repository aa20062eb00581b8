use serde::{Deserialize, Serialize};

use viastitch_core::units::from_mm;
use viastitch_core::{CopperLayer, GridBounds, LayerPair, StitchError, StitchSettings, ViaTemplate};

/// Stitching parameters as written in a config file. Lengths are in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Net the vias are assigned to.
    pub net_name: String,
    pub grid_step_mm: f64,
    pub via_diameter_mm: f64,
    pub via_drill_mm: f64,
    pub clearance_mm: f64,
    pub check_clearance: bool,
    /// Also place vias on the right and top edges when they fall on the grid.
    pub inclusive_bounds: bool,
    /// Copper layers the vias span, e.g. `["F.Cu", "B.Cu"]`.
    pub layers: [String; 2],
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            net_name: "GND".to_string(),
            grid_step_mm: 2.54,
            via_diameter_mm: 0.5,
            via_drill_mm: 0.4,
            clearance_mm: 0.25,
            check_clearance: false,
            inclusive_bounds: false,
            layers: ["F.Cu".to_string(), "B.Cu".to_string()],
        }
    }
}

impl StitchConfig {
    /// Convert to board units and validate.
    pub fn to_settings(&self) -> Result<StitchSettings, StitchError> {
        let start: CopperLayer = self.layers[0].parse()?;
        let end: CopperLayer = self.layers[1].parse()?;
        let via = ViaTemplate::new(
            from_mm(self.via_diameter_mm),
            from_mm(self.via_drill_mm),
            LayerPair::new(start, end)?,
        )?;
        let settings = StitchSettings {
            net_name: self.net_name.clone(),
            grid_step: from_mm(self.grid_step_mm),
            via,
            clearance: from_mm(self.clearance_mm),
            check_clearance: self.check_clearance,
            bounds: if self.inclusive_bounds {
                GridBounds::Inclusive
            } else {
                GridBounds::HalfOpen
            },
        };
        settings.validate()?;
        Ok(settings)
    }
}
