use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{Command, CommandHistory, PlaceViasCommand};
use crate::error::{Result, StitchError};
use crate::geometry::{BBox, Pad, Point, Track, Via};
use crate::host::{BoardFeatures, BoardOutline, NetLookup, PlacementSink};
use crate::spatial::FeatureKind;
use crate::stitch::{self, StitchReport, StitchSettings};
use crate::NetCode;

/// Net code of the unconnected net. Always valid, never listed in the net table.
pub const UNCONNECTED: NetCode = 0;

/// A named net and its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub code: NetCode,
    pub name: String,
}

fn default_copper_layers() -> u8 {
    2
}

/// In-memory printed circuit board: outline, nets and conductive features.
#[derive(Debug, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    /// Number of copper layers in the stackup.
    #[serde(default = "default_copper_layers")]
    pub copper_layers: u8,
    #[serde(default)]
    nets: Vec<Net>,
    /// Edge cuts outline vertices.
    #[serde(default)]
    pub outline: Vec<Point>,
    #[serde(default)]
    pub pads: Vec<Pad>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    vias: Vec<Via>,
    /// Command history for undo/redo.
    #[serde(skip)]
    command_history: CommandHistory,
    /// Bumped on every refresh.
    #[serde(skip)]
    revision: u64,
}

impl Board {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            copper_layers: default_copper_layers(),
            nets: Vec::new(),
            outline: Vec::new(),
            pads: Vec::new(),
            tracks: Vec::new(),
            vias: Vec::new(),
            command_history: CommandHistory::new(),
            revision: 0,
        }
    }

    /// A board whose edge cuts are the rectangle `bbox`.
    pub fn with_rect_outline(name: &str, bbox: BBox) -> Self {
        let mut board = Self::new(name);
        board.outline = vec![
            Point::new(bbox.left, bbox.bottom),
            Point::new(bbox.right, bbox.bottom),
            Point::new(bbox.right, bbox.top),
            Point::new(bbox.left, bbox.top),
        ];
        board
    }

    // ── Nets ─────────────────────────────────────────────────────────

    /// Add a net, or return the code of an existing net with that name.
    pub fn add_net(&mut self, name: &str) -> NetCode {
        if let Some(net) = self.nets.iter().find(|n| n.name == name) {
            return net.code;
        }
        let code = self.nets.iter().map(|n| n.code).max().unwrap_or(UNCONNECTED) + 1;
        self.nets.push(Net {
            code,
            name: name.to_string(),
        });
        code
    }

    pub fn find_net(&self, name: &str) -> Option<&Net> {
        self.nets.iter().find(|n| n.name == name)
    }

    pub fn net_name(&self, code: NetCode) -> Option<&str> {
        self.nets
            .iter()
            .find(|n| n.code == code)
            .map(|n| n.name.as_str())
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    fn has_net(&self, code: NetCode) -> bool {
        code == UNCONNECTED || self.nets.iter().any(|n| n.code == code)
    }

    // ── Features ─────────────────────────────────────────────────────

    pub fn add_pad(&mut self, pad: Pad) {
        self.pads.push(pad);
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn vias(&self) -> &[Via] {
        &self.vias
    }

    pub fn vias_on_net(&self, code: NetCode) -> impl Iterator<Item = &Via> {
        self.vias.iter().filter(move |v| v.net == code)
    }

    pub(crate) fn push_via(&mut self, via: Via) {
        self.vias.push(via);
    }

    /// Remove the vias with the given ids, returning how many were found.
    pub fn remove_vias(&mut self, ids: &[Uuid]) -> usize {
        let before = self.vias.len();
        self.vias.retain(|v| !ids.contains(&v.id));
        before - self.vias.len()
    }

    // ── Stitching ────────────────────────────────────────────────────

    /// Run a stitching pass as a single undoable edit.
    pub fn stitch(&mut self, settings: &StitchSettings) -> Result<StitchReport> {
        let layers = settings.via.layers();
        if !layers.exists_in(self.copper_layers) {
            return Err(StitchError::Placement(format!(
                "layers {}-{} do not exist on a {}-layer board",
                layers.start, layers.end, self.copper_layers
            )));
        }
        let plan = stitch::plan(&*self, settings)?;
        self.execute_command(Box::new(PlaceViasCommand::new(plan.vias)));
        self.refresh();
        log::info!("Placed {} vias", plan.report.placed);
        Ok(plan.report)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Undo / Redo ──────────────────────────────────────────────────

    pub fn execute_command(&mut self, command: Box<dyn Command>) {
        let mut history = std::mem::take(&mut self.command_history);
        history.execute(command, self);
        self.command_history = history;
    }

    pub fn undo(&mut self) -> bool {
        let mut history = std::mem::take(&mut self.command_history);
        let undone = history.undo(self);
        self.command_history = history;
        undone
    }

    pub fn redo(&mut self) -> bool {
        let mut history = std::mem::take(&mut self.command_history);
        let redone = history.redo(self);
        self.command_history = history;
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.command_history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.command_history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.command_history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.command_history.redo_description()
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl BoardOutline for Board {
    fn edges_bounding_box(&self) -> Result<BBox> {
        BBox::from_points(&self.outline).ok_or(StitchError::MissingOutline)
    }
}

impl NetLookup for Board {
    fn netcode_from_name(&self, name: &str) -> Result<Option<NetCode>> {
        Ok(self.find_net(name).map(|n| n.code))
    }
}

impl BoardFeatures for Board {
    fn conductive_features(&self) -> Vec<(FeatureKind, usize, BBox)> {
        let pads = self
            .pads
            .iter()
            .enumerate()
            .map(|(i, p)| (FeatureKind::Pad, i, p.bbox()));
        let tracks = self
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (FeatureKind::Track, i, t.bbox()));
        let vias = self
            .vias
            .iter()
            .enumerate()
            .map(|(i, v)| (FeatureKind::Via, i, v.bbox()));
        pads.chain(tracks).chain(vias).collect()
    }
}

impl PlacementSink for Board {
    fn add_via(&mut self, via: Via) -> Result<()> {
        if !via.layers.exists_in(self.copper_layers) {
            return Err(StitchError::Placement(format!(
                "via layers {}-{} do not exist on a {}-layer board",
                via.layers.start, via.layers.end, self.copper_layers
            )));
        }
        if !self.has_net(via.net) {
            return Err(StitchError::Placement(format!(
                "net code {} is not defined on this board",
                via.net
            )));
        }
        self.push_via(via);
        Ok(())
    }

    fn refresh(&mut self) {
        self.revision += 1;
        log::debug!("Board '{}' refreshed (revision {})", self.name, self.revision);
    }
}
