use uuid::Uuid;

use crate::board::Board;
use crate::geometry::Via;

/// A reversible command for the undo/redo system.
pub trait Command: std::fmt::Debug + Send {
    /// Execute the command (apply changes to the board).
    fn execute(&mut self, board: &mut Board);
    /// Reverse the command (undo changes).
    fn undo(&mut self, board: &mut Board);
    /// Human-readable description for the undo/redo history.
    fn description(&self) -> &str;
}

/// Place a batch of vias as one edit.
#[derive(Debug)]
pub struct PlaceViasCommand {
    vias: Vec<Via>,
}

impl PlaceViasCommand {
    pub fn new(vias: Vec<Via>) -> Self {
        Self { vias }
    }
}

impl Command for PlaceViasCommand {
    fn execute(&mut self, board: &mut Board) {
        for via in &self.vias {
            board.push_via(via.clone());
        }
    }

    fn undo(&mut self, board: &mut Board) {
        let ids: Vec<Uuid> = self.vias.iter().map(|v| v.id).collect();
        let removed = board.remove_vias(&ids);
        if removed != ids.len() {
            log::warn!(
                "Undo removed {} of {} stitched vias; the rest were already gone",
                removed,
                ids.len()
            );
        }
    }

    fn description(&self) -> &str {
        "Stitch vias"
    }
}

/// Manages the undo/redo history stack.
#[derive(Debug, Default)]
pub struct CommandHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn execute(&mut self, mut command: Box<dyn Command>, board: &mut Board) {
        command.execute(board);
        self.undo_stack.push(command);
        // Executing a new command clears the redo stack.
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, board: &mut Board) -> bool {
        if let Some(mut command) = self.undo_stack.pop() {
            command.undo(board);
            self.redo_stack.push(command);
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self, board: &mut Board) -> bool {
        if let Some(mut command) = self.redo_stack.pop() {
            command.execute(board);
            self.undo_stack.push(command);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, ViaTemplate};
    use crate::layer::LayerPair;

    fn vias(n: i64) -> Vec<Via> {
        let template = ViaTemplate::new(500_000, 400_000, LayerPair::default()).unwrap();
        (0..n)
            .map(|i| template.instantiate(Point::new(i * 1_000_000, 0), 1))
            .collect()
    }

    #[test]
    fn test_execute_undo_redo() {
        let mut board = Board::new("test");
        let mut history = CommandHistory::new();
        history.execute(Box::new(PlaceViasCommand::new(vias(3))), &mut board);
        assert_eq!(board.vias().len(), 3);
        assert_eq!(history.undo_description(), Some("Stitch vias"));

        assert!(history.undo(&mut board));
        assert!(board.vias().is_empty());
        assert!(history.can_redo());
        assert_eq!(history.redo_description(), Some("Stitch vias"));

        assert!(history.redo(&mut board));
        assert_eq!(board.vias().len(), 3);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_keeps_unrelated_vias() {
        let mut board = Board::new("test");
        let existing = vias(1).remove(0);
        board.push_via(existing.clone());

        let mut history = CommandHistory::new();
        history.execute(Box::new(PlaceViasCommand::new(vias(2))), &mut board);
        assert_eq!(board.vias().len(), 3);
        history.undo(&mut board);
        assert_eq!(board.vias(), &[existing]);
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut board = Board::new("test");
        let mut history = CommandHistory::new();
        history.execute(Box::new(PlaceViasCommand::new(vias(1))), &mut board);
        history.undo(&mut board);
        history.execute(Box::new(PlaceViasCommand::new(vias(2))), &mut board);
        assert!(!history.can_redo());
        assert_eq!(history.redo_description(), None);
        assert!(!history.redo(&mut board));
        assert_eq!(board.vias().len(), 2);
    }
}
