use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use viastitch_core::{Board, StitchError};

use crate::config::StitchConfig;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Stitch(#[from] StitchError),
}

fn read_text(path: &Path) -> Result<String, IoError> {
    fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_text(path: &Path, text: &str) -> Result<(), IoError> {
    fs::write(path, text).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn json_error(path: &Path, source: serde_json::Error) -> IoError {
    IoError::Json {
        path: path.to_path_buf(),
        source,
    }
}

/// Attach `path` to JSON failures reported by the board model.
fn board_error(path: &Path, err: StitchError) -> IoError {
    match err {
        StitchError::Json(source) => json_error(path, source),
        other => IoError::Stitch(other),
    }
}

pub fn load_config(path: &Path) -> Result<StitchConfig, IoError> {
    let text = read_text(path)?;
    let config = serde_json::from_str(&text).map_err(|source| json_error(path, source))?;
    log::info!("Loaded stitch config from {}", path.display());
    Ok(config)
}

pub fn save_config(path: &Path, config: &StitchConfig) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(config).map_err(|source| json_error(path, source))?;
    write_text(path, &json)
}

pub fn load_board(path: &Path) -> Result<Board, IoError> {
    let text = read_text(path)?;
    let board = Board::from_json(&text).map_err(|err| board_error(path, err))?;
    log::info!(
        "Loaded board '{}' ({} pads, {} tracks, {} vias)",
        board.name,
        board.pads.len(),
        board.tracks.len(),
        board.vias().len()
    );
    Ok(board)
}

pub fn save_board(path: &Path, board: &Board) -> Result<(), IoError> {
    let json = board.to_json().map_err(|err| board_error(path, err))?;
    write_text(path, &json)?;
    log::info!("Saved board '{}' to {}", board.name, path.display());
    Ok(())
}
