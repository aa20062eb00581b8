//! # viastitch I/O
//!
//! Stitching configuration in human-readable millimetres, and loading and
//! saving of JSON board snapshots.

pub mod config;
pub mod files;

pub use config::StitchConfig;
pub use files::{load_board, load_config, save_board, save_config, IoError};
