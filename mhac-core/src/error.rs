use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the processing of a tile.
#[derive(Debug, Error)]
pub enum MhacError {
    /// A point-cloud file, articulation index or index entry does not exist.
    #[error("Input not found: {what} ({path})")]
    InputNotFound {
        /// Description of the missing input
        what: String,
        /// Path that was looked up
        path: PathBuf,
    },

    /// A year, tile-id or configuration value is malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No points (or no ground points) survived filtering.
    #[error("Empty result for tile {tile_id}: {reason}")]
    EmptyResult {
        /// Tile that was being processed
        tile_id: String,
        /// What turned out to be empty
        reason: String,
    },

    /// The destination could not be written.
    #[error("Failed to write {path}: {reason}")]
    WriteFailure {
        /// Destination path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MhacError {
    pub fn input_not_found<S: Into<String>, P: Into<PathBuf>>(what: S, path: P) -> Self {
        Self::InputNotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    pub fn empty_result<S: Into<String>, R: Into<String>>(tile_id: S, reason: R) -> Self {
        Self::EmptyResult {
            tile_id: tile_id.into(),
            reason: reason.into(),
        }
    }

    pub fn write_failure<P: Into<PathBuf>, R: ToString>(path: P, reason: R) -> Self {
        Self::WriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type with `MhacError` as the error
pub type Result<T> = std::result::Result<T, MhacError>;
