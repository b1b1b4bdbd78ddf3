//! Error types for configuration and grid construction
//!
//! The simulation itself has no recoverable failures; these cover building a
//! game from external input and rejected player commands.

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised while building a [`crate::grid::Grid`] from a layout
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row and two columns, got {rows}x{columns}")]
    BadDimensions { rows: usize, columns: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth { row: usize, expected: usize, found: usize },
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
}

/// Reasons a fire command is refused
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FireError {
    #[error("the game is over")]
    GameOver,
    #[error("no projectile is loaded")]
    Empty,
    #[error("aim of {angle:.2} rad is outside the firing cone of +/-{max:.2} rad")]
    OutsideCone { angle: f64, max: f64 },
}
