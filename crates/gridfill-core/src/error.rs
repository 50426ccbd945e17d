//! Error types for gridfill core.

use gridfill_engine::engine::{CellId, Position};
use thiserror::Error;

/// Errors that can occur while driving a sheet
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Unknown cell: {0}")]
    UnknownCell(CellId),

    #[error("Position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("Cell {cell} holds a number, rejected input {input:?}")]
    NotNumeric { cell: CellId, input: String },

    #[error("Sort column {0} is outside the grid")]
    InvalidSortColumn(usize),

    #[error("Nothing selected")]
    NoSelection,

    #[error("Autofill in progress")]
    Busy,

    #[error("No autofill in progress")]
    NoFillInProgress,

    #[error("Fill ticket {0} does not match the fill in progress")]
    StaleTicket(u64),

    #[error("Autofill failed: {0}")]
    Autofill(#[from] FillError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Recoverable failures at the autofill boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FillError {
    #[error("Autofill not configured: {0}")]
    NotConfigured(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Response is {got_rows}x{got_cols}, request needs at least {want_rows}x{want_cols}")]
    Shape {
        want_rows: usize,
        want_cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
}

pub type Result<T> = std::result::Result<T, GridError>;
