//! Cell data structures for the grid.
//!
//! - [`CellValue`] - The content of a cell, tagged as text or number
//! - [`CellKind`] - The tag of a [`CellValue`]
//! - [`Cell`] - A stored cell: its identity plus its value

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::cell_id::CellId;

/// Strict numeric input: optional minus, digits, optional fraction.
static NUMBER_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern compiles"));

/// The type of content stored in a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Text,
    Number,
}

/// The content of a cell.
///
/// Serializes untagged, so a 2D array of values is plain JSON
/// (`[["Mon", 1], ["Tue", 2]]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// The placeholder used for positions with nothing stored.
    pub fn empty() -> CellValue {
        CellValue::Text(String::new())
    }

    pub fn text(s: impl Into<String>) -> CellValue {
        CellValue::Text(s.into())
    }

    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Number(_) => CellKind::Number,
            CellValue::Text(_) => CellKind::Text,
        }
    }

    /// Content the store never keeps: empty text or numeric zero.
    pub fn is_vacant(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
        }
    }

    /// Check input against the strict numeric pattern (`-12`, `3.5`; not `1e3`, ` 4`, `.5`).
    pub fn is_numeric_input(input: &str) -> bool {
        NUMBER_ONLY.is_match(input)
    }

    /// Parse raw input.
    /// - Strict numeric string -> Number
    /// - Anything else (including "") -> Text, verbatim
    pub fn from_input(input: &str) -> CellValue {
        if Self::is_numeric_input(input)
            && let Ok(n) = input.parse::<f64>()
        {
            return CellValue::Number(n);
        }
        CellValue::Text(input.to_string())
    }

    /// Re-run input coercion on a text value; numbers pass through.
    pub fn coerce(self) -> CellValue {
        match self {
            CellValue::Text(s) => CellValue::from_input(&s),
            number => number,
        }
    }

    /// Get the string form used for editing and for clipboard text.
    pub fn to_input_string(&self) -> String {
        self.to_string()
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::empty()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// A cell held by the [`CellStore`](super::CellStore).
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub value: CellValue,
}

impl Cell {
    pub fn new(id: CellId, value: CellValue) -> Cell {
        Cell { id, value }
    }

    pub fn kind(&self) -> CellKind {
        self.value.kind()
    }
}
