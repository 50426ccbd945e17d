//! Grid coordinates.
//!
//! Provides bidirectional conversion between spreadsheet-style references
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column positions, plus the
//! rectangle math used by range selection and serialization.
//!
//! # Examples
//!
//! ```
//! use gridfill_engine::engine::Position;
//!
//! let pos = Position::parse_a1("B3").unwrap();
//! assert_eq!(pos.col, 1); // 0-indexed
//! assert_eq!(pos.row, 2);
//! assert_eq!(pos.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static A1_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("A1 pattern compiles")
});

/// Where a cell currently renders (0-indexed).
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Parse a reference in spreadsheet notation (e.g., "A1", "b2", "AA10").
    /// Returns None if the input is invalid.
    pub fn parse_a1(name: &str) -> Option<Position> {
        let caps = A1_REF.captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(Position::new(row, col))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Offset by (rows, cols), None on overflow.
    pub fn offset(self, rows: usize, cols: usize) -> Option<Position> {
        Some(Position::new(
            self.row.checked_add(rows)?,
            self.col.checked_add(cols)?,
        ))
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}

/// Fixed size of a grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Dimensions {
        Dimensions { rows, cols }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Inclusive rectangle of positions.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Rect {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Rect {
    /// Rectangle with `a` and `b` as opposite corners, in either order.
    pub fn spanning(a: Position, b: Position) -> Rect {
        Rect {
            top: a.row.min(b.row),
            left: a.col.min(b.col),
            bottom: a.row.max(b.row),
            right: a.col.max(b.col),
        }
    }

    /// Smallest rectangle containing every position, None if there are none.
    pub fn bounding(positions: impl IntoIterator<Item = Position>) -> Option<Rect> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Rect::spanning(first, first), |rect, pos| Rect {
            top: rect.top.min(pos.row),
            left: rect.left.min(pos.col),
            bottom: rect.bottom.max(pos.row),
            right: rect.right.max(pos.col),
        }))
    }

    pub fn top_left(&self) -> Position {
        Position::new(self.top, self.left)
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= self.top && pos.row <= self.bottom && pos.col >= self.left && pos.col <= self.right
    }

    /// Every position inside, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.top..=self.bottom)
            .flat_map(move |row| (self.left..=self.right).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.height() == 1 && self.width() == 1 {
            write!(f, "{}", self.top_left())
        } else {
            write!(
                f,
                "{}:{}",
                self.top_left(),
                Position::new(self.bottom, self.right)
            )
        }
    }
}
