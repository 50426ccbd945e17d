//! Keyboard navigation with wraparound.

use gridfill_engine::engine::{Dimensions, Position};

/// Keyboard movement through the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Next column, continuing on the next row after the last column.
    TabForward,
    /// Previous column, continuing on the previous row before column 0.
    TabBackward,
    /// Commit the edit in place.
    Enter,
}

impl Direction {
    /// Target of a move from `pos`. Every move wraps at the grid edges.
    ///
    /// # Panics
    ///
    /// If the result falls outside `dims`, which wrapping rules out for any
    /// `pos` inside a non-empty grid.
    pub fn step(self, pos: Position, dims: Dimensions) -> Position {
        let Dimensions { rows, cols } = dims;
        let prev_row = |row: usize| if row == 0 { rows - 1 } else { row - 1 };
        let prev_col = |col: usize| if col == 0 { cols - 1 } else { col - 1 };

        let next = match self {
            Direction::Up => Position::new(prev_row(pos.row), pos.col),
            Direction::Down => Position::new((pos.row + 1) % rows, pos.col),
            Direction::Left => Position::new(pos.row, prev_col(pos.col)),
            Direction::Right => Position::new(pos.row, (pos.col + 1) % cols),
            Direction::TabForward => {
                let col = (pos.col + 1) % cols;
                let row = if col == 0 { (pos.row + 1) % rows } else { pos.row };
                Position::new(row, col)
            }
            Direction::TabBackward => {
                let row = if pos.col == 0 { prev_row(pos.row) } else { pos.row };
                Position::new(row, prev_col(pos.col))
            }
            Direction::Enter => pos,
        };

        assert!(
            dims.contains(next),
            "navigation from {pos} resolved to {next}, outside {rows}x{cols}"
        );
        next
    }
}
