//! Identity ↔ position index.
//!
//! Rows are stored in render order; each row carries the ids of its cells by
//! column plus the row's origin index. Sorting permutes rows and then the
//! reverse index is rebuilt, so ids never change while positions do.

use std::collections::HashMap;

use super::cell_id::CellId;
use super::position::{Dimensions, Position, Rect};

/// One rendered row: origin index plus the ids of its cells, by column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    origin: usize,
    ids: Vec<CellId>,
}

impl Row {
    /// Row index at grid creation.
    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn ids(&self) -> &[CellId] {
        &self.ids
    }

    pub fn id_at(&self, col: usize) -> Option<&CellId> {
        self.ids.get(col)
    }
}

/// Bidirectional mapping between [`CellId`] and current [`Position`].
#[derive(Clone, Debug)]
pub struct CoordinateTranslator {
    dims: Dimensions,
    rows: Vec<Row>,
    index: HashMap<CellId, Position>,
}

impl CoordinateTranslator {
    /// Mint one id per position and index them.
    pub fn new(dims: Dimensions) -> Self {
        let rows = (0..dims.rows)
            .map(|row| Row {
                origin: row,
                ids: (0..dims.cols)
                    .map(|col| CellId::at_origin(Position::new(row, col)))
                    .collect(),
            })
            .collect();
        let mut translator = CoordinateTranslator {
            dims,
            rows,
            index: HashMap::with_capacity(dims.cell_count()),
        };
        translator.rebuild();
        translator
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn position_of(&self, id: &CellId) -> Option<Position> {
        self.index.get(id).copied()
    }

    pub fn id_at(&self, pos: Position) -> Option<&CellId> {
        self.rows.get(pos.row)?.id_at(pos.col)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Origin indices of the rows in render order.
    pub fn row_order(&self) -> Vec<usize> {
        self.rows.iter().map(Row::origin).collect()
    }

    /// Ids inside `rect`, row-major. Positions outside the grid are skipped.
    pub fn ids_in(&self, rect: Rect) -> Vec<CellId> {
        rect.positions()
            .filter_map(|pos| self.id_at(pos).cloned())
            .collect()
    }

    /// Replace the row order. `rows` must be a permutation of the current rows.
    pub(crate) fn reorder(&mut self, rows: Vec<Row>) {
        debug_assert_eq!(rows.len(), self.rows.len());
        self.rows = rows;
        self.rebuild();
    }

    pub(crate) fn take_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }

    fn rebuild(&mut self) {
        self.index.clear();
        for (row, entry) in self.rows.iter().enumerate() {
            for (col, id) in entry.ids.iter().enumerate() {
                self.index.insert(id.clone(), Position::new(row, col));
            }
        }
        tracing::trace!(cells = self.index.len(), "rebuilt coordinate index");
    }
}
