use gridfill_engine::engine::{
    CellId, CellStore, CellValue, CoordinateTranslator, Dimensions, Position, SortKey,
};

use super::fill::PendingFill;
use super::history::{History, Snapshot};
use super::layout::Layout;
use super::selection::Selection;
use crate::config::GridConfig;
use crate::error::{GridError, Result};

/// UI-agnostic state of one grid: cells, coordinates, selection, history, layout.
///
/// Every mutating operation runs synchronously. The only long-running operation,
/// autofill, is split into `begin_fill`/`complete_fill`; in between the sheet is
/// busy and rejects mutations with [`GridError::Busy`].
#[derive(Debug)]
pub struct Sheet {
    pub(crate) store: CellStore,
    pub(crate) translator: CoordinateTranslator,
    pub(crate) selection: Selection,
    pub(crate) history: History,
    pub(crate) layout: Layout,
    pub(crate) sort: Option<SortKey>,
    pub(crate) fill: Option<PendingFill>,
    pub(crate) next_ticket: u64,
}

impl Sheet {
    /// Create an empty `rows x cols` sheet with default settings.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_config(GridConfig::with_dimensions(rows, cols))
    }

    pub fn with_config(config: GridConfig) -> Result<Self> {
        let dims = config.dimensions();
        if dims.rows == 0 || dims.cols == 0 {
            return Err(GridError::InvalidDimensions {
                rows: dims.rows,
                cols: dims.cols,
            });
        }

        Ok(Sheet {
            store: CellStore::new(),
            translator: CoordinateTranslator::new(dims),
            selection: Selection::default(),
            history: History::new(config.history_limit),
            layout: Layout::new(config.layout),
            sort: None,
            fill: None,
            next_ticket: 1,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.translator.dimensions()
    }

    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn translator(&self) -> &CoordinateTranslator {
        &self.translator
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The sort currently applied to the rows, if any.
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort
    }

    /// True while an autofill is outstanding.
    pub fn is_busy(&self) -> bool {
        self.fill.is_some()
    }

    pub fn id_at(&self, pos: Position) -> Option<&CellId> {
        self.translator.id_at(pos)
    }

    pub fn position_of(&self, id: &CellId) -> Option<Position> {
        self.translator.position_of(id)
    }

    /// Value of a cell, or the empty placeholder.
    pub fn value(&self, id: &CellId) -> CellValue {
        self.store.value_or_empty(id)
    }

    /// Value rendered at a position, or the empty placeholder (also off-grid).
    pub fn value_at(&self, pos: Position) -> CellValue {
        self.id_at(pos)
            .map(|id| self.value(id))
            .unwrap_or_else(CellValue::empty)
    }

    /// Id at a position, as an error when off-grid.
    pub fn require_id(&self, pos: Position) -> Result<CellId> {
        self.id_at(pos).cloned().ok_or(GridError::OutOfBounds(pos))
    }

    pub(crate) fn require_position(&self, id: &CellId) -> Result<Position> {
        self.position_of(id)
            .ok_or_else(|| GridError::UnknownCell(id.clone()))
    }

    pub(crate) fn ensure_idle(&self) -> Result<()> {
        if self.is_busy() {
            return Err(GridError::Busy);
        }
        Ok(())
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.store.clone(),
            selected: self.selection.selected().to_vec(),
        }
    }

    /// Push the pre-mutation state. Call before applying a change.
    pub(crate) fn record(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.store = snapshot.cells;
        self.selection.replace(snapshot.selected);
    }
}
