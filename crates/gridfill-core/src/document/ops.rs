use gridfill_engine::engine::{CellId, CellKind, CellValue, Position, SortKey};

use super::Sheet;
use super::navigate::Direction;
use super::selection::range_ids;
use crate::error::{GridError, Result};

impl Sheet {
    // Edits

    /// Edit a cell from raw user input.
    ///
    /// Strict numeric input becomes a number, anything else text; `""` clears
    /// the cell. A cell holding a number only accepts numeric (or empty) input.
    pub fn set_content(&mut self, id: &CellId, input: &str) -> Result<()> {
        self.ensure_idle()?;
        self.require_position(id)?;

        let value = CellValue::from_input(input);
        if !input.is_empty()
            && value.kind() == CellKind::Text
            && self.store.get(id).is_some_and(|cell| cell.kind() == CellKind::Number)
        {
            return Err(GridError::NotNumeric {
                cell: id.clone(),
                input: input.to_string(),
            });
        }

        self.record();
        self.store.set(id, value);
        tracing::debug!(cell = %id, input, "set content");
        Ok(())
    }

    /// Write an already-typed value, replacing whatever kind the cell had.
    pub fn set_value(&mut self, id: &CellId, value: CellValue) -> Result<()> {
        self.ensure_idle()?;
        self.require_position(id)?;
        self.record();
        self.store.set(id, value);
        Ok(())
    }

    /// Write many cells as one undoable action.
    ///
    /// Only writes that change a cell are applied; if none do, nothing is
    /// recorded. Returns the number of cells changed.
    pub fn set_contents(&mut self, writes: Vec<(CellId, CellValue)>) -> Result<usize> {
        self.ensure_idle()?;
        self.write_batch(writes)
    }

    /// Clear every selected cell (Delete key) as one undoable action.
    pub fn clear_selection(&mut self) -> Result<usize> {
        self.ensure_idle()?;
        let writes = self
            .selection
            .selected()
            .iter()
            .map(|id| (id.clone(), CellValue::empty()))
            .collect();
        self.write_batch(writes)
    }

    pub(crate) fn write_batch(&mut self, writes: Vec<(CellId, CellValue)>) -> Result<usize> {
        for (id, _) in &writes {
            self.require_position(id)?;
        }
        let changed: Vec<(CellId, CellValue)> = writes
            .into_iter()
            .filter(|(id, value)| self.would_change(id, value))
            .collect();
        if changed.is_empty() {
            return Ok(0);
        }

        self.record();
        let count = changed.len();
        for (id, value) in changed {
            self.store.set(&id, value);
        }
        tracing::debug!(cells = count, "batch write");
        Ok(count)
    }

    pub(crate) fn would_change(&self, id: &CellId, value: &CellValue) -> bool {
        if value.is_vacant() {
            self.store.contains(id)
        } else {
            self.store.value(id) != Some(value)
        }
    }

    // History

    /// Restore the state before the last recorded action.
    /// Ok(false) when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        let current = self.snapshot();
        let Some(previous) = self.history.undo(current) else {
            return Ok(false);
        };
        self.restore(previous);
        self.selection.activate(None);
        tracing::debug!(depth = self.history.undo_depth(), "undo");
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        let current = self.snapshot();
        let Some(next) = self.history.redo(current) else {
            return Ok(false);
        };
        self.restore(next);
        self.selection.activate(None);
        tracing::debug!(depth = self.history.redo_depth(), "redo");
        Ok(true)
    }

    // Sorting

    /// Reorder rows by `key`. Column 0 restores creation order.
    ///
    /// Row order is not part of history; cancels any active edit.
    pub fn sort_by(&mut self, key: SortKey) -> Result<()> {
        self.ensure_idle()?;
        if key.column > self.dimensions().cols {
            return Err(GridError::InvalidSortColumn(key.column));
        }
        self.selection.activate(None);
        self.translator.sort_rows(&self.store, key);
        self.sort = Some(key);
        Ok(())
    }

    /// Header click: ascending on a new column, flip on the current one.
    pub fn toggle_sort(&mut self, column: usize) -> Result<SortKey> {
        let key = match self.sort {
            Some(current) if current.column == column => {
                SortKey::new(column, current.direction.flipped())
            }
            _ => SortKey::ascending(column),
        };
        self.sort_by(key)?;
        Ok(key)
    }

    // Selection

    pub fn select_single(&mut self, id: &CellId) -> Result<()> {
        self.ensure_idle()?;
        self.require_position(id)?;
        self.selection.select_single(id.clone());
        Ok(())
    }

    /// Ctrl-click.
    pub fn toggle_select(&mut self, id: &CellId) -> Result<()> {
        self.ensure_idle()?;
        self.require_position(id)?;
        self.selection.toggle(id.clone());
        Ok(())
    }

    /// Select the rectangle between `anchor` and `target`, recording the
    /// previous selection. Returns false if the selection was already that.
    pub fn select_range(&mut self, anchor: &CellId, target: &CellId) -> Result<bool> {
        self.select_range_with(anchor, target, true)
    }

    /// [`select_range`](Self::select_range) with control over recording, for
    /// drags that should only record their first change.
    pub fn select_range_with(
        &mut self,
        anchor: &CellId,
        target: &CellId,
        record: bool,
    ) -> Result<bool> {
        self.ensure_idle()?;
        let ids = self.range_between(anchor, target)?;
        if ids.as_slice() == self.selection.selected() {
            return Ok(false);
        }
        if record {
            self.record();
        }
        self.selection.replace(ids);
        Ok(true)
    }

    /// Ctrl+Shift-click: add the rectangle from the last selected cell to `target`.
    pub fn extend_range_from_last(&mut self, target: &CellId) -> Result<bool> {
        self.ensure_idle()?;
        let anchor = self.selection.last().cloned().ok_or(GridError::NoSelection)?;
        let ids = self.range_between(&anchor, target)?;
        if ids.iter().all(|id| self.selection.is_selected(id)) {
            return Ok(false);
        }
        self.record();
        self.selection.extend(ids);
        Ok(true)
    }

    /// Enter edit mode on a cell (making it the sole selection), or leave it.
    pub fn activate(&mut self, id: Option<&CellId>) -> Result<()> {
        self.ensure_idle()?;
        if let Some(id) = id {
            self.require_position(id)?;
        }
        self.selection.activate(id.cloned());
        Ok(())
    }

    fn range_between(&self, anchor: &CellId, target: &CellId) -> Result<Vec<CellId>> {
        range_ids(&self.translator, anchor, target).ok_or_else(|| {
            let missing = if self.position_of(anchor).is_none() {
                anchor
            } else {
                target
            };
            GridError::UnknownCell(missing.clone())
        })
    }

    // Navigation

    /// Move from `from`. Directional moves select exactly the target and leave
    /// edit mode; Enter leaves edit mode in place. Returns the selected cell.
    pub fn navigate_from(&mut self, from: &CellId, direction: Direction) -> Result<CellId> {
        self.ensure_idle()?;
        let pos = self.require_position(from)?;
        if direction == Direction::Enter {
            self.selection.activate(None);
            return Ok(from.clone());
        }

        let next = direction.step(pos, self.dimensions());
        let target = self.require_id(next)?;
        self.selection.select_single(target.clone());
        Ok(target)
    }

    /// Navigate from the active cell, or the last selected one.
    /// Ok(None) with nothing selected.
    pub fn navigate(&mut self, direction: Direction) -> Result<Option<CellId>> {
        let Some(from) = self.selection.cursor().cloned() else {
            return Ok(None);
        };
        self.navigate_from(&from, direction).map(Some)
    }

    // Layout

    /// Allowed while a fill is outstanding.
    pub fn set_column_width(&mut self, col: usize, width: u32) -> Result<u32> {
        if col >= self.dimensions().cols {
            return Err(GridError::OutOfBounds(Position::new(0, col)));
        }
        Ok(self.layout.set_width(col, width))
    }

    pub fn set_row_height(&mut self, row: usize, height: u32) -> Result<u32> {
        if row >= self.dimensions().rows {
            return Err(GridError::OutOfBounds(Position::new(row, 0)));
        }
        Ok(self.layout.set_height(row, height))
    }
}
