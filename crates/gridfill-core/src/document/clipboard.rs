//! Copy, cut and paste through tab-separated text.

use super::Sheet;
use crate::error::{GridError, Result};
use crate::storage::{format_tsv, from_array, parse_tsv, to_array};

impl Sheet {
    /// The selection's bounding rectangle as TSV. None with nothing selected.
    pub fn copy_selection(&self) -> Option<String> {
        let selected = self.selection.selected();
        if selected.is_empty() {
            return None;
        }
        Some(format_tsv(&to_array(&self.translator, &self.store, selected)))
    }

    /// Copy, then clear the selected cells as one undoable step.
    pub fn cut_selection(&mut self) -> Result<Option<String>> {
        self.ensure_idle()?;
        let Some(text) = self.copy_selection() else {
            return Ok(None);
        };
        self.clear_selection()?;
        Ok(Some(text))
    }

    /// Paste TSV with its top-left at the last selected cell.
    ///
    /// Cells past the grid edge are dropped; the selection is left alone.
    /// Returns the number of cells changed.
    pub fn paste_text(&mut self, text: &str) -> Result<usize> {
        self.ensure_idle()?;
        let anchor = self.selection.last().ok_or(GridError::NoSelection)?;
        let anchor = self.require_position(anchor)?;
        let table = parse_tsv(text);
        if table.is_empty() {
            return Ok(0);
        }
        let writes = from_array(&self.translator, &table, anchor);
        let changed = self.write_batch(writes)?;
        tracing::debug!(at = %anchor, rows = table.len(), cells = changed, "paste");
        Ok(changed)
    }
}
