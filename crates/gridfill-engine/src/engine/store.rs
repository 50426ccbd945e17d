//! Sparse cell storage keyed by [`CellId`].

use std::collections::HashMap;

use super::cell::{Cell, CellValue};
use super::cell_id::CellId;

/// Sparse identity → cell map.
///
/// Only cells with content are stored: writing a vacant value (empty text or
/// zero) removes the entry instead. Cloning copies every value, which is what
/// history snapshots rely on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellStore {
    cells: HashMap<CellId, Cell>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn value(&self, id: &CellId) -> Option<&CellValue> {
        self.cells.get(id).map(|cell| &cell.value)
    }

    /// Stored value, or the empty placeholder for cells never written.
    pub fn value_or_empty(&self, id: &CellId) -> CellValue {
        self.value(id).cloned().unwrap_or_else(CellValue::empty)
    }

    /// Write a value, returning the previous one.
    /// Vacant values delete the entry.
    pub fn set(&mut self, id: &CellId, value: CellValue) -> Option<CellValue> {
        if value.is_vacant() {
            return self.remove(id);
        }
        match self.cells.get_mut(id) {
            Some(cell) => Some(std::mem::replace(&mut cell.value, value)),
            None => {
                self.cells.insert(id.clone(), Cell::new(id.clone(), value));
                None
            }
        }
    }

    pub fn remove(&mut self, id: &CellId) -> Option<CellValue> {
        self.cells.remove(id).map(|cell| cell.value)
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.cells.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }
}
