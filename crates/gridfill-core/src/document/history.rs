//! Snapshot-based undo/redo.

use gridfill_engine::engine::{CellId, CellStore};

/// Pre-mutation state: a deep copy of the cells and of the selected ids.
///
/// Layout and the active cell are not part of history.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub cells: CellStore,
    pub selected: Vec<CellId>,
}

/// Undo and redo stacks (LIFO).
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo entries to keep (0 = unbounded)
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Push a snapshot taken before a mutation and drop the redo branch.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.limit > 0 && self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the last snapshot, parking `current` on the redo stack.
    /// None (and `current` is dropped) when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gridfill_engine::engine::{CoordinateTranslator, Dimensions, Position};

    /// Snapshots told apart by how many cells they select.
    fn snap(n: usize) -> Snapshot {
        let translator = CoordinateTranslator::new(Dimensions::new(1, 8));
        Snapshot {
            cells: CellStore::new(),
            selected: (0..n)
                .map(|col| translator.id_at(Position::new(0, col)).unwrap().clone())
                .collect(),
        }
    }

    #[test]
    fn test_undo_redo_on_empty_is_none() {
        let mut history = History::new(0);
        assert!(history.undo(snap(0)).is_none());
        assert!(history.redo(snap(0)).is_none());
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_undo_then_redo_swaps_stacks() {
        let mut history = History::new(0);
        history.record(snap(1));
        let restored = history.undo(snap(2)).unwrap();
        assert_eq!(restored, snap(1));
        assert!(history.can_redo());

        let redone = history.redo(snap(1)).unwrap();
        assert_eq!(redone, snap(2));
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new(0);
        history.record(snap(1));
        history.undo(snap(2));
        history.record(snap(3));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(2);
        history.record(snap(1));
        history.record(snap(2));
        history.record(snap(3));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(snap(0)).unwrap(), snap(3));
        assert_eq!(history.undo(snap(0)).unwrap(), snap(2));
        assert!(history.undo(snap(0)).is_none());
    }
}
