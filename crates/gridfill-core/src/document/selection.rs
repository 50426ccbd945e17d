//! Selection model and pointer session.
//!
//! [`Selection`] is the ordered, duplicate-free list of selected ids plus the
//! single active (editing) cell. [`PointerSession`] holds the transient drag
//! and modifier-key state that input handlers thread through a gesture.

use gridfill_engine::engine::{CellId, CoordinateTranslator, Rect};

/// Selected cells plus the cell being edited, if any.
///
/// An active cell is always the sole selected cell: editing and
/// multi-selection are mutually exclusive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    selected: Vec<CellId>,
    active: Option<CellId>,
}

impl Selection {
    pub fn selected(&self) -> &[CellId] {
        &self.selected
    }

    pub fn active(&self) -> Option<&CellId> {
        self.active.as_ref()
    }

    pub fn is_selected(&self, id: &CellId) -> bool {
        self.selected.contains(id)
    }

    pub fn is_active(&self, id: &CellId) -> bool {
        self.active.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn first(&self) -> Option<&CellId> {
        self.selected.first()
    }

    pub fn last(&self) -> Option<&CellId> {
        self.selected.last()
    }

    /// Where keyboard navigation starts: the active cell, else the last selected.
    pub fn cursor(&self) -> Option<&CellId> {
        self.active.as_ref().or_else(|| self.selected.last())
    }

    pub fn select_single(&mut self, id: CellId) {
        self.selected = vec![id];
        self.active = None;
    }

    /// Ctrl-click: append `id` unless it is already selected.
    pub fn toggle(&mut self, id: CellId) {
        if self.selected.len() == 1 && self.selected[0] == id {
            return;
        }
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
        if self.selected.len() > 1 {
            self.active = None;
        }
    }

    /// Replace the selection, dropping duplicates but keeping first-seen order.
    pub fn replace(&mut self, ids: Vec<CellId>) {
        self.selected.clear();
        self.extend(ids);
        if self.active.as_ref().is_some_and(|a| !self.is_sole(a)) {
            self.active = None;
        }
    }

    /// Append ids not yet selected.
    pub fn extend(&mut self, ids: Vec<CellId>) {
        for id in ids {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
        if self.selected.len() > 1 {
            self.active = None;
        }
    }

    /// Enter edit mode on `id` (which becomes the only selected cell), or leave it.
    pub fn activate(&mut self, id: Option<CellId>) {
        match id {
            Some(id) => {
                self.selected = vec![id.clone()];
                self.active = Some(id);
            }
            None => self.active = None,
        }
    }

    fn is_sole(&self, id: &CellId) -> bool {
        self.selected.len() == 1 && &self.selected[0] == id
    }
}

/// Ids inside the rectangle spanned by `anchor` and `target`, row-major.
/// Inclusive on both ends and symmetric in its arguments.
pub fn range_ids(
    translator: &CoordinateTranslator,
    anchor: &CellId,
    target: &CellId,
) -> Option<Vec<CellId>> {
    let a = translator.position_of(anchor)?;
    let b = translator.position_of(target)?;
    Some(translator.ids_in(Rect::spanning(a, b)))
}

/// Modifier keys currently held.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// Transient pointer/keyboard state for one interactive session.
///
/// Owned by the input layer and passed by reference into handlers; dropping or
/// calling [`teardown`](PointerSession::teardown) releases everything.
#[derive(Clone, Debug, Default)]
pub struct PointerSession {
    modifiers: Modifiers,
    anchor: Option<CellId>,
    dragging: bool,
    /// Whether the current drag has already pushed a history snapshot.
    drag_recorded: bool,
}

impl PointerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn set_ctrl(&mut self, held: bool) {
        self.modifiers.ctrl = held;
    }

    pub fn set_shift(&mut self, held: bool) {
        self.modifiers.shift = held;
    }

    /// Anchor for shift-click ranges: the last plain click, drag start or
    /// keyboard move.
    pub fn anchor(&self) -> Option<&CellId> {
        self.anchor.as_ref()
    }

    pub fn set_anchor(&mut self, anchor: CellId) {
        self.anchor = Some(anchor);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn begin_drag(&mut self, anchor: CellId) {
        self.anchor = Some(anchor);
        self.dragging = true;
        self.drag_recorded = false;
    }

    /// Window-level release: ends the drag wherever the pointer is.
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.drag_recorded = false;
    }

    pub(crate) fn drag_recorded(&self) -> bool {
        self.drag_recorded
    }

    pub(crate) fn mark_drag_recorded(&mut self) {
        self.drag_recorded = true;
    }

    /// The snapshot the drag pushed is no longer on top of the undo stack.
    pub(crate) fn forget_drag_record(&mut self) {
        self.drag_recorded = false;
    }

    /// Forget all held keys and drag state.
    pub fn teardown(&mut self) {
        *self = Self::default();
    }
}
