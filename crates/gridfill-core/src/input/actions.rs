//! Action types and dispatch logic.
//!
//! A front end turns raw pointer and keyboard events into [`Action`]s and
//! feeds them to [`apply_action`] together with the sheet and the
//! [`PointerSession`] it owns. Modifier keys are tracked in the session from
//! key down/up events, so pointer actions carry only the cell they hit.

use gridfill_engine::engine::CellId;

use crate::document::{Direction, PointerSession, Sheet};
use crate::error::Result;

/// Keys the grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
    Escape,
    Delete,
    Backspace,
    Ctrl,
    Shift,
    Char(char),
}

/// All user operations on a sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Press on a cell: select, ctrl-toggle, shift-range or ctrl+shift-extend.
    PointerDown(CellId),

    /// Pointer moved onto a cell; extends the drag range if one is active.
    PointerEnter(CellId),

    /// Window-level release; ends any drag.
    PointerUp,

    /// Enter edit mode on a cell.
    Activate(CellId),

    /// Commit text into the active cell.
    Edit(String),

    KeyDown(Key),

    KeyUp(Key),

    /// Click on a column header (0 = row-index column).
    HeaderClick(usize),

    Copy,

    Cut,

    /// Paste clipboard text at the last selected cell.
    Paste(String),

    /// Clear selected cells.
    Clear,

    Undo,

    Redo,

    /// Release the pointer session.
    Teardown,
}

/// What an action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// Dropped: the sheet was busy, or the action meant nothing here.
    Ignored,
    /// Text for the system clipboard (copy/cut).
    Clipboard(String),
}

/// Apply an action to the sheet and pointer session.
///
/// While a fill is outstanding every action that could mutate the sheet is
/// dropped with [`ActionOutcome::Ignored`]; releases, copies and teardown
/// still go through.
pub fn apply_action(
    sheet: &mut Sheet,
    session: &mut PointerSession,
    action: Action,
) -> Result<ActionOutcome> {
    if sheet.is_busy() && !passes_while_busy(&action) {
        tracing::trace!(?action, "dropped while busy");
        return Ok(ActionOutcome::Ignored);
    }

    match action {
        Action::PointerDown(id) => pointer_down(sheet, session, id),

        Action::PointerEnter(id) => {
            if !session.is_dragging() {
                return Ok(ActionOutcome::Ignored);
            }
            let Some(anchor) = session.anchor().cloned() else {
                return Ok(ActionOutcome::Ignored);
            };
            let record = !session.drag_recorded();
            if sheet.select_range_with(&anchor, &id, record)? && record {
                session.mark_drag_recorded();
            }
            Ok(ActionOutcome::Done)
        }

        Action::PointerUp => {
            session.end_drag();
            Ok(ActionOutcome::Done)
        }

        Action::Activate(id) => {
            sheet.activate(Some(&id))?;
            Ok(ActionOutcome::Done)
        }

        Action::Edit(input) => {
            let Some(id) = sheet.selection().active().cloned() else {
                return Ok(ActionOutcome::Ignored);
            };
            sheet.set_content(&id, &input)?;
            Ok(ActionOutcome::Done)
        }

        Action::KeyDown(key) => key_down(sheet, session, key),

        Action::KeyUp(key) => {
            match key {
                Key::Ctrl => session.set_ctrl(false),
                Key::Shift => session.set_shift(false),
                _ => return Ok(ActionOutcome::Ignored),
            }
            Ok(ActionOutcome::Done)
        }

        Action::HeaderClick(column) => {
            sheet.toggle_sort(column)?;
            Ok(ActionOutcome::Done)
        }

        Action::Copy => Ok(sheet
            .copy_selection()
            .map_or(ActionOutcome::Ignored, ActionOutcome::Clipboard)),

        Action::Cut => Ok(sheet
            .cut_selection()?
            .map_or(ActionOutcome::Ignored, ActionOutcome::Clipboard)),

        Action::Paste(text) => {
            if sheet.selection().is_empty() {
                return Ok(ActionOutcome::Ignored);
            }
            sheet.paste_text(&text)?;
            Ok(ActionOutcome::Done)
        }

        Action::Clear => {
            sheet.clear_selection()?;
            Ok(ActionOutcome::Done)
        }

        Action::Undo => step_history(sheet, session, false),

        Action::Redo => step_history(sheet, session, true),

        Action::Teardown => {
            session.teardown();
            Ok(ActionOutcome::Done)
        }
    }
}

fn passes_while_busy(action: &Action) -> bool {
    matches!(
        action,
        Action::PointerUp | Action::KeyUp(_) | Action::Copy | Action::Teardown
    )
}

/// Undo or redo. A drag still in progress records its next range change again.
fn step_history(
    sheet: &mut Sheet,
    session: &mut PointerSession,
    redo: bool,
) -> Result<ActionOutcome> {
    let applied = if redo { sheet.redo()? } else { sheet.undo()? };
    if applied {
        session.forget_drag_record();
    }
    Ok(done_if(applied))
}

fn done_if(applied: bool) -> ActionOutcome {
    if applied {
        ActionOutcome::Done
    } else {
        ActionOutcome::Ignored
    }
}

fn pointer_down(
    sheet: &mut Sheet,
    session: &mut PointerSession,
    id: CellId,
) -> Result<ActionOutcome> {
    let mods = session.modifiers();
    match (mods.ctrl, mods.shift) {
        (true, true) => {
            sheet.extend_range_from_last(&id)?;
        }
        (false, true) => {
            let anchor = session
                .anchor()
                .or_else(|| sheet.selection().first())
                .cloned()
                .unwrap_or_else(|| id.clone());
            sheet.select_range(&anchor, &id)?;
        }
        (true, false) => {
            sheet.toggle_select(&id)?;
        }
        (false, false) => {
            sheet.select_single(&id)?;
            session.begin_drag(id);
        }
    }
    Ok(ActionOutcome::Done)
}

fn key_down(sheet: &mut Sheet, session: &mut PointerSession, key: Key) -> Result<ActionOutcome> {
    let mods = session.modifiers();
    let direction = match key {
        Key::Ctrl => {
            session.set_ctrl(true);
            return Ok(ActionOutcome::Done);
        }
        Key::Shift => {
            session.set_shift(true);
            return Ok(ActionOutcome::Done);
        }
        Key::Char(c) if mods.ctrl && c.eq_ignore_ascii_case(&'z') => {
            return step_history(sheet, session, mods.shift);
        }
        Key::Char(c) if mods.ctrl && c.eq_ignore_ascii_case(&'y') => {
            return step_history(sheet, session, true);
        }
        Key::Escape => {
            if sheet.selection().active().is_none() {
                return Ok(ActionOutcome::Ignored);
            }
            sheet.activate(None)?;
            return Ok(ActionOutcome::Done);
        }
        Key::Delete | Key::Backspace => {
            // While editing these keys belong to the text input.
            if sheet.selection().active().is_some() {
                return Ok(ActionOutcome::Ignored);
            }
            sheet.clear_selection()?;
            return Ok(ActionOutcome::Done);
        }
        Key::Enter => {
            if sheet.selection().active().is_none() {
                let Some(cursor) = sheet.selection().cursor().cloned() else {
                    return Ok(ActionOutcome::Ignored);
                };
                sheet.activate(Some(&cursor))?;
                return Ok(ActionOutcome::Done);
            }
            Direction::Enter
        }
        Key::Up => Direction::Up,
        Key::Down => Direction::Down,
        Key::Left => Direction::Left,
        Key::Right => Direction::Right,
        Key::Tab if mods.shift => Direction::TabBackward,
        Key::Tab => Direction::TabForward,
        Key::Char(_) => return Ok(ActionOutcome::Ignored),
    };

    let editing = sheet.selection().active().is_some();
    let Some(target) = sheet.navigate(direction)? else {
        return Ok(ActionOutcome::Ignored);
    };
    // Moving out of an edit keeps editing at the new cell.
    if editing && direction != Direction::Enter {
        sheet.activate(Some(&target))?;
    }
    session.set_anchor(target);
    Ok(ActionOutcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfill_engine::engine::{CellValue, Position};
    use pretty_assertions::assert_eq;

    fn setup(rows: usize, cols: usize) -> (Sheet, PointerSession) {
        (Sheet::new(rows, cols).unwrap(), PointerSession::new())
    }

    fn id(sheet: &Sheet, row: usize, col: usize) -> CellId {
        sheet.require_id(Position::new(row, col)).unwrap()
    }

    fn apply(sheet: &mut Sheet, session: &mut PointerSession, actions: Vec<Action>) {
        for action in actions {
            apply_action(sheet, session, action).unwrap();
        }
    }

    #[test]
    fn test_drag_selects_range_and_records_once() {
        let (mut sheet, mut session) = setup(4, 4);
        let a1 = id(&sheet, 0, 0);
        let b2 = id(&sheet, 1, 1);
        let c3 = id(&sheet, 2, 2);
        apply(
            &mut sheet,
            &mut session,
            vec![
                Action::PointerDown(a1.clone()),
                Action::PointerEnter(b2),
                Action::PointerEnter(c3.clone()),
                Action::PointerEnter(c3),
                Action::PointerUp,
            ],
        );
        assert_eq!(sheet.selection().selected().len(), 9);
        assert_eq!(sheet.history().undo_depth(), 1);
        assert!(!session.is_dragging());

        sheet.undo().unwrap();
        assert_eq!(sheet.selection().selected(), &[a1]);
    }

    #[test]
    fn test_undo_mid_drag_records_next_range() {
        let (mut sheet, mut session) = setup(4, 4);
        let a1 = id(&sheet, 0, 0);
        let b2 = id(&sheet, 1, 1);
        let c3 = id(&sheet, 2, 2);
        apply(
            &mut sheet,
            &mut session,
            vec![
                Action::PointerDown(a1.clone()),
                Action::PointerEnter(b2),
                Action::Undo,
                Action::PointerEnter(c3),
                Action::PointerUp,
            ],
        );
        assert_eq!(sheet.selection().selected().len(), 9);
        assert_eq!(sheet.history().undo_depth(), 1);
        assert_eq!(sheet.history().redo_depth(), 0);

        sheet.undo().unwrap();
        assert_eq!(sheet.selection().selected(), &[a1]);
    }

    #[test]
    fn test_redo_key_mid_drag_records_next_range() {
        let (mut sheet, mut session) = setup(4, 4);
        let a1 = id(&sheet, 0, 0);
        let b2 = id(&sheet, 1, 1);
        let d4 = id(&sheet, 3, 3);
        apply(
            &mut sheet,
            &mut session,
            vec![
                Action::PointerDown(a1),
                Action::PointerEnter(b2),
                Action::KeyDown(Key::Ctrl),
                Action::KeyDown(Key::Char('z')),
                Action::KeyDown(Key::Char('y')),
                Action::KeyUp(Key::Ctrl),
                Action::PointerEnter(d4),
                Action::PointerUp,
            ],
        );
        assert_eq!(sheet.selection().selected().len(), 16);
        assert_eq!(sheet.history().undo_depth(), 2);
        assert_eq!(sheet.history().redo_depth(), 0);
    }

    #[test]
    fn test_shift_click_anchors_at_keyboard_cursor() {
        let (mut sheet, mut session) = setup(5, 3);
        let a1 = id(&sheet, 0, 0);
        let b4 = id(&sheet, 3, 1);
        apply(
            &mut sheet,
            &mut session,
            vec![
                Action::PointerDown(a1),
                Action::PointerUp,
                Action::KeyDown(Key::Down),
                Action::KeyDown(Key::Down),
                Action::KeyDown(Key::Shift),
                Action::PointerDown(b4.clone()),
                Action::KeyUp(Key::Shift),
            ],
        );
        assert_eq!(
            sheet.selection().selected(),
            &[id(&sheet, 2, 0), id(&sheet, 2, 1), id(&sheet, 3, 0), b4]
        );
    }

    #[test]
    fn test_enter_without_drag_is_ignored() {
        let (mut sheet, mut session) = setup(2, 2);
        let b2 = id(&sheet, 1, 1);
        let outcome = apply_action(&mut sheet, &mut session, Action::PointerEnter(b2)).unwrap();
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert!(sheet.selection().is_empty());
    }

    #[test]
    fn test_modifier_clicks() {
        let (mut sheet, mut session) = setup(3, 3);
        let a1 = id(&sheet, 0, 0);
        let c1 = id(&sheet, 0, 2);
        let c3 = id(&sheet, 2, 2);
        let b2 = id(&sheet, 1, 1);

        apply(
            &mut sheet,
            &mut session,
            vec![
                Action::PointerDown(a1.clone()),
                Action::PointerUp,
                Action::KeyDown(Key::Ctrl),
                Action::PointerDown(c1.clone()),
                Action::KeyDown(Key::Shift),
                Action::PointerDown(c3.clone()),
            ],
        );
        // a1, then c1..c3 extended from the last selected cell
        assert_eq!(sheet.selection().selected().len(), 4);
        assert_eq!(sheet.selection().selected()[0], a1);

        apply(
            &mut sheet,
            &mut session,
            vec![Action::KeyUp(Key::Ctrl), Action::PointerDown(b2)],
        );
        // plain shift: range from the drag anchor (a1)
        assert_eq!(sheet.selection().selected().len(), 4);
        assert!(sheet.selection().is_selected(&a1));
        assert!(!sheet.selection().is_selected(&c1));
    }

    #[test]
    fn test_edit_and_navigate_keeps_editing() {
        let (mut sheet, mut session) = setup(2, 3);
        let a1 = id(&sheet, 0, 0);
        apply(
            &mut sheet,
            &mut session,
            vec![
                Action::Activate(a1.clone()),
                Action::Edit("Mon".to_string()),
                Action::KeyDown(Key::Tab),
            ],
        );
        assert_eq!(sheet.value(&a1), CellValue::text("Mon"));
        let b1 = id(&sheet, 0, 1);
        assert_eq!(sheet.selection().active(), Some(&b1));

        apply(&mut sheet, &mut session, vec![Action::KeyDown(Key::Enter)]);
        assert!(sheet.selection().active().is_none());
        assert_eq!(sheet.selection().selected(), &[b1.clone()]);

        apply(&mut sheet, &mut session, vec![Action::KeyDown(Key::Enter)]);
        assert_eq!(sheet.selection().active(), Some(&b1));
    }

    #[test]
    fn test_shift_tab_moves_backward() {
        let (mut sheet, mut session) = setup(2, 2);
        let a2 = id(&sheet, 1, 0);
        apply(
            &mut sheet,
            &mut session,
            vec![
                Action::PointerDown(a2),
                Action::KeyDown(Key::Shift),
                Action::KeyDown(Key::Tab),
            ],
        );
        assert_eq!(sheet.selection().selected(), &[id(&sheet, 0, 1)]);
    }

    #[test]
    fn test_arrow_without_edit_moves_selection() {
        let (mut sheet, mut session) = setup(3, 3);
        let a1 = id(&sheet, 0, 0);
        apply(
            &mut sheet,
            &mut session,
            vec![Action::PointerDown(a1), Action::KeyDown(Key::Up)],
        );
        assert_eq!(sheet.selection().selected(), &[id(&sheet, 2, 0)]);
        assert!(sheet.selection().active().is_none());
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let (mut sheet, mut session) = setup(1, 1);
        let a1 = id(&sheet, 0, 0);
        sheet.set_content(&a1, "x").unwrap();

        apply(
            &mut sheet,
            &mut session,
            vec![Action::KeyDown(Key::Ctrl), Action::KeyDown(Key::Char('z'))],
        );
        assert_eq!(sheet.value(&a1), CellValue::empty());

        apply(
            &mut sheet,
            &mut session,
            vec![Action::KeyDown(Key::Shift), Action::KeyDown(Key::Char('Z'))],
        );
        assert_eq!(sheet.value(&a1), CellValue::text("x"));

        let outcome =
            apply_action(&mut sheet, &mut session, Action::KeyDown(Key::Char('y'))).unwrap();
        assert_eq!(outcome, ActionOutcome::Ignored);
    }

    #[test]
    fn test_delete_clears_unless_editing() {
        let (mut sheet, mut session) = setup(1, 2);
        let a1 = id(&sheet, 0, 0);
        sheet.set_content(&a1, "x").unwrap();
        sheet.activate(Some(&a1)).unwrap();

        let outcome =
            apply_action(&mut sheet, &mut session, Action::KeyDown(Key::Delete)).unwrap();
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert_eq!(sheet.value(&a1), CellValue::text("x"));

        apply(
            &mut sheet,
            &mut session,
            vec![Action::KeyDown(Key::Escape), Action::KeyDown(Key::Backspace)],
        );
        assert_eq!(sheet.value(&a1), CellValue::empty());
    }

    #[test]
    fn test_copy_cut_paste_actions() {
        let (mut sheet, mut session) = setup(2, 2);
        let a1 = id(&sheet, 0, 0);
        let b2 = id(&sheet, 1, 1);
        sheet.set_content(&a1, "7").unwrap();

        assert_eq!(
            apply_action(&mut sheet, &mut session, Action::Copy).unwrap(),
            ActionOutcome::Ignored
        );
        apply(&mut sheet, &mut session, vec![Action::PointerDown(a1.clone())]);
        assert_eq!(
            apply_action(&mut sheet, &mut session, Action::Cut).unwrap(),
            ActionOutcome::Clipboard("7".to_string())
        );
        apply(
            &mut sheet,
            &mut session,
            vec![Action::PointerDown(b2.clone()), Action::Paste("7".to_string())],
        );
        assert_eq!(sheet.value(&b2), CellValue::Number(7.0));
        assert_eq!(sheet.value(&a1), CellValue::empty());
    }

    #[test]
    fn test_header_click_sorts() {
        let (mut sheet, mut session) = setup(2, 1);
        let first = id(&sheet, 0, 0);
        let second = id(&sheet, 1, 0);
        sheet.set_content(&first, "b").unwrap();
        sheet.set_content(&second, "a").unwrap();
        apply(&mut sheet, &mut session, vec![Action::HeaderClick(1)]);
        assert_eq!(sheet.position_of(&second), Some(Position::new(0, 0)));
        apply(&mut sheet, &mut session, vec![Action::HeaderClick(1)]);
        assert_eq!(sheet.position_of(&second), Some(Position::new(1, 0)));
    }

    #[test]
    fn test_busy_sheet_drops_input() {
        let (mut sheet, mut session) = setup(2, 2);
        let a1 = id(&sheet, 0, 0);
        let b2 = id(&sheet, 1, 1);
        apply(&mut sheet, &mut session, vec![Action::PointerDown(a1.clone())]);
        let _ticket = sheet.begin_fill().unwrap();

        for action in [
            Action::PointerDown(b2.clone()),
            Action::KeyDown(Key::Down),
            Action::Edit("x".to_string()),
            Action::Undo,
            Action::HeaderClick(1),
        ] {
            assert_eq!(
                apply_action(&mut sheet, &mut session, action).unwrap(),
                ActionOutcome::Ignored
            );
        }
        assert_eq!(sheet.selection().selected(), &[a1]);
        assert_eq!(
            apply_action(&mut sheet, &mut session, Action::PointerUp).unwrap(),
            ActionOutcome::Done
        );
    }

    #[test]
    fn test_teardown_releases_session() {
        let (mut sheet, mut session) = setup(2, 2);
        let a1 = id(&sheet, 0, 0);
        apply(
            &mut sheet,
            &mut session,
            vec![
                Action::KeyDown(Key::Shift),
                Action::PointerDown(a1),
                Action::Teardown,
            ],
        );
        assert!(!session.modifiers().shift);
        assert!(session.anchor().is_none());
    }
}
