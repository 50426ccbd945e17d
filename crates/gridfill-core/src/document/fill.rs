//! Autofill: request/response contract and the busy-state protocol.
//!
//! A fill is split in two so the completion can run elsewhere (a worker
//! thread, a remote service):
//!
//! 1. [`Sheet::begin_fill`] serializes the selection into a [`FillRequest`],
//!    marks the sheet busy and hands back a [`FillTicket`].
//! 2. [`Sheet::complete_fill`] takes the ticket and the gateway's outcome and
//!    either applies the response as one undoable step or aborts. Either way the
//!    sheet is idle again afterwards.
//!
//! [`Sheet::autofill`] runs both halves against a blocking [`AutofillGateway`].

use gridfill_engine::engine::{CellId, CellValue};
use serde::{Deserialize, Serialize};

use super::Sheet;
use crate::error::{FillError, GridError, Result};
use crate::storage::{Table, from_array, to_array};

/// Body sent to a fill backend: the selection's bounding rectangle, gaps as `""`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillRequest {
    pub content: Table,
}

impl FillRequest {
    /// The request with every value rendered as text, for backends that only
    /// accept string cells.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.content
            .iter()
            .map(|row| row.iter().map(CellValue::to_input_string).collect())
            .collect()
    }

    pub fn to_json(&self) -> std::result::Result<String, FillError> {
        serde_json::to_string(self).map_err(|e| FillError::Malformed(e.to_string()))
    }
}

/// A completed table from a fill backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FillResponse {
    pub content: Table,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResponseBody {
    Wrapped { content: Table },
    Bare(Table),
}

impl FillResponse {
    pub fn new(content: Table) -> Self {
        Self { content }
    }

    /// Parse either `{"content": [[...]]}` or a bare `[[...]]`.
    pub fn from_json(text: &str) -> std::result::Result<Self, FillError> {
        serde_json::from_str(text).map_err(|e| FillError::Malformed(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for FillResponse {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let content = match ResponseBody::deserialize(deserializer)? {
            ResponseBody::Wrapped { content } | ResponseBody::Bare(content) => content,
        };
        Ok(Self { content })
    }
}

/// Check that `response` is at least as tall as `request` and each of its rows
/// at least as wide as the matching request row.
pub fn check_covers(
    request: &[Vec<CellValue>],
    response: &[Vec<CellValue>],
) -> std::result::Result<(), FillError> {
    let want_rows = request.len();
    let want_cols = request.iter().map(Vec::len).max().unwrap_or(0);
    let got_cols = response
        .iter()
        .take(want_rows.max(1))
        .map(Vec::len)
        .min()
        .unwrap_or(0);

    let narrow = request
        .iter()
        .zip(response)
        .any(|(want, got)| got.len() < want.len());
    if response.len() < want_rows || narrow {
        return Err(FillError::Shape {
            want_rows,
            want_cols,
            got_rows: response.len(),
            got_cols,
        });
    }
    Ok(())
}

/// Completes a fill request. Implementations may block.
pub trait AutofillGateway: Send + Sync {
    fn complete(&self, request: &FillRequest) -> std::result::Result<FillResponse, FillError>;
}

impl<F> AutofillGateway for F
where
    F: Fn(&FillRequest) -> std::result::Result<FillResponse, FillError> + Send + Sync,
{
    fn complete(&self, request: &FillRequest) -> std::result::Result<FillResponse, FillError> {
        self(request)
    }
}

/// Handle for an outstanding fill.
#[derive(Clone, Debug, PartialEq)]
pub struct FillTicket {
    id: u64,
    anchor: CellId,
    request: FillRequest,
}

impl FillTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The first selected cell when the fill began; the response lands here.
    pub fn anchor(&self) -> &CellId {
        &self.anchor
    }

    pub fn request(&self) -> &FillRequest {
        &self.request
    }
}

#[derive(Clone, Debug)]
pub(crate) struct PendingFill {
    ticket: u64,
    /// Cell being edited when the fill began; restored if the fill fails.
    active: Option<CellId>,
}

impl Sheet {
    /// Serialize the selection and enter the busy state.
    pub fn begin_fill(&mut self) -> Result<FillTicket> {
        self.ensure_idle()?;
        let selected = self.selection.selected();
        let anchor = selected.first().cloned().ok_or(GridError::NoSelection)?;
        let content = to_array(&self.translator, &self.store, selected);

        let id = self.next_ticket;
        self.next_ticket += 1;
        let active = self.selection.active().cloned();
        self.selection.activate(None);
        self.fill = Some(PendingFill { ticket: id, active });
        tracing::debug!(
            ticket = id,
            rows = content.len(),
            cols = content.first().map_or(0, Vec::len),
            "fill started"
        );

        Ok(FillTicket {
            id,
            anchor,
            request: FillRequest { content },
        })
    }

    /// Apply (or abort) the fill for `ticket` and leave the busy state.
    ///
    /// On success writes only the cells whose value changes, as a single
    /// undoable step, and selects every cell the response covered. Returns the
    /// number of cells changed. On failure the sheet is left as it was before
    /// [`begin_fill`](Self::begin_fill) and the error is returned.
    pub fn complete_fill(
        &mut self,
        ticket: &FillTicket,
        outcome: std::result::Result<FillResponse, FillError>,
    ) -> Result<usize> {
        let pending = self.fill.as_ref().ok_or(GridError::NoFillInProgress)?;
        if pending.ticket != ticket.id {
            return Err(GridError::StaleTicket(ticket.id));
        }
        let active = self.fill.take().and_then(|pending| pending.active);

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(ticket = ticket.id, error = %err, "fill failed");
                self.selection.activate(active);
                return Err(err.into());
            }
        };
        if let Err(err) = check_covers(&ticket.request.content, &response.content) {
            tracing::warn!(ticket = ticket.id, error = %err, "fill response rejected");
            self.selection.activate(active);
            return Err(err.into());
        }

        let anchor = self.require_position(&ticket.anchor)?;
        let writes = from_array(&self.translator, &response.content, anchor);
        let filled: Vec<CellId> = writes.iter().map(|(id, _)| id.clone()).collect();
        let changed: Vec<(CellId, CellValue)> = writes
            .into_iter()
            .filter(|(id, value)| self.would_change(id, value))
            .collect();

        if !changed.is_empty() || filled.as_slice() != self.selection.selected() {
            self.record();
        }
        let count = changed.len();
        for (id, value) in changed {
            self.store.set(&id, value);
        }
        self.selection.replace(filled);
        tracing::debug!(ticket = ticket.id, cells = count, "fill applied");
        Ok(count)
    }

    /// Abandon the outstanding fill without touching the grid.
    pub fn cancel_fill(&mut self) -> Result<()> {
        let pending = self.fill.take().ok_or(GridError::NoFillInProgress)?;
        self.selection.activate(pending.active);
        tracing::debug!(ticket = pending.ticket, "fill cancelled");
        Ok(())
    }

    /// Run a complete fill against a blocking gateway.
    pub fn autofill<G: AutofillGateway + ?Sized>(&mut self, gateway: &G) -> Result<usize> {
        let ticket = self.begin_fill()?;
        let outcome = gateway.complete(ticket.request());
        self.complete_fill(&ticket, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfill_engine::engine::Position;
    use pretty_assertions::assert_eq;

    type Outcome = std::result::Result<FillResponse, FillError>;

    fn t(s: &str) -> CellValue {
        CellValue::text(s)
    }

    fn id(sheet: &Sheet, row: usize, col: usize) -> CellId {
        sheet.require_id(Position::new(row, col)).unwrap()
    }

    /// Three rows in column A: Mon, Tue, blank; all selected.
    fn weekdays() -> Sheet {
        let mut sheet = Sheet::new(5, 2).unwrap();
        let (a1, a2, a3) = (id(&sheet, 0, 0), id(&sheet, 1, 0), id(&sheet, 2, 0));
        sheet.set_content(&a1, "Mon").unwrap();
        sheet.set_content(&a2, "Tue").unwrap();
        sheet.select_range(&a1, &a3).unwrap();
        sheet
    }

    fn continue_days(request: &FillRequest) -> Outcome {
        let mut content = request.content.clone();
        if let Some(last) = content.last_mut() {
            last[0] = t("Wed");
        }
        Ok(FillResponse::new(content))
    }

    #[test]
    fn test_request_is_bounding_rectangle() {
        let mut sheet = weekdays();
        let ticket = sheet.begin_fill().unwrap();
        assert_eq!(
            ticket.request().content,
            vec![vec![t("Mon")], vec![t("Tue")], vec![t("")]]
        );
        assert_eq!(ticket.request().to_json().unwrap(), r#"{"content":[["Mon"],["Tue"],[""]]}"#);
        assert!(sheet.is_busy());
    }

    #[test]
    fn test_text_rows_render_numbers() {
        let request = FillRequest {
            content: vec![vec![CellValue::Number(2.0), t("")], vec![CellValue::Number(4.5), t("x")]],
        };
        assert_eq!(request.text_rows(), vec![vec!["2", ""], vec!["4.5", "x"]]);
    }

    #[test]
    fn test_fill_writes_only_changed_cells() {
        let mut sheet = weekdays();
        let before = sheet.history().undo_depth();
        let changed = sheet.autofill(&continue_days).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(sheet.value_at(Position::new(2, 0)), t("Wed"));
        assert_eq!(sheet.history().undo_depth(), before + 1);
        assert!(!sheet.is_busy());

        sheet.undo().unwrap();
        assert_eq!(sheet.value_at(Position::new(2, 0)), CellValue::empty());
        assert_eq!(sheet.value_at(Position::new(1, 0)), t("Tue"));
    }

    #[test]
    fn test_larger_response_selects_filled_rectangle() {
        let mut sheet = weekdays();
        let gateway = |_: &FillRequest| -> Outcome {
            FillResponse::from_json(r#"[["Mon","1"],["Tue","2"],["Wed","3"],["Thu","4"]]"#)
        };
        assert_eq!(sheet.autofill(&gateway).unwrap(), 6);
        assert_eq!(sheet.selection().selected().len(), 8);
        assert_eq!(sheet.value_at(Position::new(3, 1)), CellValue::Number(4.0));
    }

    #[test]
    fn test_response_past_grid_edge_is_clipped() {
        let mut sheet = Sheet::new(2, 1).unwrap();
        let a1 = id(&sheet, 0, 0);
        sheet.set_content(&a1, "1").unwrap();
        sheet.select_single(&a1).unwrap();
        let gateway = |_: &FillRequest| -> Outcome {
            Ok(FillResponse::new(vec![vec![t("1")], vec![t("2")], vec![t("3")]]))
        };
        assert_eq!(sheet.autofill(&gateway).unwrap(), 1);
        assert_eq!(sheet.selection().selected().len(), 2);
    }

    #[test]
    fn test_failed_fill_leaves_state_untouched() {
        let mut sheet = weekdays();
        let store = sheet.store().clone();
        let selected = sheet.selection().selected().to_vec();
        let depth = sheet.history().undo_depth();

        let gateway = |_: &FillRequest| -> Outcome {
            Err(FillError::Transport("connection refused".to_string()))
        };
        let err = sheet.autofill(&gateway).unwrap_err();
        assert!(matches!(err, GridError::Autofill(FillError::Transport(_))));

        assert_eq!(sheet.store(), &store);
        assert_eq!(sheet.selection().selected(), selected.as_slice());
        assert_eq!(sheet.history().undo_depth(), depth);
        assert!(!sheet.is_busy());
    }

    #[test]
    fn test_failed_fill_restores_edit_cursor() {
        let mut sheet = Sheet::new(3, 1).unwrap();
        let a2 = id(&sheet, 1, 0);
        sheet.activate(Some(&a2)).unwrap();

        let ticket = sheet.begin_fill().unwrap();
        assert!(sheet.selection().active().is_none());
        let outcome: Outcome = Err(FillError::Malformed("not json".to_string()));
        assert!(sheet.complete_fill(&ticket, outcome).is_err());
        assert_eq!(sheet.selection().active(), Some(&a2));
        assert_eq!(sheet.selection().selected(), &[a2.clone()]);

        sheet.begin_fill().unwrap();
        sheet.cancel_fill().unwrap();
        assert_eq!(sheet.selection().active(), Some(&a2));
    }

    #[test]
    fn test_short_response_is_rejected() {
        let mut sheet = weekdays();
        let gateway = |_: &FillRequest| -> Outcome { Ok(FillResponse::new(vec![vec![t("Mon")]])) };
        let err = sheet.autofill(&gateway).unwrap_err();
        assert!(matches!(
            err,
            GridError::Autofill(FillError::Shape { want_rows: 3, got_rows: 1, .. })
        ));
        assert!(!sheet.is_busy());
        assert_eq!(sheet.value_at(Position::new(0, 0)), t("Mon"));
    }

    #[test]
    fn test_busy_rejects_mutations() {
        let mut sheet = weekdays();
        let a1 = id(&sheet, 0, 0);
        let ticket = sheet.begin_fill().unwrap();

        assert!(matches!(sheet.begin_fill(), Err(GridError::Busy)));
        assert!(matches!(sheet.set_content(&a1, "x"), Err(GridError::Busy)));
        assert!(matches!(sheet.undo(), Err(GridError::Busy)));
        assert!(matches!(sheet.select_single(&a1), Err(GridError::Busy)));
        assert!(matches!(sheet.toggle_sort(1), Err(GridError::Busy)));
        assert!(sheet.set_column_width(0, 120).is_ok());

        sheet.complete_fill(&ticket, continue_days(ticket.request())).unwrap();
        assert!(sheet.set_content(&a1, "x").is_ok());
    }

    #[test]
    fn test_stale_and_missing_tickets() {
        let mut sheet = weekdays();
        let first = sheet.begin_fill().unwrap();
        sheet.cancel_fill().unwrap();
        assert!(matches!(sheet.cancel_fill(), Err(GridError::NoFillInProgress)));
        assert!(matches!(
            sheet.complete_fill(&first, continue_days(first.request())),
            Err(GridError::NoFillInProgress)
        ));

        let second = sheet.begin_fill().unwrap();
        assert!(second.id() > first.id());
        assert!(matches!(
            sheet.complete_fill(&first, continue_days(first.request())),
            Err(GridError::StaleTicket(_))
        ));
        assert!(sheet.is_busy());
        assert_eq!(sheet.complete_fill(&second, continue_days(second.request())).unwrap(), 1);
    }

    #[test]
    fn test_fill_without_selection() {
        let mut sheet = Sheet::new(2, 2).unwrap();
        assert!(matches!(sheet.begin_fill(), Err(GridError::NoSelection)));
        assert!(!sheet.is_busy());
    }

    #[test]
    fn test_response_json_forms() {
        let wrapped = FillResponse::from_json(r#"{"content":[["a",1]]}"#).unwrap();
        let bare = FillResponse::from_json(r#"[["a",1]]"#).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.content, vec![vec![t("a"), CellValue::Number(1.0)]]);

        assert!(matches!(
            FillResponse::from_json("not json"),
            Err(FillError::Malformed(_))
        ));
        assert!(matches!(
            FillResponse::from_json(r#"{"content":"nope"}"#),
            Err(FillError::Malformed(_))
        ));
    }

    #[test]
    fn test_check_covers_row_widths() {
        let request = vec![vec![t("a"), t("b")], vec![t("c"), t("")]];
        let wide = vec![vec![t("a"), t("b"), t("x")], vec![t("c"), t("d")]];
        assert!(check_covers(&request, &wide).is_ok());

        let ragged = vec![vec![t("a"), t("b")], vec![t("c")]];
        assert!(matches!(
            check_covers(&request, &ragged),
            Err(FillError::Shape { got_cols: 1, .. })
        ));
    }
}
