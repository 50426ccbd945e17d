//! Command-driven front end.
//!
//! Each input line is one command. Pointer and keyboard commands go through
//! [`apply_action`] exactly as a windowed front end would feed them, so the
//! same busy-state and modifier rules apply. `fill` hands the request to a
//! worker thread and returns at once; `wait` (or the end of input) collects
//! the outcome.

use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow, bail};
use gridfill_core::storage::{Table, format_tsv, to_array};
use gridfill_core::{
    Action, ActionOutcome, AutofillGateway, CellId, FillError, FillResponse, FillTicket, Key,
    PointerSession, Position, Sheet, SortDirection, SortKey, apply_action,
};
use gridfill_engine::engine::Rect;

use crate::clipboard::ClipboardProvider;

pub const COMMANDS: &str = "\
set CELL [TEXT]        write TEXT (empty clears)
clear                  clear the selected cells
click CELL             select one cell
ctrl-click CELL        add a cell to the selection
shift-click CELL       select the range from the anchor
ctrl-shift-click CELL  add the range from the last selected cell
drag FROM TO           drag-select a range
edit CELL [TEXT]       edit a cell in place
key NAME               up down left right tab shift-tab enter escape delete
                       backspace ctrl-z ctrl-shift-z ctrl-y
sort COL asc|desc      sort rows (COL is a letter, or # for row order)
header COL             click a column header
undo | redo
copy | cut             copy the selection (printed and sent to the clipboard)
paste [TEXT]           paste TEXT (\\t and \\n escapes) or the clipboard
fill                   start autofill on the selection
wait                   wait for the running fill
width COL PX | height ROW PX
layout                 print the sizes set with width/height
show                   print the grid as TSV
selection              print the selected cells";

type FillOutcome = std::result::Result<FillResponse, FillError>;

struct FillWorker {
    ticket: FillTicket,
    outcome: mpsc::Receiver<FillOutcome>,
    handle: JoinHandle<()>,
}

pub struct App {
    sheet: Sheet,
    session: PointerSession,
    clipboard: Box<dyn ClipboardProvider>,
    gateway: Arc<dyn AutofillGateway>,
    worker: Option<FillWorker>,
}

impl App {
    pub fn new(
        sheet: Sheet,
        clipboard: Box<dyn ClipboardProvider>,
        gateway: Arc<dyn AutofillGateway>,
    ) -> Self {
        Self {
            sheet,
            session: PointerSession::new(),
            clipboard,
            gateway,
            worker: None,
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Run one command line, returning what it prints.
    pub fn run_line(&mut self, line: &str) -> Result<Vec<String>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Vec::new());
        }
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();
        tracing::debug!(command, "run");

        match command {
            "set" => {
                let (cell, text) = split_arg(rest);
                let id = self.cell(cell)?;
                self.sheet.set_content(&id, text)?;
            }
            "clear" => self.act(Action::Clear)?,
            "click" => {
                let id = self.cell(rest)?;
                self.click(id, &[])?;
            }
            "ctrl-click" => {
                let id = self.cell(rest)?;
                self.click(id, &[Key::Ctrl])?;
            }
            "shift-click" => {
                let id = self.cell(rest)?;
                self.click(id, &[Key::Shift])?;
            }
            "ctrl-shift-click" => {
                let id = self.cell(rest)?;
                self.click(id, &[Key::Ctrl, Key::Shift])?;
            }
            "drag" => {
                let (from, to) = split_arg(rest);
                let from = self.cell(from)?;
                let to = self.cell(to)?;
                self.act(Action::PointerDown(from))?;
                self.act(Action::PointerEnter(to))?;
                self.act(Action::PointerUp)?;
            }
            "edit" => {
                let (cell, text) = split_arg(rest);
                let id = self.cell(cell)?;
                self.act(Action::Activate(id))?;
                self.act(Action::Edit(text.to_string()))?;
            }
            "key" => self.key(rest)?,
            "sort" => {
                let (col, dir) = split_arg(rest);
                let column = parse_sort_column(col)?;
                let direction = match dir.trim() {
                    "" | "asc" => SortDirection::Ascending,
                    "desc" => SortDirection::Descending,
                    other => bail!("Unknown sort direction: {other}"),
                };
                self.sheet.sort_by(SortKey::new(column, direction))?;
            }
            "header" => {
                let column = parse_sort_column(rest)?;
                self.act(Action::HeaderClick(column))?;
            }
            "undo" => self.act(Action::Undo)?,
            "redo" => self.act(Action::Redo)?,
            "copy" | "cut" => {
                let action = if command == "copy" { Action::Copy } else { Action::Cut };
                if let ActionOutcome::Clipboard(text) = self.apply(action)? {
                    self.clipboard.set_text(text.clone());
                    return Ok(text.split('\n').map(str::to_string).collect());
                }
            }
            "paste" => {
                let text = if rest.is_empty() {
                    self.clipboard
                        .get_text()
                        .ok_or_else(|| anyhow!("Clipboard is empty"))?
                } else {
                    unescape(rest)
                };
                self.act(Action::Paste(text))?;
            }
            "fill" => self.start_fill()?,
            "wait" => return self.wait_fill(),
            "width" => {
                let (col, px) = split_arg(rest);
                let col = parse_column(col)?;
                let px: u32 = px.trim().parse().context("width must be a number")?;
                self.sheet.set_column_width(col, px)?;
            }
            "height" => {
                let (row, px) = split_arg(rest);
                let row: usize = row.parse().context("row must be a number")?;
                let px: u32 = px.trim().parse().context("height must be a number")?;
                let row = row.checked_sub(1).ok_or_else(|| anyhow!("rows start at 1"))?;
                self.sheet.set_row_height(row, px)?;
            }
            "layout" => return Ok(self.describe_layout()),
            "show" => return Ok(self.show()),
            "selection" => return Ok(vec![self.describe_selection()]),
            other => bail!("Unknown command: {other}"),
        }
        Ok(Vec::new())
    }

    /// Collect a fill still running when input ends.
    pub fn finish(&mut self) -> Result<Vec<String>> {
        if self.worker.is_some() {
            return self.wait_fill();
        }
        Ok(Vec::new())
    }

    fn apply(&mut self, action: Action) -> Result<ActionOutcome> {
        let outcome = apply_action(&mut self.sheet, &mut self.session, action)?;
        Ok(outcome)
    }

    fn act(&mut self, action: Action) -> Result<()> {
        if self.apply(action)? == ActionOutcome::Ignored && self.sheet.is_busy() {
            tracing::info!("input ignored while autofill runs");
        }
        Ok(())
    }

    fn click(&mut self, id: CellId, held: &[Key]) -> Result<()> {
        for key in held {
            self.act(Action::KeyDown(*key))?;
        }
        self.act(Action::PointerDown(id))?;
        self.act(Action::PointerUp)?;
        for key in held {
            self.act(Action::KeyUp(*key))?;
        }
        Ok(())
    }

    fn key(&mut self, name: &str) -> Result<()> {
        let (held, key): (&[Key], Key) = match name.trim().to_ascii_lowercase().as_str() {
            "up" => (&[], Key::Up),
            "down" => (&[], Key::Down),
            "left" => (&[], Key::Left),
            "right" => (&[], Key::Right),
            "tab" => (&[], Key::Tab),
            "shift-tab" => (&[Key::Shift], Key::Tab),
            "enter" => (&[], Key::Enter),
            "escape" | "esc" => (&[], Key::Escape),
            "delete" => (&[], Key::Delete),
            "backspace" => (&[], Key::Backspace),
            "ctrl-z" => (&[Key::Ctrl], Key::Char('z')),
            "ctrl-shift-z" => (&[Key::Ctrl, Key::Shift], Key::Char('z')),
            "ctrl-y" => (&[Key::Ctrl], Key::Char('y')),
            other => bail!("Unknown key: {other}"),
        };
        for k in held {
            self.act(Action::KeyDown(*k))?;
        }
        self.act(Action::KeyDown(key))?;
        for k in held {
            self.act(Action::KeyUp(*k))?;
        }
        Ok(())
    }

    fn cell(&self, name: &str) -> Result<CellId> {
        let name = name.trim();
        let pos = Position::parse_a1(name).ok_or_else(|| anyhow!("Invalid cell reference: {name}"))?;
        Ok(self.sheet.require_id(pos)?)
    }

    fn start_fill(&mut self) -> Result<()> {
        if self.worker.is_some() {
            tracing::info!("autofill already running, request dropped");
            return Ok(());
        }
        let ticket = self.sheet.begin_fill()?;
        let (tx, rx) = mpsc::channel();
        let gateway = Arc::clone(&self.gateway);
        let request = ticket.request().clone();
        let handle = thread::spawn(move || {
            let outcome = gateway.complete(&request);
            // The receiver only goes away if the app is dropped mid-fill.
            let _ = tx.send(outcome);
        });
        self.worker = Some(FillWorker {
            ticket,
            outcome: rx,
            handle,
        });
        Ok(())
    }

    fn wait_fill(&mut self) -> Result<Vec<String>> {
        let Some(worker) = self.worker.take() else {
            return Ok(vec!["no autofill running".to_string()]);
        };
        let outcome = worker
            .outcome
            .recv()
            .unwrap_or_else(|_| Err(FillError::Transport("autofill worker exited".to_string())));
        if worker.handle.join().is_err() {
            tracing::warn!("autofill worker panicked");
        }
        let changed = self.sheet.complete_fill(&worker.ticket, outcome)?;
        Ok(vec![format!("filled {changed} cells")])
    }

    fn show(&self) -> Vec<String> {
        let dims = self.sheet.dimensions();
        let all = self.sheet.translator().ids_in(Rect {
            top: 0,
            left: 0,
            bottom: dims.rows - 1,
            right: dims.cols - 1,
        });
        let table: Table = to_array(self.sheet.translator(), self.sheet.store(), &all);
        format_tsv(&table).split('\n').map(str::to_string).collect()
    }

    fn describe_layout(&self) -> Vec<String> {
        let layout = self.sheet.layout();
        let widths = layout
            .widths()
            .iter()
            .map(|(col, px)| format!("col {} {px}", Position::col_to_letters(*col)));
        let heights = layout
            .heights()
            .iter()
            .map(|(row, px)| format!("row {} {px}", row + 1));
        widths.chain(heights).collect()
    }

    fn describe_selection(&self) -> String {
        let selection = self.sheet.selection();
        let names: Vec<String> = selection
            .selected()
            .iter()
            .filter_map(|id| self.sheet.position_of(id))
            .map(|pos| pos.to_string())
            .collect();
        let mut out = names.join(" ");
        if let Some(pos) = selection.active().and_then(|id| self.sheet.position_of(id)) {
            out.push_str(&format!(" (editing {pos})"));
        }
        out
    }
}

/// Split off the first whitespace-separated argument.
fn split_arg(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim_start()),
        None => (s, ""),
    }
}

/// Column letters to a 0-based grid column.
fn parse_column(s: &str) -> Result<usize> {
    Position::parse_a1(&format!("{}1", s.trim()))
        .map(|pos| pos.col)
        .ok_or_else(|| anyhow!("Invalid column: {s}"))
}

/// Header column: `#` is the row-index column (0), letters are 1-based.
fn parse_sort_column(s: &str) -> Result<usize> {
    match s.trim() {
        "#" => Ok(0),
        col => Ok(parse_column(col)? + 1),
    }
}

fn unescape(s: &str) -> String {
    s.replace("\\t", "\t").replace("\\n", "\n")
}
