//! Tab-separated clipboard text, as exchanged with other spreadsheet apps.

use gridfill_engine::engine::CellValue;

use super::tabular::Table;

/// Render a table as TSV: tabs between columns, `\n` between rows, no trailing newline.
pub fn format_tsv(table: &[Vec<CellValue>]) -> String {
    let mut out = String::new();
    for (r, row) in table.iter().enumerate() {
        if r != 0 {
            out.push('\n');
        }
        for (c, value) in row.iter().enumerate() {
            if c != 0 {
                out.push('\t');
            }
            out.push_str(&value.to_input_string());
        }
    }
    out
}

/// Parse clipboard text into text values.
///
/// Line endings are normalised to `\n` and trailing empty lines dropped.
/// Values are left as text; numeric coercion happens when they are written.
pub fn parse_tsv(text: &str) -> Table {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|line| line.split('\t').map(CellValue::text).collect())
        .collect()
}
