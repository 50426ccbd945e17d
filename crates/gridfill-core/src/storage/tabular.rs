//! Selected rectangle <-> row-major 2D array of values.

use gridfill_engine::engine::{CellId, CellStore, CellValue, CoordinateTranslator, Position, Rect};

/// Row-major grid of values. Rows may differ in length when parsed from text.
pub type Table = Vec<Vec<CellValue>>;

/// Bounding rectangle of the current positions of `ids`. Unknown ids are ignored.
pub fn bounding_rect(translator: &CoordinateTranslator, ids: &[CellId]) -> Option<Rect> {
    Rect::bounding(ids.iter().filter_map(|id| translator.position_of(id)))
}

/// Dense copy of the bounding rectangle of `ids`.
///
/// Every position inside the rectangle is read from the store, selected or not;
/// positions with nothing stored yield the empty placeholder. No ids, no rows.
pub fn to_array(translator: &CoordinateTranslator, store: &CellStore, ids: &[CellId]) -> Table {
    let Some(rect) = bounding_rect(translator, ids) else {
        return Vec::new();
    };
    (rect.top..=rect.bottom)
        .map(|row| {
            (rect.left..=rect.right)
                .map(|col| {
                    translator
                        .id_at(Position::new(row, col))
                        .map(|id| store.value_or_empty(id))
                        .unwrap_or_else(CellValue::empty)
                })
                .collect()
        })
        .collect()
}

/// Map `data[i][j]` onto the id currently rendered at `anchor + (i, j)`.
///
/// Positions past the grid edge are skipped. Text that matches the strict
/// numeric pattern becomes a number.
pub fn from_array(
    translator: &CoordinateTranslator,
    data: &[Vec<CellValue>],
    anchor: Position,
) -> Vec<(CellId, CellValue)> {
    let mut writes = Vec::new();
    for (i, row) in data.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let Some(id) = anchor.offset(i, j).and_then(|pos| translator.id_at(pos)) else {
                continue;
            };
            writes.push((id.clone(), value.clone().coerce()));
        }
    }
    writes
}
