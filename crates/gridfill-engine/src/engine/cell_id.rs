//! Stable cell identity.

use std::fmt;

use super::position::Position;

/// Opaque identity of a cell.
///
/// Minted once per grid position when the
/// [`CoordinateTranslator`](super::CoordinateTranslator) is built and never
/// recomputed afterwards: after a sort the id no longer says anything about
/// where the cell renders.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct CellId(String);

impl CellId {
    pub(crate) fn at_origin(pos: Position) -> CellId {
        CellId(format!("{}_{}", pos.row, pos.col))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
