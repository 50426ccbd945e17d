//! Grid engine API.
//!
//! This module provides the data model underneath an interactive grid:
//!
//! - [`CellValue`], [`CellKind`], [`Cell`] - Tagged cell content
//! - [`CellId`] - Stable cell identity that survives row reordering
//! - [`Position`], [`Rect`], [`Dimensions`] - Transient coordinates (A1 notation ↔ row/col)
//! - [`CellStore`] - Sparse identity → value storage
//! - [`CoordinateTranslator`] - Bidirectional identity ↔ position index
//! - [`SortKey`], [`compare_values`] - Stable row sorting by column value

mod cell;
mod cell_id;
mod position;
mod sort;
mod store;
mod translator;

pub use cell::{Cell, CellKind, CellValue};
pub use cell_id::CellId;
pub use position::{Dimensions, Position, Rect};
pub use sort::{SortDirection, SortKey, compare_values};
pub use store::CellStore;
pub use translator::{CoordinateTranslator, Row};
