//! Rectangular interchange: 2D arrays and clipboard text.

pub mod tabular;
pub mod tsv;

pub use tabular::{Table, bounding_rect, from_array, to_array};
pub use tsv::{format_tsv, parse_tsv};
