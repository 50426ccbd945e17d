//! Stable row sorting.
//!
//! Sorting never touches cell ids or stored values: it permutes the rows of the
//! [`CoordinateTranslator`] and rebuilds its index.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::cell::CellValue;
use super::store::CellStore;
use super::translator::{CoordinateTranslator, Row};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Which column to sort by and in which direction.
///
/// Column 0 is the row-index column (restores creation order); column `k > 0`
/// sorts by grid column `k - 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: usize, direction: SortDirection) -> SortKey {
        SortKey { column, direction }
    }

    pub fn ascending(column: usize) -> SortKey {
        SortKey::new(column, SortDirection::Ascending)
    }

    pub fn descending(column: usize) -> SortKey {
        SortKey::new(column, SortDirection::Descending)
    }
}

/// Comparable form of a value: numbers before text, text case-insensitive.
#[derive(Debug, PartialEq)]
enum Comparable {
    Number(f64),
    Text(String),
}

impl Comparable {
    fn of(value: Option<&CellValue>) -> Option<Comparable> {
        match value? {
            v if v.is_vacant() => None,
            CellValue::Number(n) => Some(Comparable::Number(*n)),
            CellValue::Text(s) => Some(Comparable::Text(s.to_lowercase())),
        }
    }

    fn cmp(&self, other: &Comparable) -> Ordering {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.total_cmp(b),
            (Comparable::Text(a), Comparable::Text(b)) => a.cmp(b),
            (Comparable::Number(_), Comparable::Text(_)) => Ordering::Less,
            (Comparable::Text(_), Comparable::Number(_)) => Ordering::Greater,
        }
    }
}

fn compare_keys(a: &Option<Comparable>, b: &Option<Comparable>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        // Empty sorts last in both directions.
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => a.cmp(b).reverse(),
        },
    }
}

/// Compare two cell values for sorting. Missing and vacant values sort last.
pub fn compare_values(
    a: Option<&CellValue>,
    b: Option<&CellValue>,
    direction: SortDirection,
) -> Ordering {
    compare_keys(&Comparable::of(a), &Comparable::of(b), direction)
}

impl CoordinateTranslator {
    /// Stable-sort the rows by `key`, then rebuild the index.
    /// Returns false (and leaves the order alone) if the column is outside the grid.
    pub fn sort_rows(&mut self, store: &CellStore, key: SortKey) -> bool {
        if key.column > self.dimensions().cols {
            return false;
        }

        let rows = self.take_rows();
        let sorted: Vec<Row> = if key.column == 0 {
            let mut rows = rows;
            rows.sort_by(|a, b| match key.direction {
                SortDirection::Ascending => a.origin().cmp(&b.origin()),
                SortDirection::Descending => b.origin().cmp(&a.origin()),
            });
            rows
        } else {
            let col = key.column - 1;
            let mut keyed: Vec<(Option<Comparable>, Row)> = rows
                .into_iter()
                .map(|row| {
                    let value = row.id_at(col).and_then(|id| store.value(id));
                    (Comparable::of(value), row)
                })
                .collect();
            // `sort_by` is stable: equal keys keep their current relative order.
            keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, key.direction));
            keyed.into_iter().map(|(_, row)| row).collect()
        };

        self.reorder(sorted);
        tracing::debug!(column = key.column, direction = ?key.direction, "sorted rows");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Dimensions, Position};
    use pretty_assertions::assert_eq;

    /// Build a one-column grid with the given values (None = empty).
    fn column(values: &[Option<CellValue>]) -> (CoordinateTranslator, CellStore) {
        let translator = CoordinateTranslator::new(Dimensions::new(values.len(), 1));
        let mut store = CellStore::new();
        for (row, value) in values.iter().enumerate() {
            if let Some(value) = value {
                let id = translator.id_at(Position::new(row, 0)).unwrap();
                store.set(id, value.clone());
            }
        }
        (translator, store)
    }

    fn rendered(translator: &CoordinateTranslator, store: &CellStore) -> Vec<String> {
        translator
            .rows()
            .iter()
            .map(|row| store.value_or_empty(&row.ids()[0]).to_string())
            .collect()
    }

    #[test]
    fn test_compare_values_empty_last_both_directions() {
        let a = CellValue::text("a");
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(compare_values(None, Some(&a), direction), Ordering::Greater);
            assert_eq!(compare_values(Some(&a), None, direction), Ordering::Less);
            assert_eq!(compare_values(None, None, direction), Ordering::Equal);
        }
    }

    #[test]
    fn test_compare_values_case_insensitive_and_numeric() {
        let upper = CellValue::text("Banana");
        let lower = CellValue::text("apple");
        assert_eq!(
            compare_values(Some(&lower), Some(&upper), SortDirection::Ascending),
            Ordering::Less
        );
        // Numeric, not lexicographic: 9 < 10.
        let nine = CellValue::Number(9.0);
        let ten = CellValue::Number(10.0);
        assert_eq!(
            compare_values(Some(&nine), Some(&ten), SortDirection::Ascending),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&nine), Some(&ten), SortDirection::Descending),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sort_by_column_ascending_then_descending() {
        let (mut translator, store) = column(&[
            Some(CellValue::Number(3.0)),
            None,
            Some(CellValue::Number(1.0)),
            Some(CellValue::Number(2.0)),
        ]);

        assert!(translator.sort_rows(&store, SortKey::ascending(1)));
        assert_eq!(rendered(&translator, &store), vec!["1", "2", "3", ""]);

        assert!(translator.sort_rows(&store, SortKey::descending(1)));
        assert_eq!(rendered(&translator, &store), vec!["3", "2", "1", ""]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let (mut translator, store) = column(&[
            Some(CellValue::text("b")),
            Some(CellValue::text("A")),
            Some(CellValue::text("B")),
            Some(CellValue::text("a")),
        ]);

        translator.sort_rows(&store, SortKey::ascending(1));
        assert_eq!(translator.row_order(), vec![1, 3, 0, 2]);

        translator.sort_rows(&store, SortKey::descending(1));
        // "b"/"B" tie keeps its ascending-pass order, as does "A"/"a".
        assert_eq!(translator.row_order(), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_row_index_column_restores_creation_order() {
        let (mut translator, store) = column(&[
            Some(CellValue::Number(2.0)),
            Some(CellValue::Number(1.0)),
            Some(CellValue::Number(3.0)),
        ]);
        translator.sort_rows(&store, SortKey::ascending(1));
        assert_eq!(translator.row_order(), vec![1, 0, 2]);

        translator.sort_rows(&store, SortKey::ascending(0));
        assert_eq!(translator.row_order(), vec![0, 1, 2]);

        translator.sort_rows(&store, SortKey::descending(0));
        assert_eq!(translator.row_order(), vec![2, 1, 0]);
    }

    #[test]
    fn test_sort_column_out_of_range_is_rejected() {
        let (mut translator, store) = column(&[Some(CellValue::Number(2.0)), None]);
        assert!(!translator.sort_rows(&store, SortKey::ascending(2)));
        assert_eq!(translator.row_order(), vec![0, 1]);
    }

    #[test]
    fn test_numbers_sort_before_text() {
        let (mut translator, store) = column(&[
            Some(CellValue::text("x")),
            Some(CellValue::Number(5.0)),
        ]);
        translator.sort_rows(&store, SortKey::ascending(1));
        assert_eq!(rendered(&translator, &store), vec!["5", "x"]);
    }
}
