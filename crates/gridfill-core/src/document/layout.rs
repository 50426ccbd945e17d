//! Column widths and row heights. Not part of history.

use std::collections::BTreeMap;

use crate::config::LayoutConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    limits: LayoutConfig,
    widths: BTreeMap<usize, u32>,
    heights: BTreeMap<usize, u32>,
}

impl Layout {
    pub fn new(limits: LayoutConfig) -> Self {
        Self {
            limits,
            widths: BTreeMap::new(),
            heights: BTreeMap::new(),
        }
    }

    /// Set a column width, clamped to the minimum. Returns the stored width.
    pub fn set_width(&mut self, col: usize, width: u32) -> u32 {
        let width = width.max(self.limits.min_width);
        self.widths.insert(col, width);
        width
    }

    /// Set a row height, clamped to the minimum. Returns the stored height.
    pub fn set_height(&mut self, row: usize, height: u32) -> u32 {
        let height = height.max(self.limits.min_height);
        self.heights.insert(row, height);
        height
    }

    pub fn width(&self, col: usize) -> u32 {
        self.widths
            .get(&col)
            .copied()
            .unwrap_or(self.limits.default_width)
    }

    pub fn height(&self, row: usize) -> u32 {
        self.heights
            .get(&row)
            .copied()
            .unwrap_or(self.limits.default_height)
    }

    /// Explicitly set widths, by column.
    pub fn widths(&self) -> &BTreeMap<usize, u32> {
        &self.widths
    }

    pub fn heights(&self) -> &BTreeMap<usize, u32> {
        &self.heights
    }
}
