// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The computed answer for one page request.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Size;
use smallvec::SmallVec;

use crate::cells::{Cell, CellSequence};
use crate::grid::GridId;

/// A row of tiles within a page.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Row {
    /// Absolute index of the first cell in the row.
    pub start: usize,
    /// Uniform multiplier applied to the width and height of every cell in the row.
    ///
    /// Always `1` outside [`GridMode::Fill`](crate::GridMode::Fill) grids.
    pub scale_factor: f64,
}

impl Row {
    pub(crate) const fn new(start: usize) -> Self {
        Self {
            start,
            scale_factor: 1.0,
        }
    }
}

/// A maximal run of cells within a page that share one grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridRun {
    /// Absolute index of the first cell of the run within this page.
    pub start: usize,
    /// The grid shared by the run.
    pub grid: GridId,
    /// Row budget of the run's container: viewport width plus grid spacing.
    pub width: f64,
}

/// Layout of one page: which cells it holds and how large each one is.
///
/// Produced by [`compute_page`](crate::compute_page). Index arguments of the
/// accessors are absolute indices into the [`CellSequence`].
#[derive(Clone, Debug, PartialEq)]
pub struct PageSpec {
    pub(crate) start: usize,
    pub(crate) item_count: usize,
    pub(crate) bounds_width: f64,
    pub(crate) sizes: Vec<Size>,
    pub(crate) rows: SmallVec<[Row; 8]>,
    pub(crate) runs: SmallVec<[GridRun; 4]>,
    pub(crate) extra: Option<Range<usize>>,
}

impl PageSpec {
    /// Absolute index of the page's first cell.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Number of cells that belong to this page.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// One past the page's last cell; where the next page starts.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.item_count
    }

    /// Absolute indices of the page's cells.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Viewport width the page was computed for.
    #[must_use]
    pub const fn bounds_width(&self) -> f64 {
        self.bounds_width
    }

    /// Rows of the page, in order. The first row starts at [`PageSpec::start`].
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Grid runs of the page, in order.
    #[must_use]
    pub fn runs(&self) -> &[GridRun] {
        &self.runs
    }

    /// Cells deferred to the next page because their row was too sparse.
    ///
    /// The range starts at [`PageSpec::end`]; the host re-offers these cells at
    /// the head of the next page request.
    #[must_use]
    pub fn extra_cells(&self) -> Option<Range<usize>> {
        self.extra.clone()
    }

    /// The deferred cells themselves, in original order.
    #[must_use]
    pub fn extra_cells_in<'a, T>(&self, cells: &'a CellSequence<T>) -> &'a [Cell<T>] {
        match &self.extra {
            Some(range) => cells.cells().get(range.clone()).unwrap_or(&[]),
            None => &[],
        }
    }

    /// Returns `true` if `index` belongs to this page.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// Unscaled size of the cell at `index`.
    #[must_use]
    pub fn cell_size(&self, index: usize) -> Option<Size> {
        let offset = index.checked_sub(self.start)?;
        self.sizes.get(offset).copied()
    }

    /// The row containing `index`.
    #[must_use]
    pub fn row_of(&self, index: usize) -> Option<&Row> {
        if !self.contains(index) {
            return None;
        }
        let after = self.rows.partition_point(|row| row.start <= index);
        self.rows.get(after.checked_sub(1)?)
    }

    /// Returns `true` if the cell at `index` starts a row.
    #[must_use]
    pub fn is_row_start(&self, index: usize) -> bool {
        self.row_of(index).is_some_and(|row| row.start == index)
    }

    /// Scale factor of the row containing `index`, or `1` outside the page.
    #[must_use]
    pub fn scale_factor(&self, index: usize) -> f64 {
        self.row_of(index).map_or(1.0, |row| row.scale_factor)
    }

    /// Final size of the cell at `index`: its unscaled size times its row's scale factor.
    #[must_use]
    pub fn final_size(&self, index: usize) -> Option<Size> {
        let size = self.cell_size(index)?;
        let scale = self.scale_factor(index);
        Some(Size::new(size.width * scale, size.height * scale))
    }

    /// The grid run containing `index`.
    #[must_use]
    pub fn run_of(&self, index: usize) -> Option<&GridRun> {
        if !self.contains(index) {
            return None;
        }
        let after = self.runs.partition_point(|run| run.start <= index);
        self.runs.get(after.checked_sub(1)?)
    }

    /// Drops everything at or after `end`, deferring `end..deferred_end`.
    pub(crate) fn defer_from(&mut self, end: usize, deferred_end: usize) {
        self.item_count = end - self.start;
        self.sizes.truncate(self.item_count);
        self.rows.retain(|row| row.start < end);
        self.runs.retain(|run| run.start < end);
        self.extra = Some(end..deferred_end);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Size;
    use smallvec::smallvec;

    use super::{GridRun, PageSpec, Row};
    use crate::grid::GridId;

    fn sample() -> PageSpec {
        PageSpec {
            start: 10,
            item_count: 4,
            bounds_width: 100.0,
            sizes: vec![Size::new(40.0, 20.0); 5],
            rows: smallvec![
                Row {
                    start: 10,
                    scale_factor: 1.25
                },
                Row::new(12),
                Row::new(14),
            ],
            runs: smallvec![GridRun {
                start: 10,
                grid: GridId::new(0),
                width: 100.0,
            }],
            extra: None,
        }
    }

    #[test]
    fn row_lookup_uses_nearest_preceding_start() {
        let page = sample();
        assert_eq!(page.row_of(9), None);
        assert_eq!(page.row_of(10).unwrap().start, 10);
        assert_eq!(page.row_of(11).unwrap().start, 10);
        assert_eq!(page.row_of(13).unwrap().start, 12);
        assert_eq!(page.row_of(14), None);
        assert!(page.is_row_start(12));
        assert!(!page.is_row_start(13));
    }

    #[test]
    fn final_size_applies_row_scale() {
        let page = sample();
        assert_eq!(page.final_size(11), Some(Size::new(50.0, 25.0)));
        assert_eq!(page.final_size(12), Some(Size::new(40.0, 20.0)));
        assert_eq!(page.scale_factor(99), 1.0);
    }

    #[test]
    fn deferring_trims_rows_runs_and_sizes() {
        let mut page = sample();
        page.item_count = 5;
        page.defer_from(14, 15);
        assert_eq!(page.item_count(), 4);
        assert_eq!(page.end(), 14);
        assert_eq!(page.rows().len(), 2);
        assert_eq!(page.runs().len(), 1);
        assert_eq!(page.cell_size(14), None);
        assert_eq!(page.extra_cells(), Some(14..15));
    }
}
