// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row packing: splitting a window of cells into justified rows.

use alloc::vec::Vec;

use kurbo::Size;
use smallvec::SmallVec;

use crate::cells::CellSequence;
use crate::config::JustifyConfig;
use crate::error::LayoutError;
use crate::grid::Grid;
use crate::page::{GridRun, PageSpec, Row};

/// Computes the page that starts at `start` for a viewport `bounds_width` wide.
///
/// At most [`JustifyConfig::lookahead`] cells are examined. Within that window
/// each grid run is packed left to right:
///
/// - [`GridMode::None`](crate::GridMode::None) cells each get a full-width,
///   zero-height row.
/// - Other cells are `aspect_ratio * min_row_height` wide plus `spacing`, and a
///   row closes when the next cell would overflow `bounds_width + spacing`.
/// - In [`GridMode::Fill`](crate::GridMode::Fill) grids a closed row, and the
///   last row of a run that ends inside the window, is stretched to span the
///   budget, clamped to `[1, max_scale_factor]`.
///
/// If the window cuts a grid run short and its last row is filled below
/// [`JustifyConfig::min_fill`], that row is left out of the page and reported
/// through [`PageSpec::extra_cells`] instead. A page always keeps at least its
/// first row, so `item_count` is never zero.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidWidth`] if `bounds_width` is not finite and
/// positive, and [`LayoutError::StartOutOfBounds`] if `start` does not name a cell.
pub fn compute_page<T>(
    cells: &CellSequence<T>,
    start: usize,
    bounds_width: f64,
    config: &JustifyConfig,
) -> Result<PageSpec, LayoutError> {
    LayoutError::check_width(bounds_width)?;
    let len = cells.len();
    if start >= len {
        return Err(LayoutError::StartOutOfBounds { start, len });
    }

    let items = cells.cells();
    let end = len.min(start.saturating_add(config.effective_lookahead()));

    let mut sizes = Vec::with_capacity(end - start);
    let mut rows: SmallVec<[Row; 8]> = SmallVec::new();
    let mut runs: SmallVec<[GridRun; 4]> = SmallVec::new();

    let mut i = start;
    let mut row_start = start;
    let mut fill_percent = 0.0;
    let mut at_grid_end = true;

    while i < end {
        let grid_id = items[i].grid;
        let grid = cells.grid(grid_id);
        let budget = grid.row_budget(bounds_width);

        row_start = i;
        runs.push(GridRun {
            start: i,
            grid: grid_id,
            width: budget,
        });
        rows.push(Row::new(i));

        if grid.is_header() {
            at_grid_end = true;
            fill_percent = 1.0;
            sizes.push(Size::new(bounds_width, 0.0));
            i += 1;
            continue;
        }

        let height = grid.min_row_height;
        let mut row_width = 0.0;
        while i < end && items[i].grid == grid_id {
            let width = items[i].effective_aspect() * height;
            let cell_width = width + grid.spacing;

            if i > row_start && row_width + cell_width > budget {
                if grid.is_fill() {
                    close_row(&mut rows, grid, budget, row_width, i - row_start);
                }
                rows.push(Row::new(i));
                row_start = i;
                row_width = 0.0;
            }

            row_width += cell_width;
            fill_percent = row_width / budget;
            sizes.push(Size::new(width, height));
            i += 1;
        }

        if grid.is_fill() && row_width < budget {
            close_row(&mut rows, grid, budget, row_width, i - row_start);
        }

        at_grid_end = !cells.same_grid(i, row_start);
    }

    let mut page = PageSpec {
        start,
        item_count: i - start,
        bounds_width,
        sizes,
        rows,
        runs,
        extra: None,
    };

    let sparse = fill_percent > 0.0 && fill_percent < config.min_fill;
    if sparse && !at_grid_end && row_start > start {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            start,
            deferred_from = row_start,
            deferred_to = i,
            fill_percent,
            "deferring sparse trailing row"
        );
        page.defer_from(row_start, i);
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        start,
        bounds_width,
        item_count = page.item_count,
        rows = page.rows.len(),
        runs = page.runs.len(),
        "computed page"
    );

    Ok(page)
}

/// Finalizes the scale factor of the last row in `rows`.
///
/// `count` cells with total width `row_width` (spacing included) are stretched
/// so that their content spans `budget` minus their spacing.
fn close_row(rows: &mut [Row], grid: &Grid, budget: f64, row_width: f64, count: usize) {
    let Some(row) = rows.last_mut() else {
        return;
    };
    row.scale_factor = fill_scale(grid, budget, row_width, count);
    debug_assert!(
        (1.0..=grid.scale_cap()).contains(&row.scale_factor),
        "scale factor {} escaped [1, {}]",
        row.scale_factor,
        grid.scale_cap()
    );
}

fn fill_scale(grid: &Grid, budget: f64, row_width: f64, count: usize) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Rows never hold more cells than the lookahead window"
    )]
    let total_spacing = grid.spacing * count as f64;
    let content = row_width - total_spacing;
    if content <= 0.0 {
        return 1.0;
    }
    let scale = (budget - total_spacing) / content;
    if scale.is_finite() {
        scale.clamp(1.0, grid.scale_cap())
    } else {
        1.0
    }
}
