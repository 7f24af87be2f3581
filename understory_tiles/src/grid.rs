// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid descriptors: the layout policy shared by a contiguous run of cells.

use alloc::string::String;

/// Default upper bound on the stretch applied to a [`GridMode::Fill`] row.
pub const DEFAULT_MAX_SCALE_FACTOR: f64 = 1.5;

/// Opaque handle of a [`Grid`] within one [`CellSequence`](crate::CellSequence).
///
/// Handles are assigned in build order and are only meaningful for the
/// sequence that produced them. Two cells belong to the same grid run if and
/// only if they carry the same handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(pub(crate) u32);

impl GridId {
    /// Creates the handle of the grid at `idx` in a sequence's grid list.
    #[must_use]
    pub const fn new(idx: usize) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "A sequence never holds more than u32::MAX grids"
        )]
        let idx = idx as u32;
        Self(idx)
    }

    /// Position of the grid in its sequence's grid list.
    #[must_use]
    pub const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// How a grid packs its cells into rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GridMode {
    /// Pass-through: each cell is a full-width, zero-height row of its own.
    ///
    /// Used for header bands.
    None,
    /// Pack cells into rows at their natural row height without stretching.
    Fit,
    /// Pack cells into rows and stretch each row to span the available width,
    /// bounded by [`Grid::max_scale_factor`].
    Fill,
}

/// Layout policy for a contiguous run of cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Identifies the grid region for rendering and grouping.
    pub key: String,
    /// Packing policy.
    pub mode: GridMode,
    /// Target row height, in layout units. `0` for [`GridMode::None`].
    pub min_row_height: f64,
    /// Gap inserted around each cell.
    pub spacing: f64,
    /// Upper bound on a row's stretch multiplier in [`GridMode::Fill`].
    pub max_scale_factor: f64,
    /// Extra space before the grid's first row.
    pub margin_top: f64,
    /// Extra space after the grid's last row.
    pub margin_bottom: f64,
}

impl Grid {
    /// Creates the private grid used by a single header cell.
    pub(crate) fn header(key: String) -> Self {
        Self {
            key,
            mode: GridMode::None,
            min_row_height: 0.0,
            spacing: 0.0,
            max_scale_factor: 1.0,
            margin_top: 0.0,
            margin_bottom: 0.0,
        }
    }

    /// Returns `true` if rows of this grid are stretched to the available width.
    #[must_use]
    pub const fn is_fill(&self) -> bool {
        matches!(self.mode, GridMode::Fill)
    }

    /// Returns `true` if this grid is a pass-through header band.
    #[must_use]
    pub const fn is_header(&self) -> bool {
        matches!(self.mode, GridMode::None)
    }

    /// Width budget of one row: `bounds_width + spacing`.
    ///
    /// Each cell counts its spacing as a trailing margin, so one extra unit
    /// balances the row edges.
    #[must_use]
    pub fn row_budget(&self, bounds_width: f64) -> f64 {
        bounds_width + self.spacing
    }

    /// Upper bound on the scale factor, never below `1`.
    pub(crate) fn scale_cap(&self) -> f64 {
        if self.max_scale_factor.is_finite() {
            self.max_scale_factor.max(1.0)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Grid, GridId, GridMode};

    #[test]
    fn header_grid_is_pass_through() {
        let grid = Grid::header("header-a".to_string());
        assert!(grid.is_header());
        assert!(!grid.is_fill());
        assert_eq!(grid.min_row_height, 0.0);
        assert_eq!(grid.row_budget(320.0), 320.0);
    }

    #[test]
    fn scale_cap_never_shrinks() {
        let mut grid = Grid::header("h".to_string());
        grid.mode = GridMode::Fill;
        grid.max_scale_factor = 0.5;
        assert_eq!(grid.scale_cap(), 1.0);
        grid.max_scale_factor = f64::NAN;
        assert_eq!(grid.scale_cap(), 1.0);
        grid.max_scale_factor = 2.0;
        assert_eq!(grid.scale_cap(), 2.0);
    }

    #[test]
    fn grid_ids_round_trip_their_index() {
        assert_eq!(GridId::new(7).idx(), 7);
        assert!(GridId::new(1) < GridId::new(2));
    }
}
