// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell model: flattening caller segments and headers into one linear sequence.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Size;

use crate::grid::{DEFAULT_MAX_SCALE_FACTOR, Grid, GridId, GridMode};

/// One tile offered by the caller inside a [`GridSegment`].
#[derive(Clone, Debug, PartialEq)]
pub struct TileItem<T> {
    /// Stable identifier, unique within the segment.
    pub key: String,
    /// Caller-owned payload. Never inspected by the layout.
    pub content: T,
    /// Natural size of the tile, used only for its aspect ratio.
    ///
    /// Missing or degenerate sizes lay the tile out as a square.
    pub desired_size: Option<Size>,
}

impl<T> TileItem<T> {
    /// Creates a tile with a natural size.
    pub fn new(key: impl Into<String>, content: T, desired_size: Size) -> Self {
        Self {
            key: key.into(),
            content,
            desired_size: Some(desired_size),
        }
    }

    /// Creates a tile without size information.
    pub fn without_size(key: impl Into<String>, content: T) -> Self {
        Self {
            key: key.into(),
            content,
            desired_size: None,
        }
    }

    /// Width over height of the natural size, or `1` when it is unknown.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.desired_size.map_or(1.0, aspect_of)
    }
}

/// A run of tiles laid out under one shared [`Grid`] policy.
///
/// Optional fields fall back to the defaults documented on each builder method.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSegment<T> {
    /// Segment key. The resulting grid is keyed `grid-<key>`.
    pub key: String,
    /// Packing policy.
    pub mode: GridMode,
    /// Target row height.
    pub min_row_height: f64,
    /// Gap around each tile. Defaults to `0`.
    pub spacing: Option<f64>,
    /// Stretch bound for fill rows. Defaults to [`DEFAULT_MAX_SCALE_FACTOR`].
    pub max_scale_factor: Option<f64>,
    /// Space before the first row. Defaults to `0`.
    pub margin_top: Option<f64>,
    /// Space after the last row. Defaults to `0`.
    pub margin_bottom: Option<f64>,
    /// The tiles, in display order.
    pub items: Vec<TileItem<T>>,
}

impl<T> GridSegment<T> {
    /// Creates an empty segment with default spacing, margins, and stretch bound.
    pub fn new(key: impl Into<String>, mode: GridMode, min_row_height: f64) -> Self {
        Self {
            key: key.into(),
            mode,
            min_row_height,
            spacing: None,
            max_scale_factor: None,
            margin_top: None,
            margin_bottom: None,
            items: Vec::new(),
        }
    }

    /// Sets the gap around each tile.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Sets the stretch bound for fill rows.
    #[must_use]
    pub fn with_max_scale_factor(mut self, max_scale_factor: f64) -> Self {
        self.max_scale_factor = Some(max_scale_factor);
        self
    }

    /// Sets the space before the first and after the last row.
    #[must_use]
    pub fn with_margins(mut self, top: f64, bottom: f64) -> Self {
        self.margin_top = Some(top);
        self.margin_bottom = Some(bottom);
        self
    }

    /// Replaces the tiles of this segment.
    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = TileItem<T>>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Appends a tile.
    pub fn push(&mut self, item: TileItem<T>) {
        self.items.push(item);
    }

    fn grid(&self) -> Grid {
        Grid {
            key: format!("grid-{}", self.key),
            mode: self.mode,
            min_row_height: non_negative(self.min_row_height),
            spacing: non_negative(self.spacing.unwrap_or(0.0)),
            max_scale_factor: self.max_scale_factor.unwrap_or(DEFAULT_MAX_SCALE_FACTOR),
            margin_top: self.margin_top.unwrap_or(0.0),
            margin_bottom: self.margin_bottom.unwrap_or(0.0),
        }
    }
}

/// A full-width header band occupying a row of its own.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderItem<T> {
    /// Header key. The cell and its private grid are keyed `header-<key>`.
    pub key: String,
    /// Caller-owned payload.
    pub content: T,
}

impl<T> HeaderItem<T> {
    /// Creates a header.
    pub fn new(key: impl Into<String>, content: T) -> Self {
        Self {
            key: key.into(),
            content,
        }
    }
}

/// One input record: either a grid segment or a header.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment<T> {
    /// A run of tiles sharing one grid.
    Grid(GridSegment<T>),
    /// A single header band.
    Header(HeaderItem<T>),
}

impl<T> From<GridSegment<T>> for Segment<T> {
    fn from(segment: GridSegment<T>) -> Self {
        Self::Grid(segment)
    }
}

impl<T> From<HeaderItem<T>> for Segment<T> {
    fn from(header: HeaderItem<T>) -> Self {
        Self::Header(header)
    }
}

/// One tile to be laid out.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell<T> {
    /// Stable identifier.
    pub key: String,
    /// Caller-owned payload.
    pub content: T,
    /// Width over height; always finite and positive when built by [`build_cells`].
    pub aspect_ratio: f64,
    /// Handle of the owning grid.
    pub grid: GridId,
}

impl<T> Cell<T> {
    /// The aspect ratio used for layout: [`Cell::aspect_ratio`] if it is finite
    /// and positive, `1` otherwise.
    #[must_use]
    pub fn effective_aspect(&self) -> f64 {
        if self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0 {
            self.aspect_ratio
        } else {
            1.0
        }
    }
}

/// The flattened, ordered cells together with the grids they reference.
///
/// Cells that share a [`GridId`] are contiguous.
#[derive(Clone, Debug, PartialEq)]
pub struct CellSequence<T> {
    cells: Vec<Cell<T>>,
    grids: Vec<Grid>,
}

impl<T> Default for CellSequence<T> {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            grids: Vec::new(),
        }
    }
}

impl<T> CellSequence<T> {
    /// Assembles a sequence from cells and the grids they reference.
    ///
    /// Cells sharing a grid must be contiguous, and every [`GridId`] must index
    /// into `grids`. [`build_cells`] upholds both; hosts assembling sequences by
    /// hand are responsible for them.
    pub fn from_parts(cells: Vec<Cell<T>>, grids: Vec<Grid>) -> Self {
        debug_assert!(
            cells.iter().all(|cell| cell.grid.idx() < grids.len()),
            "every cell must reference one of the supplied grids"
        );
        Self { cells, grids }
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if there are no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells, in display order.
    #[must_use]
    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    /// Returns the cell at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Cell<T>> {
        self.cells.get(index)
    }

    /// All grids, in build order (including grids of empty segments).
    #[must_use]
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    /// Resolves a grid handle produced by this sequence.
    ///
    /// # Panics
    ///
    /// Panics if `id` was produced by a different sequence with more grids.
    #[must_use]
    pub fn grid(&self, id: GridId) -> &Grid {
        &self.grids[id.idx()]
    }

    /// The grid of the cell at `index`.
    #[must_use]
    pub fn grid_of(&self, index: usize) -> Option<&Grid> {
        self.cells.get(index).map(|cell| self.grid(cell.grid))
    }

    /// Returns `true` if the cells at `a` and `b` both exist and share a grid.
    #[must_use]
    pub fn same_grid(&self, a: usize, b: usize) -> bool {
        match (self.cells.get(a), self.cells.get(b)) {
            (Some(a), Some(b)) => a.grid == b.grid,
            _ => false,
        }
    }
}

/// Flattens segments and headers into a [`CellSequence`].
///
/// Output order equals input order. Each grid segment gets one shared grid,
/// each header a private [`GridMode::None`] grid.
pub fn build_cells<T, I>(items: I) -> CellSequence<T>
where
    I: IntoIterator<Item = Segment<T>>,
{
    let mut out = CellSequence::default();
    for item in items {
        let grid = GridId::new(out.grids.len());
        match item {
            Segment::Grid(segment) => {
                out.grids.push(segment.grid());
                out.cells.reserve(segment.items.len());
                for tile in segment.items {
                    let aspect_ratio = tile.aspect_ratio();
                    out.cells.push(Cell {
                        key: tile.key,
                        content: tile.content,
                        aspect_ratio,
                        grid,
                    });
                }
            }
            Segment::Header(header) => {
                let key = format!("header-{}", header.key);
                out.grids.push(Grid::header(key.clone()));
                out.cells.push(Cell {
                    key,
                    content: header.content,
                    aspect_ratio: 1.0,
                    grid,
                });
            }
        }
    }
    out
}

fn aspect_of(size: Size) -> f64 {
    let ratio = size.width / size.height;
    if size.width > 0.0 && size.height > 0.0 && ratio.is_finite() {
        ratio
    } else {
        1.0
    }
}

fn non_negative(value: f64) -> f64 {
    debug_assert!(value.is_finite(), "grid lengths must be finite; got {value:?}");
    if value.is_sign_negative() { 0.0 } else { value }
}
