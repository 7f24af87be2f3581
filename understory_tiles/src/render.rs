// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render adapter: turning a [`PageSpec`] into sized boxes for a host to paint.
//!
//! The adapter does not paint anything. It resolves, for each cell of a page,
//! the final size and the style hints a flex-based host needs, and hands the
//! cell's content to a caller-supplied [`TileRenderer`].

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Insets, Size};

use crate::cells::{Cell, CellSequence};
use crate::grid::{Grid, GridId, GridMode};
use crate::page::PageSpec;

bitflags::bitflags! {
    /// Per-tile markers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TileFlags: u8 {
        /// The tile starts a row.
        const FIRST_IN_ROW = 0b0000_0001;
        /// The tile is a header band; its content sizes itself.
        const HEADER       = 0b0000_0010;
    }
}

bitflags::bitflags! {
    /// Per-grid-block markers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u8 {
        /// The cell before the page belongs to the same grid; no top margin.
        const OPEN_START = 0b0000_0001;
        /// The cell after the page belongs to the same grid; no bottom margin.
        const OPEN_END   = 0b0000_0010;
        /// The block lays out tiles in rows (any mode but [`GridMode::None`]).
        const TILED      = 0b0000_0100;
    }
}

/// Renders a cell's content into a box of a given size.
///
/// Implemented for any `FnMut(&T, Size) -> N`.
pub trait TileRenderer<T> {
    /// The host's visual node type.
    type Node;

    /// Renders `content` at its final size.
    ///
    /// Header cells are rendered with [`Size::ZERO`]; they manage their own sizing.
    fn render(&mut self, content: &T, size: Size) -> Self::Node;
}

impl<T, N, F> TileRenderer<T> for F
where
    F: FnMut(&T, Size) -> N,
{
    type Node = N;

    fn render(&mut self, content: &T, size: Size) -> N {
        self(content, size)
    }
}

/// Flex sizing for one tile along the row axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlexStyle {
    /// Flex grow factor.
    pub grow: f64,
    /// Flex shrink factor.
    pub shrink: f64,
    /// Flex basis: the unscaled tile width.
    pub basis: f64,
    /// Largest width the tile may grow to.
    pub max_width: f64,
}

impl FlexStyle {
    /// Style of a tile of `grid`, or `None` for header bands.
    ///
    /// Fill tiles grow and shrink in proportion to their aspect ratio, up to
    /// `max_scale_factor` times their basis (never less than the basis). Fit
    /// tiles stay at their basis.
    #[must_use]
    pub fn for_tile(grid: &Grid, aspect_ratio: f64) -> Option<Self> {
        let basis = aspect_ratio * grid.min_row_height;
        match grid.mode {
            GridMode::None => None,
            GridMode::Fit => Some(Self {
                grow: 0.0,
                shrink: 0.0,
                basis,
                max_width: basis,
            }),
            GridMode::Fill => Some(Self {
                grow: aspect_ratio,
                shrink: aspect_ratio,
                basis,
                max_width: basis * grid.scale_cap(),
            }),
        }
    }
}

/// One rendered cell.
#[derive(Clone, Debug, PartialEq)]
pub struct TileBox<N> {
    /// Absolute index of the cell.
    pub index: usize,
    /// Render key: `<grid key>-item-<cell key>`.
    pub key: String,
    /// Final size: the unscaled size times the row's scale factor.
    pub size: Size,
    /// Top padding, as a percentage of the width, that preserves the aspect
    /// ratio under reflow. `None` for headers.
    pub padding_top_percent: Option<f64>,
    /// Flex sizing. `None` for headers.
    pub flex: Option<FlexStyle>,
    /// Margin on every side of the tile: half the grid spacing.
    pub margin: f64,
    /// Markers.
    pub flags: TileFlags,
    /// The node produced by the [`TileRenderer`].
    pub node: N,
}

/// The tiles of one grid run within a page.
#[derive(Clone, Debug, PartialEq)]
pub struct GridBlock<N> {
    /// Key of the grid.
    pub key: String,
    /// The grid.
    pub grid: GridId,
    /// Container width: the viewport width plus grid spacing.
    pub width: f64,
    /// Container margins. Horizontal margins pull the container out by half
    /// the spacing; vertical margins collapse to zero at open edges.
    pub margin: Insets,
    /// Markers.
    pub flags: BlockFlags,
    /// Tiles in display order.
    pub tiles: Vec<TileBox<N>>,
}

/// A page ready for the host to materialize.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPage<N> {
    /// Absolute index of the first cell.
    pub start: usize,
    /// One block per grid run.
    pub blocks: Vec<GridBlock<N>>,
}

impl<N> RenderedPage<N> {
    /// Iterates over every tile of the page.
    pub fn tiles(&self) -> impl Iterator<Item = &TileBox<N>> {
        self.blocks.iter().flat_map(|block| block.tiles.iter())
    }
}

/// Renders the cells of `page` through `renderer`.
///
/// `cells` must be the sequence `page` was computed from. Blocks read the
/// cells immediately before and after the page to decide whether their
/// vertical margins collapse.
pub fn render_page<T, R>(
    cells: &CellSequence<T>,
    page: &PageSpec,
    renderer: &mut R,
) -> RenderedPage<R::Node>
where
    R: TileRenderer<T>,
{
    debug_assert!(
        page.end() <= cells.len(),
        "page {:?} does not belong to a sequence of {} cells",
        page.range(),
        cells.len()
    );
    let before = page.start().checked_sub(1).and_then(|i| cells.get(i));
    let after = cells.get(page.end());

    let runs = page.runs();
    let mut blocks = Vec::with_capacity(runs.len());
    for (n, run) in runs.iter().enumerate() {
        let run_end = runs.get(n + 1).map_or(page.end(), |next| next.start);
        let grid = cells.grid(run.grid);

        let mut flags = BlockFlags::empty();
        flags.set(BlockFlags::TILED, !grid.is_header());
        flags.set(BlockFlags::OPEN_START, in_grid(before, run.grid));
        flags.set(BlockFlags::OPEN_END, in_grid(after, run.grid));

        let half = grid.spacing / 2.0;
        let margin = Insets::new(
            -half,
            if flags.contains(BlockFlags::OPEN_START) {
                0.0
            } else {
                grid.margin_top - half
            },
            -half,
            if flags.contains(BlockFlags::OPEN_END) {
                0.0
            } else {
                grid.margin_bottom - half
            },
        );

        let run_cells = cells.cells().get(run.start..run_end).unwrap_or(&[]);
        let tiles = run_cells
            .iter()
            .zip(run.start..)
            .map(|(cell, index)| render_tile(cell, index, grid, page, renderer))
            .collect();

        blocks.push(GridBlock {
            key: grid.key.clone(),
            grid: run.grid,
            width: run.width,
            margin,
            flags,
            tiles,
        });
    }

    RenderedPage {
        start: page.start(),
        blocks,
    }
}

fn render_tile<T, R>(
    cell: &Cell<T>,
    index: usize,
    grid: &Grid,
    page: &PageSpec,
    renderer: &mut R,
) -> TileBox<R::Node>
where
    R: TileRenderer<T>,
{
    let size = page.final_size(index).unwrap_or(Size::ZERO);
    let mut flags = TileFlags::empty();
    flags.set(TileFlags::FIRST_IN_ROW, page.is_row_start(index));

    let key = format!("{}-item-{}", grid.key, cell.key);
    if grid.is_header() {
        flags.insert(TileFlags::HEADER);
        return TileBox {
            index,
            key,
            size,
            padding_top_percent: None,
            flex: None,
            margin: 0.0,
            flags,
            node: renderer.render(&cell.content, Size::ZERO),
        };
    }

    let aspect = cell.effective_aspect();
    TileBox {
        index,
        key,
        size,
        padding_top_percent: Some(100.0 / aspect),
        flex: FlexStyle::for_tile(grid, aspect),
        margin: grid.spacing / 2.0,
        flags,
        node: renderer.render(&cell.content, size),
    }
}

fn in_grid<T>(cell: Option<&Cell<T>>, grid: GridId) -> bool {
    cell.is_some_and(|cell| cell.grid == grid)
}
