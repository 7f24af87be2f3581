// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tiles --heading-base-level=0

//! Understory Tiles: justified tile rows for virtualized galleries.
//!
//! This crate packs a linear sequence of heterogeneous tiles (photos, cards,
//! header bands) into rows that fit a viewport width, like a "justified
//! gallery". It computes geometry only; it does not fetch or paint content.
//!
//! The core concepts are:
//!
//! - [`build_cells`]: flattens caller [`Segment`]s (grid segments and headers)
//!   into a [`CellSequence`]. Every segment gets one shared [`Grid`] policy
//!   (row height, spacing, [`GridMode`], stretch bound, margins), every header
//!   a private pass-through grid.
//! - [`compute_page`]: given a start index and a viewport width, determines row
//!   boundaries, per-row scale factors, and how many cells belong to the page.
//!   A sparse trailing row that the lookahead window cut short is deferred to
//!   the next page rather than rendered half-empty.
//! - [`PageSpecCache`]: memoizes pages per start index for the current
//!   viewport width.
//! - [`render_page`]: turns a [`PageSpec`] into [`GridBlock`]s of sized
//!   [`TileBox`]es, invoking a caller [`TileRenderer`] for each cell.
//! - [`TilesList`]: a small controller wiring the above together for a host.
//!
//! Host frameworks are responsible for:
//!
//! - Deciding which pages exist and requesting them in order, each next page
//!   starting at the previous page's [`PageSpec::end`].
//! - Calling [`PageSpecCache::invalidate`] (or [`TilesList::set_items`]) when
//!   the cells change.
//! - Painting the rendered nodes.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_tiles::{GridMode, GridSegment, HeaderItem, Segment, TileItem, TilesList};
//!
//! let photos = GridSegment::new("trip", GridMode::Fill, 200.0)
//!     .with_spacing(10.0)
//!     .with_items((0..5).map(|i| TileItem::new(format!("p{i}"), i, Size::new(300.0, 200.0))));
//!
//! let mut list = TilesList::new([
//!     Segment::from(HeaderItem::new("trip", 100)),
//!     Segment::from(photos),
//! ]);
//!
//! let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
//! let page = list.page_specification(0, viewport).unwrap();
//! assert_eq!(page.item_count(), 6);
//!
//! // The header is a row of its own; three photos fit in the next row, which
//! // is stretched by (1010 - 30) / (930 - 30) to span the viewport.
//! assert!(page.is_row_start(1));
//! assert!(page.is_row_start(4));
//! let scale = page.scale_factor(1);
//! assert!((scale - 980.0 / 900.0).abs() < 1e-9);
//!
//! let rendered = list
//!     .render_page(0, viewport, &mut |content: &i32, size: Size| (*content, size))
//!     .unwrap();
//! assert_eq!(rendered.blocks.len(), 2);
//! ```
//!
//! All sizes live in a caller-chosen coordinate space (typically logical
//! pixels) and are expected to be finite.
//!
//! ## Features
//!
//! - `std` *(default)*: enables `kurbo/std`.
//! - `libm`: enables `kurbo/libm` for `no_std` targets.
//! - `tracing`: emits `trace`/`debug` events from page computation and the cache.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod cells;
mod config;
mod error;
mod grid;
mod justify;
mod list;
mod page;
mod render;

pub use cache::PageSpecCache;
pub use cells::{Cell, CellSequence, GridSegment, HeaderItem, Segment, TileItem, build_cells};
pub use config::{DEFAULT_LOOKAHEAD, DEFAULT_MIN_FILL_PERCENT, JustifyConfig};
pub use error::LayoutError;
pub use grid::{DEFAULT_MAX_SCALE_FACTOR, Grid, GridId, GridMode};
pub use justify::compute_page;
pub use list::TilesList;
pub use page::{GridRun, PageSpec, Row};
pub use render::{
    BlockFlags, FlexStyle, GridBlock, RenderedPage, TileBox, TileFlags, TileRenderer, render_page,
};
