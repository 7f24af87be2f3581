// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small controller that owns the cell sequence and its page cache.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Rect;

use crate::cache::PageSpecCache;
use crate::cells::{CellSequence, Segment, build_cells};
use crate::config::JustifyConfig;
use crate::error::LayoutError;
use crate::page::PageSpec;
use crate::render::{RenderedPage, TileRenderer, render_page};

/// Controller for a justified tile list.
///
/// This type:
/// - owns the [`CellSequence`] built from the caller's segments,
/// - owns a [`PageSpecCache`] and invalidates it whenever the cells change,
/// - answers page requests from a virtualizing host and renders pages.
///
/// It does *not* decide which pages exist; host frameworks drive that and call
/// [`TilesList::page_specification`] once per page.
#[derive(Debug)]
pub struct TilesList<T> {
    cells: CellSequence<T>,
    cache: PageSpecCache,
}

impl<T> TilesList<T> {
    /// Creates a list over `items` with the default [`JustifyConfig`].
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Segment<T>>,
    {
        Self::with_config(items, JustifyConfig::default())
    }

    /// Creates a list over `items` that computes pages with `config`.
    pub fn with_config<I>(items: I, config: JustifyConfig) -> Self
    where
        I: IntoIterator<Item = Segment<T>>,
    {
        Self {
            cells: build_cells(items),
            cache: PageSpecCache::with_config(config),
        }
    }

    /// Replaces the items, rebuilding the cells and discarding cached pages.
    pub fn set_items<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Segment<T>>,
    {
        self.cells = build_cells(items);
        self.cache.invalidate();
    }

    /// Replaces the page configuration, discarding cached pages if it changed.
    pub fn set_config(&mut self, config: JustifyConfig) {
        self.cache.set_config(config);
    }

    /// Returns the cells.
    #[must_use]
    pub const fn cells(&self) -> &CellSequence<T> {
        &self.cells
    }

    /// Returns the page cache.
    #[must_use]
    pub const fn cache(&self) -> &PageSpecCache {
        &self.cache
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

    /// Returns the page starting at `start` for the given viewport.
    ///
    /// Only the viewport's width is consulted.
    ///
    /// # Errors
    ///
    /// See [`compute_page`](crate::compute_page).
    pub fn page_specification(
        &mut self,
        start: usize,
        viewport: Rect,
    ) -> Result<&PageSpec, LayoutError> {
        self.cache.get(&self.cells, start, viewport.width())
    }

    /// Computes (or reuses) the page starting at `start` and renders it.
    ///
    /// # Errors
    ///
    /// See [`compute_page`](crate::compute_page).
    pub fn render_page<R>(
        &mut self,
        start: usize,
        viewport: Rect,
        renderer: &mut R,
    ) -> Result<RenderedPage<R::Node>, LayoutError>
    where
        R: TileRenderer<T>,
    {
        let page = self.cache.get(&self.cells, start, viewport.width())?;
        Ok(render_page(&self.cells, page, renderer))
    }

    /// Splits the whole sequence into consecutive pages for `width`.
    ///
    /// Each page starts where the previous one ended, so cells deferred by a
    /// page are offered again at the head of the next.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidWidth`] if `width` is not finite and positive.
    pub fn page_ranges(&mut self, width: f64) -> Result<Vec<Range<usize>>, LayoutError> {
        LayoutError::check_width(width)?;
        let mut ranges = Vec::new();
        let mut start = 0;
        while start < self.cells.len() {
            let range = self.cache.get(&self.cells, start, width)?.range();
            debug_assert!(!range.is_empty(), "pages always make progress");
            start = range.end;
            ranges.push(range);
        }
        Ok(ranges)
    }
}
