// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoization of [`PageSpec`]s per start index for one viewport width.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::cells::CellSequence;
use crate::config::JustifyConfig;
use crate::error::LayoutError;
use crate::justify::compute_page;
use crate::page::PageSpec;

/// Caches computed pages by start index, scoped to a single viewport width.
///
/// - A request with a different width discards every entry before computing.
/// - A repeated request for a start index under the current width is served
///   from the cache without running the packing algorithm again.
///
/// The cache does not observe the cells it is queried with. Hosts must call
/// [`PageSpecCache::invalidate`] whenever the [`CellSequence`] changes.
#[derive(Debug, Default)]
pub struct PageSpecCache {
    config: JustifyConfig,
    width: Option<f64>,
    by_index: HashMap<usize, PageSpec>,
    computations: u64,
}

impl PageSpecCache {
    /// Creates an empty cache using the default [`JustifyConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache that computes pages with `config`.
    #[must_use]
    pub fn with_config(config: JustifyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration pages are computed with.
    #[must_use]
    pub const fn config(&self) -> &JustifyConfig {
        &self.config
    }

    /// Replaces the configuration, discarding all entries if it changed.
    pub fn set_config(&mut self, config: JustifyConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    /// Width the cached entries were computed for, if any.
    #[must_use]
    pub const fn width(&self) -> Option<f64> {
        self.width
    }

    /// Number of cached pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    /// Returns `true` if no pages are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Number of times the packing algorithm ran on behalf of this cache.
    #[must_use]
    pub const fn computations(&self) -> u64 {
        self.computations
    }

    /// Discards every entry and forgets the current width.
    ///
    /// Call this whenever the underlying cell sequence changes.
    pub fn invalidate(&mut self) {
        self.by_index.clear();
        self.width = None;
    }

    /// Records a re-measured viewport width.
    ///
    /// Entries survive if the width is unchanged; otherwise they are discarded.
    /// Returns `true` if entries were discarded.
    pub fn set_width(&mut self, width: f64) -> bool {
        if self.width == Some(width) {
            return false;
        }
        #[cfg(feature = "tracing")]
        if let Some(previous) = self.width {
            tracing::debug!(
                previous,
                width,
                discarded = self.by_index.len(),
                "viewport width changed"
            );
        }
        self.by_index.clear();
        self.width = Some(width);
        true
    }

    /// Returns the cached page starting at `start`, without computing it.
    #[must_use]
    pub fn peek(&self, start: usize) -> Option<&PageSpec> {
        self.by_index.get(&start)
    }

    /// Returns the page starting at `start` for `bounds_width`, computing it if needed.
    ///
    /// # Errors
    ///
    /// Returns the [`LayoutError`] of [`compute_page`]. Failed requests leave
    /// the cache untouched.
    pub fn get<T>(
        &mut self,
        cells: &CellSequence<T>,
        start: usize,
        bounds_width: f64,
    ) -> Result<&PageSpec, LayoutError> {
        LayoutError::check_width(bounds_width)?;
        let len = cells.len();
        if start >= len {
            return Err(LayoutError::StartOutOfBounds { start, len });
        }
        self.set_width(bounds_width);
        match self.by_index.entry(start) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let page = compute_page(cells, start, bounds_width, &self.config)?;
                self.computations += 1;
                Ok(entry.insert(page))
            }
        }
    }
}
