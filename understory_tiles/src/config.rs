// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for page computation.

/// Maximum number of cells examined from a page's start index.
///
/// A page never spans more cells than this, which keeps the cost of one page
/// computation bounded regardless of the total sequence length.
pub const DEFAULT_LOOKAHEAD: usize = 100;

/// Fraction of the row budget below which a trailing row is deferred to the
/// next page, when its grid continues past the lookahead window.
pub const DEFAULT_MIN_FILL_PERCENT: f64 = 0.9;

/// Configuration for [`compute_page`](crate::compute_page).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JustifyConfig {
    /// Maximum number of cells examined per page. Always at least `1`.
    pub lookahead: usize,
    /// Minimum fill fraction of a trailing row cut off by the lookahead window.
    pub min_fill: f64,
}

impl JustifyConfig {
    /// The default configuration.
    pub const DEFAULT: Self = Self {
        lookahead: DEFAULT_LOOKAHEAD,
        min_fill: DEFAULT_MIN_FILL_PERCENT,
    };

    /// Sets the lookahead cap. `0` is treated as `1`.
    #[must_use]
    pub const fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = if lookahead == 0 { 1 } else { lookahead };
        self
    }

    /// Sets the minimum fill fraction of a trailing row.
    #[must_use]
    pub const fn with_min_fill(mut self, min_fill: f64) -> Self {
        self.min_fill = min_fill;
        self
    }

    pub(crate) const fn effective_lookahead(&self) -> usize {
        if self.lookahead == 0 { 1 } else { self.lookahead }
    }
}

impl Default for JustifyConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LOOKAHEAD, DEFAULT_MIN_FILL_PERCENT, JustifyConfig};

    #[test]
    fn defaults_match_constants() {
        let config = JustifyConfig::default();
        assert_eq!(config.lookahead, DEFAULT_LOOKAHEAD);
        assert_eq!(config.min_fill, DEFAULT_MIN_FILL_PERCENT);
    }

    #[test]
    fn zero_lookahead_is_clamped() {
        assert_eq!(JustifyConfig::default().with_lookahead(0).effective_lookahead(), 1);
        let raw = JustifyConfig {
            lookahead: 0,
            min_fill: 0.5,
        };
        assert_eq!(raw.effective_lookahead(), 1);
    }
}
