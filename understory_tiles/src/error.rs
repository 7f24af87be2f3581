// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported for caller contract violations.

/// A page request that cannot be laid out.
///
/// These are never recovered internally: a request either succeeds in full or
/// is rejected before any work is done.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The viewport width was not a finite, positive number.
    #[error("viewport width must be finite and positive, got {width}")]
    InvalidWidth {
        /// The rejected width.
        width: f64,
    },
    /// The start index does not name a cell.
    #[error("start index {start} is out of bounds for {len} cells")]
    StartOutOfBounds {
        /// The rejected start index.
        start: usize,
        /// Number of cells in the sequence.
        len: usize,
    },
}

impl LayoutError {
    pub(crate) fn check_width(width: f64) -> Result<(), Self> {
        if width.is_finite() && width > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidWidth { width })
        }
    }
}
