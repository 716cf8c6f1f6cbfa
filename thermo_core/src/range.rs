//! Range selection over a recorded series.
//!
//! Bounds follow the usual start/end convention with one twist for the
//! end index: a negative end counts back from *one past* the last sample,
//! so `-1` selects through the final sample and `(0, -1)` is the whole
//! series.

use crate::error::StatsError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A `[start, end)` window into a series, possibly relative to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSelection {
    pub start: i64,
    pub end: i64,
}

impl Default for RangeSelection {
    fn default() -> Self {
        Self::full()
    }
}

impl RangeSelection {
    /// Creates a selection from raw bounds.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// The whole series.
    pub fn full() -> Self {
        Self { start: 0, end: -1 }
    }

    /// Resolves the selection to concrete indices for a series of `len`.
    pub fn resolve(&self, len: usize) -> Result<Range<usize>, StatsError> {
        let out_of_bounds = || StatsError::RangeOutOfBounds {
            start: self.start,
            end: self.end,
            len,
        };
        let n = i64::try_from(len).map_err(|_| out_of_bounds())?;

        let start = if self.start < 0 { n + self.start } else { self.start };
        let end = if self.end < 0 { n + 1 + self.end } else { self.end };

        if start < 0 || end < start || end > n {
            return Err(out_of_bounds());
        }

        Ok(start as usize..end as usize)
    }

    /// Returns the selected window of `samples`.
    pub fn apply<'a>(&self, samples: &'a [f64]) -> Result<&'a [f64], StatsError> {
        let range = self.resolve(samples.len())?;
        Ok(&samples[range])
    }

    /// True if this is the default whole-series selection.
    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }
}
