//! Error types for the statistics layer.

use thiserror::Error;

/// Errors raised by range resolution and block averaging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// Block averaging needs at least two blocks to define an error bar
    #[error("Invalid block count {0}: at least 2 blocks are required")]
    InvalidBlockCount(usize),

    /// Fewer samples than the operation needs
    #[error("Insufficient samples: need at least {needed}, got {available}")]
    InsufficientSamples { needed: usize, available: usize },

    /// Range selection does not fit the series
    #[error("Range [{start}, {end}) out of bounds for series of length {len}")]
    RangeOutOfBounds { start: i64, end: i64, len: usize },
}

impl StatsError {
    /// Creates an insufficient-samples error.
    pub fn insufficient(needed: usize, available: usize) -> Self {
        Self::InsufficientSamples { needed, available }
    }
}
