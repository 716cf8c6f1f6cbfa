//! Error types for the analysis driver.

use std::path::Path;
use thermo_core::StatsError;
use thiserror::Error;

/// Errors that abort an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input file missing, unreadable or not HDF5
    #[error("Cannot open input file {path}: {reason}")]
    Open { path: String, reason: String },

    /// Releasing the input file handle failed
    #[error("Failed to close input file {path}: {reason}")]
    Close { path: String, reason: String },

    /// Expected group, attribute or dataset is absent
    #[error("Missing key '{key}' in input file: {reason}")]
    MissingKey { key: String, reason: String },

    /// Key exists but holds the wrong type or shape
    #[error("Unexpected shape or type for '{key}': {reason}")]
    BadShape { key: String, reason: String },

    /// Abscissa and ordinate of the plotted series disagree
    #[error("Length mismatch: {left} has {left_len} samples but {right} has {right_len}")]
    LengthMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },

    /// Range or block-averaging failure
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Appending to the dump file failed
    #[error("Failed to write dump file {path}: {source}")]
    Dump {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Rendering the plot failed
    #[error("Plot error: {0}")]
    Plot(String),
}

impl AnalysisError {
    /// Creates an open error.
    pub fn open(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::Open {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a close error.
    pub fn close(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::Close {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a missing-key error.
    pub fn missing(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MissingKey {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a bad-shape error.
    pub fn bad_shape(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::BadShape {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a dump error.
    pub fn dump(path: &Path, source: std::io::Error) -> Self {
        Self::Dump {
            path: path.display().to_string(),
            source,
        }
    }
}
