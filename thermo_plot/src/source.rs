//! Input abstraction for the analysis driver.
//!
//! The driver only needs run metadata and whole observable series. Keeping
//! that behind a trait lets the same driver run against an HDF5 file in
//! production and against in-memory data in tests.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thermo_core::block_average::format_general;
use thermo_core::{Observable, ObservableSeries};

/// Simulation parameters stored alongside the observables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Particle count per species
    pub particles: Vec<u64>,

    /// Name of the force group in the parameter tree
    pub force: String,

    /// Potential cutoff radius (one entry per species pair)
    pub cutoff: Vec<f64>,

    /// Edge lengths of the periodic simulation box
    pub box_length: Vec<f64>,

    /// Number density
    pub density: f64,
}

impl RunMetadata {
    /// One-line summaries in display order.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Particles: {}", join(self.particles.iter().map(u64::to_string))),
            format!("Force cutoff: {}", join(self.cutoff.iter().map(|c| format_general(*c, 6)))),
            format!("Box size: {}", join(self.box_length.iter().map(|l| format_general(*l, 6)))),
            format!("Density: {}", format_general(self.density, 6)),
        ]
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

/// Anything the driver can read observables from.
pub trait ThermoSource {
    /// Reads the simulation parameters.
    fn metadata(&self) -> Result<RunMetadata, AnalysisError>;

    /// Reads the complete series of one observable.
    fn series(&self, observable: Observable) -> Result<ObservableSeries, AnalysisError>;
}

/// In-memory source, mostly for tests and library callers with
/// already-loaded data.
#[derive(Debug, Clone)]
pub struct MemorySource {
    metadata: RunMetadata,
    series: HashMap<Observable, Vec<f64>>,
}

impl MemorySource {
    pub fn new(metadata: RunMetadata) -> Self {
        Self {
            metadata,
            series: HashMap::new(),
        }
    }

    /// Adds or replaces the samples of one observable.
    pub fn with_series(mut self, observable: Observable, samples: Vec<f64>) -> Self {
        self.series.insert(observable, samples);
        self
    }
}

impl ThermoSource for MemorySource {
    fn metadata(&self) -> Result<RunMetadata, AnalysisError> {
        Ok(self.metadata.clone())
    }

    fn series(&self, observable: Observable) -> Result<ObservableSeries, AnalysisError> {
        self.series
            .get(&observable)
            .map(|samples| ObservableSeries::new(observable, samples.clone()))
            .ok_or_else(|| AnalysisError::missing(observable.dataset(), "dataset not present"))
    }
}
