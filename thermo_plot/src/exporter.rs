//! Text dump and JSON report export.
//!
//! The dump is a gnuplot-friendly two-column table appended to a file so
//! that several runs collect into one data file, each run forming its own
//! data block.

use crate::error::AnalysisError;
use crate::source::RunMetadata;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use thermo_core::{BlockAverage, Observable};

/// Header line preceding each dumped block.
pub const DUMP_HEADER: &str = "# time   E_pot(t)";

/// Paired (time, potential energy) samples for dumping.
#[derive(Debug, Clone, Copy)]
pub struct EnergyDump<'a> {
    pub time: &'a [f64],
    pub energy: &'a [f64],
}

impl<'a> EnergyDump<'a> {
    pub fn new(time: &'a [f64], energy: &'a [f64]) -> Self {
        Self { time, energy }
    }

    /// Writes header, rows and the two-line block separator.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", DUMP_HEADER)?;
        for (t, e) in self.time.iter().zip(self.energy) {
            writeln!(writer, "{:.18e} {:.18e}", t, e)?;
        }
        writeln!(writer, "\n")
    }

    /// Appends to `path`, creating the file if needed.
    pub fn append_to_file(&self, path: &Path) -> Result<(), AnalysisError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AnalysisError::dump(path, e))?;

        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| AnalysisError::dump(path, e))
    }
}

/// Statistics of one averaged observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableSummary {
    pub observable: Observable,

    /// Dataset the samples came from
    pub dataset: String,

    /// Block-averaged mean and error
    #[serde(flatten)]
    pub average: BlockAverage,

    /// Error of the mean if samples were uncorrelated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naive_error: Option<f64>,
}

/// Resolved sample window of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedRange {
    pub start: usize,
    pub end: usize,
    pub samples: usize,
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Input file path
    pub input: String,

    pub metadata: RunMetadata,

    /// Window applied to every series
    pub range: SelectedRange,

    /// Block count used for every observable
    pub blocks: usize,

    pub observables: Vec<ObservableSummary>,

    /// Dump file appended to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump: Option<String>,

    /// Plot image written, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
}

impl AnalysisReport {
    /// Looks up the summary of one observable.
    pub fn get(&self, observable: Observable) -> Option<&ObservableSummary> {
        self.observables.iter().find(|s| s.observable == observable)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
