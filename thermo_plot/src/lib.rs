//! Thermodynamics analysis of H5MD simulation output
//!
//! Reads temperature, pressure and potential energy series from an HDF5
//! file, reports their block averages, and optionally plots or dumps the
//! potential-energy trajectory.
//!
//! # Architecture
//!
//! ```text
//!  H5mdFile ──┐                     ┌──► EnergyDump   (append text table)
//!             ├─► AnalysisRunner ───┼──► EnergyPlot   (PNG / SVG)
//!  MemorySource┘   (thermo_core)    └──► AnalysisReport (log lines / JSON)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use thermo_plot::AnalysisRunner;
//! use thermo_core::RangeSelection;
//!
//! let report = AnalysisRunner::default()
//!     .with_range(RangeSelection::new(100, -1))
//!     .with_dump("epot.txt")
//!     .without_plot()
//!     .run_file("run.h5".as_ref())?;
//! println!("{}", report.to_json()?);
//! ```

mod error;
mod h5md;
mod source;
pub mod exporter;
pub mod runner;
pub mod visualizer;

pub use error::AnalysisError;
pub use exporter::{AnalysisReport, EnergyDump, ObservableSummary, SelectedRange, DUMP_HEADER};
pub use h5md::H5mdFile;
pub use runner::{AnalysisConfig, AnalysisRunner};
pub use source::{MemorySource, RunMetadata, ThermoSource};
pub use visualizer::EnergyPlot;
