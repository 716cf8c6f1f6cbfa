//! Thermodynamic time-series statistics
//!
//! This crate holds the pure computation behind `plot-h5md`:
//! - **Observables**: the recorded quantities and their dataset names
//! - **Range selection**: Python-style start/end windows over a series
//! - **Block averaging**: mean and correlation-aware standard error
//!
//! Nothing in here touches the filesystem. Reading HDF5 input, plotting
//! and dumping live in `thermo_plot`.
//!
//! # Block Averaging
//!
//! ```text
//!  samples:  x0 x1 x2 x3 x4 x5 x6 x7 x8 x9 x10
//!            └──┬──┘ └──┬──┘ └──┬──┘           (B = 3, len = 3, x9..x10 dropped)
//!  blocks:     m0      m1      m2
//!  error:    std(m0, m1, m2) / sqrt(B - 1)
//! ```
//!
//! # Usage
//!
//! ```
//! use thermo_core::{block_average, RangeSelection};
//!
//! let series: Vec<f64> = (1..=20).map(f64::from).collect();
//! let window = RangeSelection::full().apply(&series).unwrap();
//! let avg = block_average(window, 10).unwrap();
//! assert_eq!(avg.mean, 10.5);
//! ```

mod error;
mod observable;
mod range;
pub mod accumulator;
pub mod block_average;

pub use accumulator::Accumulator;
pub use block_average::{block_average, BlockAverage, DEFAULT_BLOCKS};
pub use error::StatsError;
pub use observable::{Observable, ObservableSeries};
pub use range::RangeSelection;
