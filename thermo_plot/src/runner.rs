//! Analysis runner - reads observables, reduces them, dumps and plots.

use crate::error::AnalysisError;
use crate::exporter::{AnalysisReport, EnergyDump, ObservableSummary, SelectedRange};
use crate::h5md::H5mdFile;
use crate::source::ThermoSource;
use crate::visualizer::EnergyPlot;

use std::path::{Path, PathBuf};
use thermo_core::{block_average, Accumulator, Observable, RangeSelection, DEFAULT_BLOCKS};
use tracing::{debug, info};

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Number of blocks for block averaging
    pub blocks: usize,

    /// Window applied to every series
    pub range: RangeSelection,

    /// File to append the (time, E_pot) table to
    pub dump: Option<PathBuf>,

    /// Render the potential-energy plot
    pub plot: bool,

    /// Plot image path; derived from the input name if unset
    pub plot_output: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            blocks: DEFAULT_BLOCKS,
            range: RangeSelection::full(),
            dump: None,
            plot: true,
            plot_output: None,
        }
    }
}

/// Runs the analysis pipeline with a fixed configuration.
pub struct AnalysisRunner {
    config: AnalysisConfig,
}

impl Default for AnalysisRunner {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisRunner {
    /// Creates a runner from a configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Sets the block count.
    pub fn with_blocks(mut self, blocks: usize) -> Self {
        self.config.blocks = blocks;
        self
    }

    /// Sets the sample window.
    pub fn with_range(mut self, range: RangeSelection) -> Self {
        self.config.range = range;
        self
    }

    /// Appends the energy table to `path`.
    pub fn with_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dump = Some(path.into());
        self
    }

    /// Writes the plot to `path`.
    pub fn with_plot_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.plot = true;
        self.config.plot_output = Some(path.into());
        self
    }

    /// Disables plotting.
    pub fn without_plot(mut self) -> Self {
        self.config.plot = false;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Opens `path`, analyses it and closes it again.
    pub fn run_file(&self, path: &Path) -> Result<AnalysisReport, AnalysisError> {
        let file = H5mdFile::open(path)?;
        let report = self.run(&file, &path.display().to_string());
        let closed = file.close();

        // A failed run takes precedence over a failed close
        let report = report?;
        closed?;
        Ok(report)
    }

    /// Analyses the observables of `source`, labelled `input` in output.
    pub fn run<S: ThermoSource>(
        &self,
        source: &S,
        input: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        let metadata = source.metadata()?;
        for line in metadata.summary_lines() {
            info!("{}", line);
        }

        let mut observables = Vec::new();
        for observable in Observable::averaged() {
            observables.push(self.reduce(source, observable)?);
        }

        let time = source.series(Observable::Time)?;
        let energy = source.series(Observable::PotentialEnergy)?;
        if time.len() != energy.len() {
            return Err(AnalysisError::LengthMismatch {
                left: Observable::Time.dataset().to_string(),
                left_len: time.len(),
                right: Observable::PotentialEnergy.dataset().to_string(),
                right_len: energy.len(),
            });
        }

        let window = self.config.range.resolve(energy.len())?;
        let time = &time.samples()[window.clone()];
        let energy = &energy.samples()[window.clone()];

        let dump = match &self.config.dump {
            Some(path) => {
                EnergyDump::new(time, energy).append_to_file(path)?;
                info!("Appended {} samples to {}", time.len(), path.display());
                Some(path.display().to_string())
            }
            None => None,
        };

        let plot = if self.config.plot {
            let path = self
                .config
                .plot_output
                .clone()
                .unwrap_or_else(|| default_plot_path(input));
            let mean = observables
                .iter()
                .find(|s| s.observable == Observable::PotentialEnergy)
                .map(|s| s.average.mean)
                .unwrap_or(f64::NAN);

            if EnergyPlot::new(time, energy, mean, input).render(&path)? {
                info!("Plot written to {}", path.display());
                Some(path.display().to_string())
            } else {
                None
            }
        } else {
            None
        };

        Ok(AnalysisReport {
            input: input.to_string(),
            metadata,
            range: SelectedRange {
                start: window.start,
                end: window.end,
                samples: window.len(),
            },
            blocks: self.config.blocks,
            observables,
            dump,
            plot,
        })
    }

    fn reduce<S: ThermoSource>(
        &self,
        source: &S,
        observable: Observable,
    ) -> Result<ObservableSummary, AnalysisError> {
        let series = source.series(observable)?;
        let window = self.config.range.apply(series.samples())?;
        let average = block_average(window, self.config.blocks)?;

        let naive_error = window.iter().copied().collect::<Accumulator>().std_error().ok();

        info!("{}: {}", observable.label(), average);
        debug!(
            "  {} blocks of {} samples, {} discarded, naive error {:?}",
            average.blocks, average.block_len, average.discarded, naive_error
        );

        Ok(ObservableSummary {
            observable,
            dataset: observable.dataset().to_string(),
            average,
            naive_error,
        })
    }
}

/// `<input stem>_epot.png` in the working directory.
pub fn default_plot_path(input: &str) -> PathBuf {
    let stem = Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "plot".to_string());
    PathBuf::from(format!("{}_epot.png", stem))
}
