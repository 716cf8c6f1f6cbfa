//! plot-h5md CLI
//!
//! Block-average thermodynamic observables of an H5MD file and plot the
//! potential energy over time.

use clap::Parser;
use std::path::PathBuf;
use thermo_core::{RangeSelection, DEFAULT_BLOCKS};
use thermo_plot::{AnalysisConfig, AnalysisRunner};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

/// Analyse H5MD thermodynamic observables
#[derive(Parser, Debug)]
#[command(name = "plot-h5md")]
#[command(about = "Block-average TEMP, PRESS and EPOT from an H5MD file and plot E_pot(t)", long_about = None)]
struct Args {
    /// H5MD input file with data for state variables
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Select range of data points (negative END counts back from the last sample)
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
    range: Option<Vec<i64>>,

    /// Dump plot data to filename (appends)
    #[arg(long, value_name = "FILENAME")]
    dump: Option<PathBuf>,

    /// Do not produce plots, but do the analysis
    #[arg(long)]
    no_plot: bool,

    /// Number of blocks for error estimation
    #[arg(short, long, default_value_t = DEFAULT_BLOCKS)]
    blocks: usize,

    /// Plot image path (.png or .svg), default <input stem>_epot.png
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> AnalysisConfig {
        let range = match self.range.as_deref() {
            Some([start, end]) => RangeSelection::new(*start, *end),
            _ => RangeSelection::full(),
        };

        AnalysisConfig {
            blocks: self.blocks,
            range,
            dump: self.dump.clone(),
            plot: !self.no_plot,
            plot_output: self.output.clone(),
        }
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for --json
    let level = if args.verbose {
        Level::DEBUG
    } else if args.json {
        Level::WARN
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let runner = AnalysisRunner::new(args.config());
    let report = match runner.run_file(&args.input) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    }
}
