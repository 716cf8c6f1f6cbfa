//! Potential-energy plot.
//!
//! Renders E_pot(t) with a dotted line at its block mean. Rendering is
//! only available with the `plot` feature; without it `render` logs a
//! warning and reports that nothing was drawn.
//!
//! The output format follows the file extension: `.svg` gives SVG,
//! anything else a PNG bitmap.

use crate::error::AnalysisError;
#[cfg(feature = "plot")]
use plotters::coord::Shift;
#[cfg(feature = "plot")]
use plotters::prelude::*;
use std::path::Path;

/// Points in the mean overlay line.
pub const MEAN_LINE_POINTS: usize = 50;

#[cfg(feature = "plot")]
const PLOT_SIZE: (u32, u32) = (1200, 700);

/// Data for one potential-energy plot.
#[derive(Debug, Clone, Copy)]
pub struct EnergyPlot<'a> {
    pub time: &'a [f64],
    pub energy: &'a [f64],

    /// Block mean drawn as the overlay line
    pub mean: f64,

    /// Legend label of the series, usually the input path
    pub label: &'a str,
}

impl<'a> EnergyPlot<'a> {
    pub fn new(time: &'a [f64], energy: &'a [f64], mean: f64, label: &'a str) -> Self {
        Self {
            time,
            energy,
            mean,
            label,
        }
    }

    /// Evenly spaced points at the mean value across the time span.
    pub fn mean_line(&self) -> Vec<(f64, f64)> {
        let Some((t0, t1)) = min_max(self.time) else {
            return Vec::new();
        };
        let step = (t1 - t0) / (MEAN_LINE_POINTS - 1) as f64;
        (0..MEAN_LINE_POINTS)
            .map(|i| (t0 + step * i as f64, self.mean))
            .collect()
    }

    /// The mean line broken into short dashes: every other segment
    /// between consecutive points of [`mean_line`](Self::mean_line).
    pub fn mean_dashes(&self) -> Vec<[(f64, f64); 2]> {
        self.mean_line()
            .chunks_exact(2)
            .map(|pair| [pair[0], pair[1]])
            .collect()
    }

    /// Tight axis ranges covering the series and the mean line.
    ///
    /// Degenerate spans are widened so the chart has non-zero extent.
    pub fn bounds(&self) -> Result<((f64, f64), (f64, f64)), AnalysisError> {
        let x = min_max(self.time).ok_or_else(|| AnalysisError::Plot("no samples to plot".into()))?;
        let (y0, y1) = min_max(self.energy)
            .ok_or_else(|| AnalysisError::Plot("no samples to plot".into()))?;
        let y = (y0.min(self.mean), y1.max(self.mean));
        Ok((widen(x), widen(y)))
    }

    /// Renders the plot to `path`. Returns whether a file was written.
    #[cfg(feature = "plot")]
    pub fn render(&self, path: &Path) -> Result<bool, AnalysisError> {
        let is_svg = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);

        if is_svg {
            self.draw(SVGBackend::new(path, PLOT_SIZE).into_drawing_area())?;
        } else {
            self.draw(BitMapBackend::new(path, PLOT_SIZE).into_drawing_area())?;
        }
        Ok(true)
    }

    #[cfg(not(feature = "plot"))]
    pub fn render(&self, path: &Path) -> Result<bool, AnalysisError> {
        tracing::warn!(
            "Plotting not available (compile with --features plot), skipping {}",
            path.display()
        );
        Ok(false)
    }

    #[cfg(feature = "plot")]
    fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<(), AnalysisError> {
        let ((x0, x1), (y0, y1)) = self.bounds()?;

        root.fill(&WHITE).map_err(plot_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Time t")
            .y_desc("Potential energy E_pot")
            .draw()
            .map_err(plot_error)?;

        let series = self.time.iter().copied().zip(self.energy.iter().copied());
        chart
            .draw_series(LineSeries::new(series, &BLUE))
            .map_err(plot_error)?
            .label(self.label)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .draw_series(
                self.mean_dashes()
                    .into_iter()
                    .map(|dash| PathElement::new(dash.to_vec(), BLACK)),
            )
            .map_err(plot_error)?
            .label(format!("mean {:.4}", self.mean))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 8, y)], BLACK));

        // No legend frame
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(TRANSPARENT)
            .border_style(TRANSPARENT)
            .draw()
            .map_err(plot_error)?;

        root.present().map_err(plot_error)?;
        Ok(())
    }
}

#[cfg(feature = "plot")]
fn plot_error(e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Plot(e.to_string())
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().copied().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        return (lo, hi);
    }
    let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
    (lo - pad, hi + pad)
}
