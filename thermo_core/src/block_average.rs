//! Block averaging of correlated time series.
//!
//! Successive samples of a molecular dynamics run are correlated, so the
//! naive `std / sqrt(N)` underestimates the error of the mean. Grouping the
//! series into `B` contiguous blocks and measuring the spread of the block
//! means gives an estimate that holds once blocks are longer than the
//! correlation time. Choosing `B` is up to the caller; no autocorrelation
//! check is performed here.
//!
//! # Formula
//! ```text
//! mean  = (1 / (B·L)) Σ x_i                      (first B·L samples)
//! err   = sqrt( (1/B) Σ_b (m_b - mean)² ) / sqrt(B - 1)
//! ```
//! where `L = floor(N / B)` and `m_b` is the mean of block `b`.

use crate::accumulator::Accumulator;
use crate::error::StatsError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block count used when the caller does not choose one.
pub const DEFAULT_BLOCKS: usize = 10;

/// Mean and standard error of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockAverage {
    /// Mean over all retained samples
    pub mean: f64,

    /// Standard error estimated from the spread of block means
    pub error: f64,

    /// Number of blocks
    pub blocks: usize,

    /// Samples per block
    pub block_len: usize,

    /// Samples that entered the average (`blocks * block_len`)
    pub used: usize,

    /// Trailing samples dropped to make blocks equal
    pub discarded: usize,
}

/// Computes the block average of `samples` using `blocks` blocks.
///
/// The trailing `samples.len() % blocks` samples are ignored. Fails for
/// fewer than two blocks or more blocks than samples.
pub fn block_average(samples: &[f64], blocks: usize) -> Result<BlockAverage, StatsError> {
    if blocks < 2 {
        return Err(StatsError::InvalidBlockCount(blocks));
    }
    if blocks > samples.len() {
        return Err(StatsError::insufficient(blocks, samples.len()));
    }

    let block_len = samples.len() / blocks;
    let used = blocks * block_len;

    let retained = &samples[..used];
    let mean = retained.iter().sum::<f64>() / used as f64;

    // One block per row
    let grouped = DMatrix::from_row_slice(blocks, block_len, retained);

    let block_means: Accumulator = grouped.column_mean().iter().copied().collect();
    let spread = block_means.population_variance()?.sqrt();
    let error = spread / ((blocks - 1) as f64).sqrt();

    Ok(BlockAverage {
        mean,
        error,
        blocks,
        block_len,
        used,
        discarded: samples.len() - used,
    })
}

impl fmt::Display for BlockAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} ± {}", self.mean, format_general(self.error, 2))
    }
}

/// Formats `value` with `digits` significant digits, switching to
/// exponent notation for very small or large magnitudes (printf `%g`).
pub fn format_general(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }

    // Exponent after rounding, so 99.6 at two digits becomes 1e2
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        return format!("{}e{}", trim_fraction(mantissa), exponent);
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn population_std(values: &[f64]) -> f64 {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        var.sqrt()
    }

    #[test]
    fn test_one_to_twenty() {
        let data: Vec<f64> = (1..=20).map(f64::from).collect();
        let avg = block_average(&data, 10).unwrap();

        assert_relative_eq!(avg.mean, 10.5, epsilon = 1e-12);

        // Block means are 1.5, 3.5, ..., 19.5
        let means: Vec<f64> = (0..10).map(|b| 2.0 * b as f64 + 1.5).collect();
        let expected = population_std(&means) / 9.0f64.sqrt();
        assert_relative_eq!(avg.error, expected, epsilon = 1e-12);

        assert_eq!(avg.blocks, 10);
        assert_eq!(avg.block_len, 2);
        assert_eq!(avg.used, 20);
        assert_eq!(avg.discarded, 0);
    }

    #[test]
    fn test_remainder_is_discarded() {
        let data: Vec<f64> = (0..23).map(f64::from).collect();
        let avg = block_average(&data, 5).unwrap();
        assert_eq!(avg.block_len, 4);
        assert_eq!(avg.used, 20);
        assert_eq!(avg.discarded, 3);
        assert_relative_eq!(avg.mean, 9.5, epsilon = 1e-12);
    }

    #[test]
    fn test_block_count_equal_to_samples() {
        let avg = block_average(&[1.0, 3.0], 2).unwrap();
        assert_relative_eq!(avg.mean, 2.0);
        assert_relative_eq!(avg.error, 1.0);
    }

    #[test]
    fn test_too_few_blocks() {
        let data = [1.0, 2.0, 3.0];
        assert_eq!(block_average(&data, 1), Err(StatsError::InvalidBlockCount(1)));
        assert_eq!(block_average(&data, 0), Err(StatsError::InvalidBlockCount(0)));
    }

    #[test]
    fn test_more_blocks_than_samples() {
        let data = [1.0, 2.0, 3.0];
        assert_eq!(
            block_average(&data, 4),
            Err(StatsError::InsufficientSamples { needed: 4, available: 3 })
        );
        assert!(block_average(&[], DEFAULT_BLOCKS).is_err());
    }

    #[test]
    fn test_display() {
        let avg = BlockAverage {
            mean: 2.5,
            error: 0.0012345,
            blocks: 10,
            block_len: 1,
            used: 10,
            discarded: 0,
        };
        assert_eq!(avg.to_string(), "2.5000 ± 0.0012");
    }

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(0.0, 2), "0");
        assert_eq!(format_general(0.25, 2), "0.25");
        assert_eq!(format_general(0.0996, 2), "0.1");
        assert_eq!(format_general(3.0, 2), "3");
        assert_eq!(format_general(123.0, 2), "1.2e2");
        assert_eq!(format_general(0.000012, 2), "1.2e-5");
        assert_eq!(format_general(-2.5, 2), "-2.5");
    }

    #[test]
    fn test_format_general_rounds_before_choosing_notation() {
        assert_eq!(format_general(99.6, 2), "1e2");
        assert_eq!(format_general(9.96, 2), "10");
        assert_eq!(format_general(1234.0, 2), "1.2e3");
        assert_eq!(format_general(0.000099996, 2), "0.0001");
    }

    proptest! {
        #[test]
        fn prop_constant_series(value in -1e3f64..1e3, len in 2usize..200, blocks in 2usize..20) {
            prop_assume!(blocks <= len);
            let data = vec![value; len];
            let avg = block_average(&data, blocks).unwrap();
            prop_assert!((avg.mean - value).abs() <= 1e-9 * value.abs().max(1.0));
            prop_assert!(avg.error.abs() <= 1e-9 * value.abs().max(1.0));
        }

        #[test]
        fn prop_truncation_law(
            data in prop::collection::vec(-100.0f64..100.0, 2..300),
            blocks in 2usize..25,
        ) {
            prop_assume!(blocks <= data.len());
            let truncated = &data[..(data.len() / blocks) * blocks];
            let full = block_average(&data, blocks).unwrap();
            let cut = block_average(truncated, blocks).unwrap();
            prop_assert_eq!(full.mean, cut.mean);
            prop_assert_eq!(full.error, cut.error);
        }

        #[test]
        fn prop_idempotent(
            data in prop::collection::vec(-100.0f64..100.0, 10..200),
            blocks in 2usize..10,
        ) {
            let a = block_average(&data, blocks).unwrap();
            let b = block_average(&data, blocks).unwrap();
            prop_assert_eq!(a.mean.to_bits(), b.mean.to_bits());
            prop_assert_eq!(a.error.to_bits(), b.error.to_bits());
        }

        #[test]
        fn prop_error_is_non_negative(
            data in prop::collection::vec(-1e6f64..1e6, 2..200),
            blocks in 2usize..20,
        ) {
            prop_assume!(blocks <= data.len());
            let avg = block_average(&data, blocks).unwrap();
            prop_assert!(avg.error >= 0.0);
            prop_assert!(avg.mean.is_finite());
        }
    }
}
