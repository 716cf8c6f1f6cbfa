//! Running mean and variance.
//!
//! Uses the update from Knuth, TAOCP Vol. 2, p. 232, which stays
//! accurate for long series with a large offset. Two accumulators can be
//! merged, so partial sums over blocks combine into the full-series
//! statistics.

use crate::error::StatsError;

/// Accumulates count, mean and the sum of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    count: u64,
    mean: f64,
    /// Sum of squared deviations from the running mean
    m2: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one value.
    pub fn push(&mut self, value: f64) {
        let delta = value - self.mean;
        self.count += 1;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Folds the values of `other` into this accumulator.
    pub fn merge(&mut self, other: &Accumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;

        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.mean = (n_a * self.mean + n_b * other.mean) / n;
        self.count += other.count;
    }

    /// Resets to the empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Result<f64, StatsError> {
        self.require(1)?;
        Ok(self.mean)
    }

    /// Unbiased sample variance (divides by n - 1).
    pub fn variance(&self) -> Result<f64, StatsError> {
        self.require(2)?;
        Ok(self.m2 / (self.count - 1) as f64)
    }

    /// Population variance (divides by n).
    pub fn population_variance(&self) -> Result<f64, StatsError> {
        self.require(1)?;
        Ok(self.m2 / self.count as f64)
    }

    pub fn std_dev(&self) -> Result<f64, StatsError> {
        Ok(self.variance()?.sqrt())
    }

    /// Standard error of the mean, treating samples as independent.
    pub fn std_error(&self) -> Result<f64, StatsError> {
        Ok((self.variance()? / self.count as f64).sqrt())
    }

    fn require(&self, needed: u64) -> Result<(), StatsError> {
        if self.count < needed {
            return Err(StatsError::insufficient(needed as usize, self.count as usize));
        }
        Ok(())
    }
}

impl Extend<f64> for Accumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Accumulator::new();
        acc.extend(iter);
        acc
    }
}
