//! Observables recorded per simulation step.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar quantity stored as a top-level dataset of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observable {
    /// Instantaneous temperature
    Temperature,

    /// Instantaneous pressure (virial)
    Pressure,

    /// Potential energy per particle
    PotentialEnergy,

    /// Simulation time, the abscissa of every other series
    Time,
}

impl Observable {
    /// Observables that get block-averaged, in report order.
    pub fn averaged() -> [Observable; 3] {
        [
            Observable::Temperature,
            Observable::Pressure,
            Observable::PotentialEnergy,
        ]
    }

    /// Name of the dataset holding this observable.
    pub fn dataset(&self) -> &'static str {
        match self {
            Observable::Temperature => "TEMP",
            Observable::Pressure => "PRESS",
            Observable::PotentialEnergy => "EPOT",
            Observable::Time => "TIME",
        }
    }

    /// Human-readable label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Observable::Temperature => "Temperature",
            Observable::Pressure => "Pressure",
            Observable::PotentialEnergy => "Potential energy",
            Observable::Time => "Time",
        }
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Observable {
    type Err = String;

    /// Parses a dataset name (`TEMP`, `PRESS`, `EPOT`, `TIME`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEMP" => Ok(Observable::Temperature),
            "PRESS" => Ok(Observable::Pressure),
            "EPOT" => Ok(Observable::PotentialEnergy),
            "TIME" => Ok(Observable::Time),
            _ => Err(format!("Unknown observable dataset: {}", s)),
        }
    }
}

/// Samples of one observable, one per recorded step.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservableSeries {
    observable: Observable,
    samples: Vec<f64>,
}

impl ObservableSeries {
    pub fn new(observable: Observable, samples: Vec<f64>) -> Self {
        Self { observable, samples }
    }

    pub fn observable(&self) -> Observable {
        self.observable
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_names_round_trip() {
        for obs in Observable::averaged().into_iter().chain([Observable::Time]) {
            let parsed: Observable = obs.dataset().parse().unwrap();
            assert_eq!(parsed, obs);
        }
    }

    #[test]
    fn test_unknown_dataset() {
        assert!("EKIN".parse::<Observable>().is_err());
    }

    #[test]
    fn test_series_accessors() {
        let series = ObservableSeries::new(Observable::Pressure, vec![1.0, 2.0]);
        assert_eq!(series.observable(), Observable::Pressure);
        assert_eq!(series.len(), 2);
        assert!(!series.is_empty());
        assert!(ObservableSeries::new(Observable::Time, Vec::new()).is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Observable::PotentialEnergy.to_string(), "Potential energy");
        assert_eq!(Observable::Temperature.label(), "Temperature");
    }
}
