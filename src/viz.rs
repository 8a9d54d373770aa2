//! Plain numeric series consumed by external plotting tools.
//!
//! The model only ever exposes arrays: a curve pairs a stimulus grid with rates
//! or likelihood values, a table holds one rate column per neuron over a shared
//! grid, and a scatter pairs preferred stimuli with observed spike counts. Each
//! series can be written as JSON; how it is rendered is left entirely to the
//! consumer.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::PopcodeError;
use crate::likelihood::LikelihoodCurve;
use crate::tuning::Population;

fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), PopcodeError> {
    let file = File::create(path).map_err(|e| PopcodeError::IOError(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| PopcodeError::IOError(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| PopcodeError::IOError(e.to_string()))?;
    Ok(())
}

/// A labeled line series: a stimulus grid paired with one value per stimulus.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CurveSeries {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl CurveSeries {
    /// Pair a stimulus grid with expected firing rates.
    pub fn from_rates(label: &str, stimuli: &[f64], rates: &[f64]) -> Self {
        CurveSeries {
            label: label.to_string(),
            x: stimuli.to_vec(),
            y: rates.to_vec(),
        }
    }

    /// Pair a likelihood curve's stimulus grid with its exponentiated values.
    pub fn from_likelihood(label: &str, curve: &LikelihoodCurve) -> Self {
        CurveSeries {
            label: label.to_string(),
            x: curve.stimuli().to_vec(),
            y: curve.values(),
        }
    }

    /// Write the series to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), PopcodeError> {
        write_json(self, path)
    }
}

/// Overlaid tuning curves: rows follow the stimulus grid, with one rate column
/// per neuron in population order.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TuningTable {
    pub stimuli: Vec<f64>,
    pub rates: Vec<Vec<f64>>,
}

impl TuningTable {
    /// Evaluate every tuning curve of the population over the stimulus grid.
    pub fn new(population: &Population, stimuli: &[f64]) -> Self {
        let rates = population
            .neurons()
            .iter()
            .map(|neuron| neuron.rates(stimuli))
            .collect();
        TuningTable {
            stimuli: stimuli.to_vec(),
            rates,
        }
    }

    /// Write the table to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), PopcodeError> {
        write_json(self, path)
    }
}

/// A scatter of points, e.g., preferred stimuli against sampled spike counts.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ScatterSeries {
    /// Pair each neuron's preferred stimulus with its observed spike count, in
    /// population order. The function returns an error if the number of counts
    /// differs from the number of neurons.
    pub fn spike_counts(population: &Population, counts: &[u64]) -> Result<Self, PopcodeError> {
        if counts.len() != population.num_neurons() {
            return Err(PopcodeError::DimensionMismatch(format!(
                "expected {} spike counts, one per neuron, got {}",
                population.num_neurons(),
                counts.len()
            )));
        }
        Ok(ScatterSeries {
            x: population.preferred_stimuli(),
            y: counts.iter().map(|&c| c as f64).collect(),
        })
    }

    /// Write the series to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), PopcodeError> {
        write_json(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::linspace;

    #[test]
    fn test_tuning_table_shape() {
        let population = Population::uniform(29, (-70.0, 70.0), 5.0, 1.0, 10.0).unwrap();
        let stimuli = linspace(-60.0, 59.0, 120);
        let table = TuningTable::new(&population, &stimuli);

        assert_eq!(table.stimuli.len(), 120);
        assert_eq!(table.rates.len(), 29);
        for rates in table.rates.iter() {
            assert_eq!(rates.len(), 120);
        }
    }

    #[test]
    fn test_scatter_dimension_mismatch() {
        let population = Population::uniform(5, (-20.0, 20.0), 5.0, 1.0, 10.0).unwrap();
        assert!(ScatterSeries::spike_counts(&population, &[1, 2, 3]).is_err());
        assert!(ScatterSeries::spike_counts(&population, &[1, 2, 3, 4, 5]).is_ok());
    }

    #[test]
    fn test_save_curve_series() {
        let stimuli = linspace(-10.0, 10.0, 21);
        let neuron = crate::tuning::TuningCurve::build(5.0, 1.0, 10.0, 0.0).unwrap();
        let series = CurveSeries::from_rates("tuning", &stimuli, &neuron.rates(&stimuli));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.json");
        series.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: CurveSeries = serde_json::from_str(&content).unwrap();
        assert_eq!(series, loaded);
    }
}
