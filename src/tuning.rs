//! This module provides the `TuningCurve` and `Population` structures, which map
//! stimulus values to expected firing rates via a Gaussian response profile.
//!
//! A tuning curve is parameterized by a gain, a baseline rate, a tuning width and
//! a preferred stimulus. The expected firing rate at stimulus `s` is
//!
//! `f(s) = gain * exp(-(s - preferred)^2 / (2 * width^2)) + baseline`
//!
//! so that the rate is always between `baseline` and `gain + baseline`, reaching
//! the maximum exactly at the preferred stimulus. A `Population` is an ordered,
//! immutable collection of tuning curves, typically sharing all parameters except
//! their (evenly spaced) preferred stimuli.
//!
//! # Examples
//!
//! ```rust
//! use popcode::tuning::{Population, TuningCurve};
//!
//! let neuron = TuningCurve::build(5.0, 1.0, 10.0, 20.0).unwrap();
//! assert_eq!(neuron.rate(20.0), 6.0);
//!
//! // 29 neurons with preferred stimuli evenly spaced over [-70, 70]
//! let population = Population::uniform(29, (-70.0, 70.0), 5.0, 1.0, 10.0).unwrap();
//! assert_eq!(population.num_neurons(), 29);
//! ```

use nalgebra::DMatrix;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::PopcodeError;
use crate::utils::mod_dist;

/// A Gaussian tuning curve mapping a stimulus value to an expected firing rate.
/// Immutable once built.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TuningCurve {
    /// The gain, i.e., the amplitude of the Gaussian term.
    gain: f64,
    /// The baseline firing rate, added to the Gaussian term everywhere.
    baseline: f64,
    /// The tuning width, i.e., the standard deviation of the Gaussian term.
    width: f64,
    /// The preferred stimulus, where the expected rate is maximal.
    preferred: f64,
}

impl TuningCurve {
    /// Create a new tuning curve with the specified parameters.
    /// The function returns an error if the width is not positive, if the gain or
    /// baseline is negative, or if any parameter is not finite.
    pub fn build(
        gain: f64,
        baseline: f64,
        width: f64,
        preferred: f64,
    ) -> Result<Self, PopcodeError> {
        if !gain.is_finite() || !baseline.is_finite() || !width.is_finite() || !preferred.is_finite()
        {
            return Err(PopcodeError::InvalidParameter(
                "All tuning curve parameters must be finite.".to_string(),
            ));
        }
        if width <= 0.0 {
            return Err(PopcodeError::InvalidParameter(
                "The tuning width must be positive.".to_string(),
            ));
        }
        if gain < 0.0 {
            return Err(PopcodeError::InvalidParameter(
                "The gain must be non-negative.".to_string(),
            ));
        }
        if baseline < 0.0 {
            return Err(PopcodeError::InvalidParameter(
                "The baseline rate must be non-negative.".to_string(),
            ));
        }
        Ok(TuningCurve {
            gain,
            baseline,
            width,
            preferred,
        })
    }

    /// Returns the gain of the tuning curve.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Returns the baseline firing rate of the tuning curve.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Returns the tuning width of the tuning curve.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the preferred stimulus of the tuning curve.
    pub fn preferred(&self) -> f64 {
        self.preferred
    }

    /// Returns the maximum expected firing rate, attained at the preferred stimulus.
    pub fn peak_rate(&self) -> f64 {
        self.gain + self.baseline
    }

    /// Returns the expected firing rate at the given stimulus.
    pub fn rate(&self, s: f64) -> f64 {
        let d = s - self.preferred;
        self.gain * (-d * d / (2.0 * self.width * self.width)).exp() + self.baseline
    }

    /// Returns the expected firing rate at the given stimulus on a circular
    /// stimulus space with the given period, e.g., an orientation in degrees with
    /// period 180. The distance to the preferred stimulus is taken along the
    /// shorter arc.
    pub fn rate_circular(&self, s: f64, period: f64) -> f64 {
        let d = mod_dist(s, self.preferred, period);
        self.gain * (-d * d / (2.0 * self.width * self.width)).exp() + self.baseline
    }

    /// Returns the expected firing rates at every stimulus of the given grid.
    pub fn rates(&self, stimuli: &[f64]) -> Vec<f64> {
        stimuli.iter().map(|&s| self.rate(s)).collect()
    }
}

/// An ordered collection of tuning curves, one per neuron.
/// The composition is fixed per simulation run; no neuron ever mutates.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Population {
    neurons: Vec<TuningCurve>,
}

impl Population {
    /// Create a new population from the given tuning curves.
    pub fn new(neurons: Vec<TuningCurve>) -> Self {
        Population { neurons }
    }

    /// Create a population of neurons with preferred stimuli evenly spaced over
    /// the closed interval [lo, hi] and shared gain, baseline and width.
    /// A single-neuron population is placed at the interval midpoint.
    pub fn uniform(
        num_neurons: usize,
        (lo, hi): (f64, f64),
        gain: f64,
        baseline: f64,
        width: f64,
    ) -> Result<Self, PopcodeError> {
        if num_neurons == 0 {
            return Err(PopcodeError::InvalidParameter(
                "The population must contain at least one neuron.".to_string(),
            ));
        }
        if lo >= hi {
            return Err(PopcodeError::InvalidParameter(
                "The preferred stimulus range must be non-empty.".to_string(),
            ));
        }
        let neurons = if num_neurons == 1 {
            vec![TuningCurve::build(gain, baseline, width, 0.5 * (lo + hi))?]
        } else {
            let step = (hi - lo) / (num_neurons - 1) as f64;
            (0..num_neurons)
                .map(|i| TuningCurve::build(gain, baseline, width, lo + i as f64 * step))
                .collect::<Result<Vec<TuningCurve>, PopcodeError>>()?
        };
        Ok(Population { neurons })
    }

    /// Create a population of neurons with preferred stimuli drawn uniformly at
    /// random from the half-open interval [lo, hi) and shared gain, baseline and
    /// width.
    pub fn rand(
        num_neurons: usize,
        (lo, hi): (f64, f64),
        gain: f64,
        baseline: f64,
        width: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, PopcodeError> {
        if num_neurons == 0 {
            return Err(PopcodeError::InvalidParameter(
                "The population must contain at least one neuron.".to_string(),
            ));
        }
        if lo >= hi {
            return Err(PopcodeError::InvalidParameter(
                "The preferred stimulus range must be non-empty.".to_string(),
            ));
        }
        let preferred_dist = Uniform::new(lo, hi);
        let neurons = (0..num_neurons)
            .map(|_| TuningCurve::build(gain, baseline, width, preferred_dist.sample(rng)))
            .collect::<Result<Vec<TuningCurve>, PopcodeError>>()?;
        Ok(Population { neurons })
    }

    /// Returns the number of neurons in the population.
    pub fn num_neurons(&self) -> usize {
        self.neurons.len()
    }

    /// Returns a slice of the tuning curves of the population.
    pub fn neurons(&self) -> &[TuningCurve] {
        &self.neurons
    }

    /// Returns the preferred stimulus of every neuron, in population order.
    pub fn preferred_stimuli(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.preferred()).collect()
    }

    /// Returns the expected firing rate of every neuron at the given stimulus,
    /// in population order.
    pub fn rates_at(&self, s: f64) -> Vec<f64> {
        self.neurons.iter().map(|n| n.rate(s)).collect()
    }

    /// Returns the tuning curve matrix over the given stimulus grid, where rows
    /// index stimuli and columns index neurons.
    pub fn rate_matrix(&self, stimuli: &[f64]) -> DMatrix<f64> {
        DMatrix::from_fn(stimuli.len(), self.neurons.len(), |i, j| {
            self.neurons[j].rate(stimuli[i])
        })
    }

    /// Save the population parameters to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), PopcodeError> {
        let file = File::create(path).map_err(|e| PopcodeError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| PopcodeError::IOError(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| PopcodeError::IOError(e.to_string()))?;
        Ok(())
    }

    /// Load a population from a JSON file produced by [`Population::save_to`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Population, PopcodeError> {
        let file = File::open(path).map_err(|e| PopcodeError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| PopcodeError::IOError(e.to_string()))
    }
}
