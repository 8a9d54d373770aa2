//! This crate provides tools for simulating and decoding neural population codes in Rust.
//!
//! A population of sensory neurons encodes a stimulus value through noisy spike
//! counts: each neuron responds according to a Gaussian tuning curve, and its
//! spike count on a single trial is Poisson-distributed around that expected
//! rate. From an observed spike count vector, the likelihood of every candidate
//! stimulus can be evaluated with the Poisson probability mass function and used
//! to read the stimulus back out.
//!
//! # Tuning Curves
//!
//! ```rust
//! use popcode::tuning::TuningCurve;
//!
//! // gain 5 Hz, baseline 1 Hz, width 10, preferred stimulus 20
//! let neuron = TuningCurve::build(5.0, 1.0, 10.0, 20.0).unwrap();
//! assert_eq!(neuron.rate(20.0), 6.0);
//! assert_eq!(neuron.rate(50.0), neuron.rate(-10.0));
//! ```
//!
//! # Simulating Spike Counts
//!
//! ```rust
//! use popcode::sampler::{sample_spike_counts, sampling_rng};
//! use popcode::tuning::Population;
//!
//! let population = Population::uniform(29, (-70.0, 70.0), 5.0, 1.0, 10.0).unwrap();
//!
//! // one Poisson draw per neuron at the true (hidden) stimulus
//! let mut rng = sampling_rng(Some(42));
//! let counts = sample_spike_counts(&population.rates_at(20.0), &mut rng).unwrap();
//! assert_eq!(counts.len(), 29);
//! ```
//!
//! # Likelihood Decoding
//!
//! ```rust
//! use popcode::likelihood::LikelihoodCurve;
//! use popcode::sampler::{sample_spike_counts, sampling_rng};
//! use popcode::tuning::Population;
//! use popcode::utils::linspace;
//!
//! let population = Population::uniform(29, (-70.0, 70.0), 50.0, 1.0, 10.0).unwrap();
//! let stimuli = linspace(-60.0, 59.0, 120);
//!
//! let mut rng = sampling_rng(Some(42));
//! let counts = sample_spike_counts(&population.rates_at(10.0), &mut rng).unwrap();
//!
//! let curve = LikelihoodCurve::population(&counts, &stimuli, &population).unwrap();
//! let estimate = curve.peak().unwrap();
//! assert!((estimate - 10.0).abs() <= 10.0);
//! ```

pub mod error;
pub mod likelihood;
pub mod sampler;
pub mod tuning;
pub mod utils;
pub mod viz;
