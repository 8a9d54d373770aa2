//! This module provides functionality for generating Poisson spike counts from
//! expected firing rates.
//!
//! Each count is drawn independently from a Poisson distribution whose mean is
//! the corresponding expected rate, so the output has the same length as the
//! input rate vector. All sampling goes through a caller-supplied random number
//! generator; use [`sampling_rng`] to get a reproducible stream from an explicit
//! seed, or a free-running one for exploratory use.
//!
//! # Examples
//!
//! ```
//! use popcode::sampler::{sample_spike_counts, sampling_rng};
//!
//! let mut rng = sampling_rng(Some(42));
//! let counts = sample_spike_counts(&[2.0, 4.0, 8.0], &mut rng).unwrap();
//! assert_eq!(counts.len(), 3);
//! ```

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Poisson};

use crate::error::PopcodeError;

/// Create the random number generator used for spike count sampling.
/// With `Some(seed)` the stream is reproducible; with `None` it is seeded from
/// system entropy and free-running.
pub fn sampling_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Draw a single Poisson spike count with the given expected firing rate.
/// The function returns an error if the rate is negative or not finite.
pub fn sample_spike_count<R: Rng>(rate: f64, rng: &mut R) -> Result<u64, PopcodeError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(PopcodeError::InvalidParameter(format!(
            "The firing rate must be non-negative, got {}.",
            rate
        )));
    }
    if rate == 0.0 {
        return Ok(0);
    }
    let poisson = Poisson::new(rate).map_err(|e| PopcodeError::InvalidParameter(e.to_string()))?;
    Ok(poisson.sample(rng) as u64)
}

/// Draw one independent Poisson spike count per expected firing rate.
/// The output has the same length as the input rate vector.
pub fn sample_spike_counts<R: Rng>(rates: &[f64], rng: &mut R) -> Result<Vec<u64>, PopcodeError> {
    let counts = rates
        .iter()
        .map(|&rate| sample_spike_count(rate, rng))
        .collect::<Result<Vec<u64>, PopcodeError>>()?;
    debug!(
        "Sampled {} spike counts ({} spikes in total)",
        counts.len(),
        counts.iter().sum::<u64>()
    );
    Ok(counts)
}
