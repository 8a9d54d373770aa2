//! This module provides Poisson likelihood evaluation for single neurons and
//! populations.
//!
//! Given an observed spike count `r` and an expected firing rate `λ`, the Poisson
//! probability mass is `p(r | λ) = λ^r * e^{-λ} / r!`. Evaluating it directly
//! overflows for counts beyond a few hundred, so all computation happens in log
//! space, `r ln λ - λ - ln Γ(r+1)`, and is only exponentiated for display.
//!
//! For a population, the joint likelihood at a candidate stimulus is the product
//! of the per-neuron masses, accumulated as a sum of log masses. The direct
//! product underflows to zero for populations much larger than a few dozen
//! neurons; the log route is the reference computation and the two agree for
//! small populations. The returned curves are relative likelihood surfaces only
//! and are not normalized.

use itertools::Itertools;
use log::debug;
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

use crate::error::PopcodeError;
use crate::tuning::{Population, TuningCurve};

/// Returns the log of the Poisson probability mass `p(count | rate)`.
/// A zero rate puts all mass on a zero count. The function returns an error if
/// the rate is negative or not finite.
pub fn log_poisson_pmf(count: u64, rate: f64) -> Result<f64, PopcodeError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(PopcodeError::InvalidParameter(format!(
            "The expected rate must be non-negative, got {}.",
            rate
        )));
    }
    if rate == 0.0 {
        return Ok(if count == 0 { 0.0 } else { f64::NEG_INFINITY });
    }
    Ok(count as f64 * rate.ln() - rate - ln_gamma(count as f64 + 1.0))
}

/// Returns the Poisson probability mass `p(count | rate)`, evaluated in log
/// space and exponentiated.
pub fn poisson_pmf(count: u64, rate: f64) -> Result<f64, PopcodeError> {
    Ok(log_poisson_pmf(count, rate)?.exp())
}

/// Returns the likelihood of a single neuron's observed spike count at every
/// candidate, given the neuron's expected rate at each candidate stimulus.
pub fn likelihood_scan(count: u64, rates: &[f64]) -> Result<Vec<f64>, PopcodeError> {
    rates.iter().map(|&rate| poisson_pmf(count, rate)).collect()
}

/// Returns the joint log-likelihood of a vector of observed spike counts at
/// every candidate stimulus, as the sum of per-neuron log masses.
///
/// In `rate_matrix`, rows index candidate stimuli and columns index neurons (see
/// [`Population::rate_matrix`]); `counts` holds one observation per neuron, in
/// the same column order. Candidates are evaluated in parallel, as every output
/// element is independent of every other.
pub fn population_log_likelihood(
    counts: &[u64],
    rate_matrix: &DMatrix<f64>,
) -> Result<Vec<f64>, PopcodeError> {
    if counts.len() != rate_matrix.ncols() {
        return Err(PopcodeError::DimensionMismatch(format!(
            "expected {} spike counts, one per neuron, got {}",
            rate_matrix.ncols(),
            counts.len()
        )));
    }
    (0..rate_matrix.nrows())
        .into_par_iter()
        .map(|i| {
            let mut acc = 0.0;
            for (j, &count) in counts.iter().enumerate() {
                acc += log_poisson_pmf(count, rate_matrix[(i, j)])?;
            }
            Ok(acc)
        })
        .collect::<Result<Vec<f64>, PopcodeError>>()
}

/// Returns the exponentiated joint likelihood of a vector of observed spike
/// counts at every candidate stimulus. Underflows to zero for large
/// populations; prefer [`population_log_likelihood`] for anything but display.
pub fn population_likelihood(
    counts: &[u64],
    rate_matrix: &DMatrix<f64>,
) -> Result<Vec<f64>, PopcodeError> {
    Ok(population_log_likelihood(counts, rate_matrix)?
        .into_iter()
        .map(f64::exp)
        .collect())
}

/// A likelihood surface over a grid of candidate stimuli, stored in log space.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LikelihoodCurve {
    /// The candidate stimulus grid.
    stimuli: Vec<f64>,
    /// The log-likelihood at each candidate stimulus.
    log_values: Vec<f64>,
}

impl LikelihoodCurve {
    /// Evaluate the likelihood of a single neuron's observed spike count over
    /// the given candidate stimulus grid.
    pub fn single(
        count: u64,
        stimuli: &[f64],
        neuron: &TuningCurve,
    ) -> Result<Self, PopcodeError> {
        let log_values = stimuli
            .iter()
            .map(|&s| log_poisson_pmf(count, neuron.rate(s)))
            .collect::<Result<Vec<f64>, PopcodeError>>()?;
        Ok(LikelihoodCurve {
            stimuli: stimuli.to_vec(),
            log_values,
        })
    }

    /// Evaluate the joint likelihood of the population's observed spike counts
    /// over the given candidate stimulus grid. `counts` holds one observation
    /// per neuron, in population order.
    pub fn population(
        counts: &[u64],
        stimuli: &[f64],
        population: &Population,
    ) -> Result<Self, PopcodeError> {
        let rate_matrix = population.rate_matrix(stimuli);
        let log_values = population_log_likelihood(counts, &rate_matrix)?;
        debug!(
            "Evaluated population likelihood over {} candidates for {} neurons",
            stimuli.len(),
            population.num_neurons()
        );
        Ok(LikelihoodCurve {
            stimuli: stimuli.to_vec(),
            log_values,
        })
    }

    /// Returns the candidate stimulus grid.
    pub fn stimuli(&self) -> &[f64] {
        &self.stimuli
    }

    /// Returns the log-likelihood at each candidate stimulus.
    pub fn log_values(&self) -> &[f64] {
        &self.log_values
    }

    /// Returns the exponentiated likelihood at each candidate stimulus, for
    /// display. Underflows to zero for large populations.
    pub fn values(&self) -> Vec<f64> {
        self.log_values.iter().map(|&v| v.exp()).collect()
    }

    /// Returns the candidate stimulus with the highest likelihood, i.e., the
    /// maximum likelihood estimate over the grid, or `None` for an empty grid.
    pub fn peak(&self) -> Option<f64> {
        self.log_values
            .iter()
            .position_max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|i| self.stimuli[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::linspace;

    #[test]
    fn test_log_pmf_invalid_rate() {
        assert!(log_poisson_pmf(3, -1.0).is_err());
        assert!(log_poisson_pmf(3, f64::NAN).is_err());
        assert!(log_poisson_pmf(3, f64::INFINITY).is_err());
    }

    #[test]
    fn test_log_pmf_zero_rate() {
        assert_eq!(log_poisson_pmf(0, 0.0), Ok(0.0));
        assert_eq!(log_poisson_pmf(3, 0.0), Ok(f64::NEG_INFINITY));
        assert_eq!(poisson_pmf(0, 0.0), Ok(1.0));
        assert_eq!(poisson_pmf(3, 0.0), Ok(0.0));
    }

    #[test]
    fn test_pmf_matches_direct_formula() {
        // direct formula is safe for small counts
        for &rate in [0.5f64, 1.0, 5.0, 20.0].iter() {
            let mut factorial = 1.0;
            for count in 0..15u64 {
                if count > 0 {
                    factorial *= count as f64;
                }
                let direct = rate.powi(count as i32) * (-rate).exp() / factorial;
                let stable = poisson_pmf(count, rate).unwrap();
                assert!((stable - direct).abs() <= 1e-10 * direct.max(1e-300));
            }
        }
    }

    #[test]
    fn test_pmf_sums_to_one() {
        for &rate in [0.1, 0.5, 1.0, 5.0, 10.0, 25.0, 50.0].iter() {
            let sum = (0..=200u64)
                .map(|count| poisson_pmf(count, rate).unwrap())
                .sum::<f64>();
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_pmf_large_count() {
        // stable in log space where the direct formula overflows
        let value = poisson_pmf(300, 300.0).unwrap();
        assert!(value.is_finite());
        assert!(value > 0.0);
        // p(r|λ=r) ≈ 1/sqrt(2π r) by Stirling
        let stirling = 1.0 / (2.0 * std::f64::consts::PI * 300.0).sqrt();
        assert!((value - stirling).abs() / stirling < 1e-3);
    }

    #[test]
    fn test_zero_count_well_defined() {
        let neuron = TuningCurve::build(500.0, 1.0, 10.0, 0.0).unwrap();
        let stimuli = linspace(-60.0, 60.0, 121);
        let curve = LikelihoodCurve::single(0, &stimuli, &neuron).unwrap();
        for &value in curve.values().iter() {
            assert!(!value.is_nan());
            assert!(value >= 0.0);
        }
        // near the preferred stimulus the rate is ~501, so p(0) is tiny but valid
        assert!(curve.values()[60] < 1e-100);
    }

    #[test]
    fn test_single_neuron_argmax_at_preferred() {
        let neuron = TuningCurve::build(5.0, 1.0, 10.0, 20.0).unwrap();
        let stimuli = linspace(-60.0, 59.0, 120);

        // observing the peak rate makes the preferred stimulus the best candidate
        let curve = LikelihoodCurve::single(6, &stimuli, &neuron).unwrap();
        assert_eq!(curve.peak(), Some(20.0));
    }

    #[test]
    fn test_population_log_route_matches_direct_product() {
        let population = Population::uniform(5, (-20.0, 20.0), 5.0, 1.0, 10.0).unwrap();
        let stimuli = linspace(-30.0, 30.0, 61);
        let counts = vec![2, 4, 6, 3, 1];
        let rate_matrix = population.rate_matrix(&stimuli);

        let stable = population_likelihood(&counts, &rate_matrix).unwrap();
        for (i, &value) in stable.iter().enumerate() {
            let direct = counts
                .iter()
                .enumerate()
                .map(|(j, &count)| poisson_pmf(count, rate_matrix[(i, j)]).unwrap())
                .product::<f64>();
            assert!((value - direct).abs() <= 1e-9 * direct);
        }
    }

    #[test]
    fn test_population_order_invariance() {
        let stimuli = linspace(-30.0, 30.0, 61);
        let neurons: Vec<TuningCurve> = [-20.0, -10.0, 0.0, 10.0, 20.0]
            .iter()
            .map(|&preferred| TuningCurve::build(5.0, 1.0, 10.0, preferred).unwrap())
            .collect();
        let counts = vec![2u64, 4, 6, 3, 1];

        let curve = LikelihoodCurve::population(
            &counts,
            &stimuli,
            &Population::new(neurons.clone()),
        )
        .unwrap();

        // reverse the neuron order together with the observations
        let reversed_curve = LikelihoodCurve::population(
            &counts.iter().rev().copied().collect::<Vec<u64>>(),
            &stimuli,
            &Population::new(neurons.into_iter().rev().collect()),
        )
        .unwrap();

        for (a, b) in curve
            .log_values()
            .iter()
            .zip(reversed_curve.log_values().iter())
        {
            assert!((a - b).abs() < 1e-12 * a.abs().max(1.0));
        }
    }

    #[test]
    fn test_population_dimension_mismatch() {
        let population = Population::uniform(5, (-20.0, 20.0), 5.0, 1.0, 10.0).unwrap();
        let stimuli = linspace(-30.0, 30.0, 61);
        assert_eq!(
            LikelihoodCurve::population(&[1, 2, 3], &stimuli, &population),
            Err(PopcodeError::DimensionMismatch(
                "expected 5 spike counts, one per neuron, got 3".into()
            ))
        );
    }

    #[test]
    fn test_flat_curves_zero_counts_uniform() {
        // zero gain makes every tuning curve flat; observing all zeros must give
        // a uniform, nonzero likelihood surface
        let population = Population::uniform(5, (-20.0, 20.0), 0.0, 1.0, 10.0).unwrap();
        let stimuli = linspace(-30.0, 30.0, 61);
        let counts = vec![0u64; 5];

        let curve = LikelihoodCurve::population(&counts, &stimuli, &population).unwrap();
        let values = curve.values();
        assert!(values[0] > 0.0);
        for &value in values.iter() {
            assert!((value - values[0]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_curve_peak() {
        let neuron = TuningCurve::build(5.0, 1.0, 10.0, 20.0).unwrap();
        let curve = LikelihoodCurve::single(3, &[], &neuron).unwrap();
        assert_eq!(curve.peak(), None);
    }
}
