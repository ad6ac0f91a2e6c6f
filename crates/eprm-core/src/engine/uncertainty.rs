use super::config::{ExperimentParameters, NoiseModel};
use super::utils::stats;
use crate::core::models::properties::SequenceProperties;
use crate::core::recovery::factors;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum UncertaintyError {
    #[error("Iteration count must be a positive integer")]
    ZeroIterations,

    #[error("Invalid noise scale for {name}: standard deviation {value} must be finite and non-negative")]
    InvalidNoiseScale { name: &'static str, value: f64 },

    #[error("Statistical reduction failed: {source}")]
    Reduction {
        #[from]
        source: stats::StatsError,
    },
}

/// Distributional estimate of the effective concentration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UncertaintyEstimate {
    pub mean: f64,
    /// Population standard deviation (divides by n) of the sample population.
    pub standard_deviation: f64,
    /// Empirical 2.5th and 97.5th percentiles of the sample population.
    pub confidence_interval_95: (f64, f64),
    pub iterations: usize,
}

/// Propagates the assumed measurement noise through the recovery model by
/// Monte Carlo resampling.
///
/// Each iteration draws perturbed instability (floored at 0), GRAVY, and kit
/// and systemic efficiencies (clipped to [0, 1]), and re-evaluates the factor
/// chain. The isoelectric point, buffer pH, and dilution geometry are treated
/// as exact and never resampled. Reproducibility is a property of the
/// caller-seeded `rng`; no process-wide random state is touched.
#[instrument(level = "debug", skip_all, fields(iterations))]
pub fn quantify(
    params: &ExperimentParameters,
    props: &SequenceProperties,
    noise: &NoiseModel,
    iterations: usize,
    rng: &mut impl Rng,
) -> Result<UncertaintyEstimate, UncertaintyError> {
    if iterations == 0 {
        return Err(UncertaintyError::ZeroIterations);
    }

    let instability_dist = normal(
        "instability_index",
        props.instability_index,
        noise.instability_rel_sd * props.instability_index,
    )?;
    let gravy_dist = normal("gravy", props.gravy, noise.gravy_abs_sd)?;
    let kit_dist = normal(
        "kit_efficiency",
        params.kit_efficiency(),
        noise.kit_efficiency_rel_sd * params.kit_efficiency(),
    )?;
    let systemic_dist = normal(
        "systemic_efficiency",
        params.systemic_efficiency(),
        noise.systemic_efficiency_rel_sd * params.systemic_efficiency(),
    )?;

    // pI and buffer pH carry no noise, so this factor is constant across
    // iterations, as is the dilution term.
    let pi_solubility =
        factors::pi_solubility_factor(params.buffer_ph(), props.isoelectric_point);
    let theoretical_max = params.initial_concentration_um() * params.initial_volume_ul()
        / params.final_volume_ul();

    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let instability = instability_dist.sample(rng).max(0.0);
        let gravy = gravy_dist.sample(rng);
        let kit_efficiency = kit_dist.sample(rng).clamp(0.0, 1.0);
        let systemic_efficiency = systemic_dist.sample(rng).clamp(0.0, 1.0);

        let stability = factors::stability_factor(
            instability,
            params.instability_threshold(),
            params.instability_penalty_factor(),
        );
        let adsorption = factors::adsorption_factor(gravy, params.gravy_penalty_factor());
        let protein_efficiency = (stability * adsorption * pi_solubility).max(0.0);

        samples.push(theoretical_max * kit_efficiency * systemic_efficiency * protein_efficiency);
    }

    let mean = stats::mean(&samples)?;
    let standard_deviation = stats::population_std_dev(&samples)?;

    let mut sorted = samples;
    sorted.sort_by(f64::total_cmp);
    let lower = stats::percentile(&sorted, 0.025)?;
    let upper = stats::percentile(&sorted, 0.975)?;

    Ok(UncertaintyEstimate {
        mean,
        standard_deviation,
        confidence_interval_95: (lower, upper),
        iterations,
    })
}

fn normal(
    name: &'static str,
    mean: f64,
    std_dev: f64,
) -> Result<Normal<f64>, UncertaintyError> {
    Normal::new(mean, std_dev).map_err(|_| UncertaintyError::InvalidNoiseScale {
        name,
        value: std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::recovery;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn canonical_params() -> ExperimentParameters {
        ExperimentParameters::builder()
            .initial_concentration_um(10.0)
            .initial_volume_ul(90.0)
            .final_volume_ul(450.0)
            .kit_efficiency(0.50)
            .systemic_efficiency(0.75)
            .build()
            .unwrap()
    }

    fn canonical_props() -> SequenceProperties {
        SequenceProperties {
            molecular_weight_kda: 20.0,
            instability_index: 30.0,
            gravy: 0.0,
            isoelectric_point: 7.4,
        }
    }

    fn zero_noise() -> NoiseModel {
        NoiseModel {
            instability_rel_sd: 0.0,
            gravy_abs_sd: 0.0,
            kit_efficiency_rel_sd: 0.0,
            systemic_efficiency_rel_sd: 0.0,
        }
    }

    #[test]
    fn zero_iterations_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = quantify(
            &canonical_params(),
            &canonical_props(),
            &NoiseModel::default(),
            0,
            &mut rng,
        );
        assert!(matches!(result, Err(UncertaintyError::ZeroIterations)));
    }

    #[test]
    fn identical_seeds_give_identical_estimates() {
        let params = canonical_params();
        let props = canonical_props();
        let noise = NoiseModel::default();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = quantify(&params, &props, &noise, 500, &mut rng_a).unwrap();
        let b = quantify(&params, &props, &noise, 500, &mut rng_b).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_give_different_samples() {
        let params = canonical_params();
        let props = canonical_props();
        let noise = NoiseModel::default();

        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(2);
        let a = quantify(&params, &props, &noise, 500, &mut rng_a).unwrap();
        let b = quantify(&params, &props, &noise, 500, &mut rng_b).unwrap();

        assert_ne!(a.mean, b.mean);
    }

    #[test]
    fn zero_noise_collapses_to_the_deterministic_estimate() {
        let params = canonical_params();
        let props = canonical_props();
        let deterministic = recovery::evaluate(&params, &props).effective_concentration_um;

        let mut rng = StdRng::seed_from_u64(7);
        let estimate = quantify(&params, &props, &zero_noise(), 200, &mut rng).unwrap();

        assert!((estimate.mean - deterministic).abs() < 1e-12);
        assert!(estimate.standard_deviation < 1e-12);
        assert!((estimate.confidence_interval_95.0 - deterministic).abs() < 1e-12);
        assert!((estimate.confidence_interval_95.1 - deterministic).abs() < 1e-12);
    }

    #[test]
    fn vanishing_noise_converges_to_the_deterministic_estimate() {
        let params = canonical_params();
        let props = canonical_props();
        let deterministic = recovery::evaluate(&params, &props).effective_concentration_um;

        let tiny = NoiseModel {
            instability_rel_sd: 1e-9,
            gravy_abs_sd: 1e-9,
            kit_efficiency_rel_sd: 1e-9,
            systemic_efficiency_rel_sd: 1e-9,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let estimate = quantify(&params, &props, &tiny, 2000, &mut rng).unwrap();

        assert!((estimate.mean - deterministic).abs() < 1e-6);
        assert!(estimate.standard_deviation < 1e-6);
    }

    #[test]
    fn samples_never_exceed_the_theoretical_maximum() {
        let params = canonical_params();
        let props = canonical_props();

        let mut rng = StdRng::seed_from_u64(3);
        let estimate = quantify(&params, &props, &NoiseModel::default(), 2000, &mut rng).unwrap();

        // Every factor and efficiency is at most 1 after clipping, so the
        // upper CI bound cannot pass the unperturbed dilution limit.
        assert!(estimate.confidence_interval_95.1 <= 2.0);
        assert!(estimate.confidence_interval_95.0 >= 0.0);
        assert!(estimate.confidence_interval_95.0 <= estimate.confidence_interval_95.1);
    }

    #[test]
    fn ci_width_is_less_stable_with_fewer_iterations() {
        let params = canonical_params();
        let props = canonical_props();
        let noise = NoiseModel::default();

        let widths = |iterations: usize| -> Vec<f64> {
            (0..20)
                .map(|seed| {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let estimate =
                        quantify(&params, &props, &noise, iterations, &mut rng).unwrap();
                    estimate.confidence_interval_95.1 - estimate.confidence_interval_95.0
                })
                .collect()
        };

        let variance = |values: &[f64]| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64
        };

        let small_runs = widths(50);
        let large_runs = widths(5000);

        assert!(variance(&small_runs) > variance(&large_runs));
    }

    #[test]
    fn negative_instability_index_yields_an_invalid_noise_scale_error() {
        let props = SequenceProperties {
            instability_index: -10.0,
            ..canonical_props()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let result = quantify(
            &canonical_params(),
            &props,
            &NoiseModel::default(),
            100,
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(UncertaintyError::InvalidNoiseScale {
                name: "instability_index",
                ..
            })
        ));
    }
}
