use crate::core::models::properties::SequenceProperties;
use crate::engine::config::{ExperimentParameters, UncertaintySettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::recovery::{self, RecoveryEstimate};
use crate::engine::uncertainty::{self, UncertaintyEstimate};
use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument};

/// Default working-stock target: 20 nM.
pub const DEFAULT_TARGET_CONCENTRATION_UM: f64 = 0.02;

/// One sequence's full analysis result.
///
/// The deterministic estimate is always present. When uncertainty was
/// quantified, the distributional `(mean, std)` pair and confidence interval
/// supersede the deterministic effective concentration as the value to plan
/// around; the factors, coefficients, and theoretical maximum stay the
/// single-point values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub properties: SequenceProperties,
    pub recovery: RecoveryEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<UncertaintyEstimate>,
}

impl ResultRecord {
    /// The concentration a caller should plan around: the distributional mean
    /// when uncertainty was quantified, the deterministic point estimate
    /// otherwise.
    pub fn expected_concentration_um(&self) -> f64 {
        self.uncertainty
            .map(|u| u.mean)
            .unwrap_or(self.recovery.effective_concentration_um)
    }

    /// Integer dilution factor to reach `target_um`, or `None` when the
    /// expected concentration is at or below the target (no dilution
    /// possible).
    pub fn dilution_factor(&self, target_um: f64) -> Option<u64> {
        let expected = self.expected_concentration_um();
        if target_um > 0.0 && expected > target_um {
            Some((expected / target_um) as u64)
        } else {
            None
        }
    }
}

/// Evaluates one sequence's properties under the given experiment parameters.
///
/// With `uncertainty` settings present, the Monte Carlo pass runs against the
/// supplied random source; pass a freshly seeded generator for reproducible
/// results.
#[instrument(skip_all, name = "analyze_workflow")]
pub fn run(
    params: &ExperimentParameters,
    props: &SequenceProperties,
    uncertainty: Option<&UncertaintySettings>,
    reporter: &ProgressReporter,
    rng: &mut impl Rng,
) -> Result<ResultRecord, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Recovery Evaluation",
    });
    let recovery = recovery::evaluate(params, props);
    info!(
        total_recovery_coefficient = recovery.total_recovery_coefficient,
        effective_concentration_um = recovery.effective_concentration_um,
        "Deterministic estimate computed."
    );
    reporter.report(Progress::PhaseFinish);

    let uncertainty = match uncertainty {
        Some(settings) => {
            reporter.report(Progress::PhaseStart {
                name: "Uncertainty Quantification",
            });
            let estimate =
                uncertainty::quantify(params, props, &settings.noise, settings.iterations, rng)?;
            info!(
                mean = estimate.mean,
                standard_deviation = estimate.standard_deviation,
                "Monte Carlo estimate computed."
            );
            reporter.report(Progress::PhaseFinish);
            Some(estimate)
        }
        None => None,
    };

    Ok(ResultRecord {
        properties: *props,
        recovery,
        uncertainty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn point_estimate_only_when_uncertainty_is_off() {
        let mut rng = StdRng::seed_from_u64(1);
        let record = run(
            &canonical_params(),
            &canonical_props(),
            None,
            &ProgressReporter::new(),
            &mut rng,
        )
        .unwrap();

        assert!(record.uncertainty.is_none());
        assert!((record.expected_concentration_um() - 0.6375).abs() < 1e-12);
    }

    #[test]
    fn distributional_estimate_supersedes_the_point_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let record = run(
            &canonical_params(),
            &canonical_props(),
            Some(&UncertaintySettings::default()),
            &ProgressReporter::new(),
            &mut rng,
        )
        .unwrap();

        let uncertainty = record.uncertainty.unwrap();
        assert_eq!(record.expected_concentration_um(), uncertainty.mean);
        // The deterministic fields stay the single-point values.
        assert!((record.recovery.effective_concentration_um - 0.6375).abs() < 1e-12);
    }

    #[test]
    fn dilution_factor_truncates_toward_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let record = run(
            &canonical_params(),
            &canonical_props(),
            None,
            &ProgressReporter::new(),
            &mut rng,
        )
        .unwrap();

        // 0.6375 / 0.02 = 31.875, truncated.
        assert_eq!(record.dilution_factor(DEFAULT_TARGET_CONCENTRATION_UM), Some(31));
    }

    #[test]
    fn no_dilution_guidance_at_or_below_the_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let record = run(
            &canonical_params(),
            &canonical_props(),
            None,
            &ProgressReporter::new(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(record.dilution_factor(1.0), None);
        assert_eq!(record.dilution_factor(0.0), None);
    }

    #[test]
    fn progress_phases_are_reported_in_order() {
        use std::sync::Mutex;

        let events: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let label = match event {
                Progress::PhaseStart { name } => format!("start:{name}"),
                Progress::PhaseFinish => "finish".to_string(),
                _ => return,
            };
            events.lock().unwrap().push(label);
        }));

        let mut rng = StdRng::seed_from_u64(1);
        run(
            &canonical_params(),
            &canonical_props(),
            Some(&UncertaintySettings::default()),
            &reporter,
            &mut rng,
        )
        .unwrap();
        drop(reporter);

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "start:Recovery Evaluation",
                "finish",
                "start:Uncertainty Quantification",
                "finish"
            ]
        );
    }
}
