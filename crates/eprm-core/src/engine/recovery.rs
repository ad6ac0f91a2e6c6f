use super::config::ExperimentParameters;
use crate::core::models::properties::SequenceProperties;
use crate::core::recovery::factors;
use serde::Serialize;

/// The three physicochemical correction factors and their combined product.
///
/// The individual factors are not floored; only `protein_efficiency`, their
/// product, is clamped at zero. Flooring earlier would change the numeric
/// behavior for extreme inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorSet {
    pub stability: f64,
    pub adsorption: f64,
    pub pi_solubility: f64,
    pub protein_efficiency: f64,
}

/// One deterministic evaluation of the recovery model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecoveryEstimate {
    pub factors: FactorSet,
    pub total_recovery_coefficient: f64,
    pub theoretical_max_concentration_um: f64,
    pub effective_concentration_um: f64,
}

/// Evaluates the recovery model for one sequence. Pure and deterministic.
pub fn evaluate(params: &ExperimentParameters, props: &SequenceProperties) -> RecoveryEstimate {
    let stability = factors::stability_factor(
        props.instability_index,
        params.instability_threshold(),
        params.instability_penalty_factor(),
    );
    let adsorption = factors::adsorption_factor(props.gravy, params.gravy_penalty_factor());
    let pi_solubility =
        factors::pi_solubility_factor(params.buffer_ph(), props.isoelectric_point);

    // The one clamp in the chain.
    let protein_efficiency = (stability * adsorption * pi_solubility).max(0.0);

    let total_recovery_coefficient =
        params.kit_efficiency() * params.systemic_efficiency() * protein_efficiency;

    // Mass-conservation dilution; may exceed the initial concentration when
    // the protocol concentrates, which is a valid outcome.
    let theoretical_max_concentration_um = params.initial_concentration_um()
        * params.initial_volume_ul()
        / params.final_volume_ul();

    RecoveryEstimate {
        factors: FactorSet {
            stability,
            adsorption,
            pi_solubility,
            protein_efficiency,
        },
        total_recovery_coefficient,
        theoretical_max_concentration_um,
        effective_concentration_um: theoretical_max_concentration_um * total_recovery_coefficient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

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

    fn stable_props() -> SequenceProperties {
        SequenceProperties {
            molecular_weight_kda: 20.0,
            instability_index: 30.0,
            gravy: 0.0,
            isoelectric_point: 7.4,
        }
    }

    #[test]
    fn canonical_scenario_reproduces_the_reference_numbers() {
        let estimate = evaluate(&canonical_params(), &stable_props());

        assert_eq!(estimate.factors.stability, 1.0);
        assert_eq!(estimate.factors.adsorption, 1.0);
        assert!(f64_approx_equal(estimate.factors.pi_solubility, 0.85));
        assert!(f64_approx_equal(estimate.factors.protein_efficiency, 0.85));
        assert!(f64_approx_equal(estimate.total_recovery_coefficient, 0.31875));
        assert!(f64_approx_equal(
            estimate.theoretical_max_concentration_um,
            2.0
        ));
        assert!(f64_approx_equal(estimate.effective_concentration_um, 0.6375));
    }

    #[test]
    fn instability_above_threshold_applies_the_linear_penalty() {
        let props = SequenceProperties {
            instability_index: 50.0,
            ..stable_props()
        };
        let estimate = evaluate(&canonical_params(), &props);

        assert!(f64_approx_equal(estimate.factors.stability, 0.875));
        assert!(f64_approx_equal(
            estimate.factors.protein_efficiency,
            0.875 * 1.0 * 0.85
        ));
    }

    #[test]
    fn protein_efficiency_is_clamped_at_zero_for_extreme_instability() {
        let props = SequenceProperties {
            instability_index: 500.0,
            ..stable_props()
        };
        let estimate = evaluate(&canonical_params(), &props);

        assert!(estimate.factors.stability < 0.0);
        assert_eq!(estimate.factors.protein_efficiency, 0.0);
        assert_eq!(estimate.effective_concentration_um, 0.0);
    }

    #[test]
    fn effective_concentration_scales_linearly_with_initial_concentration() {
        let base = evaluate(&canonical_params(), &stable_props());

        let doubled_params = ExperimentParameters::builder()
            .initial_concentration_um(20.0)
            .initial_volume_ul(90.0)
            .final_volume_ul(450.0)
            .kit_efficiency(0.50)
            .systemic_efficiency(0.75)
            .build()
            .unwrap();
        let doubled = evaluate(&doubled_params, &stable_props());

        assert!(f64_approx_equal(
            doubled.effective_concentration_um,
            2.0 * base.effective_concentration_um
        ));
    }

    #[test]
    fn a_concentration_step_may_exceed_the_initial_concentration() {
        let params = ExperimentParameters::builder()
            .initial_concentration_um(10.0)
            .initial_volume_ul(90.0)
            .final_volume_ul(45.0)
            .kit_efficiency(0.50)
            .systemic_efficiency(0.75)
            .build()
            .unwrap();
        let estimate = evaluate(&params, &stable_props());

        assert!(f64_approx_equal(
            estimate.theoretical_max_concentration_um,
            20.0
        ));
    }

    #[test]
    fn adsorption_penalty_is_symmetric_in_gravy_sign() {
        let hydrophobic = evaluate(
            &canonical_params(),
            &SequenceProperties {
                gravy: 0.8,
                ..stable_props()
            },
        );
        let hydrophilic = evaluate(
            &canonical_params(),
            &SequenceProperties {
                gravy: -0.8,
                ..stable_props()
            },
        );

        assert!(f64_approx_equal(
            hydrophobic.effective_concentration_um,
            hydrophilic.effective_concentration_um
        ));
    }
}
