use crate::cli::{ExperimentOverrides, UncertaintyArgs};
use crate::error::{CliError, Result};
use eprm::engine::config::{ExperimentParameters, UncertaintySettings};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Hard-coded fallbacks for the experiment-specific quantities: the canonical
/// 10 uM / 90 uL / 450 uL run with a 50 % kit and 75 % systemic efficiency.
pub struct DefaultsConfig {
    pub initial_concentration_um: f64,
    pub initial_volume_ul: f64,
    pub final_volume_ul: f64,
    pub kit_efficiency: f64,
    pub systemic_efficiency: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            initial_concentration_um: 10.0,
            initial_volume_ul: 90.0,
            final_volume_ul: 450.0,
            kit_efficiency: 0.50,
            systemic_efficiency: 0.75,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialExperiment {
    #[serde(rename = "initial-concentration-um")]
    initial_concentration_um: Option<f64>,
    #[serde(rename = "initial-volume-ul")]
    initial_volume_ul: Option<f64>,
    #[serde(rename = "final-volume-ul")]
    final_volume_ul: Option<f64>,
    #[serde(rename = "kit-efficiency")]
    kit_efficiency: Option<f64>,
    #[serde(rename = "systemic-efficiency")]
    systemic_efficiency: Option<f64>,
    #[serde(rename = "buffer-ph")]
    buffer_ph: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialModel {
    #[serde(rename = "instability-threshold")]
    instability_threshold: Option<f64>,
    #[serde(rename = "instability-penalty-factor")]
    instability_penalty_factor: Option<f64>,
    #[serde(rename = "gravy-penalty-factor")]
    gravy_penalty_factor: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialUncertainty {
    iterations: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialExperimentConfig {
    experiment: Option<PartialExperiment>,
    model: Option<PartialModel>,
    uncertainty: Option<PartialUncertainty>,
}

impl PartialExperimentConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the Monte Carlo settings: CLI wins over the file, the file
    /// over the defaults; `--no-uncertainty` disables the pass entirely.
    pub fn uncertainty_settings(&self, args: &UncertaintyArgs) -> Option<UncertaintySettings> {
        if args.no_uncertainty {
            return None;
        }
        let mut settings = UncertaintySettings::default();
        let file_iterations = self.uncertainty.as_ref().and_then(|u| u.iterations);
        if let Some(iterations) = args.iterations.or(file_iterations) {
            settings.iterations = iterations;
        }
        Some(settings)
    }

    /// Produces the validated experiment parameters, layering CLI overrides
    /// over file values over the hard-coded defaults.
    pub fn merge_with_cli(mut self, args: &ExperimentOverrides) -> Result<ExperimentParameters> {
        let experiment = self.experiment.take().unwrap_or_default();
        let model = self.model.take().unwrap_or_default();
        let defaults = DefaultsConfig::default();

        let mut builder = ExperimentParameters::builder()
            .initial_concentration_um(
                args.initial_concentration
                    .or(experiment.initial_concentration_um)
                    .unwrap_or(defaults.initial_concentration_um),
            )
            .initial_volume_ul(
                args.initial_volume
                    .or(experiment.initial_volume_ul)
                    .unwrap_or(defaults.initial_volume_ul),
            )
            .final_volume_ul(
                args.final_volume
                    .or(experiment.final_volume_ul)
                    .unwrap_or(defaults.final_volume_ul),
            )
            .kit_efficiency(
                args.kit_efficiency
                    .or(experiment.kit_efficiency)
                    .unwrap_or(defaults.kit_efficiency),
            )
            .systemic_efficiency(
                args.systemic_efficiency
                    .or(experiment.systemic_efficiency)
                    .unwrap_or(defaults.systemic_efficiency),
            );

        if let Some(ph) = args.buffer_ph.or(experiment.buffer_ph) {
            builder = builder.buffer_ph(ph);
        }
        if let Some(threshold) = model.instability_threshold {
            builder = builder.instability_threshold(threshold);
        }
        if let Some(penalty) = model.instability_penalty_factor {
            builder = builder.instability_penalty_factor(penalty);
        }
        if let Some(penalty) = model.gravy_penalty_factor {
            builder = builder.gravy_penalty_factor(penalty);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }
}
