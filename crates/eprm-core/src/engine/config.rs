use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Parameter '{name}' must lie in (0, 1], got {value}")]
    EfficiencyOutOfRange { name: &'static str, value: f64 },

    #[error("Parameter '{name}' must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// The immutable experimental configuration for one analysis session.
///
/// Constructed once through [`ExperimentParametersBuilder`], validated at
/// build time, and shared read-only across every sequence evaluated in the
/// session; changing a condition means building a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExperimentParameters {
    initial_concentration_um: f64,
    initial_volume_ul: f64,
    final_volume_ul: f64,
    kit_efficiency: f64,
    systemic_efficiency: f64,
    buffer_ph: f64,
    instability_threshold: f64,
    instability_penalty_factor: f64,
    gravy_penalty_factor: f64,
}

impl ExperimentParameters {
    pub fn builder() -> ExperimentParametersBuilder {
        ExperimentParametersBuilder::new()
    }

    pub fn initial_concentration_um(&self) -> f64 {
        self.initial_concentration_um
    }
    pub fn initial_volume_ul(&self) -> f64 {
        self.initial_volume_ul
    }
    pub fn final_volume_ul(&self) -> f64 {
        self.final_volume_ul
    }
    pub fn kit_efficiency(&self) -> f64 {
        self.kit_efficiency
    }
    pub fn systemic_efficiency(&self) -> f64 {
        self.systemic_efficiency
    }
    pub fn buffer_ph(&self) -> f64 {
        self.buffer_ph
    }
    pub fn instability_threshold(&self) -> f64 {
        self.instability_threshold
    }
    pub fn instability_penalty_factor(&self) -> f64 {
        self.instability_penalty_factor
    }
    pub fn gravy_penalty_factor(&self) -> f64 {
        self.gravy_penalty_factor
    }

    /// True when the final volume is smaller than the initial volume, i.e.
    /// the protocol concentrates rather than dilutes. Valid, not an error.
    pub fn is_concentration_step(&self) -> bool {
        self.final_volume_ul < self.initial_volume_ul
    }
}

/// Builder for [`ExperimentParameters`].
///
/// The experiment-specific quantities (concentration, volumes, efficiencies)
/// are required; the model constants default to buffer pH 7.4, instability
/// threshold 40.0, instability penalty 80.0, and GRAVY penalty 0.15.
#[derive(Debug, Default)]
pub struct ExperimentParametersBuilder {
    initial_concentration_um: Option<f64>,
    initial_volume_ul: Option<f64>,
    final_volume_ul: Option<f64>,
    kit_efficiency: Option<f64>,
    systemic_efficiency: Option<f64>,
    buffer_ph: Option<f64>,
    instability_threshold: Option<f64>,
    instability_penalty_factor: Option<f64>,
    gravy_penalty_factor: Option<f64>,
}

impl ExperimentParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_concentration_um(mut self, value: f64) -> Self {
        self.initial_concentration_um = Some(value);
        self
    }
    pub fn initial_volume_ul(mut self, value: f64) -> Self {
        self.initial_volume_ul = Some(value);
        self
    }
    pub fn final_volume_ul(mut self, value: f64) -> Self {
        self.final_volume_ul = Some(value);
        self
    }
    pub fn kit_efficiency(mut self, value: f64) -> Self {
        self.kit_efficiency = Some(value);
        self
    }
    pub fn systemic_efficiency(mut self, value: f64) -> Self {
        self.systemic_efficiency = Some(value);
        self
    }
    pub fn buffer_ph(mut self, value: f64) -> Self {
        self.buffer_ph = Some(value);
        self
    }
    pub fn instability_threshold(mut self, value: f64) -> Self {
        self.instability_threshold = Some(value);
        self
    }
    pub fn instability_penalty_factor(mut self, value: f64) -> Self {
        self.instability_penalty_factor = Some(value);
        self
    }
    pub fn gravy_penalty_factor(mut self, value: f64) -> Self {
        self.gravy_penalty_factor = Some(value);
        self
    }

    pub fn build(self) -> Result<ExperimentParameters, ConfigError> {
        let params = ExperimentParameters {
            initial_concentration_um: self
                .initial_concentration_um
                .ok_or(ConfigError::MissingParameter("initial_concentration_um"))?,
            initial_volume_ul: self
                .initial_volume_ul
                .ok_or(ConfigError::MissingParameter("initial_volume_ul"))?,
            final_volume_ul: self
                .final_volume_ul
                .ok_or(ConfigError::MissingParameter("final_volume_ul"))?,
            kit_efficiency: self
                .kit_efficiency
                .ok_or(ConfigError::MissingParameter("kit_efficiency"))?,
            systemic_efficiency: self
                .systemic_efficiency
                .ok_or(ConfigError::MissingParameter("systemic_efficiency"))?,
            buffer_ph: self.buffer_ph.unwrap_or(7.4),
            instability_threshold: self.instability_threshold.unwrap_or(40.0),
            instability_penalty_factor: self.instability_penalty_factor.unwrap_or(80.0),
            gravy_penalty_factor: self.gravy_penalty_factor.unwrap_or(0.15),
        };
        params.validate()?;
        Ok(params)
    }
}

impl ExperimentParameters {
    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("initial_concentration_um", self.initial_concentration_um)?;
        check_positive("initial_volume_ul", self.initial_volume_ul)?;
        check_positive("final_volume_ul", self.final_volume_ul)?;
        check_efficiency("kit_efficiency", self.kit_efficiency)?;
        check_efficiency("systemic_efficiency", self.systemic_efficiency)?;
        check_positive("instability_penalty_factor", self.instability_penalty_factor)?;
        if self.gravy_penalty_factor < 0.0 {
            return Err(ConfigError::Negative {
                name: "gravy_penalty_factor",
                value: self.gravy_penalty_factor,
            });
        }

        if self.is_concentration_step() {
            warn!(
                final_volume_ul = self.final_volume_ul,
                initial_volume_ul = self.initial_volume_ul,
                "Final volume is smaller than the initial volume; assuming a concentration step."
            );
        }
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn check_efficiency(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::EfficiencyOutOfRange { name, value })
    }
}

/// Standard deviations of the measurement noise assumed by the Monte Carlo
/// engine. Relative scales multiply the point value; the GRAVY scale is
/// absolute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NoiseModel {
    pub instability_rel_sd: f64,
    pub gravy_abs_sd: f64,
    pub kit_efficiency_rel_sd: f64,
    pub systemic_efficiency_rel_sd: f64,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            instability_rel_sd: 0.05,
            gravy_abs_sd: 0.10,
            kit_efficiency_rel_sd: 0.05,
            systemic_efficiency_rel_sd: 0.05,
        }
    }
}

/// How the uncertainty pass should run when a caller requests it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UncertaintySettings {
    pub iterations: usize,
    pub noise: NoiseModel,
}

impl Default for UncertaintySettings {
    fn default() -> Self {
        Self {
            iterations: 1000,
            noise: NoiseModel::default(),
        }
    }
}
