use crate::error::{CliError, Result};
use chrono::Local;
use eprm::engine::config::{ExperimentParameters, UncertaintySettings};
use eprm::workflows::analyze::{DEFAULT_TARGET_CONCENTRATION_UM, ResultRecord};
use eprm::workflows::batch::BatchReport;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything needed to replay a run, written next to the results.
///
/// Scalar fields come before the tables so the TOML serializer accepts the
/// layout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunConfigSnapshot<'a> {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub experiment: &'a ExperimentParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<&'a UncertaintySettings>,
}

/// Creates the run directory: the explicit path if given, otherwise a
/// timestamped directory so repeated runs never overwrite each other.
pub fn create_run_directory(output: Option<&Path>) -> Result<PathBuf> {
    let dir = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!(
            "eprm-results-{}",
            Local::now().format("%Y%m%d_%H%M%S")
        )),
    };
    fs::create_dir_all(&dir)?;
    info!("Run directory: {:?}", dir);
    Ok(dir)
}

pub fn write_batch_report(dir: &Path, report: &BatchReport) -> Result<PathBuf> {
    let path = dir.join("results.json");
    let json = serde_json::to_string_pretty(report).map_err(|e| CliError::Other(e.into()))?;
    fs::write(&path, json)?;
    Ok(path)
}

pub fn write_config_snapshot(dir: &Path, snapshot: &RunConfigSnapshot) -> Result<PathBuf> {
    let path = dir.join("config.toml");
    let content =
        toml::to_string_pretty(snapshot).map_err(|e| CliError::Other(anyhow::anyhow!(e)))?;
    fs::write(&path, content)?;
    Ok(path)
}

/// Prints one record's analysis in the standard report shape.
pub fn print_result(header: &str, record: &ResultRecord) {
    let properties = &record.properties;
    let recovery = &record.recovery;

    println!("[Analysis target: {header}]");
    println!(
        "  • Properties: MW={:.1} kDa, pI={:.2}, GRAVY={:.2}, Instability={:.2}",
        properties.molecular_weight_kda,
        properties.isoelectric_point,
        properties.gravy,
        properties.instability_index,
    );
    println!(
        "  • Factors: stability={:.3} × adsorption={:.3} × pI={:.3} → protein efficiency={:.3}",
        recovery.factors.stability,
        recovery.factors.adsorption,
        recovery.factors.pi_solubility,
        recovery.factors.protein_efficiency,
    );
    println!(
        "  • Total recovery coefficient: {:.4} (theoretical max {:.4} uM)",
        recovery.total_recovery_coefficient, recovery.theoretical_max_concentration_um,
    );

    match &record.uncertainty {
        Some(uncertainty) => {
            println!(
                "  • Estimated effective conc: {:.4} ± {:.4} uM",
                uncertainty.mean, uncertainty.standard_deviation,
            );
            println!(
                "  • 95% CI: [{:.4}, {:.4}] uM",
                uncertainty.confidence_interval_95.0, uncertainty.confidence_interval_95.1,
            );
        }
        None => {
            println!(
                "  • Estimated effective conc: {:.4} uM",
                recovery.effective_concentration_um,
            );
        }
    }

    match record.dilution_factor(DEFAULT_TARGET_CONCENTRATION_UM) {
        Some(factor) => println!("  • For a 20 nM working stock: dilute 1:{factor}"),
        None => println!("  • Warning: concentration too low (< 20 nM) for a standard dilution"),
    }
}
