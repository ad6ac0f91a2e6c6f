use crate::cli::AnalyzeArgs;
use crate::config::PartialExperimentConfig;
use crate::error::{CliError, Result};
use crate::output;
use crate::utils::progress::CliProgressHandler;
use eprm::core::io::properties::PropertyTable;
use eprm::core::models::properties::SequenceProperties;
use eprm::engine::progress::ProgressReporter;
use eprm::workflows;
use tracing::info;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let partial = PartialExperimentConfig::load_or_default(args.config.as_deref())?;
    let settings = partial.uncertainty_settings(&args.uncertainty);
    let params = partial.merge_with_cli(&args.overrides)?;

    let (label, props) = resolve_properties(&args)?;
    info!(
        record = %label,
        instability_index = props.instability_index,
        gravy = props.gravy,
        isoelectric_point = props.isoelectric_point,
        "Resolved sequence properties."
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut rng = super::build_rng(args.uncertainty.seed);

    let record = workflows::analyze::run(&params, &props, settings.as_ref(), &reporter, &mut rng)?;

    output::print_result(&label, &record);
    Ok(())
}

/// Properties come either from a table lookup or from the four direct flags;
/// mixing the two shapes is rejected up front.
fn resolve_properties(args: &AnalyzeArgs) -> Result<(String, SequenceProperties)> {
    if let Some(table_path) = &args.properties {
        let id = args
            .id
            .as_ref()
            .ok_or_else(|| CliError::Argument("--id is required with --properties.".to_string()))?;

        let table = PropertyTable::from_path(table_path)?;
        info!("Loaded property table with {} entries.", table.len());

        let props = table.get(id).copied().ok_or_else(|| {
            CliError::Argument(format!("Record '{id}' not found in the property table."))
        })?;
        return Ok((id.clone(), props));
    }

    match (
        args.molecular_weight,
        args.instability,
        args.gravy,
        args.isoelectric_point,
    ) {
        (Some(molecular_weight_kda), Some(instability_index), Some(gravy), Some(isoelectric_point)) => Ok((
            "sequence".to_string(),
            SequenceProperties {
                molecular_weight_kda,
                instability_index,
                gravy,
                isoelectric_point,
            },
        )),
        _ => Err(CliError::Argument(
            "Provide either --properties with --id, or all of --molecular-weight, \
             --instability, --gravy, and --isoelectric-point."
                .to_string(),
        )),
    }
}
