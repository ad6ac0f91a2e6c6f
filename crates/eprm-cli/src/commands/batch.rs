use crate::cli::BatchArgs;
use crate::config::PartialExperimentConfig;
use crate::error::Result;
use crate::output::{self, RunConfigSnapshot};
use crate::utils::progress::CliProgressHandler;
use eprm::core::io::properties::PropertyTable;
use eprm::engine::progress::ProgressReporter;
use eprm::workflows;
use tracing::{info, warn};

pub fn run(args: BatchArgs) -> Result<()> {
    let partial = PartialExperimentConfig::load_or_default(args.config.as_deref())?;
    let settings = partial.uncertainty_settings(&args.uncertainty);
    let params = partial.merge_with_cli(&args.overrides)?;

    let table = PropertyTable::from_path(&args.properties)?;
    info!("Loaded property table with {} entries.", table.len());
    if table.is_empty() {
        warn!("The property table is empty; every record will be skipped.");
    }

    let run_dir = output::create_run_directory(args.output.as_deref())?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut rng = super::build_rng(args.uncertainty.seed);

    println!("Starting batch analysis of {}...", args.input.display());
    let report = workflows::batch::run(
        &args.input,
        &params,
        &table,
        settings.as_ref(),
        &reporter,
        &mut rng,
    )?;

    for entry in &report.entries {
        output::print_result(&entry.header, &entry.result);
    }
    if !report.skipped.is_empty() {
        println!(
            "Skipped {} record(s); run with -v for the reasons.",
            report.skipped.len()
        );
    }

    let results_path = output::write_batch_report(&run_dir, &report)?;
    let snapshot = RunConfigSnapshot {
        version: env!("CARGO_PKG_VERSION"),
        seed: args.uncertainty.seed,
        experiment: &params,
        uncertainty: settings.as_ref(),
    };
    let snapshot_path = output::write_config_snapshot(&run_dir, &snapshot)?;
    info!("Run configuration snapshot written to {:?}", snapshot_path);

    println!(
        "✓ {} record(s) analyzed. Results written to: {}",
        report.entries.len(),
        results_path.display()
    );
    Ok(())
}
