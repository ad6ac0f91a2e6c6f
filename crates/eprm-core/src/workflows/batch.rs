use super::analyze::{self, ResultRecord};
use crate::core::io::discovery::{self, Discovery};
use crate::core::io::fasta::FastaFile;
use crate::core::io::traits::PropertyProvider;
use crate::core::models::record::SequenceRecord;
use crate::engine::config::{ExperimentParameters, UncertaintySettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::uncertainty::UncertaintyError;
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// One successfully analyzed record.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub file: PathBuf,
    pub header: String,
    pub sequence: String,
    pub result: ResultRecord,
}

/// A record (or whole file) that was skipped, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub file: PathBuf,
    pub header: String,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub skipped: Vec<SkippedRecord>,
}

/// Analyzes every sequence file in a directory.
///
/// Invalid records, unresolvable properties, and unreadable files become
/// skip entries rather than aborting the run; an empty directory is an
/// error. Records are processed in sorted path order, so a seeded `rng`
/// makes the whole batch reproducible.
#[instrument(skip_all, name = "batch_workflow", fields(dir = ?input_dir))]
pub fn run<P: PropertyProvider>(
    input_dir: &Path,
    params: &ExperimentParameters,
    provider: &P,
    uncertainty: Option<&UncertaintySettings>,
    reporter: &ProgressReporter,
    rng: &mut impl Rng,
) -> Result<BatchReport, EngineError> {
    // Caller errors surface before any filesystem work.
    if let Some(settings) = uncertainty {
        if settings.iterations == 0 {
            return Err(UncertaintyError::ZeroIterations.into());
        }
    }

    reporter.report(Progress::PhaseStart { name: "Discovery" });
    let Discovery { targets, excluded } = discovery::discover_sequence_files(input_dir)?;
    for (path, reason) in &excluded {
        info!(path = ?path, %reason, "Excluded candidate file.");
    }
    if targets.is_empty() {
        reporter.report(Progress::PhaseFinish);
        return Err(EngineError::NoSequenceFiles {
            dir: input_dir.to_path_buf(),
        });
    }
    info!(files = targets.len(), "Found sequence file(s) to process.");
    reporter.report(Progress::Message(format!(
        "{} sequence file(s) found, {} candidate(s) excluded.",
        targets.len(),
        excluded.len()
    )));
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Parsing" });
    let mut report = BatchReport::default();
    let mut pending: Vec<(PathBuf, SequenceRecord)> = Vec::new();
    for path in targets {
        match FastaFile::read_from_path(&path) {
            Ok(contents) => {
                for entry in contents.skipped {
                    warn!(
                        header = %entry.header,
                        reason = %entry.reason,
                        "Skipping invalid sequence entry."
                    );
                    report.skipped.push(SkippedRecord {
                        file: path.clone(),
                        header: entry.header,
                        reason: entry.reason.to_string(),
                    });
                }
                for record in contents.records {
                    pending.push((path.clone(), record));
                }
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to read sequence file; skipping it.");
                report.skipped.push(SkippedRecord {
                    file: path,
                    header: String::new(),
                    reason: e.to_string(),
                });
            }
        }
    }
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Evaluation" });
    reporter.report(Progress::TaskStart {
        total_records: pending.len() as u64,
    });
    for (file, record) in pending {
        reporter.report(Progress::StatusUpdate {
            text: record.id().to_string(),
        });

        // The per-record sub-phases would fight the batch task display, so
        // the inner workflow gets a silent reporter.
        let outcome = provider
            .properties_for(&record)
            .map_err(EngineError::from)
            .and_then(|props| {
                analyze::run(params, &props, uncertainty, &ProgressReporter::new(), rng)
            });

        match outcome {
            Ok(result) => report.entries.push(BatchEntry {
                file,
                header: record.header().to_string(),
                sequence: record.sequence().to_string(),
                result,
            }),
            Err(e) => {
                warn!(header = record.header(), error = %e, "Skipping record.");
                report.skipped.push(SkippedRecord {
                    file,
                    header: record.header().to_string(),
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        analyzed = report.entries.len(),
        skipped = report.skipped.len(),
        "Batch analysis complete."
    );
    Ok(report)
}
