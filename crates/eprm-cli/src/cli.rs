use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "EPRM Contributors",
    version,
    about = "EPRM CLI - A command-line interface for predicting the effective recoverable concentration of purified proteins, with Monte Carlo uncertainty quantification.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the recoverable concentration for a single sequence record.
    Analyze(AnalyzeArgs),
    /// Analyze every sequence file in a directory and write a results report.
    Batch(BatchArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    // --- Property input ---
    /// Path to a property table (CSV) produced by an external
    /// sequence-analysis tool.
    #[arg(short = 'p', long, value_name = "PATH", requires = "id")]
    pub properties: Option<PathBuf>,

    /// Record identifier to look up in the property table.
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Molecular weight in kDa (direct property input).
    #[arg(long, value_name = "FLOAT")]
    pub molecular_weight: Option<f64>,

    /// Instability index (direct property input).
    #[arg(long, value_name = "FLOAT")]
    pub instability: Option<f64>,

    /// GRAVY hydropathy score (direct property input).
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub gravy: Option<f64>,

    /// Isoelectric point (direct property input).
    #[arg(long, value_name = "FLOAT")]
    pub isoelectric_point: Option<f64>,

    // --- Experiment configuration ---
    /// Path to the experiment configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ExperimentOverrides,

    #[command(flatten)]
    pub uncertainty: UncertaintyArgs,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing .fasta (and FASTA-formatted .txt) input files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub input: PathBuf,

    /// Path to a property table (CSV) covering the input records.
    #[arg(short = 'p', long, required = true, value_name = "PATH")]
    pub properties: PathBuf,

    /// Directory to write results into. Defaults to a timestamped directory
    /// under the current working directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to the experiment configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ExperimentOverrides,

    #[command(flatten)]
    pub uncertainty: UncertaintyArgs,
}

/// Experiment-parameter overrides shared by both subcommands; CLI values win
/// over the configuration file.
#[derive(Args, Debug, Clone, Copy)]
pub struct ExperimentOverrides {
    /// Override the initial protein concentration in uM.
    #[arg(long, value_name = "FLOAT")]
    pub initial_concentration: Option<f64>,

    /// Override the initial sample volume in uL.
    #[arg(long, value_name = "FLOAT")]
    pub initial_volume: Option<f64>,

    /// Override the final elution volume in uL.
    #[arg(long, value_name = "FLOAT")]
    pub final_volume: Option<f64>,

    /// Override the kit recovery efficiency, in (0, 1].
    #[arg(long, value_name = "FLOAT")]
    pub kit_efficiency: Option<f64>,

    /// Override the systemic handling efficiency, in (0, 1].
    #[arg(long, value_name = "FLOAT")]
    pub systemic_efficiency: Option<f64>,

    /// Override the buffer pH.
    #[arg(long, value_name = "FLOAT")]
    pub buffer_ph: Option<f64>,
}

/// Monte Carlo controls shared by both subcommands.
#[derive(Args, Debug, Clone, Copy)]
pub struct UncertaintyArgs {
    /// Skip the Monte Carlo uncertainty pass and report the point estimate
    /// only.
    #[arg(long)]
    pub no_uncertainty: bool,

    /// Number of Monte Carlo iterations.
    #[arg(short = 'n', long, value_name = "INT")]
    pub iterations: Option<usize>,

    /// Seed for the random source; omit for a nondeterministic run.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}
