use clap::{Args, Parser, Subcommand, ValueEnum};
use evalpro::engine::chain_map::ChainMapping;
use evalpro::engine::config::FailurePolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "evalpro CLI - Batch structure prediction and quality scoring for predicted biomolecular structures and sequences.",
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
    /// Run an external structure-prediction program over every record of a FASTA file.
    Predict(PredictArgs),
    /// Score predictions against references and print summary statistics.
    Score(ScoreArgs),
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// FASTA file whose records become the samples of the batch.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub fasta: PathBuf,

    /// Directory receiving one `<record-id>.<extension>` file per sample.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Predictor Overrides ---
    /// Override the prediction program.
    #[arg(short, long, value_name = "PROGRAM")]
    pub program: Option<String>,

    /// Override the program arguments. Can be used multiple times.
    /// `{output}` and `{sequence}` are substituted per sample.
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Set an environment variable for the program. Can be used multiple times.
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    // --- Driver Overrides ---
    /// Override the number of samples predicted concurrently.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub jobs: Option<usize>,

    /// Override what happens when a sample fails in a parallel run.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub failure_policy: Option<FailurePolicyArg>,

    /// Override the output file extension.
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Show a progress bar while the batch runs.
    #[arg(long)]
    pub progress: bool,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// The metric to compute.
    #[arg(value_enum)]
    pub metric: ScoreMetric,

    /// CSV file with `prediction` and `reference` columns.
    /// Sequences for `recovery`, structure file paths otherwise; relative paths
    /// are resolved against the CSV file's directory.
    #[arg(long, required = true, value_name = "PATH")]
    pub pairs: PathBuf,

    /// Write one CSV row of scores per pair to this file.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override how reference chains are matched to prediction chains (dockq only).
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub chain_mapping: Option<ChainMappingArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMetric {
    /// Fraction of identical positions between equal-length sequences.
    Recovery,
    /// RMSD and TM-score of the first chain of each structure.
    TmScore,
    /// DockQ interface quality of multi-chain complexes.
    Dockq,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicyArg {
    FailFast,
    Isolate,
}

impl From<FailurePolicyArg> for FailurePolicy {
    fn from(arg: FailurePolicyArg) -> Self {
        match arg {
            FailurePolicyArg::FailFast => FailurePolicy::FailFast,
            FailurePolicyArg::Isolate => FailurePolicy::Isolate,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainMappingArg {
    Positional,
    ByName,
}

impl From<ChainMappingArg> for ChainMapping {
    fn from(arg: ChainMappingArg) -> Self {
        match arg {
            ChainMappingArg::Positional => ChainMapping::Positional,
            ChainMappingArg::ByName => ChainMapping::ByName,
        }
    }
}
