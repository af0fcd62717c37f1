use evalpro::engine::cache::CacheError;
use evalpro::engine::error::{DriverError, MetricError};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Load(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Pair {index}: {source}")]
    PairInput {
        index: usize,
        #[source]
        source: Box<CliError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("{failed} of {total} predictions failed")]
    BatchFailed { failed: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
