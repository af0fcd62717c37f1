use super::cache::CacheError;
use super::config::ConfigError;
use crate::core::scoring::ScoringError;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A per-pair precondition that does not hold.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Prediction length ({prediction}) does not match reference length ({reference})")]
    LengthMismatch { prediction: usize, reference: usize },

    #[error(
        "Prediction shape [{rows}, {columns}] does not match expected shape [{expected_rows}, {expected_columns}]"
    )]
    ShapeMismatch {
        rows: usize,
        columns: usize,
        expected_rows: usize,
        expected_columns: usize,
    },

    #[error("Class index {index} at position {position} is outside [0, {vocab_size})")]
    ClassIndexOutOfRange {
        position: usize,
        index: usize,
        vocab_size: usize,
    },

    #[error("Prediction has {prediction} chains but reference has {reference}")]
    ChainCountMismatch { prediction: usize, reference: usize },

    #[error("Reference chain '{0}' has no chain with the same identifier in the prediction")]
    MissingChain(char),

    #[error("The {side} has {length} residues, at least {minimum} are required")]
    BelowMinimumLength {
        side: &'static str,
        length: usize,
        minimum: usize,
    },

    #[error("The {side} has {coords} coordinates for a sequence of length {sequence}")]
    CoordinateSequenceMismatch {
        side: &'static str,
        coords: usize,
        sequence: usize,
    },

    #[error("The {side} has a non-finite coordinate at residue {index}")]
    NonFiniteCoordinate { side: &'static str, index: usize },

    #[error("Sequences must not be empty")]
    EmptySequence,
}

/// Failure of a single `(prediction, reference)` pair.
#[derive(Debug, Error)]
pub enum PairError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Load(#[from] CacheError),
}

#[derive(Debug, Error)]
pub enum MetricError {
    #[error("{metric}: pair {index} failed: {source}")]
    Pair {
        metric: &'static str,
        index: usize,
        #[source]
        source: PairError,
    },

    #[error("{metric}: cannot compute statistics over an empty batch")]
    EmptyBatch { metric: &'static str },

    #[error("{metric}: received {predictions} predictions but {references} references")]
    BatchSizeMismatch {
        metric: &'static str,
        predictions: usize,
        references: usize,
    },

    #[error("Invalid metric configuration: {0}")]
    Config(#[from] ConfigError),
}

impl MetricError {
    /// The offending pair index, if the error concerns a single pair.
    pub fn pair_index(&self) -> Option<usize> {
        match self {
            MetricError::Pair { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Invalid driver configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Sample id '{0}' appears more than once")]
    DuplicateSample(String),

    #[error("Sample id '{id}' cannot be used as a file name: {reason}")]
    InvalidSampleId { id: String, reason: &'static str },

    #[error("Failed to prepare output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Prediction for sample '{sample_id}' failed: {source}")]
    Task {
        sample_id: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl DriverError {
    /// The sample id the error is attributed to, if any.
    pub fn sample_id(&self) -> Option<&str> {
        match self {
            DriverError::DuplicateSample(id) | DriverError::InvalidSampleId { id, .. } => Some(id),
            DriverError::Task { sample_id, .. } => Some(sample_id),
            _ => None,
        }
    }
}
