//! # Scoring Module
//!
//! Geometric comparison routines that the structure metrics delegate to.
//!
//! ## Overview
//!
//! Each routine sits behind a trait so that the metrics never depend on a concrete
//! algorithm. The bundled implementations are pure Rust and need no external tools:
//!
//! - [`tm_score::StructuralAligner`] / [`tm_score::TmScoreAligner`] - superposition of
//!   two residue traces, reporting RMSD and the length-normalized TM-score
//! - [`dockq::InterfaceScorer`] / [`dockq::DockQScorer`] - per-interface docking quality
//!   of a multi-chain model against its reference

pub mod dockq;
pub mod tm_score;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("At least 3 aligned residue pairs are required, found {found}")]
    TooFewAlignedResidues { found: usize },
    #[error("Coordinate count ({coords}) does not match sequence length ({sequence})")]
    CoordinateSequenceMismatch { coords: usize, sequence: usize },
    #[error("Coordinate {index} is not finite")]
    NonFiniteCoordinate { index: usize },
    #[error("Optimal superposition could not be computed")]
    SuperpositionFailed,
    #[error("Chain '{chain}' from the chain map is not present in the {side} structure")]
    MissingChain { chain: char, side: &'static str },
    #[error("Reference structure has no chain pair in contact")]
    NoInterfaces,
    #[error("Interface {first}-{second} has no backbone atoms shared by prediction and reference")]
    EmptyAtomSelection { first: char, second: char },
}
