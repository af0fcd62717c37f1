//! # evalpro Core Library
//!
//! Quality metrics for predicted biomolecular structures and sequences, together with
//! the batch machinery used to generate and score predictions at scale.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict layered architecture so that each concern can be
//! tested and replaced on its own.
//!
//! - **[`core`]: The Foundation.** Stateless structure models (`Structure`, `Chain`),
//!   PDB I/O, geometry, sequence alignment and the bundled scoring routines
//!   (TM-score alignment and DockQ interface scoring).
//!
//! - **[`engine`]: The Framework.** The uniform metric contract (`PairMetric`,
//!   `MetricModule`), summary statistics, the process-wide `StructureCache`, chain
//!   mapping for multi-chain comparisons, and the `BatchPredictionDriver` that runs a
//!   predictor over many samples sequentially or on a bounded worker pool.
//!
//! - **[`metrics`]: The Metrics.** Sequence recovery, perplexity, docking quality and
//!   aligned structural similarity, each a `PairMetric` implementation.
//!
//! - **[`workflows`]: Ready-made Predictors.** Adapters that plug external structure
//!   prediction tools into the batch driver.

pub mod core;
pub mod engine;
pub mod metrics;
pub mod workflows;
