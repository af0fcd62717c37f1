//! # Engine Module
//!
//! This module implements the evaluation framework of evalpro: the uniform contract
//! every metric follows, the shared resources metrics draw on, and the driver that
//! generates predictions for a batch of samples.
//!
//! ## Overview
//!
//! A metric is a [`metric::PairMetric`] wrapped in a [`metric::MetricModule`]. The
//! module owns an accumulator of validated `(prediction, reference)` pairs; every
//! pair is checked against the metric's preconditions the moment it is accumulated,
//! and the whole accumulator is scored and reduced to summary statistics when
//! `compute` is called.
//!
//! Structure predictions are produced ahead of scoring by the
//! [`driver::BatchPredictionDriver`], which runs a [`driver::Predictor`] once per sample
//! either sequentially or on a bounded worker pool.
//!
//! ## Architecture
//!
//! - **Metric Contract** ([`metric`]) - Accumulate, validate, score and reduce
//! - **Summary Statistics** ([`stats`]) - Mean, maximum and minimum over per-pair values
//! - **Structure Cache** ([`cache`]) - Parse-once memoization of structure files
//! - **Chain Mapping** ([`chain_map`]) - Reference-to-prediction chain correspondence
//! - **Batch Driver** ([`driver`]) - Sequential and pooled prediction runs
//! - **Configuration** ([`config`]) - Driver settings and their validation
//! - **Progress Monitoring** ([`progress`]) - Observational progress events
//! - **Error Handling** ([`error`]) - Validation, metric and driver error taxonomy

pub mod cache;
pub mod chain_map;
pub mod config;
pub mod driver;
pub mod error;
pub mod metric;
pub mod progress;
pub mod stats;
