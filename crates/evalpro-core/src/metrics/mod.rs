//! # Metrics Module
//!
//! The concrete metrics. Each one is a [`PairMetric`](crate::engine::metric::PairMetric)
//! and is used through a [`MetricModule`](crate::engine::metric::MetricModule):
//!
//! | Metric | Pair | Summary |
//! |---|---|---|
//! | [`recovery::SequenceRecovery`] | two equal-length sequences | mean recovery rate |
//! | [`perplexity::Perplexity`] | logit matrix and class indices | mean perplexity |
//! | [`docking::DockingQuality`] | two structure file paths | DockQ mean / max / min |
//! | [`similarity::AlignedSimilarity`] | two residue traces with sequences | RMSD and TM-score mean / max / min |
//!
//! ```ignore
//! use evalpro::engine::metric::MetricModule;
//! use evalpro::metrics::recovery::SequenceRecovery;
//!
//! let mut module = MetricModule::new(SequenceRecovery);
//! module.accumulate("QVQ".into(), "QVW".into())?;
//! let summary = module.compute()?;
//! ```

pub mod docking;
pub mod perplexity;
pub mod recovery;
pub mod similarity;
