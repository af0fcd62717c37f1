use super::error::{MetricError, PairError};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// The per-pair half of a metric: how one pair is validated, scored, and how all
/// per-pair scores reduce to a summary.
///
/// Validation runs when a pair is accumulated and may turn the raw input into a
/// prepared form (for example, loading structure files). Scoring runs only on pairs
/// that passed validation.
pub trait PairMetric {
    type Prediction;
    type Reference;
    /// A validated pair, ready to be scored.
    type Pair;
    type Score;
    type Summary;

    fn name(&self) -> &'static str;

    fn validate(
        &self,
        prediction: Self::Prediction,
        reference: Self::Reference,
    ) -> Result<Self::Pair, PairError>;

    fn score(&self, pair: &Self::Pair) -> Result<Self::Score, PairError>;

    /// Reduces a non-empty slice of per-pair scores.
    fn reduce(&self, scores: &[Self::Score]) -> Self::Summary;
}

/// A summary that can be flattened into named scalar statistics.
pub trait NamedStatistics {
    fn to_map(&self) -> BTreeMap<String, f64>;
}

/// Per-pair scores together with their summary.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedResult<S, T> {
    pub scores: Vec<S>,
    pub summary: T,
}

/// Accumulator and reduction driver for a [`PairMetric`].
///
/// Pairs are validated as they are accumulated and kept in insertion order. Every
/// `compute*` call consumes the whole accumulator, whether or not scoring succeeds,
/// so the module is ready for a fresh batch afterwards.
pub struct MetricModule<M: PairMetric> {
    metric: M,
    pending: Vec<M::Pair>,
}

impl<M: PairMetric> MetricModule<M> {
    pub fn new(metric: M) -> Self {
        Self {
            metric,
            pending: Vec::new(),
        }
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Validates and appends one pair.
    pub fn accumulate(
        &mut self,
        prediction: M::Prediction,
        reference: M::Reference,
    ) -> Result<(), MetricError> {
        let index = self.pending.len();
        let pair = self
            .metric
            .validate(prediction, reference)
            .map_err(|source| self.pair_error(index, source))?;
        self.pending.push(pair);
        Ok(())
    }

    /// Validates every pair of the batch, then appends them all.
    ///
    /// Nothing is appended if any pair fails validation.
    pub fn accumulate_batch(
        &mut self,
        predictions: Vec<M::Prediction>,
        references: Vec<M::Reference>,
    ) -> Result<(), MetricError> {
        if predictions.len() != references.len() {
            return Err(MetricError::BatchSizeMismatch {
                metric: self.metric.name(),
                predictions: predictions.len(),
                references: references.len(),
            });
        }

        let offset = self.pending.len();
        let mut validated = Vec::with_capacity(predictions.len());
        for (i, (prediction, reference)) in predictions.into_iter().zip(references).enumerate() {
            let pair = self
                .metric
                .validate(prediction, reference)
                .map_err(|source| self.pair_error(offset + i, source))?;
            validated.push(pair);
        }
        self.pending.extend(validated);
        Ok(())
    }

    /// Scores and reduces every accumulated pair.
    pub fn compute(&mut self) -> Result<M::Summary, MetricError> {
        self.compute_detailed().map(|result| result.summary)
    }

    /// Accumulates the given batch, then scores and reduces everything accumulated.
    pub fn compute_with(
        &mut self,
        predictions: Vec<M::Prediction>,
        references: Vec<M::Reference>,
    ) -> Result<M::Summary, MetricError> {
        self.accumulate_batch(predictions, references)?;
        self.compute()
    }

    /// Like [`compute`](Self::compute), but also returns every per-pair score in
    /// accumulation order.
    #[instrument(skip_all, name = "metric_compute", fields(metric = self.metric.name(), pairs = self.pending.len()))]
    pub fn compute_detailed(&mut self) -> Result<DetailedResult<M::Score, M::Summary>, MetricError> {
        let pairs = std::mem::take(&mut self.pending);
        if pairs.is_empty() {
            return Err(MetricError::EmptyBatch {
                metric: self.metric.name(),
            });
        }

        let mut scores = Vec::with_capacity(pairs.len());
        for (index, pair) in pairs.iter().enumerate() {
            let score = self
                .metric
                .score(pair)
                .map_err(|source| self.pair_error(index, source))?;
            debug!(index, "Scored pair.");
            scores.push(score);
        }

        let summary = self.metric.reduce(&scores);
        info!(pairs = scores.len(), "Metric computation finished.");
        Ok(DetailedResult { scores, summary })
    }

    fn pair_error(&self, index: usize, source: PairError) -> MetricError {
        MetricError::Pair {
            metric: self.metric.name(),
            index,
            source,
        }
    }
}
