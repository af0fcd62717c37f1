use crate::engine::config::ConfigError;
use crate::engine::error::{PairError, ValidationError};
use crate::engine::metric::{NamedStatistics, PairMetric};
use crate::engine::stats;
use nalgebra::DMatrix;
use std::collections::BTreeMap;

/// Perplexity of a sequence model's per-position class scores against the true classes.
///
/// Predictions are `[N, vocab_size]` matrices of unnormalized logits; references are
/// the `N` true class indices. Each row is normalized with a max-shifted
/// log-softmax, so large logits never overflow. A uniform row contributes a
/// perplexity of exactly `vocab_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perplexity {
    vocab_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerplexitySummary {
    pub perplexity: f64,
}

impl NamedStatistics for PerplexitySummary {
    fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([("perplexity".to_string(), self.perplexity)])
    }
}

impl Perplexity {
    pub fn new(vocab_size: usize) -> Result<Self, ConfigError> {
        if vocab_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "vocab_size",
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(Self { vocab_size })
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }
}

/// `exp(-mean(log_softmax(logits)[i, targets[i]]))` over all rows.
pub fn perplexity(logits: &DMatrix<f64>, targets: &[usize]) -> f64 {
    let mut log_likelihood = 0.0;
    for (i, &target) in targets.iter().enumerate() {
        let row = logits.row(i);
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_sum_exp = max + row.iter().map(|&x| (x - max).exp()).sum::<f64>().ln();
        log_likelihood += row[target] - log_sum_exp;
    }
    (-log_likelihood / targets.len() as f64).exp()
}

impl PairMetric for Perplexity {
    type Prediction = DMatrix<f64>;
    type Reference = Vec<usize>;
    type Pair = (DMatrix<f64>, Vec<usize>);
    type Score = f64;
    type Summary = PerplexitySummary;

    fn name(&self) -> &'static str {
        "perplexity"
    }

    fn validate(
        &self,
        prediction: DMatrix<f64>,
        reference: Vec<usize>,
    ) -> Result<Self::Pair, PairError> {
        let (rows, columns) = prediction.shape();
        if rows != reference.len() || columns != self.vocab_size {
            return Err(ValidationError::ShapeMismatch {
                rows,
                columns,
                expected_rows: reference.len(),
                expected_columns: self.vocab_size,
            }
            .into());
        }
        if reference.is_empty() {
            return Err(ValidationError::EmptySequence.into());
        }
        if let Some((position, &index)) = reference
            .iter()
            .enumerate()
            .find(|&(_, &index)| index >= self.vocab_size)
        {
            return Err(ValidationError::ClassIndexOutOfRange {
                position,
                index,
                vocab_size: self.vocab_size,
            }
            .into());
        }
        Ok((prediction, reference))
    }

    fn score(&self, pair: &Self::Pair) -> Result<f64, PairError> {
        Ok(perplexity(&pair.0, &pair.1))
    }

    fn reduce(&self, scores: &[f64]) -> PerplexitySummary {
        PerplexitySummary {
            perplexity: stats::mean(scores).unwrap_or(f64::NAN),
        }
    }
}
