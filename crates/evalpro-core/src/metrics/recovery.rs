use crate::engine::error::{PairError, ValidationError};
use crate::engine::metric::{NamedStatistics, PairMetric};
use crate::engine::stats;
use std::collections::BTreeMap;

/// Fraction of positions at which a predicted sequence matches its reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRecovery;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoverySummary {
    pub seq_recovery_rate: f64,
}

impl NamedStatistics for RecoverySummary {
    fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([("seq_recovery_rate".to_string(), self.seq_recovery_rate)])
    }
}

pub fn recovery_rate(prediction: &[char], reference: &[char]) -> f64 {
    let identical = prediction
        .iter()
        .zip(reference)
        .filter(|(p, r)| p == r)
        .count();
    identical as f64 / prediction.len() as f64
}

impl PairMetric for SequenceRecovery {
    type Prediction = String;
    type Reference = String;
    type Pair = (Vec<char>, Vec<char>);
    type Score = f64;
    type Summary = RecoverySummary;

    fn name(&self) -> &'static str {
        "sequence_recovery"
    }

    fn validate(&self, prediction: String, reference: String) -> Result<Self::Pair, PairError> {
        let prediction: Vec<char> = prediction.chars().collect();
        let reference: Vec<char> = reference.chars().collect();
        if prediction.len() != reference.len() {
            return Err(ValidationError::LengthMismatch {
                prediction: prediction.len(),
                reference: reference.len(),
            }
            .into());
        }
        if prediction.is_empty() {
            return Err(ValidationError::EmptySequence.into());
        }
        Ok((prediction, reference))
    }

    fn score(&self, pair: &Self::Pair) -> Result<f64, PairError> {
        Ok(recovery_rate(&pair.0, &pair.1))
    }

    fn reduce(&self, scores: &[f64]) -> RecoverySummary {
        RecoverySummary {
            seq_recovery_rate: stats::mean(scores).unwrap_or(f64::NAN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::MetricError;
    use crate::engine::metric::MetricModule;

    fn recovery(prediction: &str, reference: &str) -> f64 {
        let mut module = MetricModule::new(SequenceRecovery);
        module
            .accumulate(prediction.to_string(), reference.to_string())
            .unwrap();
        module.compute().unwrap().seq_recovery_rate
    }

    #[test]
    fn identical_sequences_recover_fully() {
        assert!((recovery("QVQ", "QVQ") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_match_counts_identical_positions() {
        assert!((recovery("QVQ", "QVW") - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_sequences_recover_nothing() {
        assert!(recovery("QVQ", "VWT").abs() < 1e-9);
    }

    #[test]
    fn summary_is_the_mean_over_pairs() {
        let mut module = MetricModule::new(SequenceRecovery);
        let summary = module
            .compute_with(
                vec!["QVQ".into(), "QVQ".into()],
                vec!["QVQ".into(), "VWT".into()],
            )
            .unwrap();
        assert!((summary.seq_recovery_rate - 0.5).abs() < 1e-9);
        assert_eq!(summary.to_map().len(), 1);
        assert!(summary.to_map().contains_key("seq_recovery_rate"));
    }

    #[test]
    fn length_mismatch_fails_at_accumulation() {
        let mut module = MetricModule::new(SequenceRecovery);
        let err = module.accumulate("QVQ".into(), "QV".into()).unwrap_err();
        assert!(matches!(
            err,
            MetricError::Pair {
                index: 0,
                source: PairError::Validation(ValidationError::LengthMismatch {
                    prediction: 3,
                    reference: 2
                }),
                ..
            }
        ));
    }

    #[test]
    fn empty_sequences_are_rejected() {
        let mut module = MetricModule::new(SequenceRecovery);
        assert!(module.accumulate(String::new(), String::new()).is_err());
    }

    #[test]
    fn multibyte_characters_compare_by_character() {
        assert!((recovery("αβ", "αγ") - 0.5).abs() < 1e-9);
    }
}
