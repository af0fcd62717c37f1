use crate::core::models::chain::Chain;
use crate::core::scoring::tm_score::{AlignmentResult, StructuralAligner, TmScoreAligner};
use crate::engine::error::{PairError, ValidationError};
use crate::engine::metric::{NamedStatistics, PairMetric};
use crate::engine::stats::Statistics;
use nalgebra::Point3;
use std::collections::BTreeMap;

const MIN_RESIDUES: usize = 3;

/// One residue trace: a coordinate per residue and the matching one-letter sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityInput {
    pub coords: Vec<Point3<f64>>,
    pub seq: String,
}

impl SimilarityInput {
    pub fn new(coords: Vec<Point3<f64>>, seq: impl Into<String>) -> Self {
        Self {
            coords,
            seq: seq.into(),
        }
    }

    /// The representative-atom trace of a chain (CA for proteins).
    pub fn from_chain(chain: &Chain) -> Self {
        Self {
            coords: chain.trace_coords(),
            seq: chain.sequence(),
        }
    }
}

/// Aligned structural similarity: RMSD and TM-score of a predicted trace against a
/// reference trace, normalized by the prediction's length.
pub struct AlignedSimilarity {
    aligner: Box<dyn StructuralAligner>,
}

impl Default for AlignedSimilarity {
    fn default() -> Self {
        Self::new()
    }
}

impl AlignedSimilarity {
    pub fn new() -> Self {
        Self::with_aligner(Box::new(TmScoreAligner::new()))
    }

    pub fn with_aligner(aligner: Box<dyn StructuralAligner>) -> Self {
        Self { aligner }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilaritySummary {
    pub rmsd: Statistics,
    pub tm_score: Statistics,
}

impl NamedStatistics for SimilaritySummary {
    fn to_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        for (prefix, stats) in [("rmsd", &self.rmsd), ("tm_score", &self.tm_score)] {
            map.insert(format!("{}_avg", prefix), stats.mean);
            map.insert(format!("{}_max", prefix), stats.max);
            map.insert(format!("{}_min", prefix), stats.min);
        }
        map
    }
}

fn check_side(input: &SimilarityInput, side: &'static str) -> Result<(), ValidationError> {
    let sequence = input.seq.chars().count();
    if input.coords.len() != sequence {
        return Err(ValidationError::CoordinateSequenceMismatch {
            side,
            coords: input.coords.len(),
            sequence,
        });
    }
    if sequence < MIN_RESIDUES {
        return Err(ValidationError::BelowMinimumLength {
            side,
            length: sequence,
            minimum: MIN_RESIDUES,
        });
    }
    if let Some(index) = input
        .coords
        .iter()
        .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    {
        return Err(ValidationError::NonFiniteCoordinate { side, index });
    }
    Ok(())
}

impl PairMetric for AlignedSimilarity {
    type Prediction = SimilarityInput;
    type Reference = SimilarityInput;
    type Pair = (SimilarityInput, SimilarityInput);
    type Score = AlignmentResult;
    type Summary = SimilaritySummary;

    fn name(&self) -> &'static str {
        "aligned_similarity"
    }

    fn validate(
        &self,
        prediction: SimilarityInput,
        reference: SimilarityInput,
    ) -> Result<Self::Pair, PairError> {
        check_side(&prediction, "prediction")?;
        check_side(&reference, "reference")?;
        Ok((prediction, reference))
    }

    fn score(&self, pair: &Self::Pair) -> Result<AlignmentResult, PairError> {
        let (prediction, reference) = pair;
        Ok(self.aligner.align(
            &prediction.coords,
            &reference.coords,
            &prediction.seq,
            &reference.seq,
        )?)
    }

    fn reduce(&self, scores: &[AlignmentResult]) -> SimilaritySummary {
        let rmsd: Vec<f64> = scores.iter().map(|s| s.rmsd).collect();
        let tm_score: Vec<f64> = scores.iter().map(|s| s.tm_score).collect();
        let empty = Statistics {
            mean: f64::NAN,
            max: f64::NAN,
            min: f64::NAN,
        };
        SimilaritySummary {
            rmsd: Statistics::from_values(&rmsd).unwrap_or(empty),
            tm_score: Statistics::from_values(&tm_score).unwrap_or(empty),
        }
    }
}
