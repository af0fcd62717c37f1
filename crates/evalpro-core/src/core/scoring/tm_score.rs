use super::ScoringError;
use crate::core::utils::alignment::residue_correspondence;
use crate::core::utils::geometry::{Superposition, superpose, superposed_rmsd};
use nalgebra::Point3;

/// Outcome of superposing a predicted residue trace onto a reference trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentResult {
    /// Kabsch RMSD over every aligned residue pair.
    pub rmsd: f64,
    /// TM-score normalized by the length of the first (predicted) trace.
    pub tm_score: f64,
    /// Number of residue pairs that took part in the alignment.
    pub aligned_length: usize,
}

/// A routine that aligns two residue traces and scores their similarity.
///
/// `coords_a`/`seq_a` describe the prediction and `coords_b`/`seq_b` the reference;
/// each coordinate set must have exactly one point per sequence character.
pub trait StructuralAligner: Send + Sync {
    fn align(
        &self,
        coords_a: &[Point3<f64>],
        coords_b: &[Point3<f64>],
        seq_a: &str,
        seq_b: &str,
    ) -> Result<AlignmentResult, ScoringError>;
}

const MIN_ALIGNED_PAIRS: usize = 3;
const MIN_FRAGMENT_LENGTH: usize = 4;
const MAX_REFINEMENT_ROUNDS: usize = 20;
const CUTOFF_STEP: f64 = 0.5;
const MAX_SEARCH_CUTOFF: f64 = 50.0;

/// TM-score aligner working on a fixed residue correspondence.
///
/// The correspondence is positional for equal-length sequences and comes from a
/// global sequence alignment otherwise. The superposition that maximizes the
/// TM-score is searched from contiguous seed fragments (full length, then halves,
/// quarters and so on down to four residues), each refined by repeatedly
/// superposing on the pairs that fall within a distance cutoff.
#[derive(Debug, Clone, Copy, Default)]
pub struct TmScoreAligner;

impl TmScoreAligner {
    pub fn new() -> Self {
        Self
    }
}

/// TM-score distance scale for a chain of `length` residues.
pub fn d0_scale(length: usize) -> f64 {
    if length <= 21 {
        return 0.5;
    }
    (1.24 * ((length - 15) as f64).cbrt() - 1.8).max(0.5)
}

fn tm_score_under(
    transform: &Superposition,
    mobile: &[Point3<f64>],
    target: &[Point3<f64>],
    d0: f64,
    norm_length: usize,
) -> f64 {
    let d0_sq = d0 * d0;
    let sum: f64 = mobile
        .iter()
        .zip(target)
        .map(|(m, t)| 1.0 / (1.0 + (transform.apply(m) - t).norm_squared() / d0_sq))
        .sum();
    sum / norm_length as f64
}

fn pairs_within(
    transform: &Superposition,
    mobile: &[Point3<f64>],
    target: &[Point3<f64>],
    cutoff: f64,
) -> Vec<usize> {
    let cutoff_sq = cutoff * cutoff;
    mobile
        .iter()
        .zip(target)
        .enumerate()
        .filter(|(_, (m, t))| (transform.apply(m) - *t).norm_squared() < cutoff_sq)
        .map(|(i, _)| i)
        .collect()
}

fn seed_fragments(aligned: usize) -> Vec<(usize, usize)> {
    let mut seeds = Vec::new();
    let mut length = aligned;
    loop {
        let step = (length / 2).max(1);
        let mut start = 0;
        while start + length <= aligned {
            seeds.push((start, length));
            start += step;
        }
        if length / 2 < MIN_FRAGMENT_LENGTH {
            break;
        }
        length /= 2;
    }
    seeds
}

impl StructuralAligner for TmScoreAligner {
    fn align(
        &self,
        coords_a: &[Point3<f64>],
        coords_b: &[Point3<f64>],
        seq_a: &str,
        seq_b: &str,
    ) -> Result<AlignmentResult, ScoringError> {
        for (coords, seq) in [(coords_a, seq_a), (coords_b, seq_b)] {
            let sequence = seq.chars().count();
            if coords.len() != sequence {
                return Err(ScoringError::CoordinateSequenceMismatch {
                    coords: coords.len(),
                    sequence,
                });
            }
            if let Some(index) = coords
                .iter()
                .position(|p| !p.coords.iter().all(|c| c.is_finite()))
            {
                return Err(ScoringError::NonFiniteCoordinate { index });
            }
        }

        let pairs = residue_correspondence(seq_a, seq_b);
        if pairs.len() < MIN_ALIGNED_PAIRS {
            return Err(ScoringError::TooFewAlignedResidues { found: pairs.len() });
        }
        let mobile: Vec<Point3<f64>> = pairs.iter().map(|&(i, _)| coords_a[i]).collect();
        let target: Vec<Point3<f64>> = pairs.iter().map(|&(_, j)| coords_b[j]).collect();

        let norm_length = coords_a.len();
        let d0 = d0_scale(norm_length);
        let search_cutoff = d0.clamp(4.5, 8.0);

        let mut best_score = 0.0;
        for (start, length) in seed_fragments(mobile.len()) {
            let Some(mut transform) = superpose(
                &mobile[start..start + length],
                &target[start..start + length],
            ) else {
                continue;
            };

            let mut selected: Vec<usize> = (start..start + length).collect();
            for _ in 0..MAX_REFINEMENT_ROUNDS {
                let score = tm_score_under(&transform, &mobile, &target, d0, norm_length);
                if score > best_score {
                    best_score = score;
                }

                let mut cutoff = search_cutoff;
                let mut within = pairs_within(&transform, &mobile, &target, cutoff);
                while within.len() < MIN_ALIGNED_PAIRS
                    && within.len() < mobile.len()
                    && cutoff < MAX_SEARCH_CUTOFF
                {
                    cutoff += CUTOFF_STEP;
                    within = pairs_within(&transform, &mobile, &target, cutoff);
                }
                if within == selected {
                    break;
                }

                let sub_mobile: Vec<_> = within.iter().map(|&i| mobile[i]).collect();
                let sub_target: Vec<_> = within.iter().map(|&i| target[i]).collect();
                match superpose(&sub_mobile, &sub_target) {
                    Some(next) => transform = next,
                    None => break,
                }
                selected = within;
            }
            best_score = f64::max(
                best_score,
                tm_score_under(&transform, &mobile, &target, d0, norm_length),
            );
        }

        let rmsd = superposed_rmsd(&mobile, &target).ok_or(ScoringError::SuperpositionFailed)?;

        Ok(AlignmentResult {
            rmsd,
            tm_score: best_score,
            aligned_length: pairs.len(),
        })
    }
}
