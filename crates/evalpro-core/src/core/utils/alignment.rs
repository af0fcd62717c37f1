//! Global sequence alignment used to establish residue correspondence between two
//! chains whose sequences are not identical in length.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentScoring {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_penalty: i32,
}

impl Default for AlignmentScoring {
    fn default() -> Self {
        Self {
            match_score: 2,
            mismatch_score: -1,
            gap_penalty: -2,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Step {
    Diagonal,
    Up,
    Left,
}

/// Needleman-Wunsch global alignment with a linear gap penalty.
///
/// Returns the aligned index pairs `(i, j)` where `a[i]` sits opposite `b[j]`,
/// mismatches included and gap columns omitted. Ties during traceback prefer the
/// diagonal, then a gap in `b`, then a gap in `a`.
pub fn global_alignment(a: &[char], b: &[char], scoring: &AlignmentScoring) -> Vec<(usize, usize)> {
    let (n, m) = (a.len(), b.len());
    let width = m + 1;
    let mut scores = vec![0i32; (n + 1) * width];
    let mut steps = vec![Step::Diagonal; (n + 1) * width];

    for i in 1..=n {
        scores[i * width] = i as i32 * scoring.gap_penalty;
        steps[i * width] = Step::Up;
    }
    for j in 1..=m {
        scores[j] = j as i32 * scoring.gap_penalty;
        steps[j] = Step::Left;
    }

    for i in 1..=n {
        for j in 1..=m {
            let substitution = if a[i - 1] == b[j - 1] {
                scoring.match_score
            } else {
                scoring.mismatch_score
            };
            let diagonal = scores[(i - 1) * width + j - 1] + substitution;
            let up = scores[(i - 1) * width + j] + scoring.gap_penalty;
            let left = scores[i * width + j - 1] + scoring.gap_penalty;

            let (best, step) = if diagonal >= up && diagonal >= left {
                (diagonal, Step::Diagonal)
            } else if up >= left {
                (up, Step::Up)
            } else {
                (left, Step::Left)
            };
            scores[i * width + j] = best;
            steps[i * width + j] = step;
        }
    }

    let mut pairs = Vec::with_capacity(n.min(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        match steps[i * width + j] {
            Step::Diagonal => {
                pairs.push((i - 1, j - 1));
                i -= 1;
                j -= 1;
            }
            Step::Up => i -= 1,
            Step::Left => j -= 1,
        }
    }
    pairs.reverse();
    pairs
}

/// Residue correspondence between two sequences.
///
/// Equal-length sequences correspond position by position; otherwise the pairs come
/// from a default-scored [`global_alignment`].
pub fn residue_correspondence(a: &str, b: &str) -> Vec<(usize, usize)> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() == b.len() {
        return (0..a.len()).map(|i| (i, i)).collect();
    }
    global_alignment(&a, &b, &AlignmentScoring::default())
}

/// Fraction of aligned pairs whose residues are identical.
pub fn sequence_identity(a: &str, b: &str, pairs: &[(usize, usize)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let identical = pairs.iter().filter(|&&(i, j)| a[i] == b[j]).count();
    identical as f64 / pairs.len() as f64
}
