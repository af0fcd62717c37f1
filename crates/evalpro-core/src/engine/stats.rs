use serde::Serialize;

/// Mean, maximum and minimum of a set of per-pair values.
///
/// Each statistic is computed independently over the same values; there is no
/// weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl Statistics {
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        Some(Self {
            mean: sum / values.len() as f64,
            max,
            min,
        })
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_over_values() {
        let stats = Statistics::from_values(&[0.2, 0.8, 0.5]).unwrap();
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert_eq!(stats.max, 0.8);
        assert_eq!(stats.min, 0.2);
    }

    #[test]
    fn single_value_is_its_own_summary() {
        let stats = Statistics::from_values(&[3.0]).unwrap();
        assert_eq!(stats, Statistics { mean: 3.0, max: 3.0, min: 3.0 });
    }

    #[test]
    fn empty_values_have_no_summary() {
        assert!(Statistics::from_values(&[]).is_none());
        assert!(mean(&[]).is_none());
    }
}
