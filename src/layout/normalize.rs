use crate::error::{LayoutError, Result};

/// Scale `weights` so they sum to `target_area`, keeping their ratios.
///
/// An empty slice yields an empty result. Weights must be finite and
/// non-negative with a positive total.
pub fn normalize_sizes(weights: &[f64], target_area: f64) -> Result<Vec<f64>> {
    if weights.is_empty() {
        return Ok(Vec::new());
    }

    let invalid = LayoutError::InvalidWeights {
        count: weights.len(),
    };
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(invalid);
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(invalid);
    }

    let scale = target_area / total;
    Ok(weights.iter().map(|w| w * scale).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_one_one_into_unit_area() {
        let areas = normalize_sizes(&[2.0, 1.0, 1.0], 1.0).unwrap();
        assert_eq!(areas, vec![0.5, 0.25, 0.25]);
    }

    #[test]
    fn under_coverage_still_fills_target() {
        let areas = normalize_sizes(&[0.3, 0.1], 0.2).unwrap();
        let sum: f64 = areas.iter().sum();
        assert!((sum - 0.2).abs() < 1e-12);
        assert!((areas[0] / areas[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_is_empty() {
        assert!(normalize_sizes(&[], 1.0).unwrap().is_empty());
    }

    #[test]
    fn all_zero_and_bad_values_are_invalid() {
        assert_eq!(
            normalize_sizes(&[0.0, 0.0], 1.0),
            Err(LayoutError::InvalidWeights { count: 2 })
        );
        assert!(normalize_sizes(&[1.0, -0.5], 1.0).is_err());
        assert!(normalize_sizes(&[f64::NAN], 1.0).is_err());
        assert!(normalize_sizes(&[f64::INFINITY, 1.0], 1.0).is_err());
    }
}
