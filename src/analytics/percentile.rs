use crate::error::{AnalyticsError, Result};

/// Mid-rank percentile of `value` within `population`.
///
/// `100 * (below + 0.5 * equal) / n`, so every member of a tie gets the same
/// percentile. `value` does not have to be a member of `population`.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientData`] for an empty population.
pub fn percentile(value: f64, population: &[f64]) -> Result<f64> {
    if population.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "percentile of an empty population".to_string(),
        ));
    }

    let (below, equal) = population.iter().fold((0usize, 0usize), |(b, e), &p| {
        if p < value {
            (b + 1, e)
        } else if p == value {
            (b, e + 1)
        } else {
            (b, e)
        }
    });

    Ok(100.0 * (below as f64 + 0.5 * equal as f64) / population.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_tie_is_midrank() {
        assert_eq!(percentile(10.0, &[10.0, 10.0, 10.0]).unwrap(), 50.0);
    }

    #[test]
    fn test_ties_share_percentile() {
        let p = percentile(80.0, &[90.0, 80.0, 80.0]).unwrap();
        // Nothing is below 80 and two values equal it: 100 * (0 + 1) / 3.
        assert!((p - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_permutation_invariant() {
        let a = percentile(60.0, &[40.0, 60.0, 75.0, 60.0, 90.0]).unwrap();
        let b = percentile(60.0, &[90.0, 60.0, 60.0, 40.0, 75.0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, 40.0);
    }

    #[test]
    fn test_non_member_threshold() {
        assert_eq!(percentile(100.0, &[10.0, 20.0, 30.0, 40.0]).unwrap(), 100.0);
        assert_eq!(percentile(0.0, &[10.0, 20.0, 30.0, 40.0]).unwrap(), 0.0);
        assert_eq!(percentile(25.0, &[10.0, 20.0, 30.0, 40.0]).unwrap(), 50.0);
    }

    #[test]
    fn test_unique_extremes() {
        let pop = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(10.0, &pop).unwrap(), 12.5);
        assert_eq!(percentile(40.0, &pop).unwrap(), 87.5);
    }

    #[test]
    fn test_empty_population() {
        assert!(matches!(
            percentile(50.0, &[]),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }
}
