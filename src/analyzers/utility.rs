/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes `Σ(value × weight) / Σ(weight)` over `(value, weight)` pairs.
/// Returns 0.0 when the weights sum to zero.
pub fn weighted_mean(pairs: &[(f64, f64)]) -> f64 {
    let weight_sum: f64 = pairs.iter().map(|(_, w)| w).sum();
    if weight_sum == 0.0 {
        return 0.0;
    }
    pairs.iter().map(|(v, w)| v * w).sum::<f64>() / weight_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn test_weighted_mean() {
        assert_eq!(weighted_mean(&[(2.0, 1.0), (4.0, 3.0)]), 3.5);
    }

    #[test]
    fn test_weighted_mean_zero_weight() {
        assert_eq!(weighted_mean(&[]), 0.0);
        assert_eq!(weighted_mean(&[(5.0, 0.0)]), 0.0);
    }
}
