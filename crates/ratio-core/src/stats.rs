//! Small aggregation helpers shared by the screening layer.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Geometric average of periodic growth rates (fractions, 0.1 = 10%).
///
/// Computes `(Π(1 + r))^(1/n) - 1`. Returns `None` for an empty slice or when
/// the cumulative growth factor is not positive.
pub fn compound_rate(rates: &[f64]) -> Option<f64> {
    if rates.is_empty() {
        return None;
    }
    let factor: f64 = rates.iter().map(|r| 1.0 + r).product();
    if factor <= 0.0 || !factor.is_finite() {
        return None;
    }
    let rate = factor.powf(1.0 / rates.len() as f64) - 1.0;
    rate.is_finite().then_some(rate)
}

/// Rounds a share of `part` in `whole` to a whole percentage, halves to even.
pub fn rounded_percent(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some((part as f64 * 100.0 / whole as f64).round_ties_even())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_compound_rate() {
        // +10% then +21% compounds to 1.331 over two years
        assert_relative_eq!(compound_rate(&[0.10, 0.21]).unwrap(), 0.1537, epsilon = 1e-4);
        assert_relative_eq!(compound_rate(&[0.05, 0.05, 0.05]).unwrap(), 0.05, epsilon = 1e-12);
        assert_eq!(compound_rate(&[]), None);
        assert_eq!(compound_rate(&[-1.0]), None);
    }

    #[test]
    fn test_rounded_percent() {
        assert_eq!(rounded_percent(1, 3), Some(33.0));
        assert_eq!(rounded_percent(2, 3), Some(67.0));
        assert_eq!(rounded_percent(0, 0), None);
        // 12.5 rounds half to even
        assert_eq!(rounded_percent(1, 8), Some(12.0));
        assert_eq!(rounded_percent(3, 8), Some(38.0));
    }
}
