//! Statistical helpers.

use statrs::distribution::{ContinuousCDF, Normal};

/// Inverse CDF of the standard normal distribution.
///
/// Returns `NEG_INFINITY` / `INFINITY` at the ends of `[0, 1]` and `NaN`
/// outside it.
///
/// # Example
/// ```
/// use demand_planner::utils::normal_quantile;
///
/// let z = normal_quantile(0.95);
/// assert!((z - 1.6449).abs() < 1e-4);
/// ```
pub fn normal_quantile(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    match Normal::new(0.0, 1.0) {
        Ok(standard) => standard.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator); `NaN` for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_quantile_known_values() {
        assert_relative_eq!(normal_quantile(0.5), 0.0, epsilon = 1e-9);
        assert_relative_eq!(normal_quantile(0.95), 1.644_853_6, epsilon = 1e-6);
        assert_relative_eq!(normal_quantile(0.99), 2.326_347_9, epsilon = 1e-6);
        assert_relative_eq!(normal_quantile(0.025), -1.959_964, epsilon = 1e-6);
    }

    #[test]
    fn normal_quantile_edges() {
        assert_eq!(normal_quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(normal_quantile(1.0), f64::INFINITY);
        assert!(normal_quantile(1.5).is_nan());
        assert!(normal_quantile(f64::NAN).is_nan());
    }

    #[test]
    fn mean_and_variance() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-12);
        assert!(mean(&[]).is_nan());
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-12);
        assert!(variance(&[1.0]).is_nan());
        assert_relative_eq!(std_dev(&[2.0, 4.0]), 2.0_f64.sqrt(), epsilon = 1e-12);
    }
}
