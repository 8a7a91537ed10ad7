//! Differencing utilities for ARIMA models.

/// Difference `series` `d` times.
///
/// Each pass shortens the series by one; a series that runs out of values
/// stops shrinking.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `d` rounds of differencing for values that follow `original`.
///
/// `differenced` holds future values on the `d`-times differenced scale;
/// each level is rebuilt by a cumulative sum starting from the last value
/// of `original` differenced to that level.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    let mut result = differenced.to_vec();

    for level in (0..d).rev() {
        let init_value = difference(original, level).last().copied().unwrap_or(0.0);

        let mut cumsum = init_value;
        result = result
            .iter()
            .map(|diff| {
                cumsum += diff;
                cumsum
            })
            .collect();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_first_order() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn difference_second_order() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_zero_order_is_identity() {
        let series = vec![4.0, 2.0];
        assert_eq!(difference(&series, 0), series);
    }

    #[test]
    fn difference_stops_at_single_value() {
        assert_eq!(difference(&[5.0, 7.0], 3), vec![2.0]);
    }

    #[test]
    fn integrate_continues_first_order() {
        let original = vec![10.0, 12.0, 15.0];
        let future = integrate(&[4.0, 5.0], &original, 1);
        assert_relative_eq!(future[0], 19.0);
        assert_relative_eq!(future[1], 24.0);
    }

    #[test]
    fn integrate_continues_second_order() {
        // Quadratic: second differences are constant 1
        let original = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        let future = integrate(&[1.0, 1.0], &original, 2);
        assert_relative_eq!(future[0], 21.0);
        assert_relative_eq!(future[1], 28.0);
    }
}
