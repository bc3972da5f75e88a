//! Sample statistics consumed by the fitting routines

/// Arithmetic mean; 0 for an empty slice
pub fn sample_mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance (normalized by n, as the moment estimators expect);
/// 0 for slices shorter than 2
pub fn sample_variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = sample_mean(data);
    data.iter()
        .map(|&x| {
            let d = x - m;
            d * d
        })
        .sum::<f64>()
        / data.len() as f64
}

/// k-th raw moment `mean(x^k)`
pub fn raw_moment(data: &[f64], k: i32) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|&x| x.powi(k)).sum::<f64>() / data.len() as f64
}

/// Mean of `ln(x)`; NaN as soon as the sample leaves (0, inf)
pub fn log_mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|&x| x.ln()).sum::<f64>() / data.len() as f64
}

/// Arithmetic mean of an integer sample
pub fn int_mean(data: &[i64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|&k| k as f64).sum::<f64>() / data.len() as f64
}

/// Population variance of an integer sample
pub fn int_variance(data: &[i64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = int_mean(data);
    data.iter()
        .map(|&k| {
            let d = k as f64 - m;
            d * d
        })
        .sum::<f64>()
        / data.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sample_mean() {
        assert_eq!(sample_mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(sample_mean(&[]), 0.0);
    }

    #[test]
    fn test_sample_variance_population() {
        // Population variance of {1..5} is 2, not the unbiased 2.5
        assert_abs_diff_eq!(
            sample_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            2.0,
            epsilon = 1e-12
        );
        assert_eq!(sample_variance(&[42.0]), 0.0);
    }

    #[test]
    fn test_raw_moment() {
        assert_abs_diff_eq!(raw_moment(&[1.0, 2.0, 3.0], 2), 14.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(raw_moment(&[1.0, 2.0, 3.0], 1), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_log_mean() {
        let data = [1.0, std::f64::consts::E];
        assert_abs_diff_eq!(log_mean(&data), 0.5, epsilon = 1e-12);
        assert!(log_mean(&[1.0, -1.0]).is_nan());
    }

    #[test]
    fn test_int_moments() {
        assert_eq!(int_mean(&[1, 2, 3]), 2.0);
        assert_abs_diff_eq!(int_variance(&[1, 2, 3, 4, 5]), 2.0, epsilon = 1e-12);
    }
}
