//! Cauchy distribution

use rand::Rng;
use randvar_core::{ContinuousDistribution, Support, MIN_POSITIVE};

use std::f64::consts::{FRAC_1_PI, PI};

/// Cauchy distribution, X ~ Cauchy(x₀, γ)
///
/// No moments exist: the mean is NaN and the variance infinite.
#[derive(Debug, Clone, PartialEq)]
pub struct Cauchy {
    x0: f64,
    gamma: f64,
    gamma_inv: f64,
}

impl Cauchy {
    /// Construct Cauchy(x₀, γ). A non-positive scale is clamped.
    pub fn new(location: f64, scale: f64) -> Self {
        let mut c = Cauchy {
            x0: 0.0,
            gamma: 1.0,
            gamma_inv: 1.0,
        };
        c.set_location(location);
        c.set_scale(scale);
        c
    }

    pub fn set_location(&mut self, location: f64) {
        self.x0 = location;
    }

    pub fn set_scale(&mut self, scale: f64) {
        if scale <= 0.0 {
            log::debug!("cauchy scale {scale} clamped to {MIN_POSITIVE}");
        }
        self.gamma = scale.max(MIN_POSITIVE);
        self.gamma_inv = 1.0 / self.gamma;
    }

    pub fn location(&self) -> f64 {
        self.x0
    }

    pub fn scale(&self) -> f64 {
        self.gamma
    }

    /// Standard Cauchy draw by inversion
    pub fn standard_variate<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        (PI * (rng.gen::<f64>() - 0.5)).tan()
    }

    pub fn entropy(&self) -> f64 {
        (4.0 * PI * self.gamma).ln()
    }
}

impl ContinuousDistribution for Cauchy {
    fn support(&self) -> Support {
        Support::Infinite
    }

    fn min_value(&self) -> f64 {
        f64::NEG_INFINITY
    }

    fn max_value(&self) -> f64 {
        f64::INFINITY
    }

    fn density(&self, x: f64) -> f64 {
        let z = (x - self.x0) * self.gamma_inv;
        FRAC_1_PI * self.gamma_inv / (1.0 + z * z)
    }

    fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.x0) * self.gamma_inv;
        0.5 + FRAC_1_PI * z.atan()
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.x0 + self.gamma * Self::standard_variate(rng)
    }

    fn mean(&self) -> f64 {
        f64::NAN
    }

    fn variance(&self) -> f64 {
        f64::INFINITY
    }

    fn median(&self) -> f64 {
        self.x0
    }

    fn mode(&self) -> f64 {
        self.x0
    }

    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return f64::NEG_INFINITY;
        }
        if p == 1.0 {
            return f64::INFINITY;
        }
        self.x0 + self.gamma * (PI * (p - 0.5)).tan()
    }

    fn quantile_upper(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return f64::INFINITY;
        }
        if p == 1.0 {
            return f64::NEG_INFINITY;
        }
        self.x0 - self.gamma * (PI * (p - 0.5)).tan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_density_and_cdf() {
        let c = Cauchy::new(0.0, 1.0);
        assert_abs_diff_eq!(c.density(0.0), FRAC_1_PI, epsilon = 1e-15);
        assert_abs_diff_eq!(c.cdf(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(c.cdf(1.0), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_no_moments() {
        let c = Cauchy::new(2.0, 0.5);
        assert!(c.mean().is_nan());
        assert!(c.variance().is_infinite());
        assert_eq!(c.median(), 2.0);
        assert_eq!(c.mode(), 2.0);
    }

    #[test]
    fn test_quantile_round_trip() {
        let c = Cauchy::new(-1.0, 2.0);
        for &p in &[0.1, 0.5, 0.9] {
            assert_abs_diff_eq!(c.cdf(c.quantile(p)), p, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(c.quantile_upper(0.2), c.quantile(0.8), epsilon = 1e-10);
    }
}
