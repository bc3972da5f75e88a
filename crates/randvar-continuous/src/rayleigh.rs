//! Rayleigh distribution

use rand::Rng;
use randvar_core::{stats, ContinuousDistribution, Error, Result, Support, MIN_POSITIVE};

use std::f64::consts::{FRAC_PI_2, LN_2, PI};

use crate::exponential::Exponential;

/// Rayleigh distribution, X ~ Rayleigh(σ)
#[derive(Debug, Clone, PartialEq)]
pub struct Rayleigh {
    sigma: f64,
    sigma_sq_inv: f64,
}

impl Rayleigh {
    /// Construct Rayleigh(σ). A non-positive scale is clamped.
    pub fn new(scale: f64) -> Self {
        let mut r = Rayleigh {
            sigma: 1.0,
            sigma_sq_inv: 1.0,
        };
        r.set_scale(scale);
        r
    }

    pub fn set_scale(&mut self, scale: f64) {
        if scale <= 0.0 {
            log::debug!("rayleigh scale {scale} clamped to {MIN_POSITIVE}");
        }
        self.sigma = scale.max(MIN_POSITIVE);
        self.sigma_sq_inv = 1.0 / (self.sigma * self.sigma);
    }

    pub fn scale(&self) -> f64 {
        self.sigma
    }

    pub fn skewness(&self) -> f64 {
        2.0 * PI.sqrt() * (PI - 3.0) / (4.0 - PI).powf(1.5)
    }

    pub fn excess_kurtosis(&self) -> f64 {
        let d = 4.0 - PI;
        -(6.0 * PI * PI - 24.0 * PI + 16.0) / (d * d)
    }

    fn check_sample(sample: &[f64]) -> Result<()> {
        if sample.is_empty() {
            return Err(Error::empty_sample());
        }
        if sample.iter().any(|&x| x < 0.0) {
            return Err(Error::out_of_support("negative observation"));
        }
        Ok(())
    }

    /// Maximum-likelihood scale: σ² is half the second raw moment
    pub fn fit_scale_mle(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let sigma_sq = 0.5 * stats::raw_moment(sample, 2);
        self.set_scale(sigma_sq.sqrt());
        Ok(())
    }

    /// Unbiased scale estimator.
    ///
    /// Small samples carry the exact factorial correction
    /// n^(3/2) ((n-1)!)² 4ⁿ / (√π (2n)!); past n = 30 the expansion
    /// 1 + 0.1252 / n is accurate to 1e-6.
    pub fn fit_scale_umvu(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let n = sample.len();
        let sigma_est = (0.5 * stats::raw_moment(sample, 2)).sqrt();

        if n > 30 {
            self.set_scale((1.0 + 0.1252 / n as f64) * sigma_est);
        } else {
            let mut coef = factorial(n - 1);
            coef *= n as f64 * coef;
            coef *= (n as f64).sqrt() / PI.sqrt();
            coef /= factorial(2 * n);
            let pow2n = (1u64 << n) as f64;
            coef *= pow2n * pow2n;
            self.set_scale(coef * sigma_est);
        }
        Ok(())
    }
}

/// Exact factorial; callers stay within the f64-representable range
fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

impl ContinuousDistribution for Rayleigh {
    fn support(&self) -> Support {
        Support::RightSemiInfinite
    }

    fn min_value(&self) -> f64 {
        0.0
    }

    fn max_value(&self) -> f64 {
        f64::INFINITY
    }

    fn density(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let y = x * self.sigma_sq_inv;
        y * (-0.5 * x * y).exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            -(-0.5 * x * x * self.sigma_sq_inv).exp_m1()
        }
    }

    fn survival(&self, x: f64) -> f64 {
        if x <= 0.0 {
            1.0
        } else {
            (-0.5 * x * x * self.sigma_sq_inv).exp()
        }
    }

    /// Square-root of an exponential draw
    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sigma * (2.0 * Exponential::standard_variate(rng)).sqrt()
    }

    fn mean(&self) -> f64 {
        self.sigma * FRAC_PI_2.sqrt()
    }

    fn variance(&self) -> f64 {
        (2.0 - FRAC_PI_2) * self.sigma * self.sigma
    }

    fn median(&self) -> f64 {
        self.sigma * (LN_2 + LN_2).sqrt()
    }

    fn mode(&self) -> f64 {
        self.sigma
    }

    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 1.0 {
            return f64::INFINITY;
        }
        self.sigma * (-2.0 * (-p).ln_1p()).sqrt()
    }

    fn quantile_upper(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return f64::INFINITY;
        }
        self.sigma * (-2.0 * p.ln()).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_closed_forms() {
        let r = Rayleigh::new(2.0);
        assert_abs_diff_eq!(r.mean(), 2.0 * FRAC_PI_2.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(r.mode(), 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(r.quantile(r.cdf(1.7)), 1.7, epsilon = 1e-10);
        assert_abs_diff_eq!(r.quantile_upper(0.3), r.quantile(0.7), epsilon = 1e-10);
    }

    #[test]
    fn test_fit_scale_mle_round_trip() {
        let r = Rayleigh::new(1.5);
        let mut rng = SmallRng::seed_from_u64(79);
        let mut sample = vec![0.0; 10_000];
        r.sample(&mut rng, &mut sample);

        let mut fitted = Rayleigh::new(1.0);
        fitted.fit_scale_mle(&sample).unwrap();
        assert_abs_diff_eq!(fitted.scale(), 1.5, epsilon = 0.05);
    }

    #[test]
    fn test_umvu_correction_small_sample() {
        // The correction factor exceeds 1 and shrinks toward 1 as n grows
        let mut small = Rayleigh::new(1.0);
        small.fit_scale_umvu(&[1.0, 2.0, 1.5, 0.5]).unwrap();
        let mut mle = Rayleigh::new(1.0);
        mle.fit_scale_mle(&[1.0, 2.0, 1.5, 0.5]).unwrap();
        assert!(small.scale() > mle.scale());
        assert!(small.scale() < 1.2 * mle.scale());
    }

    #[test]
    fn test_fit_rejects_negative() {
        let mut r = Rayleigh::new(1.0);
        assert!(r.fit_scale_mle(&[0.5, -0.1]).is_err());
        assert_eq!(r.scale(), 1.0);
    }
}
