//! Exponential distribution

use rand::Rng;
use randvar_core::{stats, ContinuousDistribution, Error, Result, Support, MIN_POSITIVE};

use crate::gamma::Gamma;

/// Exponential distribution, X ~ Exp(λ)
///
/// f(x | λ) = λ exp(-λx)
#[derive(Debug, Clone, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    /// Construct Exp(λ). A non-positive rate is clamped.
    pub fn new(rate: f64) -> Self {
        let mut e = Exponential { rate: 1.0 };
        e.set_rate(rate);
        e
    }

    pub fn set_rate(&mut self, rate: f64) {
        if rate <= 0.0 {
            log::debug!("exponential rate {rate} clamped to {MIN_POSITIVE}");
        }
        self.rate = rate.max(MIN_POSITIVE);
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn scale(&self) -> f64 {
        1.0 / self.rate
    }

    /// Standard exponential draw (unit rate), by inversion
    pub fn standard_variate<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        -(1.0 - rng.gen::<f64>()).ln()
    }

    /// Exp(λ) draw without constructing a distribution
    pub fn variate_with_rate<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> f64 {
        Self::standard_variate(rng) / rate
    }

    pub fn entropy(&self) -> f64 {
        1.0 - self.rate.ln()
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

    /// Maximum-likelihood rate: λ = 1 / mean
    pub fn fit_rate_mle(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let mean = stats::sample_mean(sample);
        if mean <= 0.0 {
            return Err(Error::no_solution("rate estimate from a zero-mean sample"));
        }
        self.set_rate(1.0 / mean);
        Ok(())
    }

    /// Conjugate Bayesian update: a Gamma(α, β) prior over λ yields the
    /// posterior Gamma(α + n, β + Σx). The rate is set to the posterior
    /// mean and the posterior is returned.
    pub fn fit_rate_bayes(&mut self, sample: &[f64], prior: &Gamma) -> Result<Gamma> {
        Self::check_sample(sample)?;
        let n = sample.len() as f64;
        let total: f64 = sample.iter().sum();
        let posterior = Gamma::new(prior.shape() + n, prior.rate() + total);
        self.set_rate(posterior.mean());
        Ok(posterior)
    }
}

impl ContinuousDistribution for Exponential {
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
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }

    fn log_density(&self, x: f64) -> f64 {
        if x < 0.0 {
            f64::NEG_INFINITY
        } else {
            self.rate.ln() - self.rate * x
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            -(-self.rate * x).exp_m1()
        }
    }

    fn survival(&self, x: f64) -> f64 {
        if x <= 0.0 {
            1.0
        } else {
            (-self.rate * x).exp()
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        Self::standard_variate(rng) / self.rate
    }

    fn mean(&self) -> f64 {
        1.0 / self.rate
    }

    fn variance(&self) -> f64 {
        1.0 / (self.rate * self.rate)
    }

    fn median(&self) -> f64 {
        std::f64::consts::LN_2 / self.rate
    }

    fn mode(&self) -> f64 {
        0.0
    }

    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        -(-p).ln_1p() / self.rate
    }

    fn quantile_upper(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        -p.ln() / self.rate
    }

    /// Constant hazard λ on the support
    fn hazard(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate
        }
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
        let e = Exponential::new(2.0);
        assert_abs_diff_eq!(e.density(0.0), 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(e.cdf(1.0), 1.0 - (-2.0f64).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(e.mean(), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(e.variance(), 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(e.quantile(e.cdf(0.7)), 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(e.quantile_upper(0.25), e.quantile(0.75), epsilon = 1e-12);
    }

    #[test]
    fn test_rate_clamped() {
        let e = Exponential::new(-3.0);
        assert!(e.rate() > 0.0);
    }

    #[test]
    fn test_fit_rate_mle() {
        let e = Exponential::new(3.0);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut sample = vec![0.0; 10_000];
        e.sample(&mut rng, &mut sample);

        let mut fitted = Exponential::new(1.0);
        fitted.fit_rate_mle(&sample).unwrap();
        assert_abs_diff_eq!(fitted.rate(), 3.0, epsilon = 0.15);
    }

    #[test]
    fn test_fit_rejects_negative_sample() {
        let mut e = Exponential::new(1.0);
        assert!(e.fit_rate_mle(&[1.0, -0.5]).is_err());
        // Parameters unchanged after a rejected fit
        assert_eq!(e.rate(), 1.0);
    }

    #[test]
    fn test_fit_rate_bayes_posterior() {
        let mut e = Exponential::new(1.0);
        let prior = Gamma::new(2.0, 1.0);
        let posterior = e.fit_rate_bayes(&[1.0, 2.0, 3.0], &prior).unwrap();
        assert_abs_diff_eq!(posterior.shape(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(posterior.rate(), 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.rate(), 5.0 / 7.0, epsilon = 1e-12);
    }
}
