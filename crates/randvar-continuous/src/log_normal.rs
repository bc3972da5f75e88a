//! Log-normal distribution

use rand::Rng;
use randvar_core::{stats, ContinuousDistribution, Error, Result, Support};

use crate::normal::Normal;

/// Log-normal distribution: ln(X) ~ N(μ, σ²)
#[derive(Debug, Clone, PartialEq)]
pub struct LogNormal {
    x: Normal,
    /// exp(μ), cached for the moment formulas
    exp_mu: f64,
    /// exp(σ²)
    exp_var: f64,
}

impl LogNormal {
    /// Construct with the location and scale of the underlying normal
    pub fn new(location: f64, scale: f64) -> Self {
        let mut d = LogNormal {
            x: Normal::new(0.0, 1.0),
            exp_mu: 1.0,
            exp_var: std::f64::consts::E,
        };
        d.set_location(location);
        d.set_scale(scale);
        d
    }

    pub fn set_location(&mut self, location: f64) {
        self.x.set_location(location);
        self.exp_mu = location.exp();
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.x.set_scale(scale);
        let s = self.x.scale();
        self.exp_var = (s * s).exp();
    }

    pub fn location(&self) -> f64 {
        self.x.location()
    }

    pub fn scale(&self) -> f64 {
        self.x.scale()
    }

    pub fn skewness(&self) -> f64 {
        (self.exp_var + 2.0) * (self.exp_var - 1.0).sqrt()
    }

    pub fn excess_kurtosis(&self) -> f64 {
        let e = self.exp_var;
        e * e * e * e + 2.0 * e * e * e + 3.0 * e * e - 6.0
    }

    fn check_sample(sample: &[f64]) -> Result<()> {
        if sample.is_empty() {
            return Err(Error::empty_sample());
        }
        if sample.iter().any(|&x| x <= 0.0) {
            return Err(Error::out_of_support("non-positive observation"));
        }
        Ok(())
    }

    /// Moment fit of the location for a known scale:
    /// μ = ln(mean) - σ²/2
    pub fn fit_location_mm(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let mean = stats::sample_mean(sample);
        let s = self.x.scale();
        self.set_location(mean.ln() - 0.5 * s * s);
        Ok(())
    }

    /// Moment fit of the scale for a known location:
    /// σ² = ln(E[X²]) - 2μ - ... reduced to ln(m₂/m₁²) about the sample
    pub fn fit_scale_mm(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let m1 = stats::sample_mean(sample);
        let m2 = stats::raw_moment(sample, 2);
        let ratio = m2 / (m1 * m1);
        if ratio <= 1.0 {
            return Err(Error::no_solution("second moment below the mean square"));
        }
        self.set_scale(ratio.ln().sqrt());
        Ok(())
    }

    /// Maximum-likelihood fit of both parameters from the log-sample
    pub fn fit_mle(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        if sample.len() < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: sample.len(),
            });
        }
        let logs: Vec<f64> = sample.iter().map(|&x| x.ln()).collect();
        self.set_location(stats::sample_mean(&logs));
        self.set_scale(stats::sample_variance(&logs).sqrt());
        Ok(())
    }
}

impl ContinuousDistribution for LogNormal {
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
            0.0
        } else {
            self.x.density(x.ln()) / x
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            self.x.cdf(x.ln())
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.x.variate(rng).exp()
    }

    fn mean(&self) -> f64 {
        self.exp_mu * self.exp_var.sqrt()
    }

    fn variance(&self) -> f64 {
        (self.exp_var - 1.0) * self.exp_mu * self.exp_mu * self.exp_var
    }

    fn median(&self) -> f64 {
        self.exp_mu
    }

    fn mode(&self) -> f64 {
        self.exp_mu / self.exp_var
    }

    fn quantile(&self, p: f64) -> f64 {
        self.x.quantile(p).exp()
    }

    fn quantile_upper(&self, p: f64) -> f64 {
        self.x.quantile_upper(p).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_moments() {
        let d = LogNormal::new(0.0, 1.0);
        assert_abs_diff_eq!(d.mean(), (0.5f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(d.median(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.mode(), (-1.0f64).exp(), epsilon = 1e-12);
        let e = std::f64::consts::E;
        assert_abs_diff_eq!(d.variance(), (e - 1.0) * e, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_round_trip() {
        let d = LogNormal::new(1.0, 0.5);
        for &p in &[0.05, 0.5, 0.95] {
            assert_abs_diff_eq!(d.cdf(d.quantile(p)), p, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_fit_mle_round_trip() {
        let d = LogNormal::new(0.7, 0.3);
        let mut rng = SmallRng::seed_from_u64(67);
        let mut sample = vec![0.0; 10_000];
        d.sample(&mut rng, &mut sample);

        let mut fitted = LogNormal::new(0.0, 1.0);
        fitted.fit_mle(&sample).unwrap();
        assert_abs_diff_eq!(fitted.location(), 0.7, epsilon = 0.035);
        assert_abs_diff_eq!(fitted.scale(), 0.3, epsilon = 0.015);
    }

    #[test]
    fn test_fit_rejects_non_positive() {
        let mut d = LogNormal::new(0.0, 1.0);
        assert!(d.fit_mle(&[1.0, 0.0, 2.0]).is_err());
        assert_eq!(d.location(), 0.0);
    }
}
