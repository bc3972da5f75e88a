//! Normal (Gaussian) distribution

use rand::Rng;
use randvar_core::{stats, ContinuousDistribution, Error, Result, Support, MIN_POSITIVE};
use statrs::function::erf;

const SQRT_2: f64 = std::f64::consts::SQRT_2;
const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// Iteration cap for the polar rejection loop
const MAX_POLAR_ITERATIONS: usize = 1_000;

/// Normal distribution, X ~ N(μ, σ²)
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Construct N(μ, σ²). A non-positive σ is clamped.
    pub fn new(location: f64, scale: f64) -> Self {
        let mut n = Normal {
            mu: 0.0,
            sigma: 1.0,
        };
        n.set_location(location);
        n.set_scale(scale);
        n
    }

    pub fn set_location(&mut self, location: f64) {
        self.mu = location;
    }

    pub fn set_scale(&mut self, scale: f64) {
        if scale <= 0.0 {
            log::debug!("normal scale {scale} clamped to {MIN_POSITIVE}");
        }
        self.sigma = scale.max(MIN_POSITIVE);
    }

    pub fn location(&self) -> f64 {
        self.mu
    }

    pub fn scale(&self) -> f64 {
        self.sigma
    }

    /// Standard normal draw by Marsaglia's polar method.
    ///
    /// The rejection loop accepts ~78.5% of proposals; if the cap is ever
    /// exhausted the draw falls through to a direct Box-Muller evaluation,
    /// which cannot fail.
    pub fn standard_variate<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        for _ in 0..MAX_POLAR_ITERATIONS {
            let u = 2.0 * rng.gen::<f64>() - 1.0;
            let v = 2.0 * rng.gen::<f64>() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                return u * (-2.0 * s.ln() / s).sqrt();
            }
        }
        let u: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
        (-2.0 * u.ln()).sqrt() * (TWO_PI * rng.gen::<f64>()).cos()
    }

    /// Standard normal CDF
    pub fn standard_cdf(x: f64) -> f64 {
        0.5 * (1.0 + erf::erf(x / SQRT_2))
    }

    /// Standard normal quantile
    pub fn standard_quantile(p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        SQRT_2 * erf::erf_inv(2.0 * p - 1.0)
    }

    pub fn entropy(&self) -> f64 {
        0.5 * (TWO_PI * std::f64::consts::E * self.sigma * self.sigma).ln()
    }

    pub fn skewness(&self) -> f64 {
        0.0
    }

    pub fn excess_kurtosis(&self) -> f64 {
        0.0
    }

    /// Maximum-likelihood fit of both parameters
    pub fn fit_mle(&mut self, sample: &[f64]) -> Result<()> {
        if sample.len() < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: sample.len(),
            });
        }
        let mean = stats::sample_mean(sample);
        let var = stats::sample_variance(sample);
        self.set_location(mean);
        self.set_scale(var.sqrt());
        Ok(())
    }
}

impl ContinuousDistribution for Normal {
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
        let z = (x - self.mu) / self.sigma;
        (-0.5 * z * z).exp() / (self.sigma * TWO_PI.sqrt())
    }

    fn log_density(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        -0.5 * z * z - self.sigma.ln() - 0.5 * TWO_PI.ln()
    }

    fn cdf(&self, x: f64) -> f64 {
        Self::standard_cdf((x - self.mu) / self.sigma)
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.mu + self.sigma * Self::standard_variate(rng)
    }

    fn mean(&self) -> f64 {
        self.mu
    }

    fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    fn median(&self) -> f64 {
        self.mu
    }

    fn mode(&self) -> f64 {
        self.mu
    }

    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.mu + self.sigma * Self::standard_quantile(p)
    }

    fn quantile_upper(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.mu - self.sigma * Self::standard_quantile(p)
    }
}
