//! Poisson distribution

use rand::Rng;
use randvar_core::{stats, DiscreteDistribution, Error, Result, Support, MIN_POSITIVE};
use statrs::function::gamma::{gamma_ur, ln_gamma};

use randvar_continuous::gamma::Gamma;
use randvar_core::ContinuousDistribution as _;

/// Above this mean, draws are decomposed into chunks; the product-of-
/// uniforms inversion would otherwise underflow its acceptance product
const SMALL_MEAN_THRESHOLD: f64 = 16.0;

/// Iteration cap for the inversion loop (generous for means <= 16)
const MAX_INVERSION_STEPS: usize = 10_000;

/// Variate-generation algorithm, selected by the mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoissonRegime {
    /// λ <= 16: Knuth's product-of-uniforms inversion
    Inversion,
    /// λ > 16: exact decomposition into independent small-mean chunks
    Chunked,
}

impl PoissonRegime {
    /// Regime for a given mean
    pub fn for_mean(lambda: f64) -> Self {
        if lambda <= SMALL_MEAN_THRESHOLD {
            PoissonRegime::Inversion
        } else {
            PoissonRegime::Chunked
        }
    }
}

/// Poisson distribution, X ~ Poisson(λ)
#[derive(Debug, Clone, PartialEq)]
pub struct Poisson {
    lambda: f64,
    log_lambda: f64,
    regime: PoissonRegime,
}

impl Poisson {
    /// Construct Poisson(λ). A non-positive mean is clamped.
    pub fn new(mean: f64) -> Self {
        let mut p = Poisson {
            lambda: 1.0,
            log_lambda: 0.0,
            regime: PoissonRegime::Inversion,
        };
        p.set_mean(mean);
        p
    }

    /// Set the mean, re-deriving the cached log and the regime.
    pub fn set_mean(&mut self, mean: f64) {
        if mean <= 0.0 {
            log::debug!("poisson mean {mean} clamped to {MIN_POSITIVE}");
        }
        self.lambda = mean.max(MIN_POSITIVE);
        self.log_lambda = self.lambda.ln();
        self.regime = PoissonRegime::for_mean(self.lambda);
    }

    pub fn rate(&self) -> f64 {
        self.lambda
    }

    /// Currently selected sampling regime
    pub fn regime(&self) -> PoissonRegime {
        self.regime
    }

    /// Poisson(λ) draw without constructing a distribution.
    ///
    /// Splits large means into chunks of at most 16 and sums independent
    /// inversion draws; the sum of independent Poissons is Poisson, so the
    /// decomposition is exact rather than an approximate normal cutoff.
    pub fn variate_with_mean<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> i64 {
        if mean <= 0.0 {
            return 0;
        }
        let mut total = 0i64;
        let mut remaining = mean;
        while remaining > SMALL_MEAN_THRESHOLD {
            total += knuth_inversion(rng, SMALL_MEAN_THRESHOLD);
            remaining -= SMALL_MEAN_THRESHOLD;
        }
        total + knuth_inversion(rng, remaining)
    }

    pub fn skewness(&self) -> f64 {
        1.0 / self.lambda.sqrt()
    }

    pub fn excess_kurtosis(&self) -> f64 {
        1.0 / self.lambda
    }

    fn check_sample(sample: &[i64]) -> Result<()> {
        if sample.is_empty() {
            return Err(Error::empty_sample());
        }
        if sample.iter().any(|&k| k < 0) {
            return Err(Error::out_of_support("negative count"));
        }
        Ok(())
    }

    /// Maximum-likelihood mean: λ = sample mean
    pub fn fit_mle(&mut self, sample: &[i64]) -> Result<()> {
        Self::check_sample(sample)?;
        self.set_mean(stats::int_mean(sample));
        Ok(())
    }

    /// Conjugate Bayesian update: a Gamma(α, β) prior over λ yields the
    /// posterior Gamma(α + Σk, β + n). The mean is set to the posterior
    /// mean and the posterior is returned.
    pub fn fit_bayes(&mut self, sample: &[i64], prior: &Gamma) -> Result<Gamma> {
        Self::check_sample(sample)?;
        let n = sample.len() as f64;
        let total: f64 = sample.iter().map(|&k| k as f64).sum();
        let posterior = Gamma::new(prior.shape() + total, prior.rate() + n);
        self.set_mean(posterior.mean());
        Ok(posterior)
    }
}

/// Knuth's inversion: count uniforms until their product drops below
/// exp(-λ). Capped; the cap is unreachable for the means routed here.
fn knuth_inversion<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> i64 {
    if lambda <= 0.0 {
        return 0;
    }
    let floor = (-lambda).exp();
    let mut k = 0i64;
    let mut prod = rng.gen::<f64>();
    for _ in 0..MAX_INVERSION_STEPS {
        if prod <= floor {
            return k;
        }
        k += 1;
        prod *= rng.gen::<f64>();
    }
    k
}

impl DiscreteDistribution for Poisson {
    fn support(&self) -> Support {
        Support::RightSemiInfinite
    }

    fn min_value(&self) -> i64 {
        0
    }

    fn max_value(&self) -> i64 {
        i64::MAX
    }

    fn pmf(&self, k: i64) -> f64 {
        if k < 0 {
            0.0
        } else {
            self.log_pmf(k).exp()
        }
    }

    fn log_pmf(&self, k: i64) -> f64 {
        if k < 0 {
            return f64::NEG_INFINITY;
        }
        let kf = k as f64;
        kf * self.log_lambda - self.lambda - ln_gamma(kf + 1.0)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            gamma_ur(x.floor() + 1.0, self.lambda)
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        match self.regime {
            PoissonRegime::Inversion => knuth_inversion(rng, self.lambda),
            PoissonRegime::Chunked => Self::variate_with_mean(rng, self.lambda),
        }
    }

    fn mean(&self) -> f64 {
        self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda
    }

    fn mode(&self) -> f64 {
        self.lambda.floor()
    }
}
