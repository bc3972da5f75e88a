//! Negative binomial distribution
//!
//! P(X = k) = C(k + r - 1, k) p^r (1-p)^k, the number of failures before
//! the r-th success.
//!
//! The count parameter is generic: [`Pascal`] (integer count, `u64`) and
//! [`Polya`] (real count, `f64`) share this one implementation, selected at
//! construction. Related: NB(1, p) is Geometric(p).

use rand::Rng;
use randvar_core::roots::find_root_bracketed;
use randvar_core::{stats, DiscreteDistribution, Error, Result, Support, MIN_POSITIVE};
use statrs::function::beta::beta_reg;
use statrs::function::gamma::{digamma, ln_gamma};

use num_traits::{NumCast, ToPrimitive};

use randvar_continuous::beta::Beta;
use randvar_continuous::exponential::Exponential;
use randvar_continuous::gamma::Gamma;
use randvar_core::ContinuousDistribution as _;

use crate::geometric::{EXPONENTIAL_THRESHOLD, TABLE_SIZE};
use crate::poisson::Poisson;

/// Largest integer count routed to the sum-of-geometrics samplers; larger
/// or non-integer counts use the Gamma-Poisson mixture
const MAX_GEOMETRIC_SUM_COUNT: f64 = 15.0;

/// Ceiling on the success probability so q stays strictly positive
const MAX_PROBABILITY: f64 = 1.0 - 1e-12;

/// Iteration cap for the tail walk past the cached geometric table
const MAX_TABLE_WALK: usize = 1_000_000;

/// Count parameter of a negative binomial: integer (Pascal) or real
/// (Polya), fixed by the concrete type.
pub trait CountNumber:
    NumCast + ToPrimitive + Copy + PartialOrd + std::fmt::Debug + Send + Sync + 'static
{
    /// Whether this count type only takes integer values
    const INTEGER_VALUED: bool;

    /// Clamp into the valid parameter domain
    fn clamp_valid(self) -> Self;

    /// Convert a real-valued estimate back into the parameter domain
    fn from_estimate(value: f64) -> Self;

    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl CountNumber for u64 {
    const INTEGER_VALUED: bool = true;

    fn clamp_valid(self) -> Self {
        self.max(1)
    }

    fn from_estimate(value: f64) -> Self {
        value.round().max(1.0) as u64
    }
}

impl CountNumber for f64 {
    const INTEGER_VALUED: bool = false;

    fn clamp_valid(self) -> Self {
        self.max(MIN_POSITIVE)
    }

    fn from_estimate(value: f64) -> Self {
        value.max(MIN_POSITIVE)
    }
}

/// Variate-generation algorithm, selected by the count and probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegativeBinomialRegime {
    /// Integer count <= 15, p >= 0.08: sum of table-searched geometrics
    Table,
    /// Integer count <= 15, p < 0.08: sum of floor-of-exponential geometrics
    Exponential,
    /// Real or large count: exact Gamma-Poisson mixture
    GammaPoisson,
}

impl NegativeBinomialRegime {
    /// Regime for a given count and success probability
    fn select(integer_count: bool, count: f64, probability: f64) -> Self {
        if !integer_count || count > MAX_GEOMETRIC_SUM_COUNT {
            NegativeBinomialRegime::GammaPoisson
        } else if probability < EXPONENTIAL_THRESHOLD {
            NegativeBinomialRegime::Exponential
        } else {
            NegativeBinomialRegime::Table
        }
    }
}

/// Negative binomial distribution, X ~ NB(r, p)
#[derive(Debug, Clone, PartialEq)]
pub struct NegativeBinomial<T: CountNumber> {
    r: T,
    p: f64,
    q: f64,
    log_p: f64,
    /// ln(1 - p)
    log_q: f64,
    /// r ln(p) - ln(Γ(r))
    pdf_coef: f64,
    q_div_p: f64,
    /// Cumulative geometric table for the sum-of-geometrics regimes
    table: [f64; TABLE_SIZE],
    /// Gamma(r, p/q) mixing distribution for the Gamma-Poisson regime
    gamma_rv: Gamma,
    regime: NegativeBinomialRegime,
}

/// Negative binomial with an integer count
pub type Pascal = NegativeBinomial<u64>;

/// Negative binomial with a real count
pub type Polya = NegativeBinomial<f64>;

impl<T: CountNumber> NegativeBinomial<T> {
    /// Construct NB(r, p). The count is clamped into its domain and the
    /// probability into (0, 1).
    pub fn new(number: T, probability: f64) -> Self {
        let mut nb = NegativeBinomial {
            r: T::from_estimate(1.0),
            p: 0.5,
            q: 0.5,
            log_p: 0.0,
            log_q: 0.0,
            pdf_coef: 0.0,
            q_div_p: 1.0,
            table: [0.0; TABLE_SIZE],
            gamma_rv: Gamma::new(1.0, 1.0),
            regime: NegativeBinomialRegime::Table,
        };
        nb.set_parameters(number, probability);
        nb
    }

    /// Set both parameters, re-deriving the log terms, the geometric table,
    /// the mixing Gamma, and the sampling regime before returning.
    pub fn set_parameters(&mut self, number: T, probability: f64) {
        if !(0.0..=1.0).contains(&probability) || probability == 0.0 {
            log::debug!("negative binomial probability {probability} clamped into (0, 1)");
        }
        self.r = number.clamp_valid();
        self.p = probability.clamp(MIN_POSITIVE, MAX_PROBABILITY);
        self.q = 1.0 - self.p;
        self.log_p = self.p.ln();
        self.log_q = (-self.p).ln_1p();
        let r_f = self.r.as_f64();
        self.pdf_coef = r_f * self.log_p - ln_gamma(r_f);
        self.q_div_p = self.q / self.p;

        let mut cumulative = 0.0;
        let mut term = self.p;
        for slot in self.table.iter_mut() {
            cumulative += term;
            *slot = cumulative;
            term *= self.q;
        }

        self.gamma_rv.set_parameters(r_f, self.p / self.q);
        self.regime = NegativeBinomialRegime::select(T::INTEGER_VALUED, r_f, self.p);
    }

    pub fn set_probability(&mut self, probability: f64) {
        self.set_parameters(self.r, probability);
    }

    pub fn set_number(&mut self, number: T) {
        self.set_parameters(number, self.p);
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    pub fn number(&self) -> T {
        self.r
    }

    /// Currently selected sampling regime
    pub fn regime(&self) -> NegativeBinomialRegime {
        self.regime
    }

    fn variate_geometric_by_table<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let u = rng.gen::<f64>();
        for (k, &cumulative) in self.table.iter().enumerate() {
            if u < cumulative {
                return k as i64;
            }
        }
        let mut sum = self.table[TABLE_SIZE - 1];
        let mut prod = self.p * self.q.powi(TABLE_SIZE as i32);
        let mut k = TABLE_SIZE as i64;
        for _ in 0..MAX_TABLE_WALK {
            sum += prod;
            if u < sum {
                return k;
            }
            prod *= self.q;
            k += 1;
        }
        k
    }

    fn variate_geometric_through_exponential<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        (Exponential::standard_variate(rng) / -self.log_q).floor() as i64
    }

    fn variate_by_table<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let count = self.r.to_u64().unwrap_or(1);
        (0..count)
            .map(|_| self.variate_geometric_by_table(rng))
            .sum()
    }

    fn variate_through_exponential<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let count = self.r.to_u64().unwrap_or(1);
        (0..count)
            .map(|_| self.variate_geometric_through_exponential(rng))
            .sum()
    }

    /// Exact mixture: draw λ ~ Gamma(r, p/q), then Poisson(λ)
    fn variate_through_gamma_poisson<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let lambda = self.gamma_rv.variate(rng);
        Poisson::variate_with_mean(rng, lambda)
    }

    pub fn skewness(&self) -> f64 {
        (2.0 - self.p) / (self.r.as_f64() * self.q).sqrt()
    }

    pub fn excess_kurtosis(&self) -> f64 {
        let r_f = self.r.as_f64();
        6.0 / r_f + self.p * self.p / (self.q * r_f)
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

    /// Method-of-moments probability for a known count: p = r / (r + mean)
    pub fn fit_probability_mm(&mut self, sample: &[i64]) -> Result<()> {
        Self::check_sample(sample)?;
        let r_f = self.r.as_f64();
        self.set_probability(r_f / (r_f + stats::int_mean(sample)));
        Ok(())
    }

    /// Conjugate Bayesian update of the probability: a Beta(α, β) prior
    /// yields the posterior Beta(α + nr, β + Σk). The probability is set to
    /// the posterior mean and the posterior is returned.
    pub fn fit_probability_bayes(&mut self, sample: &[i64], prior: &Beta) -> Result<Beta> {
        Self::check_sample(sample)?;
        let n = sample.len() as f64;
        let total: f64 = sample.iter().map(|&k| k as f64).sum();
        let posterior = Beta::new(prior.alpha() + n * self.r.as_f64(), prior.beta() + total);
        self.set_probability(posterior.mean());
        Ok(posterior)
    }

    /// Method-of-moments count for a known probability: r = mean p / q
    pub fn fit_number_mm(&mut self, sample: &[i64]) -> Result<()> {
        Self::check_sample(sample)?;
        let estimate = stats::int_mean(sample) * self.p / self.q;
        self.set_number(T::from_estimate(estimate));
        Ok(())
    }

    /// Method-of-moments fit of both parameters:
    /// r = m² / (v - m), p = m / v; requires the sample variance to exceed
    /// the sample mean
    pub fn fit_number_and_probability_mm(&mut self, sample: &[i64]) -> Result<()> {
        Self::check_sample(sample)?;
        let m = stats::int_mean(sample);
        let v = stats::int_variance(sample);
        if v <= m {
            return Err(Error::Computation(
                "Sample variance should be bigger than sample mean".to_string(),
            ));
        }
        self.set_parameters(T::from_estimate(m * m / (v - m)), m / v);
        Ok(())
    }

    /// Maximum-likelihood fit of both parameters. The count solves the
    /// profile score mean(ψ(kᵢ + r)) - ψ(r) + ln(r / (r + m)) = 0 through
    /// the bracketed root finder; the probability follows as r / (r + m).
    /// Fails when the sample is not over-dispersed (no finite solution).
    pub fn fit_number_and_probability_mle(&mut self, sample: &[i64]) -> Result<()> {
        Self::check_sample(sample)?;
        let n = sample.len() as f64;
        let m = stats::int_mean(sample);
        if m <= 0.0 {
            return Err(Error::no_solution("likelihood fit on an all-zero sample"));
        }
        let score = |r: f64| {
            let digamma_mean: f64 =
                sample.iter().map(|&k| digamma(k as f64 + r)).sum::<f64>() / n;
            digamma_mean - digamma(r) + (r / (r + m)).ln()
        };
        // The score falls from +inf toward zero; a sign change only exists
        // for over-dispersed samples
        let hi = 1e6;
        if score(hi) >= 0.0 {
            return Err(Error::no_solution("count likelihood equation"));
        }
        let r = find_root_bracketed(score, 1e-3, hi)
            .ok_or_else(|| Error::no_solution("count likelihood equation"))?;
        self.set_parameters(T::from_estimate(r), r / (r + m));
        Ok(())
    }
}

impl<T: CountNumber> DiscreteDistribution for NegativeBinomial<T> {
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
        let r_f = self.r.as_f64();
        self.pdf_coef + ln_gamma(r_f + kf) - ln_gamma(kf + 1.0) + kf * self.log_q
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            beta_reg(self.r.as_f64(), x.floor() + 1.0, self.p)
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        match self.regime {
            NegativeBinomialRegime::Table => self.variate_by_table(rng),
            NegativeBinomialRegime::Exponential => self.variate_through_exponential(rng),
            NegativeBinomialRegime::GammaPoisson => self.variate_through_gamma_poisson(rng),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [i64]) {
        match self.regime {
            NegativeBinomialRegime::Table => {
                for slot in out.iter_mut() {
                    *slot = self.variate_by_table(rng);
                }
            }
            NegativeBinomialRegime::Exponential => {
                for slot in out.iter_mut() {
                    *slot = self.variate_through_exponential(rng);
                }
            }
            NegativeBinomialRegime::GammaPoisson => {
                for slot in out.iter_mut() {
                    *slot = self.variate_through_gamma_poisson(rng);
                }
            }
        }
    }

    fn mean(&self) -> f64 {
        self.r.as_f64() * self.q_div_p
    }

    fn variance(&self) -> f64 {
        self.r.as_f64() * self.q_div_p / self.p
    }

    fn mode(&self) -> f64 {
        let r_f = self.r.as_f64();
        if r_f > 1.0 {
            ((r_f - 1.0) * self.q_div_p).floor()
        } else {
            0.0
        }
    }
}
