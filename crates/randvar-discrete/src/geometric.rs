//! Geometric distribution (failures before the first success)

use rand::Rng;
use randvar_core::{stats, DiscreteDistribution, Error, Result, Support, MIN_POSITIVE};

use randvar_continuous::beta::Beta;
use randvar_continuous::exponential::Exponential;
use randvar_core::ContinuousDistribution as _;

use std::f64::consts::LN_2;

/// Below this success probability the floor-of-exponential sampler wins;
/// above it the partial-sum table is cheaper
pub(crate) const EXPONENTIAL_THRESHOLD: f64 = 0.08;

/// Entries of the cached partial-sum table
pub(crate) const TABLE_SIZE: usize = 16;

/// Ceiling on the success probability so q stays strictly positive
const MAX_PROBABILITY: f64 = 1.0 - 1e-12;

/// Iteration cap for the tail walk past the cached table
const MAX_TABLE_WALK: usize = 1_000_000;

/// Variate-generation algorithm, selected by the success probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometricRegime {
    /// p < 0.08: floor of an exponential with rate -ln(1-p)
    ExponentialFloor,
    /// p >= 0.08: search of the cached cumulative table
    TableSearch,
}

impl GeometricRegime {
    /// Regime for a given success probability
    pub fn for_probability(p: f64) -> Self {
        if p < EXPONENTIAL_THRESHOLD {
            GeometricRegime::ExponentialFloor
        } else {
            GeometricRegime::TableSearch
        }
    }
}

/// Geometric distribution, X ~ Geometric(p)
///
/// P(X = k) = p (1-p)^k for k = 0, 1, 2, ...
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    p: f64,
    q: f64,
    /// ln(1 - p)
    log_q: f64,
    /// Cumulative P(X <= k) for k < TABLE_SIZE
    table: [f64; TABLE_SIZE],
    regime: GeometricRegime,
}

impl Geometric {
    /// Construct Geometric(p). The probability is clamped into (0, 1).
    pub fn new(probability: f64) -> Self {
        let mut g = Geometric {
            p: 0.5,
            q: 0.5,
            log_q: 0.5f64.ln(),
            table: [0.0; TABLE_SIZE],
            regime: GeometricRegime::TableSearch,
        };
        g.set_probability(probability);
        g
    }

    /// Set the success probability, rebuilding the cumulative table and
    /// re-deriving the regime before returning.
    pub fn set_probability(&mut self, probability: f64) {
        if !(0.0..=1.0).contains(&probability) || probability == 0.0 {
            log::debug!("geometric probability {probability} clamped into (0, 1)");
        }
        self.p = probability.clamp(MIN_POSITIVE, MAX_PROBABILITY);
        self.q = 1.0 - self.p;
        self.log_q = (-self.p).ln_1p();
        let mut cumulative = 0.0;
        let mut term = self.p;
        for slot in self.table.iter_mut() {
            cumulative += term;
            *slot = cumulative;
            term *= self.q;
        }
        self.regime = GeometricRegime::for_probability(self.p);
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    /// Currently selected sampling regime
    pub fn regime(&self) -> GeometricRegime {
        self.regime
    }

    /// Geometric(p) draw without constructing a distribution (no cached
    /// table, so the table route recomputes partial sums on the fly)
    pub fn variate_with_probability<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> i64 {
        let p = probability.clamp(MIN_POSITIVE, MAX_PROBABILITY);
        if p < EXPONENTIAL_THRESHOLD {
            return (Exponential::standard_variate(rng) / -(-p).ln_1p()).floor() as i64;
        }
        let u = rng.gen::<f64>();
        let q = 1.0 - p;
        let mut prod = p;
        let mut sum = prod;
        let mut k = 0i64;
        while u > sum && (k as usize) < MAX_TABLE_WALK {
            prod *= q;
            sum += prod;
            k += 1;
        }
        k
    }

    fn variate_through_exponential<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        (Exponential::standard_variate(rng) / -self.log_q).floor() as i64
    }

    fn variate_by_table<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let u = rng.gen::<f64>();
        for (k, &cumulative) in self.table.iter().enumerate() {
            if u < cumulative {
                return k as i64;
            }
        }
        // Tail beyond the cached table
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

    pub fn entropy(&self) -> f64 {
        let a = -self.q * self.log_q;
        let b = -self.p * self.p.ln();
        (a + b) / (LN_2 * self.p)
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

    /// Maximum-likelihood probability: p = 1 / (mean + 1)
    pub fn fit_mle(&mut self, sample: &[i64]) -> Result<()> {
        Self::check_sample(sample)?;
        self.set_probability(1.0 / (stats::int_mean(sample) + 1.0));
        Ok(())
    }

    /// The moment estimator coincides with the MLE
    pub fn fit_mm(&mut self, sample: &[i64]) -> Result<()> {
        self.fit_mle(sample)
    }

    /// Conjugate Bayesian update: a Beta(α, β) prior over p yields the
    /// posterior Beta(α + n, β + Σk). The probability is set to the
    /// posterior mean and the posterior is returned.
    pub fn fit_bayes(&mut self, sample: &[i64], prior: &Beta) -> Result<Beta> {
        Self::check_sample(sample)?;
        let n = sample.len() as f64;
        let total: f64 = sample.iter().map(|&k| k as f64).sum();
        let posterior = Beta::new(prior.alpha() + n, prior.beta() + total);
        self.set_probability(posterior.mean());
        Ok(posterior)
    }
}

impl DiscreteDistribution for Geometric {
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
            self.p * (k as f64 * self.log_q).exp()
        }
    }

    fn log_pmf(&self, k: i64) -> f64 {
        if k < 0 {
            f64::NEG_INFINITY
        } else {
            self.p.ln() + k as f64 * self.log_q
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            -((x.floor() + 1.0) * self.log_q).exp_m1()
        }
    }

    fn survival(&self, x: f64) -> f64 {
        if x < 0.0 {
            1.0
        } else {
            ((x.floor() + 1.0) * self.log_q).exp()
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        match self.regime {
            GeometricRegime::ExponentialFloor => self.variate_through_exponential(rng),
            GeometricRegime::TableSearch => self.variate_by_table(rng),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [i64]) {
        match self.regime {
            GeometricRegime::ExponentialFloor => {
                for slot in out.iter_mut() {
                    *slot = self.variate_through_exponential(rng);
                }
            }
            GeometricRegime::TableSearch => {
                for slot in out.iter_mut() {
                    *slot = self.variate_by_table(rng);
                }
            }
        }
    }

    fn mean(&self) -> f64 {
        self.q / self.p
    }

    fn variance(&self) -> f64 {
        self.q / (self.p * self.p)
    }

    fn median(&self) -> f64 {
        (-LN_2 / self.log_q).floor()
    }

    fn mode(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_pmf_and_cdf() {
        let g = Geometric::new(0.25);
        assert_eq!(g.pmf(-1), 0.0);
        assert_abs_diff_eq!(g.pmf(0), 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(g.pmf(2), 0.25 * 0.75 * 0.75, epsilon = 1e-15);
        assert_abs_diff_eq!(g.cdf(1.0), 1.0 - 0.75f64.powi(2), epsilon = 1e-12);
        // CDF is a step function: constant between lattice points
        assert_eq!(g.cdf(1.0), g.cdf(1.9));
    }

    #[test]
    fn test_regime_threshold() {
        assert_eq!(
            GeometricRegime::for_probability(0.079),
            GeometricRegime::ExponentialFloor
        );
        assert_eq!(
            GeometricRegime::for_probability(0.081),
            GeometricRegime::TableSearch
        );
        let mut g = Geometric::new(0.5);
        assert_eq!(g.regime(), GeometricRegime::TableSearch);
        g.set_probability(0.01);
        assert_eq!(g.regime(), GeometricRegime::ExponentialFloor);
    }

    #[test]
    fn test_sample_moments_straddling_threshold() {
        // Same statistical target on both sides of the dispatch boundary
        for &p in &[0.075, 0.085] {
            let g = Geometric::new(p);
            let mut rng = SmallRng::seed_from_u64(97);
            let mut sample = vec![0i64; 20_000];
            g.sample(&mut rng, &mut sample);
            let mean = stats::int_mean(&sample);
            let var = stats::int_variance(&sample);
            let tol = 4.0 * (g.variance() / 20_000.0).sqrt();
            assert_abs_diff_eq!(mean, g.mean(), epsilon = tol);
            assert_abs_diff_eq!(var, g.variance(), epsilon = 0.1 * g.variance());
        }
    }

    #[test]
    fn test_fit_mle_round_trip() {
        let g = Geometric::new(0.3);
        let mut rng = SmallRng::seed_from_u64(101);
        let mut sample = vec![0i64; 10_000];
        g.sample(&mut rng, &mut sample);

        let mut fitted = Geometric::new(0.5);
        fitted.fit_mle(&sample).unwrap();
        assert_abs_diff_eq!(fitted.probability(), 0.3, epsilon = 0.015);
    }

    #[test]
    fn test_fit_bayes_posterior() {
        let mut g = Geometric::new(0.5);
        let prior = Beta::new(1.0, 1.0);
        let posterior = g.fit_bayes(&[0, 1, 2, 1], &prior).unwrap();
        assert_abs_diff_eq!(posterior.alpha(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(posterior.beta(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(g.probability(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_rejects_negative_counts() {
        let mut g = Geometric::new(0.4);
        assert!(g.fit_mle(&[1, -2]).is_err());
        assert_eq!(g.probability(), 0.4);
    }

    #[test]
    fn test_hazard_is_constant_on_support() {
        // Memorylessness: hazard P(X=k)/P(X>=k) equals p everywhere
        let g = Geometric::new(0.2);
        for k in 0..10 {
            assert_abs_diff_eq!(g.hazard(k), 0.2, epsilon = 1e-10);
        }
        assert_eq!(g.hazard(-3), 0.0);
    }
}
