//! The capability contract for discrete (integer-valued) distributions
//!
//! Mirrors the continuous contract over the integer lattice. Quantiles walk
//! the lattice from a mean-anchored start instead of root finding, and
//! expectations are capped series instead of quadrature. The same failure
//! policy applies: out-of-domain queries and exhausted budgets return NaN.

use rand::Rng;

use crate::support::Support;

/// Step cap for the lattice quantile walk
const MAX_QUANTILE_STEPS: usize = 1_000_000;

/// Term cap for series expectations
const MAX_EXPECTATION_TERMS: usize = 1_000_000;

/// Upper-tail mass below which a series expectation stops
const TAIL_TOLERANCE: f64 = 1e-12;

/// Contract implemented by every discrete distribution.
pub trait DiscreteDistribution {
    /// Support classification, constant per concrete type
    fn support(&self) -> Support;

    /// Smallest value with positive mass
    fn min_value(&self) -> i64;

    /// Largest value with positive mass (`i64::MAX` for unbounded tails)
    fn max_value(&self) -> i64;

    /// Probability mass at `k`; 0 outside the support
    fn pmf(&self, k: i64) -> f64;

    /// Cumulative distribution function at real-valued `x`
    fn cdf(&self, x: f64) -> f64;

    /// Draw a single variate
    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> i64;

    /// Natural log of the mass function
    fn log_pmf(&self, k: i64) -> f64 {
        self.pmf(k).ln()
    }

    /// Survival function `1 - cdf(x)`
    fn survival(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// Fill the caller-owned buffer with independent variates
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [i64]) {
        for slot in out.iter_mut() {
            *slot = self.variate(rng);
        }
    }

    /// E[X], by capped series unless overridden
    fn mean(&self) -> f64 {
        self.expected_value(|k| k as f64)
    }

    /// Var(X), by capped series unless overridden
    fn variance(&self) -> f64 {
        let m = self.mean();
        if !m.is_finite() {
            return f64::NAN;
        }
        self.expected_value(|k| {
            let d = k as f64 - m;
            d * d
        })
    }

    /// Median, `quantile(0.5)` unless overridden
    fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    /// Mode, by hill climbing from the rounded mean unless overridden
    fn mode(&self) -> f64 {
        let mean = self.mean();
        let mut k = if mean.is_finite() {
            (mean.round() as i64).clamp(self.min_value(), self.max_value())
        } else {
            self.min_value()
        };
        let mut steps = 0usize;
        while k > self.min_value() && self.pmf(k - 1) > self.pmf(k) && steps < MAX_QUANTILE_STEPS {
            k -= 1;
            steps += 1;
        }
        while k < self.max_value() && self.pmf(k + 1) > self.pmf(k) && steps < MAX_QUANTILE_STEPS {
            k += 1;
            steps += 1;
        }
        k as f64
    }

    /// Quantile: the smallest lattice point `k` with `cdf(k) >= p`.
    ///
    /// NaN outside [0, 1] or when the walk exhausts its step cap.
    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return self.min_value() as f64;
        }
        if p == 1.0 {
            return self.max_value() as f64;
        }
        let mean = self.mean();
        let mut k = if mean.is_finite() {
            (mean.floor() as i64).clamp(self.min_value(), self.max_value())
        } else {
            self.min_value()
        };
        let mut steps = 0usize;
        while k > self.min_value() && self.cdf((k - 1) as f64) >= p {
            k -= 1;
            steps += 1;
            if steps > MAX_QUANTILE_STEPS {
                return f64::NAN;
            }
        }
        while self.cdf(k as f64) < p {
            k += 1;
            steps += 1;
            if steps > MAX_QUANTILE_STEPS {
                return f64::NAN;
            }
        }
        k as f64
    }

    /// Hazard `P(X = k) / P(X >= k)`.
    ///
    /// 0 below the support, NaN above it.
    fn hazard(&self, k: i64) -> f64 {
        if k < self.min_value() {
            return 0.0;
        }
        if k > self.max_value() {
            return f64::NAN;
        }
        self.pmf(k) / (1.0 - self.cdf((k - 1) as f64))
    }

    /// Likelihood of an observed sample; the sample is only read
    fn likelihood(&self, sample: &[i64]) -> f64 {
        sample.iter().map(|&k| self.pmf(k)).product()
    }

    /// Log-likelihood of an observed sample
    fn log_likelihood(&self, sample: &[i64]) -> f64 {
        sample.iter().map(|&k| self.log_pmf(k)).sum()
    }

    /// E[g(X)] as a series from the support minimum, stopping once the
    /// remaining tail mass drops below tolerance or the term cap is hit.
    fn expected_value<G>(&self, g: G) -> f64
    where
        G: Fn(i64) -> f64,
    {
        let mut total = 0.0;
        let mut k = self.min_value();
        for _ in 0..MAX_EXPECTATION_TERMS {
            total += g(k) * self.pmf(k);
            if k >= self.max_value() || self.survival(k as f64) < TAIL_TOLERANCE {
                break;
            }
            k += 1;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Fair four-sided die on {0, 1, 2, 3}.
    #[derive(Debug, Clone)]
    struct FourSidedDie;

    impl DiscreteDistribution for FourSidedDie {
        fn support(&self) -> Support {
            Support::Finite
        }
        fn min_value(&self) -> i64 {
            0
        }
        fn max_value(&self) -> i64 {
            3
        }
        fn pmf(&self, k: i64) -> f64 {
            if (0..=3).contains(&k) {
                0.25
            } else {
                0.0
            }
        }
        fn cdf(&self, x: f64) -> f64 {
            if x < 0.0 {
                0.0
            } else {
                (0.25 * (x.floor() + 1.0)).min(1.0)
            }
        }
        fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
            rng.gen_range(0..4)
        }
    }

    #[test]
    fn test_moments() {
        let d = FourSidedDie;
        assert_abs_diff_eq!(d.mean(), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(d.variance(), 1.25, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_walk() {
        let d = FourSidedDie;
        assert_eq!(d.quantile(0.1), 0.0);
        assert_eq!(d.quantile(0.26), 1.0);
        assert_eq!(d.quantile(0.5), 1.0);
        assert_eq!(d.quantile(0.76), 3.0);
        assert_eq!(d.quantile(0.0), 0.0);
        assert_eq!(d.quantile(1.0), 3.0);
        assert!(d.quantile(1.5).is_nan());
    }

    #[test]
    fn test_hazard_boundaries() {
        let d = FourSidedDie;
        assert_eq!(d.hazard(-1), 0.0);
        assert!(d.hazard(4).is_nan());
        // P(X = 2) / P(X >= 2) = 0.25 / 0.5
        assert_abs_diff_eq!(d.hazard(2), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_likelihood() {
        let d = FourSidedDie;
        assert_abs_diff_eq!(d.likelihood(&[0, 1, 2]), 0.25f64.powi(3), epsilon = 1e-15);
        assert_eq!(d.likelihood(&[5]), 0.0);
    }

    #[test]
    fn test_sample_within_support() {
        let d = FourSidedDie;
        let mut rng = SmallRng::seed_from_u64(3);
        let mut buf = [0i64; 64];
        d.sample(&mut rng, &mut buf);
        assert!(buf.iter().all(|&k| (0..=3).contains(&k)));
    }
}
