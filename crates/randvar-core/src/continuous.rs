//! The capability contract for continuous distributions
//!
//! A concrete distribution supplies its support classification, inclusive
//! bounds, density, CDF, and a variate generator; everything else (quantile
//! inversion, hazard, mode, expectations over arbitrary supports, batch
//! sampling, likelihoods) is derived here generically. Families with closed
//! forms override the defaults.
//!
//! Failure policy: routine out-of-domain queries and solver non-convergence
//! return NaN, never an error. All defaults are side-effect-free; they read
//! the distribution's current parameters and touch nothing shared.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::integrate::integral;
use crate::roots::{find_min, find_root_bracketed, find_root_newton};
use crate::support::Support;

/// Number of draws behind the order-statistic quantile guess
const QUANTILE_SAMPLE_SIZE: usize = 100;

/// Seed for the guess sample, fixed so quantiles are deterministic
const QUANTILE_GUESS_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Shift applied to a finite endpoint whose density is non-finite
const ENDPOINT_EPSILON: f64 = 1e-10;

/// Contract implemented by every continuous distribution.
pub trait ContinuousDistribution {
    /// Support classification, constant per concrete type
    fn support(&self) -> Support;

    /// Inclusive lower bound of the support (may be -inf)
    fn min_value(&self) -> f64;

    /// Inclusive upper bound of the support (may be +inf)
    fn max_value(&self) -> f64;

    /// Probability density at `x`; 0 outside the support
    fn density(&self, x: f64) -> f64;

    /// Cumulative distribution function at `x`
    fn cdf(&self, x: f64) -> f64;

    /// Draw a single variate
    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;

    /// Natural log of the density
    fn log_density(&self, x: f64) -> f64 {
        self.density(x).ln()
    }

    /// Survival function `1 - cdf(x)`
    fn survival(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// Fill the caller-owned buffer with independent variates.
    ///
    /// Slots carry no inter-dependency; the buffer is never resized.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) {
        for slot in out.iter_mut() {
            *slot = self.variate(rng);
        }
    }

    /// E[X], by numerical expectation unless overridden
    fn mean(&self) -> f64 {
        self.expected_value(|x| x)
    }

    /// Var(X), by numerical expectation unless overridden
    fn variance(&self) -> f64 {
        let m = self.mean();
        if !m.is_finite() {
            return f64::NAN;
        }
        self.expected_value(|x| {
            let d = x - m;
            d * d
        })
    }

    /// Median, `quantile(0.5)` unless overridden
    fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    /// Mode, found by minimizing the negative density from the mean
    /// (median fallback when the mean is non-finite).
    fn mode(&self) -> f64 {
        let mut guess = self.mean();
        if !guess.is_finite() {
            guess = self.median();
        }
        match find_min(|x| -self.density(x), guess) {
            Some((x, _)) => x,
            None => f64::NAN,
        }
    }

    /// Quantile: the `x` with `cdf(x) = p`.
    ///
    /// NaN outside [0, 1]; the support bounds at `p = 0` and `p = 1`.
    /// Finite supports solve over the bracket [min, max]; unbounded
    /// supports refine an order-statistic guess with Newton steps on
    /// `(cdf(x) - p, density(x))`. NaN on non-convergence.
    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return self.min_value();
        }
        if p == 1.0 {
            return self.max_value();
        }
        if self.support() == Support::Finite {
            return find_root_bracketed(|x| self.cdf(x) - p, self.min_value(), self.max_value())
                .unwrap_or(f64::NAN);
        }
        let guess = order_statistic_guess(self, p, false);
        find_root_newton(|x| (self.cdf(x) - p, self.density(x)), guess).unwrap_or(f64::NAN)
    }

    /// Quantile of `1 - p`, solved in survival form.
    ///
    /// Algebraically `quantile(1.0 - p)`, but `cdf(x) - 1 + p` keeps
    /// precision for small `p` deep in the upper tail, and the guess sample
    /// is sorted descending.
    fn quantile_upper(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return self.max_value();
        }
        if p == 1.0 {
            return self.min_value();
        }
        if self.support() == Support::Finite {
            return find_root_bracketed(
                |x| self.cdf(x) - 1.0 + p,
                self.min_value(),
                self.max_value(),
            )
            .unwrap_or(f64::NAN);
        }
        let guess = order_statistic_guess(self, p, true);
        find_root_newton(|x| (self.cdf(x) - 1.0 + p, self.density(x)), guess).unwrap_or(f64::NAN)
    }

    /// Hazard rate `density / survival`.
    ///
    /// 0 below the support (0/1), NaN above it (0/0).
    fn hazard(&self, x: f64) -> f64 {
        if x < self.min_value() {
            return 0.0;
        }
        if x > self.max_value() {
            return f64::NAN;
        }
        self.density(x) / self.survival(x)
    }

    /// Likelihood of an observed sample; the sample is only read
    fn likelihood(&self, sample: &[f64]) -> f64 {
        sample.iter().map(|&x| self.density(x)).product()
    }

    /// Log-likelihood of an observed sample
    fn log_likelihood(&self, sample: &[f64]) -> f64 {
        sample.iter().map(|&x| self.log_density(x)).sum()
    }

    /// E[g(X)] over the true support, by adaptive quadrature.
    ///
    /// The support classification picks the variable substitution; each
    /// substitution maps its singular endpoint to an integrand value of
    /// exactly zero, so the density is never evaluated beyond the support.
    fn expected_value<G>(&self, g: G) -> f64
    where
        G: Fn(f64) -> f64,
    {
        match self.support() {
            Support::Finite => {
                let lo = nudged_lower(self, self.min_value());
                let hi = nudged_upper(self, self.max_value());
                integral(|x| g(x) * self.density(x), lo, hi)
            }
            Support::RightSemiInfinite => {
                // x = lo + t / (1 - t), dx = dt / (1 - t)^2, t in [0, 1)
                let lo = nudged_lower(self, self.min_value());
                integral(
                    |t| {
                        if t >= 1.0 {
                            return 0.0;
                        }
                        let denom = 1.0 - t;
                        let x = lo + t / denom;
                        g(x) * self.density(x) / (denom * denom)
                    },
                    0.0,
                    1.0,
                )
            }
            Support::LeftSemiInfinite => {
                // x = hi - (1 - t) / t, dx = dt / t^2, t in (0, 1]
                let hi = nudged_upper(self, self.max_value());
                integral(
                    |t| {
                        if t <= 0.0 {
                            return 0.0;
                        }
                        let x = hi - (1.0 - t) / t;
                        g(x) * self.density(x) / (t * t)
                    },
                    0.0,
                    1.0,
                )
            }
            Support::Infinite => {
                // x = t / (1 - t^2), dx = (1 + t^2) / (1 - t^2)^2 dt, t in (-1, 1)
                integral(
                    |t| {
                        if t.abs() >= 1.0 {
                            return 0.0;
                        }
                        let t2 = t * t;
                        let denom = 1.0 - t2;
                        let x = t / denom;
                        g(x) * self.density(x) * (1.0 + t2) / (denom * denom)
                    },
                    -1.0,
                    1.0,
                )
            }
        }
    }
}

/// Initial quantile guess: the `floor(p * n)`-th order statistic of a
/// 100-draw sample from a fixed-seed generator.
fn order_statistic_guess<D>(d: &D, p: f64, descending: bool) -> f64
where
    D: ContinuousDistribution + ?Sized,
{
    let mut rng = SmallRng::seed_from_u64(QUANTILE_GUESS_SEED);
    let mut draws = vec![0.0; QUANTILE_SAMPLE_SIZE];
    d.sample(&mut rng, &mut draws);
    if descending {
        draws.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    } else {
        draws.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    }
    let idx = ((p * QUANTILE_SAMPLE_SIZE as f64) as usize).min(QUANTILE_SAMPLE_SIZE - 1);
    draws[idx]
}

/// Nudge a finite lower endpoint inward when the density diverges there
fn nudged_lower<D>(d: &D, value: f64) -> f64
where
    D: ContinuousDistribution + ?Sized,
{
    if d.density(value).is_finite() {
        value
    } else if value.abs() < 1.0 {
        value + ENDPOINT_EPSILON
    } else {
        value + 1e-4 * value.abs()
    }
}

/// Nudge a finite upper endpoint inward when the density diverges there
fn nudged_upper<D>(d: &D, value: f64) -> f64
where
    D: ContinuousDistribution + ?Sized,
{
    if d.density(value).is_finite() {
        value
    } else if value.abs() < 1.0 {
        value - ENDPOINT_EPSILON
    } else {
        value - 1e-4 * value.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Triangular density on [0, 2]: f(x) = x/2 on [0, 2]. Closed forms are
    /// simple enough to validate every default against by hand.
    #[derive(Debug, Clone)]
    struct RampDistribution;

    impl ContinuousDistribution for RampDistribution {
        fn support(&self) -> Support {
            Support::Finite
        }
        fn min_value(&self) -> f64 {
            0.0
        }
        fn max_value(&self) -> f64 {
            2.0
        }
        fn density(&self, x: f64) -> f64 {
            if (0.0..=2.0).contains(&x) {
                0.5 * x
            } else {
                0.0
            }
        }
        fn cdf(&self, x: f64) -> f64 {
            if x <= 0.0 {
                0.0
            } else if x >= 2.0 {
                1.0
            } else {
                0.25 * x * x
            }
        }
        fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
            // Inversion: F^{-1}(u) = 2 sqrt(u)
            2.0 * rng.gen::<f64>().sqrt()
        }
    }

    #[test]
    fn test_quantile_bracketed() {
        let d = RampDistribution;
        // F(x) = x^2/4, so F^{-1}(p) = 2 sqrt(p)
        assert_abs_diff_eq!(d.quantile(0.25), 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(d.quantile(0.81), 1.8, epsilon = 1e-8);
        assert_eq!(d.quantile(0.0), 0.0);
        assert_eq!(d.quantile(1.0), 2.0);
        assert!(d.quantile(-0.1).is_nan());
        assert!(d.quantile(1.1).is_nan());
    }

    #[test]
    fn test_quantile_upper_mirrors_quantile() {
        let d = RampDistribution;
        assert_abs_diff_eq!(d.quantile_upper(0.75), d.quantile(0.25), epsilon = 1e-8);
        assert_eq!(d.quantile_upper(0.0), 2.0);
        assert_eq!(d.quantile_upper(1.0), 0.0);
    }

    #[test]
    fn test_expected_value_finite_support() {
        let d = RampDistribution;
        // E[X] = int_0^2 x * x/2 dx = 4/3
        assert_abs_diff_eq!(d.mean(), 4.0 / 3.0, epsilon = 1e-9);
        // Var = 2 - 16/9 = 2/9
        assert_abs_diff_eq!(d.variance(), 2.0 / 9.0, epsilon = 1e-8);
    }

    #[test]
    fn test_mode_via_minimizer() {
        let d = RampDistribution;
        // Density increases on the whole support; the minimizer must end at
        // a point no worse than its start and near the right edge.
        let mode = d.mode();
        assert!(d.density(mode) >= d.density(d.mean()) - 1e-12);
    }

    #[test]
    fn test_hazard_boundaries() {
        let d = RampDistribution;
        assert_eq!(d.hazard(-1.0), 0.0);
        assert!(d.hazard(2.5).is_nan());
        // Interior: f / (1 - F)
        let x = 1.0;
        assert_abs_diff_eq!(d.hazard(x), 0.5 / 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_likelihood() {
        let d = RampDistribution;
        let sample = [1.0, 2.0];
        assert_abs_diff_eq!(d.likelihood(&sample), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(
            d.log_likelihood(&sample),
            0.5f64.ln() + 1.0f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_sample_fills_buffer_in_place() {
        let d = RampDistribution;
        let mut rng = SmallRng::seed_from_u64(1);
        let mut buf = [0.0; 32];
        d.sample(&mut rng, &mut buf);
        assert!(buf.iter().all(|&x| (0.0..=2.0).contains(&x)));
    }

    #[test]
    fn test_quantile_deterministic() {
        let d = RampDistribution;
        assert_eq!(d.quantile(0.3), d.quantile(0.3));
    }
}
