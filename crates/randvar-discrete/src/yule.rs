//! Yule-Simon distribution

use rand::Rng;
use randvar_core::{DiscreteDistribution, Support, MIN_POSITIVE};
use statrs::function::gamma::ln_gamma;

use randvar_continuous::pareto::Pareto;

use crate::geometric::Geometric;

/// Yule-Simon distribution, X ~ Yule(ρ)
///
/// P(X = k) = ρ B(k, ρ + 1) for k = 1, 2, ...
///
/// Heavy-tailed: the mean is infinite for ρ <= 1 and the variance for
/// ρ <= 2.
#[derive(Debug, Clone, PartialEq)]
pub struct Yule {
    rho: f64,
    /// log(Γ(ρ + 1))
    ln_gamma_1p_rho: f64,
}

impl Yule {
    /// Construct Yule(ρ). A non-positive shape is clamped.
    pub fn new(shape: f64) -> Self {
        let mut y = Yule {
            rho: 1.0,
            ln_gamma_1p_rho: 0.0,
        };
        y.set_shape(shape);
        y
    }

    pub fn set_shape(&mut self, shape: f64) {
        if shape <= 0.0 {
            log::debug!("yule shape {shape} clamped to {MIN_POSITIVE}");
        }
        self.rho = shape.max(MIN_POSITIVE);
        self.ln_gamma_1p_rho = ln_gamma(self.rho + 1.0);
    }

    pub fn shape(&self) -> f64 {
        self.rho
    }

    pub fn skewness(&self) -> f64 {
        if self.rho <= 3.0 {
            return f64::INFINITY;
        }
        let mut skewness = self.rho + 1.0;
        skewness *= skewness;
        skewness *= (self.rho - 2.0).sqrt();
        skewness / (self.rho * (self.rho - 3.0))
    }

    pub fn excess_kurtosis(&self) -> f64 {
        if self.rho <= 4.0 {
            return f64::INFINITY;
        }
        let mut numerator = 11.0 * self.rho * self.rho - 49.0;
        numerator *= self.rho;
        numerator -= 22.0;
        let denominator = self.rho * (self.rho - 4.0) * (self.rho - 3.0);
        self.rho + 3.0 + numerator / denominator
    }
}

impl DiscreteDistribution for Yule {
    fn support(&self) -> Support {
        Support::RightSemiInfinite
    }

    fn min_value(&self) -> i64 {
        1
    }

    fn max_value(&self) -> i64 {
        i64::MAX
    }

    fn pmf(&self, k: i64) -> f64 {
        if k < 1 {
            0.0
        } else {
            self.log_pmf(k).exp()
        }
    }

    fn log_pmf(&self, k: i64) -> f64 {
        if k < 1 {
            return f64::NEG_INFINITY;
        }
        let kf = k as f64;
        self.rho.ln() + self.ln_gamma_1p_rho + ln_gamma(kf) - ln_gamma(kf + self.rho + 1.0)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < 1.0 {
            return 0.0;
        }
        let k = x.floor();
        // S(k) = k B(k, ρ + 1), with k Γ(k) folded into Γ(k + 1)
        1.0 - (self.ln_gamma_1p_rho + ln_gamma(k + 1.0) - ln_gamma(k + self.rho + 1.0)).exp()
    }

    /// Composition: a geometric draw whose success probability is the
    /// reciprocal of a Pareto(ρ, 1) draw, shifted onto {1, 2, ...}
    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let prob = 1.0 / Pareto::standard_variate(rng, self.rho);
        Geometric::variate_with_probability(rng, prob) + 1
    }

    fn mean(&self) -> f64 {
        if self.rho <= 1.0 {
            f64::INFINITY
        } else {
            self.rho / (self.rho - 1.0)
        }
    }

    fn variance(&self) -> f64 {
        if self.rho <= 2.0 {
            return f64::INFINITY;
        }
        let aux = self.rho / (self.rho - 1.0);
        aux * aux / (self.rho - 2.0)
    }

    fn mode(&self) -> f64 {
        1.0
    }
}
