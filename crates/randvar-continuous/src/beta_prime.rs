//! Beta-prime distribution
//!
//! Related distributions:
//! X / (X + 1) ~ Beta(α, β);
//! X = Y / Z for Y ~ Gamma(α), Z ~ Gamma(β);
//! X ~ F(2α, 2β) up to scale.

use rand::Rng;
use randvar_core::{ContinuousDistribution, Support, MIN_POSITIVE};
use statrs::function::beta::{beta_reg, ln_beta};

use crate::gamma::Gamma;

/// Beta-prime distribution, X ~ Beta'(α, β)
///
/// f(x | α, β) = x^(α-1) (1 + x)^(-α-β) / B(α, β)
#[derive(Debug, Clone, PartialEq)]
pub struct BetaPrime {
    alpha: f64,
    beta: f64,
    /// log(B(α, β))
    ln_beta_fn: f64,
    x: Gamma,
    y: Gamma,
}

impl BetaPrime {
    /// Construct Beta'(α, β). Non-positive shapes are clamped.
    pub fn new(shape1: f64, shape2: f64) -> Self {
        let mut b = BetaPrime {
            alpha: 1.0,
            beta: 1.0,
            ln_beta_fn: 0.0,
            x: Gamma::new(1.0, 1.0),
            y: Gamma::new(1.0, 1.0),
        };
        b.set_parameters(shape1, shape2);
        b
    }

    pub fn set_parameters(&mut self, shape1: f64, shape2: f64) {
        if shape1 <= 0.0 || shape2 <= 0.0 {
            log::debug!("beta-prime shapes ({shape1}, {shape2}) clamped to stay positive");
        }
        self.alpha = shape1.max(MIN_POSITIVE);
        self.beta = shape2.max(MIN_POSITIVE);
        self.ln_beta_fn = ln_beta(self.alpha, self.beta);
        self.x.set_parameters(self.alpha, 1.0);
        self.y.set_parameters(self.beta, 1.0);
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl ContinuousDistribution for BetaPrime {
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
            return 0.0;
        }
        if x == 0.0 {
            return match self.alpha.partial_cmp(&1.0) {
                Some(std::cmp::Ordering::Less) => f64::INFINITY,
                Some(std::cmp::Ordering::Equal) => (-self.ln_beta_fn).exp(),
                _ => 0.0,
            };
        }
        self.log_density(x).exp()
    }

    fn log_density(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
        (self.alpha - 1.0) * x.ln() - (self.alpha + self.beta) * x.ln_1p() - self.ln_beta_fn
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            beta_reg(self.alpha, self.beta, x / (1.0 + x))
        }
    }

    /// Ratio of two Gamma draws
    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.x.variate(rng) / self.y.variate(rng)
    }

    fn mean(&self) -> f64 {
        if self.beta > 1.0 {
            self.alpha / (self.beta - 1.0)
        } else {
            f64::INFINITY
        }
    }

    fn variance(&self) -> f64 {
        if self.beta <= 2.0 {
            return f64::INFINITY;
        }
        let bm1 = self.beta - 1.0;
        self.alpha * (self.alpha + bm1) / (bm1 * bm1 * (self.beta - 2.0))
    }

    fn mode(&self) -> f64 {
        if self.alpha < 1.0 {
            0.0
        } else {
            (self.alpha - 1.0) / (self.beta + 1.0)
        }
    }
}
