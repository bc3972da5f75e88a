//! Beta distribution

use rand::Rng;
use randvar_core::{ContinuousDistribution, Support, MIN_POSITIVE};
use statrs::function::beta::{beta_reg, ln_beta};

use crate::gamma::Gamma;

/// Iteration cap for the equal-shapes rejection loop; one billion should
/// be enough
const MAX_REJECTION_ITERATIONS: usize = 1_000_000_000;

/// Variate-generation algorithm, selected by the shape pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetaRegime {
    /// α = β: symmetric rejection against the arcsine-like envelope
    EqualShapes,
    /// α ≠ β: ratio of two Gamma draws
    GammaRatio,
}

/// Beta distribution, X ~ Beta(α, β)
///
/// f(x | α, β) = x^(α-1) (1-x)^(β-1) / B(α, β)
#[derive(Debug, Clone, PartialEq)]
pub struct Beta {
    alpha: f64,
    beta: f64,
    /// log(B(α, β))
    ln_beta_fn: f64,
    x: Gamma,
    y: Gamma,
    regime: BetaRegime,
}

impl Beta {
    /// Construct Beta(α, β). Non-positive shapes are clamped.
    pub fn new(shape1: f64, shape2: f64) -> Self {
        let mut b = Beta {
            alpha: 1.0,
            beta: 1.0,
            ln_beta_fn: 0.0,
            x: Gamma::new(1.0, 1.0),
            y: Gamma::new(1.0, 1.0),
            regime: BetaRegime::EqualShapes,
        };
        b.set_parameters(shape1, shape2);
        b
    }

    /// Set both shapes, re-deriving the normalization constant, the two
    /// Gamma generators, and the sampling regime before returning.
    pub fn set_parameters(&mut self, shape1: f64, shape2: f64) {
        if shape1 <= 0.0 || shape2 <= 0.0 {
            log::debug!("beta shapes ({shape1}, {shape2}) clamped to stay positive");
        }
        self.alpha = shape1.max(MIN_POSITIVE);
        self.beta = shape2.max(MIN_POSITIVE);
        self.ln_beta_fn = ln_beta(self.alpha, self.beta);
        self.x.set_parameters(self.alpha, 1.0);
        self.y.set_parameters(self.beta, 1.0);
        self.regime = if self.alpha == self.beta {
            BetaRegime::EqualShapes
        } else {
            BetaRegime::GammaRatio
        };
    }

    pub fn set_alpha(&mut self, shape1: f64) {
        self.set_parameters(shape1, self.beta);
    }

    pub fn set_beta(&mut self, shape2: f64) {
        self.set_parameters(self.alpha, shape2);
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Currently selected sampling regime
    pub fn regime(&self) -> BetaRegime {
        self.regime
    }

    /// Rejection sampler for α = β.
    ///
    /// Capped; on exhaustion the last candidate is returned so the caller
    /// still receives a point inside the support.
    fn variate_equal_shapes<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut u1 = 0.5;
        for _ in 0..MAX_REJECTION_ITERATIONS {
            u1 = rng.gen::<f64>();
            let u2 = rng.gen::<f64>();
            if u2 <= (4.0 * u1 * (1.0 - u1)).powf(self.alpha - 1.0) {
                return u1;
            }
        }
        u1
    }

    fn variate_gamma_ratio<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let x = self.x.variate(rng);
        let y = self.y.variate(rng);
        x / (x + y)
    }
}

impl ContinuousDistribution for Beta {
    fn support(&self) -> Support {
        Support::Finite
    }

    fn min_value(&self) -> f64 {
        0.0
    }

    fn max_value(&self) -> f64 {
        1.0
    }

    fn density(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        if x == 0.0 {
            return match self.alpha.partial_cmp(&1.0) {
                Some(std::cmp::Ordering::Less) => f64::INFINITY,
                Some(std::cmp::Ordering::Equal) => (-self.ln_beta_fn).exp(),
                _ => 0.0,
            };
        }
        if x == 1.0 {
            return match self.beta.partial_cmp(&1.0) {
                Some(std::cmp::Ordering::Less) => f64::INFINITY,
                Some(std::cmp::Ordering::Equal) => (-self.ln_beta_fn).exp(),
                _ => 0.0,
            };
        }
        self.log_density(x).exp()
    }

    fn log_density(&self, x: f64) -> f64 {
        if !(0.0..1.0).contains(&x) && x != 1.0 {
            return f64::NEG_INFINITY;
        }
        (self.alpha - 1.0) * x.ln() + (self.beta - 1.0) * (1.0 - x).ln() - self.ln_beta_fn
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else if x >= 1.0 {
            1.0
        } else {
            beta_reg(self.alpha, self.beta, x)
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.regime {
            BetaRegime::EqualShapes => self.variate_equal_shapes(rng),
            BetaRegime::GammaRatio => self.variate_gamma_ratio(rng),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) {
        match self.regime {
            BetaRegime::EqualShapes => {
                for slot in out.iter_mut() {
                    *slot = self.variate_equal_shapes(rng);
                }
            }
            BetaRegime::GammaRatio => {
                for slot in out.iter_mut() {
                    *slot = self.variate_gamma_ratio(rng);
                }
            }
        }
    }

    fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    fn variance(&self) -> f64 {
        let s = self.alpha + self.beta;
        self.alpha * self.beta / (s * s * (s + 1.0))
    }

    fn mode(&self) -> f64 {
        if self.alpha > 1.0 && self.beta > 1.0 {
            (self.alpha - 1.0) / (self.alpha + self.beta - 2.0)
        } else if self.alpha < 1.0 && self.beta >= 1.0 {
            0.0
        } else if self.beta < 1.0 && self.alpha >= 1.0 {
            1.0
        } else {
            // Bimodal or flat; fall back to the numerical default
            let m = self.mean();
            match randvar_core::roots::find_min(|x| -self.density(x), m) {
                Some((x, _)) => x,
                None => f64::NAN,
            }
        }
    }
}
