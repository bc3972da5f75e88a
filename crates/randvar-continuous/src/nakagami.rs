//! Nakagami distribution
//!
//! Related distributions:
//! X² ~ Gamma(m, m/Ω);
//! Nakagami(n/2, nσ²) is Chi(n, σ).

use rand::Rng;
use randvar_core::{ContinuousDistribution, Support};
use statrs::function::gamma::ln_gamma;

use crate::gamma::Gamma;

/// Nakagami distribution, X ~ Nakagami(m, Ω)
#[derive(Debug, Clone, PartialEq)]
pub struct Nakagami {
    m: f64,
    omega: f64,
    /// m / Ω, the rate of the squared draw
    sigma: f64,
    y: Gamma,
}

impl Nakagami {
    /// Construct Nakagami(m, Ω). The shape is clamped to m >= 1/2 and a
    /// non-positive spread falls back to 1.
    pub fn new(shape: f64, spread: f64) -> Self {
        let mut n = Nakagami {
            m: 0.5,
            omega: 1.0,
            sigma: 0.5,
            y: Gamma::new(0.5, 0.5),
        };
        n.set_parameters(shape, spread);
        n
    }

    /// Set both parameters, re-deriving the backing Gamma before returning.
    pub fn set_parameters(&mut self, shape: f64, spread: f64) {
        if shape < 0.5 {
            log::debug!("nakagami shape {shape} clamped to 0.5");
        }
        self.m = shape.max(0.5);
        self.omega = if spread > 0.0 {
            spread
        } else {
            log::debug!("nakagami spread {spread} replaced with 1");
            1.0
        };
        self.sigma = self.m / self.omega;
        self.y.set_parameters(self.m, self.sigma);
    }

    pub fn shape(&self) -> f64 {
        self.m
    }

    pub fn spread(&self) -> f64 {
        self.omega
    }
}

impl ContinuousDistribution for Nakagami {
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
            2.0 * x * self.y.density(x * x)
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            self.y.cdf(x * x)
        }
    }

    /// Square root of the backing Gamma draw
    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.y.variate(rng).sqrt()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) {
        self.y.sample(rng, out);
        for slot in out.iter_mut() {
            *slot = slot.sqrt();
        }
    }

    fn mean(&self) -> f64 {
        let y = ln_gamma(self.m + 0.5) - self.y.ln_gamma_shape() - 0.5 * self.sigma.ln();
        y.exp()
    }

    fn variance(&self) -> f64 {
        let y = ln_gamma(self.m + 0.5) - self.y.ln_gamma_shape();
        self.omega * (1.0 - (y + y).exp() / self.m)
    }

    fn mode(&self) -> f64 {
        let half_spread_over_shape = 0.5 * self.omega / self.m;
        (self.omega - half_spread_over_shape).sqrt()
    }
}
