//! Continuous uniform distribution on [a, b]

use rand::Rng;
use randvar_core::{ContinuousDistribution, Support};

/// Uniform distribution, X ~ U(a, b)
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    a: f64,
    b: f64,
    width_inv: f64,
}

impl Uniform {
    /// Construct U(a, b). A degenerate interval is widened to unit length
    /// above `a`.
    pub fn new(a: f64, b: f64) -> Self {
        let mut u = Uniform {
            a: 0.0,
            b: 1.0,
            width_inv: 1.0,
        };
        u.set_bounds(a, b);
        u
    }

    /// Standard uniform draw on [0, 1)
    pub fn standard_variate<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        rng.gen::<f64>()
    }

    pub fn set_bounds(&mut self, a: f64, b: f64) {
        let b = if b > a {
            b
        } else {
            log::debug!("uniform upper bound {b} clamped above lower bound {a}");
            a + 1.0
        };
        self.a = a;
        self.b = b;
        self.width_inv = 1.0 / (b - a);
    }

    pub fn lower(&self) -> f64 {
        self.a
    }

    pub fn upper(&self) -> f64 {
        self.b
    }

    pub fn entropy(&self) -> f64 {
        (self.b - self.a).ln()
    }
}

impl ContinuousDistribution for Uniform {
    fn support(&self) -> Support {
        Support::Finite
    }

    fn min_value(&self) -> f64 {
        self.a
    }

    fn max_value(&self) -> f64 {
        self.b
    }

    fn density(&self, x: f64) -> f64 {
        if x < self.a || x > self.b {
            0.0
        } else {
            self.width_inv
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= self.a {
            0.0
        } else if x >= self.b {
            1.0
        } else {
            (x - self.a) * self.width_inv
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.a + (self.b - self.a) * rng.gen::<f64>()
    }

    fn mean(&self) -> f64 {
        0.5 * (self.a + self.b)
    }

    fn variance(&self) -> f64 {
        let w = self.b - self.a;
        w * w / 12.0
    }

    fn median(&self) -> f64 {
        0.5 * (self.a + self.b)
    }

    /// The density is flat; the midpoint is reported by convention.
    fn mode(&self) -> f64 {
        0.5 * (self.a + self.b)
    }

    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.a + p * (self.b - self.a)
    }

    fn quantile_upper(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.b - p * (self.b - self.a)
    }
}
