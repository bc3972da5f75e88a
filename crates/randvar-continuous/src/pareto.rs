//! Pareto distribution

use rand::Rng;
use randvar_core::{ContinuousDistribution, Error, Result, Support, MIN_POSITIVE};

use crate::exponential::Exponential;

/// Pareto distribution, X ~ Pareto(α, xₘ)
///
/// f(x | α, xₘ) = α xₘ^α / x^(α+1) for x >= xₘ
#[derive(Debug, Clone, PartialEq)]
pub struct Pareto {
    shape: f64,
    scale: f64,
    log_scale: f64,
}

impl Pareto {
    /// Construct Pareto(α, xₘ). Non-positive parameters are clamped.
    pub fn new(shape: f64, scale: f64) -> Self {
        let mut p = Pareto {
            shape: 1.0,
            scale: 1.0,
            log_scale: 0.0,
        };
        p.set_parameters(shape, scale);
        p
    }

    pub fn set_parameters(&mut self, shape: f64, scale: f64) {
        if shape <= 0.0 || scale <= 0.0 {
            log::debug!("pareto parameters ({shape}, {scale}) clamped to stay positive");
        }
        self.shape = shape.max(MIN_POSITIVE);
        self.scale = scale.max(MIN_POSITIVE);
        self.log_scale = self.scale.ln();
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pareto(α, 1) draw through the exponential representation
    pub fn standard_variate<R: Rng + ?Sized>(rng: &mut R, shape: f64) -> f64 {
        (Exponential::standard_variate(rng) / shape).exp()
    }

    /// Joint maximum-likelihood fit: xₘ is the sample minimum, α the
    /// reciprocal mean log-excess over it
    pub fn fit_mle(&mut self, sample: &[f64]) -> Result<()> {
        if sample.is_empty() {
            return Err(Error::empty_sample());
        }
        if sample.iter().any(|&x| x <= 0.0) {
            return Err(Error::out_of_support("non-positive observation"));
        }
        let min = sample.iter().cloned().fold(f64::INFINITY, f64::min);
        let log_excess: f64 = sample.iter().map(|&x| x.ln() - min.ln()).sum();
        if log_excess <= 0.0 {
            return Err(Error::no_solution("shape estimate on a constant sample"));
        }
        let shape = sample.len() as f64 / log_excess;
        self.set_parameters(shape, min);
        Ok(())
    }
}

impl ContinuousDistribution for Pareto {
    fn support(&self) -> Support {
        Support::RightSemiInfinite
    }

    fn min_value(&self) -> f64 {
        self.scale
    }

    fn max_value(&self) -> f64 {
        f64::INFINITY
    }

    fn density(&self, x: f64) -> f64 {
        if x < self.scale {
            0.0
        } else {
            self.log_density(x).exp()
        }
    }

    fn log_density(&self, x: f64) -> f64 {
        if x < self.scale {
            return f64::NEG_INFINITY;
        }
        self.shape.ln() + self.shape * self.log_scale - (self.shape + 1.0) * x.ln()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= self.scale {
            0.0
        } else {
            1.0 - (self.scale / x).powf(self.shape)
        }
    }

    fn survival(&self, x: f64) -> f64 {
        if x <= self.scale {
            1.0
        } else {
            (self.scale / x).powf(self.shape)
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.scale * Self::standard_variate(rng, self.shape)
    }

    fn mean(&self) -> f64 {
        if self.shape > 1.0 {
            self.shape * self.scale / (self.shape - 1.0)
        } else {
            f64::INFINITY
        }
    }

    fn variance(&self) -> f64 {
        if self.shape <= 2.0 {
            return f64::INFINITY;
        }
        let am1 = self.shape - 1.0;
        self.scale * self.scale * self.shape / (am1 * am1 * (self.shape - 2.0))
    }

    fn median(&self) -> f64 {
        self.scale * 2.0f64.powf(1.0 / self.shape)
    }

    fn mode(&self) -> f64 {
        self.scale
    }

    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.scale * (1.0 - p).powf(-1.0 / self.shape)
    }

    fn quantile_upper(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.scale * p.powf(-1.0 / self.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_closed_forms() {
        let p = Pareto::new(3.0, 2.0);
        assert_eq!(p.density(1.0), 0.0);
        assert_abs_diff_eq!(p.density(2.0), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.cdf(4.0), 1.0 - 0.125, epsilon = 1e-12);
        assert_abs_diff_eq!(p.mean(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.quantile(p.cdf(3.0)), 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_heavy_tail_moments() {
        assert!(Pareto::new(0.5, 1.0).mean().is_infinite());
        assert!(Pareto::new(1.5, 1.0).variance().is_infinite());
    }

    #[test]
    fn test_fit_mle_round_trip() {
        let p = Pareto::new(2.5, 3.0);
        let mut rng = SmallRng::seed_from_u64(71);
        let mut sample = vec![0.0; 10_000];
        p.sample(&mut rng, &mut sample);

        let mut fitted = Pareto::new(1.0, 1.0);
        fitted.fit_mle(&sample).unwrap();
        assert_abs_diff_eq!(fitted.shape(), 2.5, epsilon = 0.125);
        assert_abs_diff_eq!(fitted.scale(), 3.0, epsilon = 0.01);
    }
}
