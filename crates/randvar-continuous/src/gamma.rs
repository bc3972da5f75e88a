//! Gamma distribution
//!
//! f(x | α, β) = β^α / Γ(α) * x^(α-1) * exp(-βx)
//!
//! Related distributions:
//! σX ~ Gamma(α, β/σ);
//! Gamma(1, β) is Exp(β);
//! Gamma(n/2, 1/2) is ChiSquared(n);
//! Gamma(k, β) for integer k is Erlang(k, β).
//!
//! Sampling dispatches over five shape regimes (see [`GammaRegime`]); the
//! selection is a pure function of α, re-derived whenever a parameter
//! changes.

use rand::Rng;
use randvar_core::roots::{find_root_bracketed, find_root_newton};
use randvar_core::{stats, ContinuousDistribution, Error, Result, Support, MIN_POSITIVE};
use statrs::function::gamma::{digamma, gamma_lr, gamma_ur, ln_gamma};

use crate::exponential::Exponential;
use crate::normal::Normal;

/// Iteration cap shared by the rejection samplers
const MAX_REJECTION_ITERATIONS: usize = 1_000_000_000;

/// Variate-generation algorithm, selected by the shape α.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GammaRegime {
    /// α ∈ {1, 2, 3}: sum of standard exponentials (Erlang decomposition)
    IntegerShape,
    /// α = 1.5: E + N²/2
    OneAndAHalfShape,
    /// α < 0.34: Best's RGS rejection
    SmallShape,
    /// 1 < α < 1.2: Fishman's double-exponential rejection
    Fishman,
    /// Everything else: Marsaglia-Tsang, with the U^(1/α) boost below α = 1
    MarsagliaTsang,
}

impl GammaRegime {
    /// Regime for a given shape; thresholds per the algorithm notes above
    pub fn for_shape(shape: f64) -> Self {
        if shape == 1.0 || shape == 2.0 || shape == 3.0 {
            GammaRegime::IntegerShape
        } else if shape == 1.5 {
            GammaRegime::OneAndAHalfShape
        } else if shape < 0.34 {
            GammaRegime::SmallShape
        } else if shape > 1.0 && shape < 1.2 {
            GammaRegime::Fishman
        } else {
            GammaRegime::MarsagliaTsang
        }
    }
}

/// Gamma distribution, X ~ Gamma(α, β)
#[derive(Debug, Clone, PartialEq)]
pub struct Gamma {
    alpha: f64,
    beta: f64,
    /// log(Γ(α))
    ln_gamma_shape: f64,
    /// α log(β) - log(Γ(α))
    pdf_coef: f64,
    log_alpha: f64,
    log_beta: f64,
    /// Best's RGS constants, valid in the small-shape regime
    t: f64,
    b: f64,
    regime: GammaRegime,
}

impl Gamma {
    /// Construct Gamma(α, β). Non-positive parameters are clamped.
    pub fn new(shape: f64, rate: f64) -> Self {
        let mut g = Gamma {
            alpha: 1.0,
            beta: 1.0,
            ln_gamma_shape: 0.0,
            pdf_coef: 0.0,
            log_alpha: 0.0,
            log_beta: 0.0,
            t: 0.0,
            b: 0.0,
            regime: GammaRegime::IntegerShape,
        };
        g.set_parameters(shape, rate);
        g
    }

    /// ChiSquared(n) as Gamma(n/2, 1/2)
    pub fn chi_squared(degrees: u64) -> Self {
        Self::new(0.5 * degrees.max(1) as f64, 0.5)
    }

    /// Erlang(k, β) as Gamma(k, β) with integer shape
    pub fn erlang(shape: u64, rate: f64) -> Self {
        Self::new(shape.max(1) as f64, rate)
    }

    /// Set both parameters, re-deriving every cached coefficient and the
    /// sampling regime before returning.
    pub fn set_parameters(&mut self, shape: f64, rate: f64) {
        if shape <= 0.0 {
            log::debug!("gamma shape {shape} clamped to {MIN_POSITIVE}");
        }
        if rate <= 0.0 {
            log::debug!("gamma rate {rate} clamped to {MIN_POSITIVE}");
        }
        self.alpha = shape.max(MIN_POSITIVE);
        self.beta = rate.max(MIN_POSITIVE);
        self.ln_gamma_shape = ln_gamma(self.alpha);
        self.log_alpha = self.alpha.ln();
        self.log_beta = self.beta.ln();
        self.pdf_coef = self.alpha * self.log_beta - self.ln_gamma_shape;
        // Best's constants only matter for α < 0.34, where 1 - α stays positive
        self.t = 0.07 + 0.75 * (1.0 - self.alpha).abs().sqrt();
        self.b = 1.0 + (-self.t).exp() * self.alpha / self.t;
        self.regime = GammaRegime::for_shape(self.alpha);
    }

    pub fn set_shape(&mut self, shape: f64) {
        self.set_parameters(shape, self.beta);
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.set_parameters(self.alpha, rate);
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.set_rate(1.0 / scale.max(MIN_POSITIVE));
    }

    pub fn shape(&self) -> f64 {
        self.alpha
    }

    pub fn rate(&self) -> f64 {
        self.beta
    }

    pub fn scale(&self) -> f64 {
        1.0 / self.beta
    }

    pub fn ln_gamma_shape(&self) -> f64 {
        self.ln_gamma_shape
    }

    /// Currently selected sampling regime
    pub fn regime(&self) -> GammaRegime {
        self.regime
    }

    /// E[ln X] = ψ(α) - ln(β)
    pub fn geometric_mean(&self) -> f64 {
        digamma(self.alpha) - self.log_beta
    }

    pub fn skewness(&self) -> f64 {
        2.0 / self.alpha.sqrt()
    }

    pub fn excess_kurtosis(&self) -> f64 {
        6.0 / self.alpha
    }

    /// Standard gamma draw (unit rate) for an arbitrary shape
    pub fn standard_variate<R: Rng + ?Sized>(rng: &mut R, shape: f64) -> f64 {
        let shape = shape.max(MIN_POSITIVE);
        match GammaRegime::for_shape(shape) {
            GammaRegime::IntegerShape => variate_exponential_sum(rng, shape as usize),
            GammaRegime::OneAndAHalfShape => variate_one_and_a_half(rng),
            GammaRegime::SmallShape => {
                let t = 0.07 + 0.75 * (1.0 - shape).sqrt();
                let b = 1.0 + (-t).exp() * shape / t;
                variate_best(rng, shape, t, b)
            }
            GammaRegime::Fishman => variate_fishman(rng, shape),
            GammaRegime::MarsagliaTsang => variate_marsaglia_tsang(rng, shape),
        }
    }

    /// Gamma(α, β) draw without constructing a distribution
    pub fn variate_with<R: Rng + ?Sized>(rng: &mut R, shape: f64, rate: f64) -> f64 {
        Self::standard_variate(rng, shape) / rate
    }

    fn quantile_initial_guess(&self, p: f64) -> f64 {
        if self.alpha > 1.0 {
            // Wilson-Hilferty transform of the normal quantile
            let z = Normal::standard_quantile(p);
            let g = 1.0 - 1.0 / (9.0 * self.alpha) + z / (3.0 * self.alpha.sqrt());
            (self.alpha * g * g * g / self.beta).max(MIN_POSITIVE)
        } else {
            // Lower-tail series: F(x) ~ (βx)^α / Γ(α + 1),
            // with ln(Γ(α + 1)) = ln(Γ(α)) + ln(α) from the cache
            let log_guess = (p.ln() + self.ln_gamma_shape + self.log_alpha) / self.alpha;
            (log_guess.exp() / self.beta).max(MIN_POSITIVE)
        }
    }

    fn quantile_upper_initial_guess(&self, p: f64) -> f64 {
        if self.alpha > 1.0 {
            let z = -Normal::standard_quantile(p);
            let g = 1.0 - 1.0 / (9.0 * self.alpha) + z / (3.0 * self.alpha.sqrt());
            (self.alpha * g * g * g / self.beta).max(MIN_POSITIVE)
        } else {
            // Below shape 1 the CDF is concave, so Newton converges
            // monotonically from any point left of the root; reuse the
            // lower-tail series at 1 - p, which always starts below
            let log_guess = ((-p).ln_1p() + self.ln_gamma_shape + self.log_alpha) / self.alpha;
            (log_guess.exp() / self.beta).max(MIN_POSITIVE)
        }
    }

    fn check_sample(sample: &[f64]) -> Result<()> {
        if sample.is_empty() {
            return Err(Error::empty_sample());
        }
        if sample.iter().any(|&x| x <= 0.0) {
            return Err(Error::out_of_support("non-positive observation"));
        }
        Ok(())
    }

    /// Maximum-likelihood rate for a known shape: β = α / mean
    pub fn fit_rate_mle(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let mean = stats::sample_mean(sample);
        self.set_rate(self.alpha / mean);
        Ok(())
    }

    /// Uniformly minimum-variance unbiased rate for a known shape:
    /// β = (nα - 1) / (n mean); requires nα > 1
    pub fn fit_rate_umvu(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let n = sample.len() as f64;
        if n * self.alpha <= 1.0 {
            return Err(Error::no_solution("UMVU rate with n * shape <= 1"));
        }
        let mean = stats::sample_mean(sample);
        self.set_rate((n * self.alpha - 1.0) / (n * mean));
        Ok(())
    }

    /// Conjugate Bayesian update of the rate: a Gamma(a, b) prior over β
    /// yields the posterior Gamma(a + nα, b + Σx). The rate is set to the
    /// posterior mean and the posterior is returned.
    pub fn fit_rate_bayes(&mut self, sample: &[f64], prior: &Gamma) -> Result<Gamma> {
        Self::check_sample(sample)?;
        let n = sample.len() as f64;
        let total: f64 = sample.iter().sum();
        let posterior = Gamma::new(prior.shape() + n * self.alpha, prior.rate() + total);
        self.set_rate(posterior.mean());
        Ok(posterior)
    }

    /// Method-of-moments shape for a known rate: α = β mean
    pub fn fit_shape_mm(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        self.set_shape(self.beta * stats::sample_mean(sample));
        Ok(())
    }

    /// Method-of-moments fit of both parameters:
    /// α = mean² / var, β = mean / var
    pub fn fit_shape_and_rate_mm(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let mean = stats::sample_mean(sample);
        let var = stats::sample_variance(sample);
        if var <= 0.0 {
            return Err(Error::no_solution("moment fit on a constant sample"));
        }
        self.set_parameters(mean * mean / var, mean / var);
        Ok(())
    }

    /// Maximum-likelihood shape for a known rate, solving
    /// ψ(α) = mean(ln x) + ln β with the bracketed root finder
    pub fn fit_shape_mle(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let target = stats::log_mean(sample) + self.log_beta;
        // digamma is increasing, so any sign change brackets the root
        let shape = find_root_bracketed(|a| digamma(a) - target, 1e-5, 1e5)
            .ok_or_else(|| Error::no_solution("digamma shape equation"))?;
        self.set_shape(shape);
        Ok(())
    }

    /// Maximum-likelihood fit of both parameters, solving
    /// ln α - ψ(α) = ln(mean) - mean(ln x), then β = α / mean
    pub fn fit_shape_and_rate_mle(&mut self, sample: &[f64]) -> Result<()> {
        Self::check_sample(sample)?;
        let mean = stats::sample_mean(sample);
        let s = mean.ln() - stats::log_mean(sample);
        if s <= 0.0 {
            return Err(Error::no_solution("log-moment gap is non-positive"));
        }
        // ln(α) - ψ(α) decreases from +inf to 0 on (0, inf)
        let shape = find_root_bracketed(|a| a.ln() - digamma(a) - s, 1e-6, 1e8)
            .ok_or_else(|| Error::no_solution("shape likelihood equation"))?;
        self.set_parameters(shape, shape / mean);
        Ok(())
    }
}

impl ContinuousDistribution for Gamma {
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
            // Limit at the lower edge depends on the shape
            return if self.alpha > 1.0 {
                0.0
            } else if self.alpha == 1.0 {
                self.beta
            } else {
                f64::INFINITY
            };
        }
        self.log_density(x).exp()
    }

    fn log_density(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
        self.pdf_coef + (self.alpha - 1.0) * x.ln() - self.beta * x
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            gamma_lr(self.alpha, self.beta * x)
        }
    }

    fn survival(&self, x: f64) -> f64 {
        if x <= 0.0 {
            1.0
        } else {
            gamma_ur(self.alpha, self.beta * x)
        }
    }

    fn variate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let standard = match self.regime {
            GammaRegime::IntegerShape => variate_exponential_sum(rng, self.alpha as usize),
            GammaRegime::OneAndAHalfShape => variate_one_and_a_half(rng),
            GammaRegime::SmallShape => variate_best(rng, self.alpha, self.t, self.b),
            GammaRegime::Fishman => variate_fishman(rng, self.alpha),
            GammaRegime::MarsagliaTsang => variate_marsaglia_tsang(rng, self.alpha),
        };
        standard / self.beta
    }

    /// The regime is resolved once; slots are then filled independently.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) {
        match self.regime {
            GammaRegime::IntegerShape => {
                let k = self.alpha as usize;
                for slot in out.iter_mut() {
                    *slot = variate_exponential_sum(rng, k) / self.beta;
                }
            }
            GammaRegime::OneAndAHalfShape => {
                for slot in out.iter_mut() {
                    *slot = variate_one_and_a_half(rng) / self.beta;
                }
            }
            GammaRegime::SmallShape => {
                for slot in out.iter_mut() {
                    *slot = variate_best(rng, self.alpha, self.t, self.b) / self.beta;
                }
            }
            GammaRegime::Fishman => {
                for slot in out.iter_mut() {
                    *slot = variate_fishman(rng, self.alpha) / self.beta;
                }
            }
            GammaRegime::MarsagliaTsang => {
                for slot in out.iter_mut() {
                    *slot = variate_marsaglia_tsang(rng, self.alpha) / self.beta;
                }
            }
        }
    }

    fn mean(&self) -> f64 {
        self.alpha / self.beta
    }

    fn variance(&self) -> f64 {
        self.alpha / (self.beta * self.beta)
    }

    fn mode(&self) -> f64 {
        if self.alpha < 1.0 {
            0.0
        } else {
            (self.alpha - 1.0) / self.beta
        }
    }

    fn quantile(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return 0.0;
        }
        if p == 1.0 {
            return f64::INFINITY;
        }
        let guess = self.quantile_initial_guess(p);
        find_root_newton(|x| (self.cdf(x) - p, self.density(x)), guess).unwrap_or(f64::NAN)
    }

    fn quantile_upper(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        if p == 0.0 {
            return f64::INFINITY;
        }
        if p == 1.0 {
            return 0.0;
        }
        let guess = self.quantile_upper_initial_guess(p);
        find_root_newton(|x| (self.cdf(x) - 1.0 + p, self.density(x)), guess).unwrap_or(f64::NAN)
    }
}

/// Erlang decomposition: sum of k standard exponentials
fn variate_exponential_sum<R: Rng + ?Sized>(rng: &mut R, k: usize) -> f64 {
    (0..k).map(|_| Exponential::standard_variate(rng)).sum()
}

/// Gamma(1.5, 1) = Exp(1) + N²/2
fn variate_one_and_a_half<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let w = Exponential::standard_variate(rng);
    let n = Normal::standard_variate(rng);
    w + 0.5 * n * n
}

/// Best's RGS rejection for α < 0.34 with precomputed t and b.
///
/// Capped; on exhaustion the last candidate is returned rather than a
/// constant masquerading as a draw.
fn variate_best<R: Rng + ?Sized>(rng: &mut R, shape: f64, t: f64, b: f64) -> f64 {
    let shape_inv = 1.0 / shape;
    let mut x = 0.0;
    for _ in 0..MAX_REJECTION_ITERATIONS {
        let v = b * rng.gen::<f64>();
        let w = rng.gen::<f64>();
        if v <= 1.0 {
            x = t * v.powf(shape_inv);
            if w <= (2.0 - x) / (2.0 + x) || w <= (-x).exp() {
                return x;
            }
        } else {
            x = -(t * (b - v) / shape).ln();
            let y = x / t;
            if w * (shape + y - shape * y) <= 1.0 || w <= y.powf(shape - 1.0) {
                return x;
            }
        }
    }
    x
}

/// Fishman's rejection for 1 < α < 1.2: propose α·E, accept on a second
/// exponential. Capped with a last-candidate fallback.
fn variate_fishman<R: Rng + ?Sized>(rng: &mut R, shape: f64) -> f64 {
    let shape_m1 = shape - 1.0;
    let mut w1 = 1.0;
    for _ in 0..MAX_REJECTION_ITERATIONS {
        w1 = Exponential::standard_variate(rng);
        let w2 = Exponential::standard_variate(rng);
        if w2 >= shape_m1 * (w1 - w1.ln() - 1.0) {
            break;
        }
    }
    shape * w1
}

/// Marsaglia-Tsang squeeze for α >= 1; α < 1 is boosted through
/// Gamma(α + 1) · U^(1/α). Capped with a last-candidate fallback.
fn variate_marsaglia_tsang<R: Rng + ?Sized>(rng: &mut R, shape: f64) -> f64 {
    if shape < 1.0 {
        let boost = rng.gen::<f64>().powf(1.0 / shape);
        return variate_marsaglia_tsang(rng, shape + 1.0) * boost;
    }
    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    let mut v = 1.0;
    for _ in 0..MAX_REJECTION_ITERATIONS {
        let n = Normal::standard_variate(rng);
        let candidate = 1.0 + c * n;
        if candidate <= 0.0 {
            continue;
        }
        v = candidate * candidate * candidate;
        let u = rng.gen::<f64>();
        let n2 = n * n;
        if u < 1.0 - 0.0331 * n2 * n2 {
            break;
        }
        if u.ln() < 0.5 * n2 + d - d * v + d * v.ln() {
            break;
        }
    }
    d * v
}
