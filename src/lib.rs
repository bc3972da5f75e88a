//! Univariate probability distributions over a shared numerical core.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`core`](randvar_core): support classification, the
//!   [`ContinuousDistribution`]/[`DiscreteDistribution`] contracts with their
//!   generic quantile/expectation/hazard defaults, root finding,
//!   minimization, and adaptive integration.
//! - [`continuous`](randvar_continuous): the continuous catalog (Uniform,
//!   Exponential, Normal, LogNormal, Cauchy, Pareto, Gamma, Beta, BetaPrime,
//!   Nakagami, Rayleigh, VonMises).
//! - [`discrete`](randvar_discrete): the discrete catalog (Geometric,
//!   NegativeBinomial, Poisson, Yule).
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use randvar::{ContinuousDistribution, Gamma};
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let g = Gamma::new(2.5, 1.0);
//!
//! let x = g.variate(&mut rng);
//! assert!(x > 0.0);
//!
//! // Quantile inverts the CDF numerically when no closed form exists.
//! let q = g.quantile(0.5);
//! assert!((g.cdf(q) - 0.5).abs() < 1e-8);
//! ```

pub use randvar_core as core;
pub use randvar_core::{
    ContinuousDistribution, DiscreteDistribution, Error, Result, Support,
};

pub use randvar_continuous as continuous;
pub use randvar_continuous::{
    Beta, BetaPrime, Cauchy, Exponential, Gamma, LogNormal, Nakagami, Normal, Pareto, Rayleigh,
    Uniform, VonMises,
};

pub use randvar_discrete as discrete;
pub use randvar_discrete::{Geometric, NegativeBinomial, Pascal, Poisson, Polya, Yule};
