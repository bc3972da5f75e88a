//! Continuous univariate distributions
//!
//! Each type implements [`randvar_core::ContinuousDistribution`], overriding
//! the generic defaults wherever a closed form exists and leaning on the
//! shared numerical core everywhere else. Parameter setters recompute every
//! cached coefficient (log-gamma terms, normalization constants, sampler
//! constants, regime selection) before returning, so a reader never observes
//! state derived from stale parameters.

pub mod beta;
pub mod beta_prime;
pub mod cauchy;
pub mod exponential;
pub mod gamma;
pub mod log_normal;
pub mod nakagami;
pub mod normal;
pub mod pareto;
pub mod rayleigh;
pub mod uniform;
pub mod von_mises;

pub use beta::{Beta, BetaRegime};
pub use beta_prime::BetaPrime;
pub use cauchy::Cauchy;
pub use exponential::Exponential;
pub use gamma::{Gamma, GammaRegime};
pub use log_normal::LogNormal;
pub use nakagami::Nakagami;
pub use normal::Normal;
pub use pareto::Pareto;
pub use rayleigh::Rayleigh;
pub use uniform::Uniform;
pub use von_mises::VonMises;
