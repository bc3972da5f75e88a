//! Distribution contracts and the shared numerical core
//!
//! This crate holds everything the concrete distribution catalogs depend
//! on but that belongs to no single family:
//!
//! - [`Support`]: support classification on the real line
//! - [`ContinuousDistribution`] / [`DiscreteDistribution`]: the capability
//!   contracts, with generic defaults for quantiles (numerical CDF
//!   inversion), hazard, mode, expectations, batch sampling, and
//!   likelihoods
//! - [`roots`]: bracketed and Newton root finding plus a derivative-free
//!   minimizer, all iteration-capped with sentinel failure
//! - [`integrate`]: adaptive Simpson quadrature over finite intervals
//! - [`stats`]: the sample moments the fitting routines consume
//! - [`Error`]/[`Result`]: the fitting-surface error type
//!
//! # Failure policy
//!
//! Out-of-domain parameters passed to constructors and setters are clamped,
//! not rejected. Routine out-of-domain queries (quantile outside [0, 1],
//! hazard past the support) and solver non-convergence return NaN. `Err` is
//! reserved for the fitting surface, where a rejected sample must leave the
//! distribution's parameters untouched.

pub mod continuous;
pub mod discrete;
pub mod error;
pub mod integrate;
pub mod roots;
pub mod stats;
pub mod support;

pub use continuous::ContinuousDistribution;
pub use discrete::DiscreteDistribution;
pub use error::{Error, Result};
pub use support::Support;

/// Floor applied when clamping a parameter that must stay strictly positive
pub const MIN_POSITIVE: f64 = 1e-21;
