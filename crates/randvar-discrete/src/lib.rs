//! Discrete univariate distributions
//!
//! Each type implements [`randvar_core::DiscreteDistribution`]. The
//! NegativeBinomial count parameter is generic over integer and real
//! variants (Pascal and Polya), selected at construction; sampling per
//! family dispatches over documented parameter regimes.

pub mod geometric;
pub mod negative_binomial;
pub mod poisson;
pub mod yule;

pub use geometric::{Geometric, GeometricRegime};
pub use negative_binomial::{CountNumber, NegativeBinomial, NegativeBinomialRegime, Pascal, Polya};
pub use poisson::{Poisson, PoissonRegime};
pub use yule::Yule;
