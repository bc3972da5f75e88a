//! Error types for distribution fitting
//!
//! The numerical core itself never returns `Err`: non-convergence is a
//! sentinel (`None` from the solvers, NaN at the distribution boundary) and
//! out-of-domain constructor inputs are clamped. Errors exist for the
//! fitting surface, where a rejected sample must leave parameters untouched.

use thiserror::Error;

/// Core error type for parameter estimation
#[derive(Error, Debug)]
pub enum Error {
    /// Sample violates a precondition of the fit (sign, integrality, range)
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// Insufficient data for the requested estimator
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation error (estimator equation has no admissible root)
    #[error("Computation error: {0}")]
    Computation(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for an empty sample
    pub fn empty_sample() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for a sample containing values outside the support
    pub fn out_of_support(context: &str) -> Self {
        Self::InvalidSample(format!("{context} lies outside the support"))
    }

    /// Create an error for an estimator equation without an admissible solution
    pub fn no_solution(context: &str) -> Self {
        Self::Computation(format!("{context} has no admissible solution"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidSample("negative value in sample".to_string());
        assert_eq!(err.to_string(), "Invalid sample: negative value in sample");

        let err = Error::InsufficientData {
            expected: 2,
            actual: 0,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 2 samples, got 0"
        );

        let err = Error::Computation("shape equation diverged".to_string());
        assert_eq!(err.to_string(), "Computation error: shape equation diverged");
    }

    #[test]
    fn test_error_helpers() {
        match Error::empty_sample() {
            Error::InsufficientData { expected, actual } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            _ => panic!("Wrong error type"),
        }

        let err = Error::out_of_support("negative observation");
        assert_eq!(
            err.to_string(),
            "Invalid sample: negative observation lies outside the support"
        );

        let err = Error::no_solution("method-of-moments system");
        assert_eq!(
            err.to_string(),
            "Computation error: method-of-moments system has no admissible solution"
        );
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom failure").into();
        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom failure")),
            _ => panic!("Wrong error type"),
        }
    }
}
