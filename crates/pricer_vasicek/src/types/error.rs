//! Error types for Vasicek moment computations.
//!
//! This module provides:
//! - `MomentError`: Errors from expectation, covariance and generating-function construction

use thiserror::Error;

/// Categorised moment computation errors.
///
/// Every failure is a caller programming error: the formulas are
/// deterministic, so there is nothing to retry and no partial result.
///
/// # Variants
/// - `DimensionMismatch`: An input vector or matrix does not have the declared length
/// - `InvalidCorrelation`: Correlation matrix is not square, not symmetric, or out of bounds
/// - `InvalidHorizon`: Horizon is negative or not finite
/// - `DegenerateParameter`: Zero mean reversion rejected by `DegeneratePolicy::Reject`
/// - `InvalidConfig`: Configuration failed validation
///
/// # Examples
/// ```
/// use pricer_vasicek::types::MomentError;
///
/// let err = MomentError::DimensionMismatch { name: "alpha", expected: 3, actual: 2 };
/// assert_eq!(format!("{}", err), "Dimension mismatch for 'alpha': expected 3, got 2");
/// assert!(err.is_invalid_argument());
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MomentError {
    /// Input length does not match the factor count.
    #[error("Dimension mismatch for '{name}': expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Name of the offending input
        name: &'static str,
        /// Declared dimension
        expected: usize,
        /// Observed length
        actual: usize,
    },

    /// Correlation matrix failed validation.
    #[error("Invalid correlation matrix: {message}")]
    InvalidCorrelation {
        /// Description of the violation
        message: String,
    },

    /// Horizon is negative or not finite.
    #[error("Invalid horizon: tau = {tau}")]
    InvalidHorizon {
        /// The invalid horizon value
        tau: f64,
    },

    /// Zero mean reversion (or zero pairwise sum) where a decay weight is required.
    #[error("Degenerate parameter '{name}' at index {index}: value = {value}")]
    DegenerateParameter {
        /// Name of the offending input
        name: &'static str,
        /// Factor index (row index for pairwise sums)
        index: usize,
        /// The degenerate value
        value: f64,
    },

    /// Configuration failed validation.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid setting
        message: String,
    },
}

impl MomentError {
    /// Returns true for errors caused by malformed inputs rather than degenerate values.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            MomentError::DimensionMismatch { .. }
                | MomentError::InvalidCorrelation { .. }
                | MomentError::InvalidHorizon { .. }
        )
    }
}
