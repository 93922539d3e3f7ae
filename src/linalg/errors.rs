//! Errors for the linear-algebra backend (contraction shape checks and
//! factorization health checks).
//!
//! This module defines [`LinAlgError`], the failure type shared by the
//! tensor-contraction and factorization primitives. Higher layers wrap these
//! values with the axis they were operating on (see
//! `soap::errors::SoapError::DecompositionFailed`).
//!
//! ## Conventions
//! - Indices are 0-based and refer to the `(row, col)` of the offending
//!   matrix entry.
//! - Non-finite values are never silently substituted; the first offender is
//!   reported and the operation aborts.

/// Result alias for linear-algebra backend operations.
pub type LinAlgResult<T> = Result<T, LinAlgError>;

/// Failure conditions of the contraction and factorization primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum LinAlgError {
    /// A matrix handed to a factorization contains a NaN/±inf entry.
    NonFiniteInput { row: usize, col: usize, value: f64 },

    /// A factorization produced a NaN/±inf entry (failed to converge).
    NonFiniteFactor { row: usize, col: usize, value: f64 },

    /// A basis matrix does not match the tensor axis it contracts against.
    DimensionMismatch { expected: usize, found: usize },
}

impl std::error::Error for LinAlgError {}

impl std::fmt::Display for LinAlgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinAlgError::NonFiniteInput { row, col, value } => {
                write!(f, "Non-finite input at ({row}, {col}): {value}")
            }
            LinAlgError::NonFiniteFactor { row, col, value } => {
                write!(f, "Factorization produced non-finite entry at ({row}, {col}): {value}")
            }
            LinAlgError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}")
            }
        }
    }
}
