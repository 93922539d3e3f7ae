//! Errors for the SOAP optimizer (configuration validation, gradient
//! checks, lifecycle invariants, and factorization failures).
//!
//! This module defines [`SoapError`], the unified error type of the
//! optimizer surface, and the [`SoapResult`] alias used across the crate.
//!
//! ## Conventions
//! - Shape vectors are reported in full (`Vec<usize>`), gradient entries by
//!   flat (row-major) index.
//! - Configuration errors carry the offending value and a static reason.
//! - Factorization failures embed the backend [`LinAlgError`] together with
//!   the tensor axis whose accumulator was being decomposed; they are never
//!   substituted with a fallback basis.
use crate::linalg::errors::LinAlgError;

/// Crate-wide result alias for optimizer operations.
pub type SoapResult<T> = Result<T, SoapError>;

/// Unified error type for the SOAP optimizer.
#[derive(Debug, Clone, PartialEq)]
pub enum SoapError {
    // ---- Configuration ----
    /// Learning rate must be finite and strictly positive.
    InvalidLearningRate { value: f64, reason: &'static str },

    /// Moment decay rates must lie in [0, 1).
    InvalidBeta { name: &'static str, value: f64, reason: &'static str },

    /// Preconditioner decay override must lie in [0, 1) when provided.
    InvalidShampooDecay { value: f64, reason: &'static str },

    /// Epsilon must be finite and strictly positive.
    InvalidEpsilon { value: f64, reason: &'static str },

    /// Refresh period must be at least 1.
    InvalidRefreshPeriod { period: usize, reason: &'static str },

    // ---- Gradients ----
    /// A supplied gradient's shape disagrees with the parameter's shape.
    GradientShapeMismatch { expected: Vec<usize>, found: Vec<usize> },

    /// Gradient elements must be finite.
    NonFiniteGradient { index: usize, value: f64 },

    // ---- Lifecycle ----
    /// Projection was requested before the eigenbasis was initialized.
    EigenbasisUnset,

    // ---- Factorizations ----
    /// Eigendecomposition or QR failed for one axis's accumulator.
    DecompositionFailed { axis: usize, source: LinAlgError },
}

impl std::error::Error for SoapError {}

impl std::fmt::Display for SoapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            SoapError::InvalidLearningRate { value, reason } => {
                write!(f, "Invalid learning rate {value}: {reason}")
            }
            SoapError::InvalidBeta { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            SoapError::InvalidShampooDecay { value, reason } => {
                write!(f, "Invalid shampoo decay {value}: {reason}")
            }
            SoapError::InvalidEpsilon { value, reason } => {
                write!(f, "Invalid epsilon {value}: {reason}")
            }
            SoapError::InvalidRefreshPeriod { period, reason } => {
                write!(f, "Invalid refresh period {period}: {reason}")
            }

            // ---- Gradients ----
            SoapError::GradientShapeMismatch { expected, found } => {
                write!(f, "Gradient shape mismatch: expected {expected:?}, found {found:?}")
            }
            SoapError::NonFiniteGradient { index, value } => {
                write!(f, "Non-finite gradient element at flat index {index}: {value}")
            }

            // ---- Lifecycle ----
            SoapError::EigenbasisUnset => {
                write!(f, "Eigenbasis accessed before initialization")
            }

            // ---- Factorizations ----
            SoapError::DecompositionFailed { axis, source } => {
                write!(f, "Decomposition failed for axis {axis}: {source}")
            }
        }
    }
}
