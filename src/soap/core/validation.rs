//! Validation helpers for optimizer configuration and gradients.
//!
//! This module centralizes the consistency checks used across the optimizer
//! surface:
//!
//! - **Hyperparameter checks**: [`validate_learning_rate`],
//!   [`validate_beta`], [`validate_shampoo_decay`], [`validate_epsilon`],
//!   [`validate_refresh_period`] enforce the ranges documented on
//!   `SoapOptions`.
//! - **Gradient validation**: [`validate_grad_shape`] enforces agreement
//!   with the parameter's recorded shape (a mismatch is a caller-side bug,
//!   not a recoverable runtime condition); [`validate_grad_finite`] rejects
//!   NaN/±inf entries before any state is mutated.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`SoapError`] variants, keeping higher-level code uniform.
use crate::soap::errors::{SoapError, SoapResult};
use ndarray::ArrayD;

/// Validate that the learning rate is finite and strictly positive.
///
/// # Errors
/// Returns [`SoapError::InvalidLearningRate`] otherwise.
pub fn validate_learning_rate(value: f64) -> SoapResult<()> {
    if !value.is_finite() {
        return Err(SoapError::InvalidLearningRate {
            value,
            reason: "Learning rate must be finite.",
        });
    }
    if value <= 0.0 {
        return Err(SoapError::InvalidLearningRate {
            value,
            reason: "Learning rate must be strictly positive.",
        });
    }
    Ok(())
}

/// Validate that a moment decay rate lies in [0, 1).
///
/// `name` identifies the field in the error payload ("beta1" or "beta2").
///
/// # Errors
/// Returns [`SoapError::InvalidBeta`] otherwise.
pub fn validate_beta(name: &'static str, value: f64) -> SoapResult<()> {
    if !value.is_finite() {
        return Err(SoapError::InvalidBeta { name, value, reason: "Decay rate must be finite." });
    }
    if !(0.0..1.0).contains(&value) {
        return Err(SoapError::InvalidBeta {
            name,
            value,
            reason: "Decay rate must lie in [0, 1).",
        });
    }
    Ok(())
}

/// Validate the optional covariance-decay override.
///
/// - Accepts `None` (reuse `beta2`).
/// - If `Some`, the value must lie in [0, 1).
///
/// # Errors
/// Returns [`SoapError::InvalidShampooDecay`] otherwise.
pub fn validate_shampoo_decay(value: Option<f64>) -> SoapResult<()> {
    if let Some(decay) = value {
        if !decay.is_finite() {
            return Err(SoapError::InvalidShampooDecay {
                value: decay,
                reason: "Shampoo decay must be finite.",
            });
        }
        if !(0.0..1.0).contains(&decay) {
            return Err(SoapError::InvalidShampooDecay {
                value: decay,
                reason: "Shampoo decay must lie in [0, 1).",
            });
        }
    }
    Ok(())
}

/// Validate that epsilon is finite and strictly positive.
///
/// # Errors
/// Returns [`SoapError::InvalidEpsilon`] otherwise.
pub fn validate_epsilon(value: f64) -> SoapResult<()> {
    if !value.is_finite() {
        return Err(SoapError::InvalidEpsilon { value, reason: "Epsilon must be finite." });
    }
    if value <= 0.0 {
        return Err(SoapError::InvalidEpsilon {
            value,
            reason: "Epsilon must be strictly positive.",
        });
    }
    Ok(())
}

/// Validate that the refresh period is at least one step.
///
/// # Errors
/// Returns [`SoapError::InvalidRefreshPeriod`] otherwise.
pub fn validate_refresh_period(period: usize) -> SoapResult<()> {
    if period == 0 {
        return Err(SoapError::InvalidRefreshPeriod {
            period,
            reason: "Refresh period must be at least 1.",
        });
    }
    Ok(())
}

/// Validate that a gradient's shape matches the parameter's recorded shape.
///
/// # Errors
/// Returns [`SoapError::GradientShapeMismatch`] carrying both shapes.
pub fn validate_grad_shape(expected: &[usize], grad: &ArrayD<f64>) -> SoapResult<()> {
    if grad.shape() != expected {
        return Err(SoapError::GradientShapeMismatch {
            expected: expected.to_vec(),
            found: grad.shape().to_vec(),
        });
    }
    Ok(())
}

/// Validate that every gradient element is finite.
///
/// # Errors
/// Returns [`SoapError::NonFiniteGradient`] with the flat index and value of
/// the first offending element.
pub fn validate_grad_finite(grad: &ArrayD<f64>) -> SoapResult<()> {
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(SoapError::NonFiniteGradient { index, value });
        }
    }
    Ok(())
}
