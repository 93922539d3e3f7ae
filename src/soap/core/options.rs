//! SOAP options — validated hyperparameter container.
//!
//! Purpose
//! -------
//! Collect the optimizer's hyperparameters in one validated struct so the
//! core step machinery can assume well-formed values: finite positive
//! learning rate and epsilon, decay rates inside [0, 1), and a refresh
//! cadence of at least one step.
//!
//! Key behaviors
//! -------------
//! - [`SoapOptions::new`] rejects out-of-range values with typed
//!   [`SoapError`]s instead of panicking at call sites.
//! - [`SoapOptions::default`] provides the documented defaults
//!   (`learning_rate = 3e-3`, `beta1 = beta2 = 0.95`, no shampoo-decay
//!   override, `epsilon = 1e-8`, `refresh_period = 10`).
//! - [`SoapOptions::preconditioner_decay`] resolves the covariance EMA
//!   decay: the explicit override when present, `beta2` otherwise.
//!
//! Conventions
//! -----------
//! - `shampoo_decay` is a tagged option rather than a negative sentinel:
//!   `None` means "reuse `beta2`".
//! - Options are attached per parameter group; distinct groups may carry
//!   distinct options.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the documented defaults, the decay fallback, and one
//!   rejection case per validated field.
use crate::soap::core::validation::{
    validate_beta, validate_epsilon, validate_learning_rate, validate_refresh_period,
    validate_shampoo_decay,
};
use crate::soap::errors::SoapResult;

/// Validated hyperparameters for one parameter group.
///
/// Invariants
/// ----------
/// - `learning_rate > 0` and finite.
/// - `beta1, beta2 ∈ [0, 1)`.
/// - `shampoo_decay`, when present, lies in [0, 1).
/// - `epsilon > 0` and finite.
/// - `refresh_period ≥ 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoapOptions {
    /// Base step size before bias correction.
    pub learning_rate: f64,
    /// First-moment (gradient EMA) decay rate.
    pub beta1: f64,
    /// Second-moment (squared projected gradient EMA) decay rate.
    pub beta2: f64,
    /// Covariance EMA decay override; `None` reuses `beta2`.
    pub shampoo_decay: Option<f64>,
    /// Denominator stabilizer added to the second-moment square root.
    pub epsilon: f64,
    /// Steps between eigenbasis refreshes.
    pub refresh_period: usize,
}

impl SoapOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// One of the `SoapError::Invalid*` configuration variants when a field
    /// is out of range; the error carries the offending value and reason.
    ///
    /// # Examples
    /// ```rust
    /// # use soap_optim::soap::SoapOptions;
    /// let opts = SoapOptions::new(1e-3, 0.9, 0.99, None, 1e-8, 5).unwrap();
    /// assert_eq!(opts.preconditioner_decay(), 0.99);
    ///
    /// assert!(SoapOptions::new(-1.0, 0.9, 0.99, None, 1e-8, 5).is_err());
    /// ```
    pub fn new(
        learning_rate: f64, beta1: f64, beta2: f64, shampoo_decay: Option<f64>, epsilon: f64,
        refresh_period: usize,
    ) -> SoapResult<SoapOptions> {
        let options =
            SoapOptions { learning_rate, beta1, beta2, shampoo_decay, epsilon, refresh_period };
        options.validate()?;
        Ok(options)
    }

    /// Re-run the field validations on an existing value.
    ///
    /// Fields are public, so options built as struct literals (including
    /// `Default` tweaked via update syntax) are re-checked at the point they
    /// are handed to an optimizer.
    ///
    /// # Errors
    /// Same variants as [`SoapOptions::new`].
    pub fn validate(&self) -> SoapResult<()> {
        validate_learning_rate(self.learning_rate)?;
        validate_beta("beta1", self.beta1)?;
        validate_beta("beta2", self.beta2)?;
        validate_shampoo_decay(self.shampoo_decay)?;
        validate_epsilon(self.epsilon)?;
        validate_refresh_period(self.refresh_period)
    }

    /// Covariance EMA decay actually used by the preconditioner: the
    /// explicit override when present, `beta2` otherwise.
    pub fn preconditioner_decay(&self) -> f64 {
        self.shampoo_decay.unwrap_or(self.beta2)
    }
}

impl Default for SoapOptions {
    /// The documented defaults: `lr = 3e-3`, `beta1 = beta2 = 0.95`, no
    /// shampoo-decay override, `epsilon = 1e-8`, `refresh_period = 10`.
    fn default() -> Self {
        SoapOptions {
            learning_rate: 3e-3,
            beta1: 0.95,
            beta2: 0.95,
            shampoo_decay: None,
            epsilon: 1e-8,
            refresh_period: 10,
        }
    }
}
