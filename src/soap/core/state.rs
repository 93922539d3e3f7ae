//! Per-parameter preconditioner state.
//!
//! Purpose
//! -------
//! Define the statically-typed record the optimizer keeps per parameter:
//! step counter, moment accumulators, per-axis covariance matrices, the
//! current eigenbasis, and the fixed decay/cadence the state was created
//! with. This replaces the original's ad hoc per-parameter dictionary with
//! an explicit type stored in a map keyed by parameter identity.
//!
//! Key behaviors
//! -------------
//! - [`PreconditionerState::new`] allocates zeroed accumulators sized from
//!   the parameter shape: moments shaped like the parameter, one `d_i × d_i`
//!   covariance per axis, and an unset eigenbasis.
//! - The eigenbasis is a tagged variant, [`Eigenbasis`]: callers go through
//!   [`PreconditionerState::bases`] and cannot read a basis before
//!   initialization logically completes.
//!
//! Invariants & assumptions
//! ------------------------
//! - `covariance[i]` is square, symmetric, and positive semi-definite up to
//!   floating error for the state's entire lifetime.
//! - The eigenbasis is either entirely unset or carries exactly one
//!   orthonormal matrix per axis, each shaped like its covariance.
//! - `second_moment` lives in projected coordinates; its axis ordering
//!   always matches the current eigenbasis column ordering (the refresh
//!   permutation keeps them aligned).
//! - `step_count` increments only on update-performing calls and never
//!   decreases.
use crate::soap::errors::{SoapError, SoapResult};
use ndarray::{Array2, ArrayD, IxDyn};

/// Current eigenbasis of the preconditioner: unset until the first full
/// decomposition, then one orthonormal matrix per tensor axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Eigenbasis {
    /// No basis yet; the state has seen exactly one gradient.
    Unset,
    /// One orthonormal `d_i × d_i` matrix per axis, columns ordered by
    /// descending (estimated) eigenvalue.
    Ready(Vec<Array2<f64>>),
}

/// Per-parameter optimizer state, created lazily on the first observed
/// gradient and owned by the optimizer for the parameter's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct PreconditionerState {
    /// Number of update-performing steps taken so far.
    pub step_count: u64,
    /// EMA of raw gradients, shaped like the parameter.
    pub first_moment: ArrayD<f64>,
    /// EMA of squared projected gradients, shaped like the parameter but
    /// expressed in eigenbasis coordinates.
    pub second_moment: ArrayD<f64>,
    /// Per-axis covariance accumulators (L, R, … in Shampoo terms).
    pub covariance: Vec<Array2<f64>>,
    /// Current eigenbasis of the covariance accumulators.
    pub eigenbasis: Eigenbasis,
    /// Covariance EMA decay, fixed at state creation.
    pub decay_rate: f64,
    /// Steps between eigenbasis refreshes, fixed at state creation.
    pub refresh_period: usize,
}

impl PreconditionerState {
    /// Allocate zeroed state for a parameter of the given shape.
    ///
    /// Moments start at zero, each axis gets a zero `d_i × d_i` covariance
    /// matrix, and the eigenbasis starts [`Eigenbasis::Unset`].
    pub fn new(shape: &[usize], decay_rate: f64, refresh_period: usize) -> PreconditionerState {
        let covariance = shape.iter().map(|&d| Array2::<f64>::zeros((d, d))).collect();
        PreconditionerState {
            step_count: 0,
            first_moment: ArrayD::zeros(IxDyn(shape)),
            second_moment: ArrayD::zeros(IxDyn(shape)),
            covariance,
            eigenbasis: Eigenbasis::Unset,
            decay_rate,
            refresh_period,
        }
    }

    /// Access the ready eigenbasis matrices.
    ///
    /// # Errors
    /// [`SoapError::EigenbasisUnset`] if initialization has not completed;
    /// reaching that error indicates a lifecycle bug in the caller, not a
    /// numerical condition.
    pub fn bases(&self) -> SoapResult<&[Array2<f64>]> {
        match &self.eigenbasis {
            Eigenbasis::Ready(bases) => Ok(bases),
            Eigenbasis::Unset => Err(SoapError::EigenbasisUnset),
        }
    }

    /// Whether the periodic refresh fires at the current step count.
    ///
    /// Evaluated in the post-update phase, after `step_count` has been
    /// incremented for the call.
    pub fn refresh_due(&self) -> bool {
        self.step_count > 0 && self.step_count % (self.refresh_period as u64) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Accumulator shapes allocated by `new` (the shape law).
    // - The unset-eigenbasis access guard.
    // - The refresh cadence predicate.
    //
    // They intentionally DO NOT cover:
    // - Covariance/eigenbasis numerics (their own modules' tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the shape law: covariance[i] is (d_i, d_i) for every axis and
    // both moments are shaped like the parameter.
    //
    // Given
    // -----
    // - A parameter shape (2, 3, 4).
    //
    // Expect
    // ------
    // - Three covariance matrices of shapes (2,2), (3,3), (4,4); moments of
    //   shape (2, 3, 4); eigenbasis unset.
    fn new_allocates_per_axis_square_covariance() {
        // Arrange + Act
        let state = PreconditionerState::new(&[2, 3, 4], 0.95, 10);

        // Assert
        assert_eq!(state.covariance.len(), 3);
        for (axis, &d) in [2usize, 3, 4].iter().enumerate() {
            assert_eq!(state.covariance[axis].shape(), &[d, d]);
        }
        assert_eq!(state.first_moment.shape(), &[2, 3, 4]);
        assert_eq!(state.second_moment.shape(), &[2, 3, 4]);
        assert_eq!(state.eigenbasis, Eigenbasis::Unset);
        assert_eq!(state.step_count, 0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure basis access before initialization surfaces the lifecycle
    // error instead of a partial basis.
    //
    // Given
    // -----
    // - A freshly created state.
    //
    // Expect
    // ------
    // - `bases()` returns `Err(SoapError::EigenbasisUnset)`.
    fn bases_guard_rejects_unset_eigenbasis() {
        // Arrange
        let state = PreconditionerState::new(&[2], 0.95, 10);

        // Act + Assert
        assert_eq!(state.bases().unwrap_err(), SoapError::EigenbasisUnset);
    }

    #[test]
    // Purpose
    // -------
    // Verify the refresh predicate: never at step 0, then exactly on
    // multiples of the period.
    //
    // Given
    // -----
    // - A state with refresh_period = 2 stepped through counts 0..=4.
    //
    // Expect
    // ------
    // - Due at steps 2 and 4 only.
    fn refresh_due_fires_on_period_multiples() {
        // Arrange
        let mut state = PreconditionerState::new(&[2], 0.95, 2);

        // Act + Assert
        let mut fired = Vec::new();
        for step in 0..=4u64 {
            state.step_count = step;
            if state.refresh_due() {
                fired.push(step);
            }
        }
        assert_eq!(fired, vec![2, 4]);
    }
}
