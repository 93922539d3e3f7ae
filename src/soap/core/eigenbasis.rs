//! Eigenbasis lifecycle — full initialization and periodic power-iteration
//! refresh.
//!
//! Purpose
//! -------
//! Manage the per-axis orthonormal bases of a [`PreconditionerState`]:
//!
//! - [`initialize_eigenbasis`] runs a full symmetric eigendecomposition of
//!   every covariance accumulator once, the step after the accumulators are
//!   first seeded.
//! - [`refresh_eigenbasis`] runs the cheap steady-state update: one power
//!   iteration against the current accumulator followed by QR
//!   re-orthonormalization, instead of a fresh decomposition.
//!
//! Key behaviors
//! -------------
//! - The refresh keeps the descending-eigenvalue column convention by
//!   estimating each column's eigenvalue under the *current* accumulator
//!   (`est_j = q_jᵀ · C · q_j`) and re-sorting columns by that estimate.
//! - Whenever columns of axis `i`'s basis are permuted, the same permutation
//!   is applied to axis `i` of the projected second moment. The second
//!   moment is indexed in eigenbasis coordinates, so skipping this would
//!   silently pair variances with the wrong directions.
//!
//! Invariants & assumptions
//! ------------------------
//! - On success every basis matrix is orthonormal with columns in
//!   descending (estimated) eigenvalue order, and the second moment's axis
//!   ordering matches the bases.
//! - A failed factorization surfaces immediately as
//!   [`SoapError::DecompositionFailed`] naming the axis; there is no retry
//!   or partial-basis fallback.
use crate::linalg::factorization::descending_order;
use crate::linalg::{qr_orthonormal, symmetric_eigenbasis, EIGEN_JITTER};
use crate::soap::core::state::{Eigenbasis, PreconditionerState};
use crate::soap::errors::{SoapError, SoapResult};
use ndarray::Axis;

/// Build the initial eigenbasis from a full decomposition of every axis's
/// covariance accumulator.
///
/// # Errors
/// [`SoapError::DecompositionFailed`] naming the first axis whose
/// decomposition fails; the state's eigenbasis is left unset in that case.
pub fn initialize_eigenbasis(state: &mut PreconditionerState) -> SoapResult<()> {
    let mut bases = Vec::with_capacity(state.covariance.len());
    for (axis, accumulator) in state.covariance.iter().enumerate() {
        let basis = symmetric_eigenbasis(accumulator, EIGEN_JITTER)
            .map_err(|source| SoapError::DecompositionFailed { axis, source })?;
        bases.push(basis);
    }
    state.eigenbasis = Eigenbasis::Ready(bases);
    Ok(())
}

/// Refresh every axis's basis by one power iteration plus QR, keeping the
/// projected second moment's axis ordering consistent with the re-sorted
/// columns.
///
/// # Errors
/// - [`SoapError::EigenbasisUnset`] if called before initialization.
/// - [`SoapError::DecompositionFailed`] if the QR step fails on some axis.
///   Axes already refreshed keep their new bases; the parameter value
///   committed earlier in the step is never rolled back.
pub fn refresh_eigenbasis(state: &mut PreconditionerState) -> SoapResult<()> {
    let bases = match &mut state.eigenbasis {
        Eigenbasis::Ready(bases) => bases,
        Eigenbasis::Unset => return Err(SoapError::EigenbasisUnset),
    };

    for (axis, basis) in bases.iter_mut().enumerate() {
        let accumulator = &state.covariance[axis];

        // One power iteration under the current accumulator. Column j of the
        // product also yields the Rayleigh-quotient eigenvalue estimate
        // est_j = q_j · (C q_j).
        let power = accumulator.dot(&*basis);
        let estimates =
            (0..basis.ncols()).map(|j| basis.column(j).dot(&power.column(j)));
        let order = descending_order(estimates);

        state.second_moment = state.second_moment.select(Axis(axis), &order);
        let power_sorted = power.select(Axis(1), &order);
        *basis = qr_orthonormal(&power_sorted)
            .map_err(|source| SoapError::DecompositionFailed { axis, source })?;
    }
    Ok(())
}
