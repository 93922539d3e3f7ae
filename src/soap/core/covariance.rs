//! Covariance tracking — per-axis EMA of gradient outer products.
//!
//! Implements the Shampoo-style accumulator update: for every tensor axis
//! `i`, blend the mode-`i` outer product of the raw gradient into the
//! state's covariance matrix,
//!
//!   `covariance[i] ← decay · covariance[i] + (1 − decay) · C_i`,
//!
//! with `C_i[a, b] = Σ_{all indices except axis i} G[.., a, ..]·G[.., b, ..]`.
//!
//! ## What this module does
//! - Runs unconditionally on every step, both before the eigenbasis exists
//!   and after.
//! - Mutates the accumulators **in place** via the documented blend
//!   (`buffer ← decay·buffer + (1−decay)·new`); no aliasing tricks.
//!
//! ## Ordering invariant (enforced by the step driver)
//! This update must only run *after* the current step's gradient has been
//! consumed for the parameter update, so the preconditioner used by a step
//! never contains that step's own gradient.
use crate::linalg::axis_outer_product;
use crate::soap::core::state::PreconditionerState;
use ndarray::ArrayD;

/// Blend each axis's gradient outer product into the state's covariance
/// accumulators in place.
///
/// For a 0-dimensional parameter the axis list is empty and this is a
/// no-op, matching the degenerate plain-Adam behavior.
pub fn update_covariance(state: &mut PreconditionerState, grad: &ArrayD<f64>) {
    let decay = state.decay_rate;
    for (axis, accumulator) in state.covariance.iter_mut().enumerate() {
        let outer = axis_outer_product(grad, axis);
        accumulator.mapv_inplace(|x| x * decay);
        accumulator.scaled_add(1.0 - decay, &outer);
    }
}
