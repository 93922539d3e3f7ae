//! Per-parameter step driver.
//!
//! Purpose
//! -------
//! Sequence one optimization step for a single parameter: gradient
//! validation, the warm-up path that seeds the covariance and builds the
//! first eigenbasis, and the steady-state path that projects, updates
//! moments, writes the parameter, and only then touches the preconditioner.
//!
//! Key behaviors
//! -------------
//! - **Warm-up** (eigenbasis unset): blend the gradient into the covariance
//!   accumulators, run the full eigendecomposition, and return without
//!   updating the parameter or the step counter. The first observed
//!   gradient only shapes the preconditioner.
//! - **Steady state**: project the gradient, update both moments, increment
//!   the step counter, apply the bias-corrected update in eigenbasis
//!   coordinates, project it back, and commit it to the parameter value.
//!   The covariance blend and any due eigenbasis refresh run strictly after
//!   the commit.
//!
//! Invariants & assumptions
//! ------------------------
//! - The preconditioner consumed by a step never contains that step's own
//!   gradient; the post-commit ordering above is what enforces this.
//! - Validation runs before any state mutation, so a rejected gradient
//!   leaves parameter and state untouched.
//! - If the post-commit refresh fails, the committed parameter write stands;
//!   the error reports the refresh failure and the caller decides whether
//!   to stop training.
use crate::soap::core::covariance::update_covariance;
use crate::soap::core::eigenbasis::{initialize_eigenbasis, refresh_eigenbasis};
use crate::soap::core::moments::{effective_step_size, update_first_moment, update_second_moment};
use crate::soap::core::options::SoapOptions;
use crate::soap::core::projection::{project, project_back};
use crate::soap::core::state::{Eigenbasis, PreconditionerState};
use crate::soap::core::validation::{validate_grad_finite, validate_grad_shape};
use crate::soap::errors::SoapResult;
use ndarray::ArrayD;

/// Run one optimization step for a single parameter.
///
/// # Parameters
/// - `value`: the parameter tensor, updated in place on steady-state steps.
/// - `grad`: the gradient attached for this step; read-only.
/// - `state`: the parameter's preconditioner state.
/// - `options`: the hyperparameters of the parameter's group.
///
/// # Errors
/// - [`crate::soap::SoapError::GradientShapeMismatch`] /
///   [`crate::soap::SoapError::NonFiniteGradient`] if the gradient fails
///   validation; no state is mutated.
/// - [`crate::soap::SoapError::DecompositionFailed`] if the warm-up
///   decomposition or a due refresh fails.
pub fn step_param(
    value: &mut ArrayD<f64>, grad: &ArrayD<f64>, state: &mut PreconditionerState,
    options: &SoapOptions,
) -> SoapResult<()> {
    validate_grad_shape(value.shape(), grad)?;
    validate_grad_finite(grad)?;

    if state.eigenbasis == Eigenbasis::Unset {
        update_covariance(state, grad);
        return initialize_eigenbasis(state);
    }

    let projected_grad = project(grad, state.bases()?)?;
    update_first_moment(&mut state.first_moment, grad, options.beta1);
    update_second_moment(&mut state.second_moment, &projected_grad, options.beta2);

    state.step_count += 1;
    let step_size =
        effective_step_size(options.learning_rate, options.beta1, options.beta2, state.step_count);

    let mut direction = project(&state.first_moment, state.bases()?)?;
    direction.zip_mut_with(&state.second_moment, |d, &v| *d /= v.sqrt() + options.epsilon);
    let raw_direction = project_back(&direction, state.bases()?)?;
    value.scaled_add(-step_size, &raw_direction);

    update_covariance(state, grad);
    if state.refresh_due() {
        refresh_eigenbasis(state)?;
    }
    Ok(())
}
