//! Adam-style moment tracking in mixed coordinates.
//!
//! The first moment is an EMA of **raw** gradients; the second moment is an
//! EMA of **squared projected** gradients, so the adaptive denominator lives
//! in eigenbasis coordinates. Bias corrections and the effective step size
//! follow the usual Adam scheme:
//!
//!   `bc_k = 1 − β_kᵗ`,  `step_size = lr · √bc₂ / bc₁`,
//!
//! with `t` the number of update-performing steps taken so far.
use ndarray::ArrayD;

/// Blend the raw gradient into the first-moment accumulator in place.
///
/// `m ← β₁·m + (1 − β₁)·g`.
pub fn update_first_moment(first_moment: &mut ArrayD<f64>, grad: &ArrayD<f64>, beta1: f64) {
    first_moment.mapv_inplace(|x| x * beta1);
    first_moment.scaled_add(1.0 - beta1, grad);
}

/// Blend the squared projected gradient into the second-moment accumulator
/// in place.
///
/// `v ← β₂·v + (1 − β₂)·g̃²`, where `g̃` is the projected gradient. Both
/// buffers live in eigenbasis coordinates.
pub fn update_second_moment(
    second_moment: &mut ArrayD<f64>, projected_grad: &ArrayD<f64>, beta2: f64,
) {
    second_moment.mapv_inplace(|x| x * beta2);
    second_moment.zip_mut_with(projected_grad, |v, &g| *v += (1.0 - beta2) * g * g);
}

/// Bias correction factor `1 − βᵗ` for a moment tracked over `step` updates.
///
/// The exponent is taken in `f64` so arbitrarily large step counts stay
/// monotone; for `β ∈ [0, 1)` the factor saturates at 1.
pub fn bias_correction(beta: f64, step: u64) -> f64 {
    1.0 - beta.powf(step as f64)
}

/// Effective learning rate after both bias corrections,
/// `lr · √(1 − β₂ᵗ) / (1 − β₁ᵗ)`.
pub fn effective_step_size(learning_rate: f64, beta1: f64, beta2: f64, step: u64) -> f64 {
    learning_rate * bias_correction(beta2, step).sqrt() / bias_correction(beta1, step)
}
