//! Trainable parameter handles shared between the training loop and the
//! optimizer.
//!
//! Purpose
//! -------
//! Define [`Parameter`] (an N-dimensional `f64` tensor plus an optional
//! attached gradient), the stable [`ParamId`] identity used to key
//! per-parameter optimizer state, and the shared [`ParamHandle`] alias.
//!
//! Key behaviors
//! -------------
//! - Every parameter receives a unique, process-wide [`ParamId`] at
//!   construction from an atomic counter; the id survives moves and clones
//!   of the handle and keys the optimizer's state map.
//! - Gradients are attached by the external differentiation mechanism via
//!   [`Parameter::set_grad`] and consumed read-only by the optimizer; the
//!   optimizer never clears them.
//!
//! Invariants & assumptions
//! ------------------------
//! - A gradient attached to a parameter is expected to match the value's
//!   shape; the optimizer validates this on every step and reports a typed
//!   error on mismatch rather than truncating.
//! - Handles are `Rc<RefCell<_>>`: the optimizer and training loop run on
//!   one thread and mutate parameters strictly sequentially, so no further
//!   synchronization is required. Per-parameter isolation is the only
//!   concurrency contract.
//!
//! Testing notes
//! -------------
//! - Unit tests cover id uniqueness and gradient attach/clear behavior.
use ndarray::ArrayD;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PARAM_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of a parameter for the life of the process.
///
/// Used as the key of the optimizer's per-parameter state map, so state
/// survives regardless of where the parameter sits inside its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(u64);

/// Shared handle to a parameter, cloned between the training loop (which
/// writes gradients) and the optimizer (which writes values).
pub type ParamHandle = Rc<RefCell<Parameter>>;

/// A trainable tensor with an optional attached gradient.
#[derive(Debug, Clone)]
pub struct Parameter {
    id: ParamId,
    /// Current parameter values, updated in place by the optimizer.
    pub value: ArrayD<f64>,
    /// Gradient attached by the external differentiation mechanism;
    /// `None` means "skip this parameter on the next step".
    pub grad: Option<ArrayD<f64>>,
}

impl Parameter {
    /// Wrap a tensor as a trainable parameter with a fresh [`ParamId`].
    pub fn new(value: ArrayD<f64>) -> Parameter {
        let id = ParamId(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed));
        Parameter { id, value, grad: None }
    }

    /// Wrap a tensor directly into a shared handle.
    pub fn handle(value: ArrayD<f64>) -> ParamHandle {
        Rc::new(RefCell::new(Parameter::new(value)))
    }

    /// Stable identity of this parameter.
    pub fn id(&self) -> ParamId {
        self.id
    }

    /// Shape of the parameter tensor.
    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    /// Attach a gradient for the next optimization step.
    ///
    /// Shape agreement is validated at step time, where a mismatch is
    /// reported with full context.
    pub fn set_grad(&mut self, grad: ArrayD<f64>) {
        self.grad = Some(grad);
    }

    /// Detach any gradient, so the next step skips this parameter.
    pub fn clear_grad(&mut self) {
        self.grad = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - ParamId uniqueness across constructions.
    // - Gradient attach/clear behavior.
    //
    // They intentionally DO NOT cover:
    // - Step-time shape validation (step-driver tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that distinct parameters receive distinct ids and that an id is
    // stable across handle clones.
    //
    // Given
    // -----
    // - Two parameters and a cloned handle of the first.
    //
    // Expect
    // ------
    // - The two parameters have different ids; the clone shares the first's.
    fn param_ids_are_unique_and_stable() {
        // Arrange
        let a = Parameter::handle(ArrayD::zeros(IxDyn(&[2])));
        let b = Parameter::handle(ArrayD::zeros(IxDyn(&[2])));

        // Act
        let a_clone = Rc::clone(&a);

        // Assert
        assert_ne!(a.borrow().id(), b.borrow().id());
        assert_eq!(a.borrow().id(), a_clone.borrow().id());
    }

    #[test]
    // Purpose
    // -------
    // Verify gradient attach and clear round-trips.
    //
    // Given
    // -----
    // - A parameter of shape (2,) and a gradient tensor.
    //
    // Expect
    // ------
    // - `set_grad` stores the tensor; `clear_grad` removes it.
    fn set_and_clear_grad_round_trip() {
        // Arrange
        let mut param = Parameter::new(ArrayD::zeros(IxDyn(&[2])));
        let grad = ArrayD::from_elem(IxDyn(&[2]), 1.5);

        // Act + Assert
        param.set_grad(grad.clone());
        assert_eq!(param.grad.as_ref(), Some(&grad));
        param.clear_grad();
        assert!(param.grad.is_none());
    }
}
