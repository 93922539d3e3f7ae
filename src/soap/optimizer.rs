//! Optimizer surface — parameter groups and the multi-parameter step loop.
//!
//! Purpose
//! -------
//! Provide the user-facing [`Soap`] type: it owns the parameter groups and a
//! map of per-parameter [`PreconditionerState`] keyed by [`ParamId`], and
//! drives [`step_param`] over every parameter that has a gradient attached.
//!
//! Key behaviors
//! -------------
//! - State is created lazily on the first step that observes a gradient for
//!   a parameter, sized from that parameter's shape and configured from its
//!   group's options.
//! - Parameters without a gradient are skipped silently; their state (if
//!   any) is left exactly as the previous step left it.
//! - Groups are independent: each carries its own validated [`SoapOptions`],
//!   so e.g. embedding-like parameters can run a different refresh cadence
//!   than dense layers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters are updated strictly sequentially within a step; an error
//!   on one parameter aborts the step, leaving already-updated parameters
//!   committed. Callers treat a failed step as fatal for the run.
//!
//! Examples
//! --------
//! ```
//! use ndarray::array;
//! use soap_optim::soap::{Parameter, Soap, SoapOptions};
//!
//! let weights = Parameter::handle(array![1.0, 2.0].into_dyn());
//! let mut optimizer = Soap::new(vec![weights.clone()], SoapOptions::default()).unwrap();
//!
//! weights.borrow_mut().set_grad(array![0.1, -0.2].into_dyn());
//! optimizer.step().unwrap(); // warm-up: builds the preconditioner
//! optimizer.step().unwrap(); // first real update
//! ```
use crate::soap::core::options::SoapOptions;
use crate::soap::core::param::{ParamHandle, ParamId};
use crate::soap::core::state::PreconditionerState;
use crate::soap::core::step::step_param;
use crate::soap::errors::SoapResult;
use std::collections::HashMap;

/// A set of parameters sharing one hyperparameter configuration.
#[derive(Debug, Clone)]
pub struct ParamGroup {
    /// Shared handles to the group's parameters.
    pub params: Vec<ParamHandle>,
    /// Hyperparameters applied to every parameter in the group.
    pub options: SoapOptions,
}

impl ParamGroup {
    /// Bundle parameters with a shared, already-validated configuration.
    pub fn new(params: Vec<ParamHandle>, options: SoapOptions) -> ParamGroup {
        ParamGroup { params, options }
    }
}

/// The SOAP optimizer: Shampoo-style per-axis preconditioning with Adam
/// moments tracked in the preconditioner's eigenbasis.
#[derive(Debug)]
pub struct Soap {
    groups: Vec<ParamGroup>,
    states: HashMap<ParamId, PreconditionerState>,
}

impl Soap {
    /// Create an optimizer over a single group of parameters.
    ///
    /// # Errors
    /// Propagates the validation error if `options` came from a caller-built
    /// struct literal with out-of-range fields.
    pub fn new(params: Vec<ParamHandle>, options: SoapOptions) -> SoapResult<Soap> {
        options.validate()?;
        Ok(Soap::with_groups(vec![ParamGroup::new(params, options)]))
    }

    /// Create an optimizer over pre-built parameter groups.
    pub fn with_groups(groups: Vec<ParamGroup>) -> Soap {
        Soap { groups, states: HashMap::new() }
    }

    /// Run one optimization step over every parameter with an attached
    /// gradient.
    ///
    /// Parameters whose `grad` is `None` are skipped. The first step a
    /// parameter is seen with a gradient is its warm-up: state is created,
    /// the preconditioner is seeded, and no update is applied.
    ///
    /// # Errors
    /// The first per-parameter failure aborts the step; see
    /// [`step_param`](crate::soap::core::step::step_param) for the error
    /// conditions. Parameters updated before the failure keep their new
    /// values.
    pub fn step(&mut self) -> SoapResult<()> {
        for group in &self.groups {
            for handle in &group.params {
                let mut guard = handle.borrow_mut();
                let param = &mut *guard;
                let grad = match &param.grad {
                    Some(grad) => grad,
                    None => continue,
                };
                let state = self.states.entry(param.id()).or_insert_with(|| {
                    PreconditionerState::new(
                        param.value.shape(),
                        group.options.preconditioner_decay(),
                        group.options.refresh_period,
                    )
                });
                step_param(&mut param.value, grad, state, &group.options)?;
            }
        }
        Ok(())
    }

    /// Inspect the state tracked for a parameter, if any step has created it.
    pub fn state(&self, id: ParamId) -> Option<&PreconditionerState> {
        self.states.get(&id)
    }

    /// The optimizer's parameter groups.
    pub fn groups(&self) -> &[ParamGroup] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::core::param::Parameter;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Lazy state creation keyed by parameter identity.
    // - Skipping parameters without gradients.
    // - Per-group options reaching each parameter's state.
    //
    // They intentionally DO NOT cover:
    // - Single-parameter update numerics (step-driver tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a parameter without a gradient is skipped: no state entry
    // and no value change, while its sibling with a gradient is processed.
    //
    // Given
    // -----
    // - Two parameters in one group; only the first has a gradient. Two
    //   steps are taken.
    //
    // Expect
    // ------
    // - The first parameter has state with step_count 1 and a changed value;
    //   the second has no state entry and an unchanged value.
    fn parameters_without_gradients_are_skipped() {
        // Arrange
        let with_grad = Parameter::handle(array![1.0].into_dyn());
        let without_grad = Parameter::handle(array![4.0].into_dyn());
        let mut optimizer = Soap::new(
            vec![with_grad.clone(), without_grad.clone()],
            SoapOptions::default(),
        )
        .unwrap();
        with_grad.borrow_mut().set_grad(array![0.5].into_dyn());

        // Act
        optimizer.step().unwrap();
        optimizer.step().unwrap();

        // Assert
        let stepped_id = with_grad.borrow().id();
        let skipped_id = without_grad.borrow().id();
        assert_eq!(optimizer.state(stepped_id).map(|s| s.step_count), Some(1));
        assert!(optimizer.state(skipped_id).is_none());
        assert!(with_grad.borrow().value[[0]] < 1.0);
        assert_eq!(without_grad.borrow().value, array![4.0].into_dyn());
    }

    #[test]
    // Purpose
    // -------
    // Verify lazy state creation picks up group options, including the
    // covariance-decay override.
    //
    // Given
    // -----
    // - Two groups with different shampoo decays and refresh periods, one
    //   parameter each, both with gradients.
    //
    // Expect
    // ------
    // - Each parameter's state carries its own group's decay and period.
    fn group_options_configure_each_state() {
        // Arrange
        let fast = Parameter::handle(array![1.0, 2.0].into_dyn());
        let slow = Parameter::handle(array![3.0].into_dyn());
        let fast_opts = SoapOptions::new(0.003, 0.95, 0.95, Some(0.8), 1e-8, 5).unwrap();
        let slow_opts = SoapOptions::new(0.001, 0.9, 0.99, None, 1e-8, 50).unwrap();
        let mut optimizer = Soap::with_groups(vec![
            ParamGroup::new(vec![fast.clone()], fast_opts),
            ParamGroup::new(vec![slow.clone()], slow_opts),
        ]);
        fast.borrow_mut().set_grad(array![0.1, 0.1].into_dyn());
        slow.borrow_mut().set_grad(array![0.1].into_dyn());

        // Act
        optimizer.step().unwrap();

        // Assert
        let fast_state = optimizer.state(fast.borrow().id()).unwrap();
        assert!((fast_state.decay_rate - 0.8).abs() < 1e-12);
        assert_eq!(fast_state.refresh_period, 5);
        let slow_state = optimizer.state(slow.borrow().id()).unwrap();
        assert!((slow_state.decay_rate - 0.99).abs() < 1e-12);
        assert_eq!(slow_state.refresh_period, 50);
    }

    #[test]
    // Purpose
    // -------
    // Verify that state survives across steps and stays keyed to the same
    // parameter through handle clones.
    //
    // Given
    // -----
    // - One parameter stepped three times through a cloned handle.
    //
    // Expect
    // ------
    // - A single state entry whose step_count reads 2 (warm-up excluded).
    fn state_persists_across_steps() {
        // Arrange
        let param = Parameter::handle(array![1.0, -1.0].into_dyn());
        let clone = param.clone();
        let mut optimizer = Soap::new(vec![clone], SoapOptions::default()).unwrap();
        param.borrow_mut().set_grad(array![0.2, -0.3].into_dyn());

        // Act
        for _ in 0..3 {
            optimizer.step().unwrap();
        }

        // Assert
        let state = optimizer.state(param.borrow().id()).unwrap();
        assert_eq!(state.step_count, 2);
    }
}
