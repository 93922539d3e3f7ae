//! Core SOAP machinery — state, numerics, and the per-parameter step.
//!
//! Purpose
//! -------
//! House the building blocks the optimizer surface composes: validated
//! hyperparameters, parameter handles, per-parameter preconditioner state,
//! the covariance/moment trackers, eigenbasis lifecycle management, the
//! projection maps, and the step driver that sequences them.
//!
//! Submodules
//! ----------
//! - [`options`]: validated hyperparameter container and defaults.
//! - [`param`]: trainable parameter handles and stable identities.
//! - [`state`]: the per-parameter preconditioner record.
//! - [`covariance`]: per-axis gradient outer-product EMAs.
//! - [`projection`]: eigenbasis coordinate maps and their inverse.
//! - [`moments`]: Adam-style moment blends and bias corrections.
//! - [`eigenbasis`]: full initialization and power-iteration refresh.
//! - [`step`]: the single-parameter step sequence.
//! - [`validation`]: hyperparameter and gradient consistency checks.

pub mod covariance;
pub mod eigenbasis;
pub mod moments;
pub mod options;
pub mod param;
pub mod projection;
pub mod state;
pub mod step;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::options::SoapOptions;
pub use self::param::{ParamHandle, ParamId, Parameter};
pub use self::state::{Eigenbasis, PreconditionerState};
