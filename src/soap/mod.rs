//! soap — the SOAP optimizer: Shampoo preconditioning with Adam moments in
//! the preconditioner's eigenbasis.
//!
//! Purpose
//! -------
//! Expose the optimizer's public surface: [`Soap`] and [`ParamGroup`] for
//! driving steps, [`Parameter`]/[`ParamHandle`] for sharing tensors with a
//! training loop, [`SoapOptions`] for configuration, and the state types
//! for inspection.
//!
//! Key behaviors
//! -------------
//! - Each parameter axis carries an EMA of gradient outer products; its
//!   eigenbasis defines the coordinates in which Adam's second moment is
//!   tracked and the update direction is computed.
//! - The first step a gradient is observed for a parameter is a warm-up
//!   that seeds the preconditioner without updating the value; the basis is
//!   then refreshed periodically by power iteration plus QR.
//! - All configuration and gradient problems surface as typed
//!   [`SoapError`] values, never panics.

pub mod core;
pub mod errors;
pub mod optimizer;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    Eigenbasis, ParamHandle, ParamId, Parameter, PreconditionerState, SoapOptions,
};
pub use self::errors::{SoapError, SoapResult};
pub use self::optimizer::{ParamGroup, Soap};
