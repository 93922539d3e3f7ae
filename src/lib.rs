//! soap-optim — SOAP: Shampoo eigenbasis preconditioning with Adam moments.
//!
//! Purpose
//! -------
//! Implement the SOAP optimizer (https://arxiv.org/abs/2409.11321): for each
//! trainable tensor, maintain per-axis covariance accumulators in the Shampoo
//! style, track their eigenbases, and run Adam-style first/second moment
//! estimation with the second moment kept in the rotated (eigenbasis)
//! coordinate system. Parameter updates are computed in that basis and
//! projected back before being applied in place.
//!
//! Key behaviors
//! -------------
//! - Lazily create one [`soap::PreconditionerState`] per parameter the first
//!   time a gradient is observed; that first call only initializes state and
//!   performs no parameter update.
//! - Blend per-axis gradient outer products into covariance accumulators
//!   every step, strictly *after* the step's parameter update has consumed
//!   the gradient.
//! - Build eigenbases once via full symmetric eigendecomposition, then track
//!   them cheaply with one power-iteration step plus QR re-orthonormalization
//!   on a fixed cadence, keeping the projected second moment axis-consistent
//!   through the refresh permutation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Gradients are produced by an external differentiation mechanism and
//!   attached to [`soap::Parameter`] handles before [`soap::Soap::step`] is
//!   called; parameters without a gradient are skipped silently.
//! - Covariance matrices are symmetric positive semi-definite up to floating
//!   error; a tiny diagonal jitter guards degenerate decompositions.
//! - All numerical work is `f64` on `ndarray` containers; factorizations run
//!   on `nalgebra` matrices behind explicit copy bridges in [`linalg`].
//!
//! Conventions
//! -----------
//! - Eigenbasis columns are ordered by descending (estimated) eigenvalue.
//! - This crate performs no I/O and no logging; failures are surfaced as
//!   typed errors ([`soap::SoapError`], [`linalg::LinAlgError`]).
//! - Checkpointing is an external collaborator's concern; per-parameter state
//!   records are exposed read-only for that purpose.
//!
//! Downstream usage
//! ----------------
//! - Wrap each trainable tensor in a [`soap::Parameter`] and share the
//!   resulting [`soap::ParamHandle`] between the training loop (which writes
//!   gradients) and the optimizer (which writes values).
//! - Construct a [`soap::Soap`] from handles plus [`soap::SoapOptions`], or
//!   from explicit [`soap::ParamGroup`]s with per-group hyperparameters, and
//!   call [`soap::Soap::step`] once per optimization step.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module and cover projection invertibility,
//!   covariance shape laws, refresh permutation consistency, bias-correction
//!   limits, and option validation.
//! - `tests/integration_soap_pipeline.rs` drives full multi-step runs over
//!   the documented end-to-end scenarios.

pub mod linalg;
pub mod soap;
