//! linalg — tensor contraction and factorization backend for the optimizer.
//!
//! Purpose
//! -------
//! Bundle the linear-algebra primitives the SOAP core consumes: explicit
//! per-axis tensor–matrix contraction, per-axis gradient outer products,
//! symmetric eigendecomposition with a descending-eigenvalue column
//! convention, and QR re-orthonormalization. Tensors live in `ndarray`;
//! factorizations run on `nalgebra::DMatrix` behind explicit copy bridges.
//!
//! Key behaviors
//! -------------
//! - Every contraction takes an explicit axis index and a [`ContractIndex`]
//!   side selector; there is no variadic axis-list API.
//! - Factorization inputs and outputs are validated for finiteness; a
//!   NaN/±inf entry aborts with a typed [`LinAlgError`] carrying the
//!   offending coordinates.
//! - [`EIGEN_JITTER`] is added to the diagonal before eigendecomposition so
//!   exactly-singular accumulators remain decomposable.
//!
//! Downstream usage
//! ----------------
//! - The covariance tracker uses [`axis_outer_product`]; the projector uses
//!   [`contract_axis`]; the eigenbasis manager uses
//!   [`symmetric_eigenbasis`] and [`qr_orthonormal`].

pub mod contraction;
pub mod errors;
pub mod factorization;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::contraction::{axis_outer_product, contract_axis, ContractIndex};
pub use self::errors::{LinAlgError, LinAlgResult};
pub use self::factorization::{qr_orthonormal, symmetric_eigenbasis, EIGEN_JITTER};
