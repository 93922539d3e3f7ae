//! Eigenbasis projection — rotating tensors into and out of preconditioner
//! coordinates.
//!
//! ## What this module does
//! - [`project`]: contract the tensor against each axis's basis matrix
//!   using the matrix's **first** index, expressing the tensor in eigenbasis
//!   coordinates along every axis (applies `Q_iᵀ` per axis).
//! - [`project_back`]: the inverse map, contracting against the **second**
//!   index (applies `Q_i` per axis).
//!
//! For orthonormal bases, `project_back(project(T)) = T` up to floating
//! error; that round trip is the module's key tested property.
//!
//! ## Conventions
//! - Axis `i` of the tensor is always contracted against `bases[i]`; axis
//!   positions are preserved, so the two maps compose in any order with the
//!   moment-tracking code between them.
//! - A 0-dimensional tensor has an empty basis list and both maps are the
//!   identity.
use crate::linalg::{contract_axis, ContractIndex};
use crate::soap::errors::{SoapError, SoapResult};
use ndarray::{Array2, ArrayD};

/// Express `tensor` in eigenbasis coordinates along every axis.
///
/// # Errors
/// [`SoapError::DecompositionFailed`] wrapping a dimension mismatch if a
/// basis matrix does not fit its axis; unreachable when the basis list was
/// built from the same parameter shape.
pub fn project(tensor: &ArrayD<f64>, bases: &[Array2<f64>]) -> SoapResult<ArrayD<f64>> {
    apply(tensor, bases, ContractIndex::First)
}

/// Map a tensor in eigenbasis coordinates back to raw coordinates.
///
/// Exact inverse of [`project`] when every basis matrix is orthonormal.
///
/// # Errors
/// Same as [`project`].
pub fn project_back(tensor: &ArrayD<f64>, bases: &[Array2<f64>]) -> SoapResult<ArrayD<f64>> {
    apply(tensor, bases, ContractIndex::Second)
}

fn apply(
    tensor: &ArrayD<f64>, bases: &[Array2<f64>], side: ContractIndex,
) -> SoapResult<ArrayD<f64>> {
    let mut rotated = tensor.clone();
    for (axis, basis) in bases.iter().enumerate() {
        rotated = contract_axis(&rotated, basis, axis, side)
            .map_err(|source| SoapError::DecompositionFailed { axis, source })?;
    }
    Ok(rotated)
}
