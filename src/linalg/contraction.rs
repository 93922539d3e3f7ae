//! Explicit per-axis tensor contractions for eigenbasis projection.
//!
//! Implements the two contraction primitives the optimizer core needs:
//!
//! - [`contract_axis`]: contract one tensor axis against a square matrix,
//!   selecting which matrix index participates via [`ContractIndex`]. This is
//!   the building block of eigenbasis projection (first index) and its
//!   inverse (second index).
//! - [`axis_outer_product`]: contract a gradient with itself over every axis
//!   *except* one, yielding the per-axis covariance contribution
//!   `C_i[a, b] = Σ G[.., a, ..] · G[.., b, ..]`.
//!
//! ## Layout strategy
//! Both primitives move the target axis to the front, flatten the remaining
//! axes into one, and delegate to a single matrix–matrix product. The axis
//! order of [`contract_axis`]'s result is restored afterwards, so the
//! contracted axis stays in place and callers never re-derive axis positions.
//!
//! ## Invariants
//! - The matrix passed to [`contract_axis`] must be `d×d` where `d` is the
//!   length of the contracted axis; mismatches are reported as
//!   [`LinAlgError::DimensionMismatch`], never truncated.
//! - Element counts are preserved by construction at every reshape; those
//!   reshapes cannot fail for inputs that pass the dimension check.
use crate::linalg::errors::{LinAlgError, LinAlgResult};
use ndarray::{Array2, ArrayD, IxDyn};

/// Which index of the basis matrix participates in a contraction.
///
/// For an orthonormal basis `Q`, contracting a tensor axis against `Q`'s
/// first index applies `Qᵀ` along that axis (projection into eigenbasis
/// coordinates); contracting against the second index applies `Q` (the
/// inverse map). Downstream code matches on this exhaustively so new
/// variants would be flagged by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractIndex {
    /// Contract against the matrix's first (row) index: applies `Qᵀ`.
    First,
    /// Contract against the matrix's second (column) index: applies `Q`.
    Second,
}

/// Contract `tensor`'s axis `axis` against the square matrix `basis`.
///
/// # Definition
/// With `side = First` the result is
/// `out[.., b, ..] = Σ_a basis[a, b] · tensor[.., a, ..]`, and with
/// `side = Second` it is
/// `out[.., b, ..] = Σ_a basis[b, a] · tensor[.., a, ..]`,
/// where the shown index ranges over `axis`. All other axes are untouched
/// and keep their positions.
///
/// # Behavior
/// - Moves `axis` to the front, flattens the rest, performs one `dot`, and
///   restores the original axis order on the result.
/// - Allocates the output tensor; the input is only read.
///
/// # Errors
/// - [`LinAlgError::DimensionMismatch`] if `basis` is not `d×d` for
///   `d = tensor.shape()[axis]`.
pub fn contract_axis(
    tensor: &ArrayD<f64>, basis: &Array2<f64>, axis: usize, side: ContractIndex,
) -> LinAlgResult<ArrayD<f64>> {
    let dim = tensor.shape()[axis];
    if basis.nrows() != dim {
        return Err(LinAlgError::DimensionMismatch { expected: dim, found: basis.nrows() });
    }
    if basis.ncols() != dim {
        return Err(LinAlgError::DimensionMismatch { expected: dim, found: basis.ncols() });
    }

    let ndim = tensor.ndim();
    let mut perm: Vec<usize> = Vec::with_capacity(ndim);
    perm.push(axis);
    perm.extend((0..ndim).filter(|&j| j != axis));

    let moved = tensor.view().permuted_axes(IxDyn(&perm));
    let moved = moved.as_standard_layout();
    let rest = moved.len() / dim.max(1);
    let flat = moved
        .to_shape((dim, rest))
        .expect("axis-to-front move preserves the element count");

    // One GEMM covers both directions: Qᵀ·X for projection, Q·X for the
    // inverse map.
    let contracted = match side {
        ContractIndex::First => basis.t().dot(&flat),
        ContractIndex::Second => basis.dot(&flat),
    };

    let mut out_shape: Vec<usize> = Vec::with_capacity(ndim);
    out_shape.push(dim);
    out_shape.extend(perm[1..].iter().map(|&j| tensor.shape()[j]));
    let out = contracted
        .into_shape_with_order(IxDyn(&out_shape))
        .expect("contraction preserves the element count");

    let mut inverse = vec![0usize; ndim];
    for (position, &original_axis) in perm.iter().enumerate() {
        inverse[original_axis] = position;
    }
    Ok(out.permuted_axes(IxDyn(&inverse)))
}

/// Contract `tensor` with itself over every axis except `axis`.
///
/// # Definition
/// `C[a, b] = Σ_{all indices except axis} tensor[.., a, ..] · tensor[.., b, ..]`
/// with `a, b` ranging over `axis`. Equivalently, `C = T_(i) · T_(i)ᵀ` for
/// the mode-`axis` unfolding `T_(i)`.
///
/// # Behavior
/// - The result is symmetric positive semi-definite by construction (up to
///   floating error) and has shape `(d, d)` for `d = tensor.shape()[axis]`.
/// - Allocates one standard-layout copy of the unfolded tensor plus the
///   output matrix.
pub fn axis_outer_product(tensor: &ArrayD<f64>, axis: usize) -> Array2<f64> {
    let dim = tensor.shape()[axis];
    let ndim = tensor.ndim();

    let mut perm: Vec<usize> = Vec::with_capacity(ndim);
    perm.push(axis);
    perm.extend((0..ndim).filter(|&j| j != axis));

    let moved = tensor.view().permuted_axes(IxDyn(&perm));
    let moved = moved.as_standard_layout();
    let rest = moved.len() / dim.max(1);
    let flat = moved
        .to_shape((dim, rest))
        .expect("axis-to-front move preserves the element count");

    flat.dot(&flat.t())
}
