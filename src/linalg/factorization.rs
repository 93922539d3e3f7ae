//! Symmetric eigendecomposition and QR re-orthonormalization.
//!
//! Purpose
//! -------
//! Provide the two factorization primitives the optimizer core consumes:
//! [`symmetric_eigenbasis`] for the one-time full eigenbasis build and
//! [`qr_orthonormal`] for the steady-state power-iteration refresh. Both
//! operate on `ndarray` matrices and delegate the numerics to `nalgebra`'s
//! `DMatrix` routines behind explicit copy bridges.
//!
//! Key behaviors
//! -------------
//! - Add a tiny diagonal jitter before eigendecomposition so exactly
//!   singular accumulators (e.g. an all-zero covariance) stay decomposable.
//! - Reorder eigenvector columns to the crate-wide descending-eigenvalue
//!   convention; `nalgebra` returns eigenpairs in no particular order.
//! - Validate inputs and factors for finiteness: a NaN/±inf entry aborts
//!   with a typed [`LinAlgError`] instead of propagating silently. There is
//!   no automatic higher-precision retry; degeneracy is the caller's to see.
//!
//! Conventions
//! -----------
//! - All matrices are square and `f64`. Symmetry of eigendecomposition
//!   inputs is the caller's responsibility (covariance accumulators are
//!   symmetric by construction).
//! - Copy bridges are column-major on the `nalgebra` side, matching
//!   `DMatrix` storage.
//!
//! Testing notes
//! -------------
//! - Unit tests cover descending ordering on a known spectrum, jitter
//!   handling of the all-zero matrix, QR orthonormality, and non-finite
//!   rejection. Interaction with the refresh permutation is tested in the
//!   eigenbasis module.
use crate::linalg::errors::{LinAlgError, LinAlgResult};
use nalgebra::DMatrix;
use ndarray::Array2;

/// Diagonal jitter added before eigendecomposition.
///
/// Covariance accumulators may be exactly singular (an all-zero gradient
/// stream keeps them at zero). The jitter keeps the decomposition input
/// non-degenerate while being far below any scale the accumulators reach on
/// real gradients, so it never influences the resulting basis in practice.
pub const EIGEN_JITTER: f64 = 1e-30;

/// Compute the orthonormal eigenbasis of a symmetric matrix, columns ordered
/// by descending eigenvalue.
///
/// # Behavior
/// - Adds `jitter` to the diagonal, runs `nalgebra`'s symmetric
///   eigendecomposition, sorts the eigenpairs by descending eigenvalue, and
///   returns the eigenvector matrix.
/// - The input is only read; the result is a fresh `d×d` matrix with
///   orthonormal columns.
///
/// # Errors
/// - [`LinAlgError::NonFiniteInput`] if `matrix` contains a NaN/±inf entry.
/// - [`LinAlgError::NonFiniteFactor`] if the decomposition fails to produce
///   finite eigenvectors.
pub fn symmetric_eigenbasis(matrix: &Array2<f64>, jitter: f64) -> LinAlgResult<Array2<f64>> {
    validate_finite(matrix, |row, col, value| LinAlgError::NonFiniteInput { row, col, value })?;

    let n = matrix.nrows();
    let mut jittered = to_dmatrix(matrix);
    for i in 0..n {
        jittered[(i, i)] += jitter;
    }

    let decomposition = jittered.symmetric_eigen();
    let order = descending_order(decomposition.eigenvalues.iter().copied());

    let mut basis = Array2::<f64>::zeros((n, n));
    for (new_col, &old_col) in order.iter().enumerate() {
        for row in 0..n {
            basis[[row, new_col]] = decomposition.eigenvectors[(row, old_col)];
        }
    }
    validate_finite(&basis, |row, col, value| LinAlgError::NonFiniteFactor { row, col, value })?;
    Ok(basis)
}

/// Re-orthonormalize a near-orthogonal matrix via QR factorization.
///
/// Used on the power-iteration product `cov · Q` during periodic refresh:
/// the orthonormal `Q` factor becomes the new eigenbasis while the upper
/// triangular factor is discarded.
///
/// # Errors
/// - [`LinAlgError::NonFiniteInput`] if `matrix` contains a NaN/±inf entry.
/// - [`LinAlgError::NonFiniteFactor`] if the factorization produces a
///   non-finite entry.
pub fn qr_orthonormal(matrix: &Array2<f64>) -> LinAlgResult<Array2<f64>> {
    validate_finite(matrix, |row, col, value| LinAlgError::NonFiniteInput { row, col, value })?;

    let q_factor = to_dmatrix(matrix).qr().q();
    let orthonormal = from_dmatrix(&q_factor);
    validate_finite(&orthonormal, |row, col, value| LinAlgError::NonFiniteFactor {
        row,
        col,
        value,
    })?;
    Ok(orthonormal)
}

/// Sort indices `0..n` by descending value.
///
/// `total_cmp` keeps the sort well-defined even for pathological inputs;
/// non-finite values are rejected before any caller reaches this point.
pub(crate) fn descending_order(values: impl Iterator<Item = f64>) -> Vec<usize> {
    let collected: Vec<f64> = values.collect();
    let mut order: Vec<usize> = (0..collected.len()).collect();
    order.sort_by(|&a, &b| collected[b].total_cmp(&collected[a]));
    order
}

// ---- ndarray <-> nalgebra bridges ----

/// Copy an `ndarray` matrix into a `nalgebra::DMatrix`, column by column to
/// match `DMatrix`'s column-major storage.
fn to_dmatrix(source: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = (source.nrows(), source.ncols());
    let mut out = DMatrix::<f64>::zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            out[(i, j)] = source[[i, j]];
        }
    }
    out
}

/// Copy a `nalgebra::DMatrix` back into an `ndarray` matrix.
fn from_dmatrix(source: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((source.nrows(), source.ncols()), |(i, j)| source[(i, j)])
}

/// Report the first non-finite entry of `matrix` via `make_error`.
fn validate_finite(
    matrix: &Array2<f64>, make_error: impl Fn(usize, usize, f64) -> LinAlgError,
) -> LinAlgResult<()> {
    for ((row, col), &value) in matrix.indexed_iter() {
        if !value.is_finite() {
            return Err(make_error(row, col, value));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Descending eigenvalue ordering of `symmetric_eigenbasis` on a known
    //   diagonal spectrum.
    // - Jitter handling of the exactly-singular all-zero matrix.
    // - Orthonormality of the QR `Q` factor.
    // - Rejection of non-finite inputs.
    //
    // They intentionally DO NOT cover:
    // - The refresh permutation of the projected second moment (eigenbasis
    //   module tests).
    // -------------------------------------------------------------------------

    fn assert_orthonormal(q: &Array2<f64>, tol: f64) {
        let gram = q.t().dot(q);
        for ((i, j), &value) in gram.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!(
                (value - expected).abs() < tol,
                "Gram[{i},{j}] = {value}, expected {expected}"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that eigenvector columns come back ordered by descending
    // eigenvalue for a diagonal matrix with a known spectrum.
    //
    // Given
    // -----
    // - M = diag(1, 5, 3).
    //
    // Expect
    // ------
    // - Column 0 spans e_1 (eigenvalue 5), column 1 spans e_2 (eigenvalue 3),
    //   column 2 spans e_0 (eigenvalue 1), each up to sign.
    fn symmetric_eigenbasis_orders_columns_descending() {
        // Arrange
        let m = array![[1.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 3.0]];

        // Act
        let q = symmetric_eigenbasis(&m, EIGEN_JITTER).unwrap();

        // Assert
        assert!((q[[1, 0]].abs() - 1.0).abs() < 1e-10);
        assert!((q[[2, 1]].abs() - 1.0).abs() < 1e-10);
        assert!((q[[0, 2]].abs() - 1.0).abs() < 1e-10);
        assert_orthonormal(&q, 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the jitter keeps the exactly-singular all-zero matrix
    // decomposable and the result orthonormal.
    //
    // Given
    // -----
    // - M = 0 (3×3).
    //
    // Expect
    // ------
    // - `symmetric_eigenbasis` succeeds and returns an orthonormal matrix.
    fn symmetric_eigenbasis_handles_all_zero_matrix() {
        // Arrange
        let m = Array2::<f64>::zeros((3, 3));

        // Act
        let q = symmetric_eigenbasis(&m, EIGEN_JITTER)
            .expect("jittered decomposition of the zero matrix should succeed");

        // Assert
        assert_orthonormal(&q, 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the QR `Q` factor of a full-rank matrix is orthonormal.
    //
    // Given
    // -----
    // - A well-conditioned non-orthogonal 2×2 matrix.
    //
    // Expect
    // ------
    // - `qr_orthonormal` returns a matrix with QᵀQ = I within tolerance.
    fn qr_orthonormal_returns_orthonormal_factor() {
        // Arrange
        let m = array![[2.0, 1.0], [1.0, 3.0]];

        // Act
        let q = qr_orthonormal(&m).unwrap();

        // Assert
        assert_orthonormal(&q, 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure non-finite inputs are rejected with the offending coordinates
    // rather than passed into the factorization.
    //
    // Given
    // -----
    // - A matrix containing a NaN entry at (0, 1).
    //
    // Expect
    // ------
    // - `Err(LinAlgError::NonFiniteInput { row: 0, col: 1, .. })` from both
    //   primitives.
    fn factorizations_reject_non_finite_input() {
        // Arrange
        let m = array![[1.0, f64::NAN], [0.0, 1.0]];

        // Act
        let eig_err = symmetric_eigenbasis(&m, EIGEN_JITTER).unwrap_err();
        let qr_err = qr_orthonormal(&m).unwrap_err();

        // Assert
        match eig_err {
            LinAlgError::NonFiniteInput { row, col, .. } => {
                assert_eq!((row, col), (0, 1));
            }
            other => panic!("expected NonFiniteInput, got {other:?}"),
        }
        match qr_err {
            LinAlgError::NonFiniteInput { row, col, .. } => {
                assert_eq!((row, col), (0, 1));
            }
            other => panic!("expected NonFiniteInput, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Check that `descending_order` produces a non-increasing arrangement.
    //
    // Given
    // -----
    // - The values [0.5, 2.0, 1.0].
    //
    // Expect
    // ------
    // - The order [1, 2, 0].
    fn descending_order_sorts_indices() {
        // Arrange + Act
        let order = descending_order([0.5, 2.0, 1.0].into_iter());

        // Assert
        assert_eq!(order, vec![1, 2, 0]);
    }
}
