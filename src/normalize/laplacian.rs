//! Spectral normalization of Laplacians
//!
//! Divides an operator by the dominant eigenvalue of a reference Laplacian,
//! so the normalized reference has spectrum in `[-1, 1]` (`[0, 1]` when it
//! is positive semi-definite).

use tracing::{debug, warn};

use crate::error::{NormError, Result};
use crate::linalg::{dominant_eigenvalue, EigenConfig};
use crate::matrix::{operand_pair, Matrix, Operand, OperandPair, Operator};

fn ensure_square(matrix: &Matrix) -> Result<usize> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(NormError::not_square(rows, cols));
    }
    Ok(rows)
}

fn scale_by_dominant<M: Operator>(reference: &M, target: &M, config: &EigenConfig) -> Result<M> {
    let lambda = dominant_eigenvalue(reference, config)?;
    if lambda == 0.0 {
        warn!("dominant eigenvalue is zero, normalized operator will not be finite");
    }
    debug!(lambda, "scaling by reciprocal dominant eigenvalue");
    Ok(target.scale(1.0 / lambda))
}

/// Normalize a Laplacian by its dominant eigenvalue: `L / λ_max`
pub fn compute_laplacian_normalized_matrix(laplacian: &Matrix) -> Result<Matrix> {
    compute_laplacian_normalized_matrix_with(laplacian, &EigenConfig::default())
}

/// [`compute_laplacian_normalized_matrix`] with explicit solver controls
pub fn compute_laplacian_normalized_matrix_with(
    laplacian: &Matrix,
    config: &EigenConfig,
) -> Result<Matrix> {
    let n = ensure_square(laplacian)?;
    debug!(n, storage = %laplacian.storage(), "normalizing laplacian");

    Ok(match laplacian.operand()? {
        Operand::Dense(l) => scale_by_dominant(l, l, config)?.into_matrix(),
        Operand::Sparse(l) => scale_by_dominant(l, l, config)?.into_matrix(),
    })
}

/// Normalize an up or down Laplacian by the dominant eigenvalue of `L`: `Lx / λ_max(L)`
///
/// `Lx` must have the shape of `L` and share its storage mode.
pub fn compute_x_laplacian_normalized_matrix(laplacian: &Matrix, lx: &Matrix) -> Result<Matrix> {
    compute_x_laplacian_normalized_matrix_with(laplacian, lx, &EigenConfig::default())
}

/// [`compute_x_laplacian_normalized_matrix`] with explicit solver controls
pub fn compute_x_laplacian_normalized_matrix_with(
    laplacian: &Matrix,
    lx: &Matrix,
    config: &EigenConfig,
) -> Result<Matrix> {
    let n = ensure_square(laplacian)?;
    let (rows, cols) = lx.shape();
    if rows != n {
        return Err(NormError::dimension_mismatch("Lx rows", n, rows));
    }
    if cols != n {
        return Err(NormError::dimension_mismatch("Lx cols", n, cols));
    }
    debug!(n, storage = %laplacian.storage(), "normalizing x-laplacian");

    Ok(match operand_pair(laplacian, lx)? {
        OperandPair::Dense(l, lx) => scale_by_dominant(l, lx, config)?.into_matrix(),
        OperandPair::Sparse(l, lx) => scale_by_dominant(l, lx, config)?.into_matrix(),
    })
}
