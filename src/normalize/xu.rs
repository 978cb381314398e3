//! Xu's asymmetric (row-degree) normalization of boundary operators
//!
//! `B̂ = D^{-1} · B` with `D = diag(rowsum(|B|))`. Zero rows stay zero.

use tracing::debug;

use super::degree::inverse_power;
use crate::error::Result;
use crate::matrix::{CsrMatrix, Matrix, Operand, Operator};

fn xu<M: Operator>(boundary: &M) -> M {
    let d_inv = M::from_diagonal(&inverse_power(&boundary.abs().row_sums(), -1.0));
    d_inv.dot(boundary)
}

/// Normalize a boundary-like matrix by its absolute row sums
///
/// `is_sparse` selects the arithmetic path: CSR products when `true`,
/// dense array products when `false`. Both paths produce the same values,
/// and the result always keeps the storage mode of `boundary`.
pub fn compute_xu_asymmetric_normalized_matrix(boundary: &Matrix, is_sparse: bool) -> Result<Matrix> {
    let (rows, cols) = boundary.shape();
    debug!(rows, cols, storage = %boundary.storage(), is_sparse, "xu normalization");

    Ok(match (boundary.operand()?, is_sparse) {
        (Operand::Sparse(b), true) => Matrix::Sparse(xu(b)),
        (Operand::Dense(b), false) => Matrix::Dense(xu(b)),
        (Operand::Sparse(b), false) => Matrix::Sparse(CsrMatrix::from_dense(&xu(&b.to_dense()))),
        (Operand::Dense(b), true) => Matrix::Dense(xu(&CsrMatrix::from_dense(b)).to_dense()),
    })
}
