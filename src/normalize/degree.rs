//! Degree matrices of boundary operators
//!
//! For `B1: C1 -> C0` and `B2: C2 -> C1`:
//!
//! - `D2 = diag(max(rowsum(|B2|), 1))`, one entry per 1-cell, floored at 1
//! - `D1 = 2 · diag(rowsum(|B1| · D2))`, one entry per 0-cell
//! - `D3 = diag(1/3, …)`, one entry per 2-cell
//! - `D5 = diag(rowsum(|B2|))`, one entry per 1-cell, not floored
//!
//! Each degree matrix is returned in the storage mode of its input.

use ndarray::Array1;
use tracing::debug;

use crate::error::{NormError, Result};
use crate::matrix::{operand_pair, Matrix, Operand, OperandPair, Operator};

/// Number of boundary faces of a triangular 2-cell
pub const TRIANGLE_FACES: f64 = 3.0;

/// Replace infinite scaling factors by zero
///
/// A zero degree raised to a negative power is infinite; the corresponding
/// row or column must be annihilated instead. Returns the number of entries
/// replaced.
pub fn zero_degenerate_degrees(factors: &mut Array1<f64>) -> usize {
    let mut replaced = 0;
    for f in factors.iter_mut() {
        if f.is_infinite() {
            *f = 0.0;
            replaced += 1;
        }
    }
    replaced
}

/// `degrees^power` element-wise with degenerate degrees zeroed
pub fn inverse_power(degrees: &Array1<f64>, power: f64) -> Array1<f64> {
    let mut factors = degrees.mapv(|d| d.powf(power));
    let replaced = zero_degenerate_degrees(&mut factors);
    if replaced > 0 {
        debug!(replaced, power, "zeroed scaling factors of zero-degree rows");
    }
    factors
}

pub(crate) fn d1<M: Operator>(b1: &M, d2: &M) -> M {
    let degrees = b1.abs().dot(d2).row_sums();
    M::from_diagonal(&degrees.mapv(|d| 2.0 * d))
}

pub(crate) fn d2<M: Operator>(b2: &M) -> M {
    let degrees = b2.abs().row_sums().mapv(|d| d.max(1.0));
    M::from_diagonal(&degrees)
}

pub(crate) fn d3<M: Operator>(b2: &M) -> M {
    let (_, faces) = b2.shape();
    M::from_diagonal(&Array1::from_elem(faces, 1.0 / TRIANGLE_FACES))
}

pub(crate) fn d5<M: Operator>(b2: &M) -> M {
    M::from_diagonal(&b2.abs().row_sums())
}

/// Degree matrix `D1 = 2 · diag(rowsum(|B1| · D2))`
///
/// `d2` is normally the output of [`compute_d2`] and must be square with
/// one row per column of `b1`.
pub fn compute_d1(b1: &Matrix, d2: &Matrix) -> Result<Matrix> {
    let (_, edges) = b1.shape();
    let (d2_rows, d2_cols) = d2.shape();
    if d2_rows != d2_cols {
        return Err(NormError::not_square(d2_rows, d2_cols));
    }
    if d2_rows != edges {
        return Err(NormError::dimension_mismatch("|B1| · D2", edges, d2_rows));
    }

    Ok(match operand_pair(b1, d2)? {
        OperandPair::Dense(b1, d2) => d1(b1, d2).into_matrix(),
        OperandPair::Sparse(b1, d2) => d1(b1, d2).into_matrix(),
    })
}

/// Degree matrix `D2 = diag(max(rowsum(|B2|), 1))`
pub fn compute_d2(b2: &Matrix) -> Result<Matrix> {
    Ok(match b2.operand()? {
        Operand::Dense(b2) => d2(b2).into_matrix(),
        Operand::Sparse(b2) => d2(b2).into_matrix(),
    })
}

/// Degree matrix `D3 = diag(1/3, …)` over the columns (2-cells) of `B2`
pub fn compute_d3(b2: &Matrix) -> Result<Matrix> {
    Ok(match b2.operand()? {
        Operand::Dense(b2) => d3(b2).into_matrix(),
        Operand::Sparse(b2) => d3(b2).into_matrix(),
    })
}

/// Degree matrix `D5 = diag(rowsum(|B2|))`
pub fn compute_d5(b2: &Matrix) -> Result<Matrix> {
    Ok(match b2.operand()? {
        Operand::Dense(b2) => d5(b2).into_matrix(),
        Operand::Sparse(b2) => d5(b2).into_matrix(),
    })
}
