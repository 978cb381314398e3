//! Bunch normalization of a pair of boundary operators
//!
//! Builds the four operators of the normalized Hodge 1-Laplacian random
//! walk (Schaub et al., "Random walks on simplicial complexes and the
//! normalized Hodge 1-Laplacian"; Bunch et al., "Simplicial 2-complex
//! convolutional neural networks"):
//!
//! ```text
//! B1_norm  = D1⁺ · B1
//! B1T_norm = D2 · B1ᵀ · D1⁺
//! B2_norm  = B2 · D3
//! B2T_norm = B2ᵀ · D5⁺
//! ```
//!
//! `D1` and `D5` can be exactly singular (isolated 0-cells, 1-cells with no
//! coface), so they are inverted with the Moore–Penrose pseudo-inverse.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::degree::{d1, d2, d3, d5};
use crate::error::{NormError, Result};
use crate::linalg::DEFAULT_RCOND;
use crate::matrix::{operand_pair, Matrix, Operand, OperandPair, Operator};

/// The four Bunch-normalized operators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BunchNormalized<M = Matrix> {
    /// Normalized `B1: C1 -> C0`
    pub b1: M,
    /// Normalized coboundary `B1ᵀ: C0 -> C1`
    pub b1t: M,
    /// Normalized `B2: C2 -> C1`
    pub b2: M,
    /// Normalized coboundary `B2ᵀ: C1 -> C2`
    pub b2t: M,
}

impl<M> BunchNormalized<M> {
    /// `(B1, B1T, B2, B2T)`
    pub fn into_tuple(self) -> (M, M, M, M) {
        (self.b1, self.b1t, self.b2, self.b2t)
    }

    fn map<N>(self, f: impl Fn(M) -> N) -> BunchNormalized<N> {
        BunchNormalized {
            b1: f(self.b1),
            b1t: f(self.b1t),
            b2: f(self.b2),
            b2t: f(self.b2t),
        }
    }
}

fn check_chain(b1: &Matrix, b2: &Matrix) -> Result<()> {
    let (_, edges) = b1.shape();
    let (rows, _) = b2.shape();
    if edges != rows {
        return Err(NormError::dimension_mismatch("B1 columns vs B2 rows", edges, rows));
    }
    Ok(())
}

fn b1_normalized<M: Operator>(b1: &M, b2: &M) -> Result<M> {
    let d1_pinv = d1(b1, &d2(b2)).pinv(DEFAULT_RCOND)?;
    Ok(d1_pinv.dot(b1))
}

fn b1t_normalized<M: Operator>(b1: &M, b2: &M) -> Result<M> {
    let d2 = d2(b2);
    let d1_pinv = d1(b1, &d2).pinv(DEFAULT_RCOND)?;
    Ok(d2.dot(&b1.transpose()).dot(&d1_pinv))
}

fn b2_normalized<M: Operator>(b2: &M) -> M {
    b2.dot(&d3(b2))
}

fn b2t_normalized<M: Operator>(b2: &M) -> Result<M> {
    let d5_pinv = d5(b2).pinv(DEFAULT_RCOND)?;
    Ok(b2.transpose().dot(&d5_pinv))
}

fn bunch<M: Operator>(b1: &M, b2: &M) -> Result<BunchNormalized<M>> {
    // D2 and D1⁺ are shared by the two B1 operators
    let d2 = d2(b2);
    let d1_pinv = d1(b1, &d2).pinv(DEFAULT_RCOND)?;

    Ok(BunchNormalized {
        b1: d1_pinv.dot(b1),
        b1t: d2.dot(&b1.transpose()).dot(&d1_pinv),
        b2: b2_normalized(b2),
        b2t: b2t_normalized(b2)?,
    })
}

/// Bunch normalization of `B1: C1 -> C0` and `B2: C2 -> C1`
///
/// Both operators must share a storage mode and satisfy
/// `B1.cols == B2.rows`. Returns `(B1, B1T, B2, B2T)` normalized, each in
/// the input storage mode.
pub fn compute_bunch_normalized_matrices(b1: &Matrix, b2: &Matrix) -> Result<BunchNormalized> {
    check_chain(b1, b2)?;
    debug!(
        nodes = b1.shape().0,
        edges = b1.shape().1,
        faces = b2.shape().1,
        storage = %b1.storage(),
        "bunch normalization"
    );

    Ok(match operand_pair(b1, b2)? {
        OperandPair::Dense(b1, b2) => bunch(b1, b2)?.map(Operator::into_matrix),
        OperandPair::Sparse(b1, b2) => bunch(b1, b2)?.map(Operator::into_matrix),
    })
}

/// Normalized `B1: C1 -> C0`, i.e. `D1⁺ · B1`
pub fn compute_b1_normalized_matrix(b1: &Matrix, b2: &Matrix) -> Result<Matrix> {
    check_chain(b1, b2)?;
    Ok(match operand_pair(b1, b2)? {
        OperandPair::Dense(b1, b2) => b1_normalized(b1, b2)?.into_matrix(),
        OperandPair::Sparse(b1, b2) => b1_normalized(b1, b2)?.into_matrix(),
    })
}

/// Normalized coboundary `B1ᵀ: C0 -> C1`, i.e. `D2 · B1ᵀ · D1⁺`
pub fn compute_b1t_normalized_matrix(b1: &Matrix, b2: &Matrix) -> Result<Matrix> {
    check_chain(b1, b2)?;
    Ok(match operand_pair(b1, b2)? {
        OperandPair::Dense(b1, b2) => b1t_normalized(b1, b2)?.into_matrix(),
        OperandPair::Sparse(b1, b2) => b1t_normalized(b1, b2)?.into_matrix(),
    })
}

/// Normalized `B2: C2 -> C1`, i.e. `B2 · D3`
pub fn compute_b2_normalized_matrix(b2: &Matrix) -> Result<Matrix> {
    Ok(match b2.operand()? {
        Operand::Dense(b2) => b2_normalized(b2).into_matrix(),
        Operand::Sparse(b2) => b2_normalized(b2).into_matrix(),
    })
}

/// Normalized coboundary `B2ᵀ: C1 -> C2`, i.e. `B2ᵀ · D5⁺`
pub fn compute_b2t_normalized_matrix(b2: &Matrix) -> Result<Matrix> {
    Ok(match b2.operand()? {
        Operand::Dense(b2) => b2t_normalized(b2)?.into_matrix(),
        Operand::Sparse(b2) => b2t_normalized(b2)?.into_matrix(),
    })
}
