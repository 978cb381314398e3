//! Matrix representations accepted by the normalizers
//!
//! A [`Matrix`] is either a dense `ndarray::Array2<f64>` or a [`CsrMatrix`].
//! Triplet matrices ([`CooMatrix`]) exist for assembly and must be
//! converted before normalization.
//!
//! Normalizers are written once against the [`Operator`] trait, which is
//! implemented for both storage modes. Public entry points dispatch on the
//! [`Matrix`] variant exactly once, so dense input always yields dense
//! output and sparse input yields sparse output.

mod coo;
mod csr;
mod dense;

pub use coo::CooMatrix;
pub use csr::CsrMatrix;

use std::fmt;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{NormError, Result};

/// Capabilities the normalizers need from a storage mode
pub trait Operator: Clone + Sized {
    /// (rows, cols)
    fn shape(&self) -> (usize, usize);

    /// Element-wise absolute value
    fn abs(&self) -> Self;

    /// Sum of every row
    fn row_sums(&self) -> Array1<f64>;

    /// Square diagonal matrix in this storage mode
    fn from_diagonal(diagonal: &Array1<f64>) -> Self;

    /// Element-wise sum of two operators of equal shape
    fn add(&self, other: &Self) -> Self;

    /// Matrix product; inner dimensions must agree
    fn dot(&self, other: &Self) -> Self;

    /// Transpose
    fn transpose(&self) -> Self;

    /// Multiply every entry by `alpha`
    fn scale(&self, alpha: f64) -> Self;

    /// Moore–Penrose pseudo-inverse, computed densely
    fn pinv(&self, rcond: f64) -> Result<Self>;

    /// Matrix-vector product
    fn mul_vec(&self, x: &[f64]) -> Vec<f64>;

    /// Dense copy
    fn to_dense(&self) -> Array2<f64>;

    /// Wrap into the matching [`Matrix`] variant
    fn into_matrix(self) -> Matrix;
}

/// Storage mode of a [`Matrix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Storage {
    /// Dense row-major array
    Dense,
    /// Compressed sparse row
    Sparse,
    /// Unordered coordinate triplets
    Triplet,
}

impl Storage {
    /// Short name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Storage::Dense => "dense",
            Storage::Sparse => "csr",
            Storage::Triplet => "triplet",
        }
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A matrix in one of the supported storage modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Matrix {
    /// Dense array
    Dense(Array2<f64>),
    /// CSR sparse matrix
    Sparse(CsrMatrix),
    /// Coordinate triplets; rejected by the normalizers
    Triplet(CooMatrix),
}

impl Matrix {
    /// Storage mode of this matrix
    pub fn storage(&self) -> Storage {
        match self {
            Matrix::Dense(_) => Storage::Dense,
            Matrix::Sparse(_) => Storage::Sparse,
            Matrix::Triplet(_) => Storage::Triplet,
        }
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(a) => a.dim(),
            Matrix::Sparse(s) => s.shape(),
            Matrix::Triplet(t) => t.shape(),
        }
    }

    /// True for CSR storage
    pub fn is_sparse(&self) -> bool {
        matches!(self, Matrix::Sparse(_))
    }

    /// Dense copy of the matrix
    pub fn to_dense(&self) -> Result<Array2<f64>> {
        match self {
            Matrix::Dense(a) => Ok(a.clone()),
            Matrix::Sparse(s) => Ok(s.to_dense()),
            Matrix::Triplet(t) => t.to_dense(),
        }
    }

    /// CSR copy of the matrix
    pub fn to_sparse(&self) -> Result<CsrMatrix> {
        match self {
            Matrix::Dense(a) => Ok(CsrMatrix::from_dense(a)),
            Matrix::Sparse(s) => Ok(s.clone()),
            Matrix::Triplet(t) => t.to_csr(),
        }
    }

    /// Borrow the dense array, if that is the storage mode
    pub fn as_dense(&self) -> Option<&Array2<f64>> {
        match self {
            Matrix::Dense(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow the CSR matrix, if that is the storage mode
    pub fn as_sparse(&self) -> Option<&CsrMatrix> {
        match self {
            Matrix::Sparse(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a normalizer operand
    pub(crate) fn operand(&self) -> Result<Operand<'_>> {
        match self {
            Matrix::Dense(a) => Ok(Operand::Dense(a)),
            Matrix::Sparse(s) => Ok(Operand::Sparse(s)),
            Matrix::Triplet(_) => Err(NormError::unsupported(Storage::Triplet.name())),
        }
    }
}

impl From<Array2<f64>> for Matrix {
    fn from(a: Array2<f64>) -> Self {
        Matrix::Dense(a)
    }
}

impl From<CsrMatrix> for Matrix {
    fn from(s: CsrMatrix) -> Self {
        Matrix::Sparse(s)
    }
}

impl From<CooMatrix> for Matrix {
    fn from(t: CooMatrix) -> Self {
        Matrix::Triplet(t)
    }
}

/// Borrowed operand in an accepted storage mode
pub(crate) enum Operand<'a> {
    Dense(&'a Array2<f64>),
    Sparse(&'a CsrMatrix),
}

/// Two borrowed operands sharing one storage mode
pub(crate) enum OperandPair<'a> {
    Dense(&'a Array2<f64>, &'a Array2<f64>),
    Sparse(&'a CsrMatrix, &'a CsrMatrix),
}

/// Borrow two matrices that must share a storage mode
pub(crate) fn operand_pair<'a>(left: &'a Matrix, right: &'a Matrix) -> Result<OperandPair<'a>> {
    match (left.operand()?, right.operand()?) {
        (Operand::Dense(a), Operand::Dense(b)) => Ok(OperandPair::Dense(a, b)),
        (Operand::Sparse(a), Operand::Sparse(b)) => Ok(OperandPair::Sparse(a, b)),
        _ => Err(NormError::storage_mismatch(
            left.storage().name(),
            right.storage().name(),
        )),
    }
}

impl Operator for CsrMatrix {
    fn shape(&self) -> (usize, usize) {
        CsrMatrix::shape(self)
    }

    fn abs(&self) -> Self {
        CsrMatrix::abs(self)
    }

    fn row_sums(&self) -> Array1<f64> {
        CsrMatrix::row_sums(self)
    }

    fn from_diagonal(diagonal: &Array1<f64>) -> Self {
        CsrMatrix::from_diagonal(diagonal)
    }

    fn add(&self, other: &Self) -> Self {
        CsrMatrix::add(self, other)
    }

    fn dot(&self, other: &Self) -> Self {
        self.matmul(other)
    }

    fn transpose(&self) -> Self {
        CsrMatrix::transpose(self)
    }

    fn scale(&self, alpha: f64) -> Self {
        CsrMatrix::scale(self, alpha)
    }

    fn pinv(&self, rcond: f64) -> Result<Self> {
        let inverse = crate::linalg::pinv(&self.to_dense(), rcond)?;
        Ok(CsrMatrix::from_dense(&inverse))
    }

    fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        CsrMatrix::mul_vec(self, x)
    }

    fn to_dense(&self) -> Array2<f64> {
        CsrMatrix::to_dense(self)
    }

    fn into_matrix(self) -> Matrix {
        Matrix::Sparse(self)
    }
}
