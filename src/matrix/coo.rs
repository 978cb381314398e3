//! Coordinate (triplet) matrices
//!
//! A staging format for assembling operators entry by entry. The
//! normalizers do not accept it directly; convert with [`CooMatrix::to_csr`].

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::CsrMatrix;
use crate::error::{NormError, Result};

/// Sparse matrix as an unordered list of (row, col, value) triplets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CooMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl CooMatrix {
    /// Create an empty triplet matrix of the given shape
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: Vec::new(),
        }
    }

    /// Append an entry; duplicates are summed on conversion
    pub fn push(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(NormError::invalid_structure(format!(
                "entry ({row}, {col}) outside {}x{} matrix",
                self.rows, self.cols
            )));
        }
        self.entries.push((row, col, value));
        Ok(())
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Raw triplets in insertion order
    pub fn entries(&self) -> &[(usize, usize, f64)] {
        &self.entries
    }

    /// Compress into CSR storage
    ///
    /// Fails only for a deserialized matrix holding out-of-range entries.
    pub fn to_csr(&self) -> Result<CsrMatrix> {
        CsrMatrix::from_triplets(self.rows, self.cols, &self.entries)
    }

    /// Densify, summing duplicates
    pub fn to_dense(&self) -> Result<Array2<f64>> {
        Ok(self.to_csr()?.to_dense())
    }
}
