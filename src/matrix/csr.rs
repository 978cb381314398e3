//! Compressed Sparse Row matrices

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{NormError, Result};

/// Sparse matrix in Compressed Sparse Row (CSR) format
///
/// Column indices are sorted within each row and every stored value is
/// non-zero unless it was produced by arithmetic on a stored entry
/// (e.g. scaling by `inf` or `NaN`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCsr")]
pub struct CsrMatrix {
    /// Number of rows
    pub(crate) rows: usize,
    /// Number of columns
    pub(crate) cols: usize,
    /// Row pointers (length = rows + 1)
    pub(crate) row_ptr: Vec<usize>,
    /// Column indices for stored elements
    pub(crate) col_idx: Vec<usize>,
    /// Values of stored elements
    pub(crate) values: Vec<f64>,
}

/// Unchecked wire form of [`CsrMatrix`]
#[derive(Deserialize)]
struct RawCsr {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl TryFrom<RawCsr> for CsrMatrix {
    type Error = NormError;

    fn try_from(raw: RawCsr) -> Result<Self> {
        CsrMatrix::from_raw_parts(raw.rows, raw.cols, raw.row_ptr, raw.col_idx, raw.values)
    }
}

impl CsrMatrix {
    /// Create an all-zero sparse matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create a sparse matrix from triplets (row, col, value)
    ///
    /// Duplicate coordinates are summed and exact zeros are dropped.
    /// Triplets outside the declared shape are rejected.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self> {
        let mut entries: Vec<Vec<(usize, f64)>> = vec![Vec::new(); rows];

        for &(r, c, v) in triplets {
            if r >= rows || c >= cols {
                return Err(NormError::invalid_structure(format!(
                    "entry ({r}, {c}) outside {rows}x{cols} matrix"
                )));
            }
            entries[r].push((c, v));
        }

        Ok(Self::from_rows(rows, cols, entries))
    }

    /// Build from unsorted per-row entry lists
    fn from_rows(rows: usize, cols: usize, mut entries: Vec<Vec<(usize, f64)>>) -> Self {
        let mut row_ptr = vec![0; rows + 1];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        for (r, row) in entries.iter_mut().enumerate() {
            row.sort_by_key(|(c, _)| *c);

            let mut k = 0;
            while k < row.len() {
                let c = row[k].0;
                let mut sum = 0.0;
                while k < row.len() && row[k].0 == c {
                    sum += row[k].1;
                    k += 1;
                }
                if sum != 0.0 {
                    col_idx.push(c);
                    values.push(sum);
                }
            }
            row_ptr[r + 1] = col_idx.len();
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Create a sparse matrix from raw CSR parts
    pub fn from_raw_parts(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if row_ptr.len() != rows + 1 {
            return Err(NormError::invalid_structure(format!(
                "row_ptr has length {}, expected {}",
                row_ptr.len(),
                rows + 1
            )));
        }
        if col_idx.len() != values.len() {
            return Err(NormError::invalid_structure(format!(
                "{} column indices for {} values",
                col_idx.len(),
                values.len()
            )));
        }
        if row_ptr[0] != 0 || row_ptr[rows] != values.len() {
            return Err(NormError::invalid_structure(
                "row_ptr must start at 0 and end at nnz",
            ));
        }
        // Every pointer is checked before any row is sliced
        if let Some(r) = row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(NormError::invalid_structure(format!(
                "row_ptr decreases at row {r}"
            )));
        }
        for r in 0..rows {
            let row = &col_idx[row_ptr[r]..row_ptr[r + 1]];
            if row.iter().any(|&c| c >= cols) {
                return Err(NormError::invalid_structure(format!(
                    "column index out of bounds in row {r}"
                )));
            }
            if row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(NormError::invalid_structure(format!(
                    "column indices not strictly increasing in row {r}"
                )));
            }
        }

        Ok(Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Convert a dense array, keeping its non-zero entries
    pub fn from_dense(dense: &Array2<f64>) -> Self {
        let (rows, cols) = dense.dim();
        let mut row_ptr = Vec::with_capacity(rows + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        row_ptr.push(0);
        for row in dense.rows() {
            for (c, &v) in row.iter().enumerate() {
                if v != 0.0 {
                    col_idx.push(c);
                    values.push(v);
                }
            }
            row_ptr.push(col_idx.len());
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Create an identity matrix
    pub fn identity(n: usize) -> Self {
        Self::from_diagonal(&Array1::ones(n))
    }

    /// Square diagonal matrix with the given diagonal
    pub fn from_diagonal(diagonal: &Array1<f64>) -> Self {
        let n = diagonal.len();
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);

        row_ptr.push(0);
        for (i, &d) in diagonal.iter().enumerate() {
            if d != 0.0 {
                col_idx.push(i);
                values.push(d);
            }
            row_ptr.push(col_idx.len());
        }

        Self {
            rows: n,
            cols: n,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored elements
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row pointers
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column indices of stored elements
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Stored values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over stored `(row, col, value)` entries
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (self.row_ptr[r]..self.row_ptr[r + 1]).map(move |k| (r, self.col_idx[k], self.values[k]))
        })
    }

    /// Get element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.rows || col >= self.cols {
            return 0.0;
        }

        let row_cols = &self.col_idx[self.row_ptr[row]..self.row_ptr[row + 1]];
        match row_cols.binary_search(&col) {
            Ok(k) => self.values[self.row_ptr[row] + k],
            Err(_) => 0.0,
        }
    }

    /// Matrix-vector multiplication: y = A * x
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.cols);
        let mut y = vec![0.0; self.rows];

        for (i, yi) in y.iter_mut().enumerate() {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                *yi += self.values[k] * x[self.col_idx[k]];
            }
        }

        y
    }

    /// Sparse matrix product: C = A * B
    ///
    /// Row-wise accumulation with a dense scatter buffer over the columns of `B`.
    /// Shapes must already agree.
    pub fn matmul(&self, other: &CsrMatrix) -> CsrMatrix {
        debug_assert_eq!(self.cols, other.rows);
        let cols = other.cols;

        let mut row_ptr = Vec::with_capacity(self.rows + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        let mut accumulator = vec![0.0; cols];
        let mut occupied = vec![false; cols];
        let mut touched: Vec<usize> = Vec::new();

        row_ptr.push(0);
        for i in 0..self.rows {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                let a = self.values[k];
                let j = self.col_idx[k];
                for kk in other.row_ptr[j]..other.row_ptr[j + 1] {
                    let c = other.col_idx[kk];
                    if !occupied[c] {
                        occupied[c] = true;
                        touched.push(c);
                    }
                    accumulator[c] += a * other.values[kk];
                }
            }

            touched.sort_unstable();
            for &c in &touched {
                let v = accumulator[c];
                if v != 0.0 {
                    col_idx.push(c);
                    values.push(v);
                }
                accumulator[c] = 0.0;
                occupied[c] = false;
            }
            touched.clear();
            row_ptr.push(col_idx.len());
        }

        CsrMatrix {
            rows: self.rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Transpose the matrix
    pub fn transpose(&self) -> Self {
        // Counting sort on column index keeps the result row-sorted
        let mut row_ptr = vec![0; self.cols + 1];
        for &c in &self.col_idx {
            row_ptr[c + 1] += 1;
        }
        for c in 0..self.cols {
            row_ptr[c + 1] += row_ptr[c];
        }

        let mut next = row_ptr.clone();
        let mut col_idx = vec![0; self.nnz()];
        let mut values = vec![0.0; self.nnz()];
        for (r, c, v) in self.iter() {
            let slot = next[c];
            col_idx[slot] = r;
            values[slot] = v;
            next[c] += 1;
        }

        Self {
            rows: self.cols,
            cols: self.rows,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Scale all stored elements by a constant
    pub fn scale(&self, alpha: f64) -> Self {
        self.map(|v| v * alpha)
    }

    /// Element-wise absolute value
    pub fn abs(&self) -> Self {
        self.map(f64::abs)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            row_ptr: self.row_ptr.clone(),
            col_idx: self.col_idx.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Add two sparse matrices of equal shape
    pub fn add(&self, other: &CsrMatrix) -> Self {
        debug_assert_eq!(self.shape(), other.shape());

        let entries = (0..self.rows)
            .map(|r| {
                let mine = (self.row_ptr[r]..self.row_ptr[r + 1])
                    .map(|k| (self.col_idx[k], self.values[k]));
                let theirs = (other.row_ptr[r]..other.row_ptr[r + 1])
                    .map(|k| (other.col_idx[k], other.values[k]));
                mine.chain(theirs).collect()
            })
            .collect();

        Self::from_rows(self.rows, self.cols, entries)
    }

    /// Sum of each row
    pub fn row_sums(&self) -> Array1<f64> {
        Array1::from_iter((0..self.rows).map(|r| {
            self.values[self.row_ptr[r]..self.row_ptr[r + 1]]
                .iter()
                .sum::<f64>()
        }))
    }

    /// Main diagonal
    pub fn diagonal(&self) -> Array1<f64> {
        let n = self.rows.min(self.cols);
        Array1::from_iter((0..n).map(|i| self.get(i, i)))
    }

    /// Densify
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.rows, self.cols));
        for (r, c, v) in self.iter() {
            dense[[r, c]] = v;
        }
        dense
    }
}
