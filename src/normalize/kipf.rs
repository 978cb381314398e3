//! Kipf–Welling symmetric normalization of (co)adjacency matrices
//!
//! `Â = D^{-1/2} · (|A| + m·I) · D^{-1/2}` where `D` holds the row sums of
//! `|A| + m·I`. Rows with zero degree get a zero scaling factor, so isolated
//! cells stay isolated rather than turning into `inf`/`NaN`.

use ndarray::Array1;
use tracing::debug;

use super::degree::inverse_power;
use crate::error::{NormError, Result};
use crate::matrix::{Matrix, Operand, Operator};

fn kipf<M: Operator>(adjacency: &M, add_identity: bool, identity_multiplier: f64) -> M {
    let (n, _) = adjacency.shape();
    let mut a = adjacency.abs();
    if add_identity {
        a = a.add(&M::from_diagonal(&Array1::from_elem(n, identity_multiplier)));
    }

    let d_inv_sqrt = M::from_diagonal(&inverse_power(&a.row_sums(), -0.5));
    a.dot(&d_inv_sqrt).transpose().dot(&d_inv_sqrt)
}

/// Normalize an adjacency-like matrix with Kipf's symmetric normalization
///
/// # Arguments
/// * `adjacency` - Square (co)adjacency matrix; signs are discarded
/// * `add_identity` - Add a self-loop term before normalizing
/// * `identity_multiplier` - Weight of the self-loop term, useful for higher
///   order adjacencies where a cell's neighbours come from several sources
pub fn compute_kipf_adjacency_normalized_matrix(
    adjacency: &Matrix,
    add_identity: bool,
    identity_multiplier: f64,
) -> Result<Matrix> {
    let (rows, cols) = adjacency.shape();
    if rows != cols {
        return Err(NormError::not_square(rows, cols));
    }
    debug!(
        n = rows,
        storage = %adjacency.storage(),
        add_identity,
        identity_multiplier,
        "kipf normalization"
    );

    Ok(match adjacency.operand()? {
        Operand::Dense(a) => kipf(a, add_identity, identity_multiplier).into_matrix(),
        Operand::Sparse(a) => kipf(a, add_identity, identity_multiplier).into_matrix(),
    })
}
