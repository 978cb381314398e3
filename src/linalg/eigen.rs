//! Dominant eigenvalue of a symmetric operator
//!
//! Lanczos iteration with full re-orthogonalization. The Krylov basis is
//! grown one vector at a time from a seeded random start vector. After each
//! step the extreme Ritz values of the tridiagonal projection are located by
//! Sturm bisection, and the one of largest magnitude is tracked until it
//! stops moving.
//!
//! Only the eigenvalue is returned, never the eigenvector.

use nalgebra::{DMatrix, SymmetricEigen};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{NormError, Result};
use crate::matrix::Operator;

/// Relative size of β below which the Krylov space is treated as invariant
const BREAKDOWN_TOL: f64 = 1e-12;

/// Consecutive steps the Ritz value must stay within tolerance
const STABLE_STEPS: usize = 2;

/// Upper bound on bisection halvings; machine precision is reached well before
const BISECTION_STEPS: usize = 128;

/// Configuration for the dominant-eigenvalue solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenConfig {
    /// Maximum Lanczos steps (Krylov dimension) before giving up
    ///
    /// `None` allows up to the operator dimension, where the Krylov space
    /// is exhausted and the Ritz value is exact. The basis is stored in
    /// full, so memory grows with `steps * n`.
    pub max_iterations: Option<usize>,
    /// Relative change of the dominant Ritz value between steps below which
    /// it counts as converged
    pub tolerance: f64,
    /// Seed for the start vector
    pub seed: u64,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self {
            max_iterations: None,
            tolerance: 1e-10,
            seed: 42,
        }
    }
}

impl EigenConfig {
    /// Create a configuration with explicit iteration bound and tolerance
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations: Some(max_iterations),
            tolerance,
            ..Default::default()
        }
    }

    /// Set the start-vector seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == Some(0) {
            return Err(NormError::invalid_parameter(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(NormError::invalid_parameter(
                "tolerance",
                format!("must be finite and positive, got {}", self.tolerance),
            ));
        }
        Ok(())
    }
}

/// Eigenvalue of largest magnitude of a square symmetric operator
///
/// The sign is kept, so a negative definite operator yields a negative value.
/// A zero operator yields `0.0`.
///
/// Iteration stops once the dominant Ritz value changes by at most
/// `tolerance * |θ|` on consecutive steps, or when the Krylov space becomes
/// invariant. Running out of steps first is a
/// [`NormError::ConvergenceFailure`] carrying the Ritz residual.
pub fn dominant_eigenvalue<M: Operator>(operator: &M, config: &EigenConfig) -> Result<f64> {
    config.validate()?;

    let (rows, cols) = operator.shape();
    if rows != cols {
        return Err(NormError::not_square(rows, cols));
    }
    let n = rows;
    if n == 0 {
        return Err(NormError::invalid_parameter(
            "operator",
            "dominant eigenvalue of an empty operator is undefined",
        ));
    }

    let limit = config.max_iterations.unwrap_or(n);
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(n.min(limit));
    let mut alpha: Vec<f64> = Vec::new();
    let mut beta: Vec<f64> = Vec::new();

    basis.push(start_vector(n, config.seed));
    let mut previous: Option<f64> = None;
    let mut stable = 0;
    let mut scale = 0.0_f64;

    for step in 1..=limit {
        let v = &basis[step - 1];
        let mut w = operator.mul_vec(v);

        let a = dot(v, &w);
        alpha.push(a);

        // Two passes of classical Gram-Schmidt against the whole basis
        for _ in 0..2 {
            for q in &basis {
                let proj = dot(&w, q);
                axpy(&mut w, q, proj);
            }
        }

        let b = norm(&w);
        scale = scale.max(a.abs()).max(b);

        let theta = dominant_ritz_value(&alpha, &beta);
        let change = previous.map_or(f64::INFINITY, |p| (theta - p).abs());
        if change <= config.tolerance * theta.abs() {
            stable += 1;
        } else {
            stable = 0;
        }
        previous = Some(theta);

        trace!(step, theta, change, beta = b, "lanczos step");

        let invariant = b <= BREAKDOWN_TOL * scale || step == n;
        if invariant || stable >= STABLE_STEPS {
            return Ok(theta);
        }

        for x in w.iter_mut() {
            *x /= b;
        }
        beta.push(b);
        basis.push(w);
    }

    // alpha holds `limit` entries and beta one coupling past them
    let (_, last_component) = dominant_ritz_pair(&alpha, &beta);
    let residual = beta.last().copied().unwrap_or(0.0) * last_component.abs();
    Err(NormError::convergence_failure(limit, residual))
}

/// Ritz value of largest magnitude
fn dominant_ritz_value(alpha: &[f64], beta: &[f64]) -> f64 {
    let m = alpha.len();
    if m == 1 {
        return alpha[0];
    }
    let beta = &beta[..m - 1];

    let (lower, upper) = gershgorin_bounds(alpha, beta);
    let pad = 2.0 * f64::EPSILON * lower.abs().max(upper.abs()) + f64::MIN_POSITIVE;
    let pivmin = f64::MIN_POSITIVE * beta.iter().fold(1.0_f64, |acc, b| acc.max(b * b));

    let largest = kth_eigenvalue(alpha, beta, m - 1, lower - pad, upper + pad, pivmin);
    let smallest = kth_eigenvalue(alpha, beta, 0, lower - pad, upper + pad, pivmin);
    if largest.abs() >= smallest.abs() {
        largest
    } else {
        smallest
    }
}

/// Interval containing every eigenvalue of the tridiagonal
fn gershgorin_bounds(alpha: &[f64], beta: &[f64]) -> (f64, f64) {
    let m = alpha.len();
    let mut lower = f64::INFINITY;
    let mut upper = f64::NEG_INFINITY;
    for (i, &a) in alpha.iter().enumerate() {
        let left = if i > 0 { beta[i - 1].abs() } else { 0.0 };
        let right = if i + 1 < m { beta[i].abs() } else { 0.0 };
        lower = lower.min(a - left - right);
        upper = upper.max(a + left + right);
    }
    (lower, upper)
}

/// `k`-th smallest eigenvalue (0-based) of the tridiagonal, by bisection
fn kth_eigenvalue(alpha: &[f64], beta: &[f64], k: usize, mut lo: f64, mut hi: f64, pivmin: f64) -> f64 {
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if count_below(alpha, beta, mid, pivmin) > k {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Number of eigenvalues below `x` (Sturm sequence of the LDLᵀ pivots)
fn count_below(alpha: &[f64], beta: &[f64], x: f64, pivmin: f64) -> usize {
    let mut count = 0;
    let mut d = 1.0;
    for (i, &a) in alpha.iter().enumerate() {
        let coupling = if i == 0 { 0.0 } else { beta[i - 1] * beta[i - 1] / d };
        d = a - x - coupling;
        if d.abs() < pivmin {
            d = -pivmin;
        }
        if d < 0.0 {
            count += 1;
        }
    }
    count
}

/// Ritz value of largest magnitude and the last component of its Ritz vector
fn dominant_ritz_pair(alpha: &[f64], beta: &[f64]) -> (f64, f64) {
    let m = alpha.len();
    let tridiagonal = DMatrix::from_fn(m, m, |i, j| {
        if i == j {
            alpha[i]
        } else if i + 1 == j {
            beta[i]
        } else if j + 1 == i {
            beta[j]
        } else {
            0.0
        }
    });

    let eigen = SymmetricEigen::new(tridiagonal);
    let mut best = 0;
    for (k, value) in eigen.eigenvalues.iter().enumerate() {
        if value.abs() > eigen.eigenvalues[best].abs() {
            best = k;
        }
    }

    (eigen.eigenvalues[best], eigen.eigenvectors[(m - 1, best)])
}

fn start_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut v: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let length = norm(&v);
    if length > 0.0 {
        for x in v.iter_mut() {
            *x /= length;
        }
    } else {
        v[0] = 1.0;
    }
    v
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// a -= scale * b
fn axpy(a: &mut [f64], b: &[f64], scale: f64) {
    for (ai, &bi) in a.iter_mut().zip(b) {
        *ai -= scale * bi;
    }
}
