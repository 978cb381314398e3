//! Integration tests for complex operator normalization
//!
//! Covers the public normalizers end to end: concrete complexes with
//! hand-computed results, dense/sparse equivalence, and property tests for
//! the degree guards and shape laws.

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use proptest::prelude::*;
use ruvector_topo_norm::prelude::*;

fn assert_matrix_close(actual: &Matrix, expected: &Array2<f64>, epsilon: f64) {
    let actual = actual.to_dense().unwrap();
    assert_eq!(actual.dim(), expected.dim());
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*a, *e, epsilon = epsilon);
    }
}

fn sparse(dense: &Array2<f64>) -> Matrix {
    Matrix::from(CsrMatrix::from_dense(dense))
}

/// Boundary operators of a hollow square with one diagonal, upper triangle filled
///
/// Nodes 0..4, edges (0,1) (0,3) (1,2) (1,3) (2,3), face (0,1,3).
fn square_complex() -> (Array2<f64>, Array2<f64>) {
    let b1 = array![
        [-1.0, -1.0, 0.0, 0.0, 0.0],
        [1.0, 0.0, -1.0, -1.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, -1.0],
        [0.0, 1.0, 0.0, 1.0, 1.0]
    ];
    let b2 = array![[1.0], [-1.0], [0.0], [1.0], [0.0]];
    (b1, b2)
}

// =============================================================================
// LAPLACIAN NORMALIZATION TESTS
// =============================================================================

mod laplacian_tests {
    use super::*;

    #[test]
    fn test_identity_laplacian_unchanged() {
        for n in [1, 3, 8] {
            let eye = Array2::<f64>::eye(n);
            let out = compute_laplacian_normalized_matrix(&Matrix::from(eye.clone())).unwrap();
            assert_matrix_close(&out, &eye, 1e-12);

            let out = compute_laplacian_normalized_matrix(&sparse(&eye)).unwrap();
            assert!(out.is_sparse());
            assert_matrix_close(&out, &eye, 1e-12);
        }
    }

    #[test]
    fn test_hodge_laplacian_spectrum_is_unit() {
        let (b1, b2) = square_complex();
        let hodge = b1.t().dot(&b1) + b2.dot(&b2.t());

        let out = compute_laplacian_normalized_matrix(&sparse(&hodge)).unwrap();
        let out = out.as_sparse().unwrap();
        let lambda = dominant_eigenvalue(out, &EigenConfig::default()).unwrap();
        assert_abs_diff_eq!(lambda, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_up_and_down_share_reference() {
        let (b1, b2) = square_complex();
        let down = b1.t().dot(&b1);
        let up = b2.dot(&b2.t());
        let hodge = &down + &up;

        let config = EigenConfig::new(100, 1e-12);
        let down_n = compute_x_laplacian_normalized_matrix_with(
            &Matrix::from(hodge.clone()),
            &Matrix::from(down.clone()),
            &config,
        )
        .unwrap()
        .to_dense()
        .unwrap();
        let up_n = compute_x_laplacian_normalized_matrix_with(
            &Matrix::from(hodge.clone()),
            &Matrix::from(up),
            &config,
        )
        .unwrap()
        .to_dense()
        .unwrap();
        let hodge_n = compute_laplacian_normalized_matrix_with(&Matrix::from(hodge), &config).unwrap();

        // Normalized parts still sum to the normalized whole
        assert_matrix_close(&hodge_n, &(&down_n + &up_n), 1e-10);
    }

    #[test]
    fn test_long_path_with_default_solver() {
        // λ_max(P_n) = 2 + 2cos(π/n); the top of the spectrum is tightly clustered
        let n = 1000;
        let mut triplets = Vec::new();
        for i in 0..n - 1 {
            triplets.push((i, i, 1.0));
            triplets.push((i + 1, i + 1, 1.0));
            triplets.push((i, i + 1, -1.0));
            triplets.push((i + 1, i, -1.0));
        }
        let l = CsrMatrix::from_triplets(n, n, &triplets).unwrap();
        let lambda = 2.0 + 2.0 * (std::f64::consts::PI / n as f64).cos();

        let out = compute_laplacian_normalized_matrix(&Matrix::from(l)).unwrap();
        let out = out.as_sparse().unwrap();
        assert_abs_diff_eq!(out.get(0, 0), 1.0 / lambda, epsilon = 1e-6);
        assert_abs_diff_eq!(out.get(1, 1), 2.0 / lambda, epsilon = 1e-6);
        assert_abs_diff_eq!(out.get(1, 0), -1.0 / lambda, epsilon = 1e-6);
    }

    #[test]
    fn test_non_square_is_rejected() {
        let l = Matrix::from(Array2::<f64>::ones((3, 2)));
        assert!(matches!(
            compute_laplacian_normalized_matrix(&l),
            Err(NormError::NotSquare { rows: 3, cols: 2 })
        ));
    }
}

// =============================================================================
// ADJACENCY / ASYMMETRIC NORMALIZATION TESTS
// =============================================================================

mod degree_normalization_tests {
    use super::*;

    #[test]
    fn test_kipf_isolated_node() {
        // Triangle 0-1-2 plus isolated node 3
        let a = array![
            [0.0, 1.0, 1.0, 0.0],
            [1.0, 0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0]
        ];
        let out = compute_kipf_adjacency_normalized_matrix(&sparse(&a), false, 1.0)
            .unwrap()
            .to_dense()
            .unwrap();

        assert!(out.iter().all(|v| v.is_finite()));
        for k in 0..4 {
            assert_eq!(out[[3, k]], 0.0);
            assert_eq!(out[[k, 3]], 0.0);
        }
        assert_abs_diff_eq!(out[[0, 1]], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_kipf_isolated_node_with_self_loop() {
        let a = array![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let out = compute_kipf_adjacency_normalized_matrix(&Matrix::from(a), true, 1.0)
            .unwrap()
            .to_dense()
            .unwrap();

        // The self loop gives the isolated node degree 1
        assert_abs_diff_eq!(out[[2, 2]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[[0, 1]], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_kipf_non_symmetric_is_transposed() {
        // Directed 3-cycle with one heavy arc; row degrees 2, 1, 1
        let a = array![[0.0, 2.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        let d_inv_sqrt = Array2::from_diag(&array![1.0 / 2.0_f64.sqrt(), 1.0, 1.0]);
        let expected = d_inv_sqrt.dot(&a.t()).dot(&d_inv_sqrt);

        for m in [Matrix::from(a.clone()), sparse(&a)] {
            let out = compute_kipf_adjacency_normalized_matrix(&m, false, 1.0).unwrap();
            assert_eq!(out.storage(), m.storage());
            assert_matrix_close(&out, &expected, 1e-12);

            let out = out.to_dense().unwrap();
            assert_abs_diff_eq!(out[[1, 0]], 2.0_f64.sqrt(), epsilon = 1e-12);
            assert_eq!(out[[0, 1]], 0.0);
        }
    }

    #[test]
    fn test_malformed_serialized_matrix_is_rejected() {
        let json = r#"{"Sparse":{"rows":2,"cols":2,"row_ptr":[0,3,1],"col_idx":[0],"values":[1.0]}}"#;
        let err = serde_json::from_str::<Matrix>(json).unwrap_err();
        assert!(err.to_string().contains("Invalid sparse structure"));

        let json = r#"{"Sparse":{"rows":2,"cols":2,"row_ptr":[0,1,1],"col_idx":[0],"values":[1.0]}}"#;
        let m: Matrix = serde_json::from_str(json).unwrap();
        assert!(compute_xu_asymmetric_normalized_matrix(&m, true).is_ok());
    }

    #[test]
    fn test_xu_on_boundary() {
        let (b1, _) = square_complex();
        let out = compute_xu_asymmetric_normalized_matrix(&sparse(&b1), true).unwrap();
        assert!(out.is_sparse());

        let out = out.to_dense().unwrap();
        for row in out.rows() {
            let mass: f64 = row.iter().map(|v| v.abs()).sum();
            assert_abs_diff_eq!(mass, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_triplet_input_is_a_type_error() {
        let mut coo = CooMatrix::new(2, 2);
        coo.push(0, 1, 1.0).unwrap();
        coo.push(1, 0, 1.0).unwrap();
        let m = Matrix::from(coo.clone());

        let err = compute_kipf_adjacency_normalized_matrix(&m, false, 1.0).unwrap_err();
        assert!(err.to_string().contains("dense array"));
        assert!(err.to_string().contains("CSR"));

        // Converting first is the supported route
        let converted = Matrix::from(coo.to_csr().unwrap());
        assert!(compute_kipf_adjacency_normalized_matrix(&converted, false, 1.0).is_ok());
    }
}

// =============================================================================
// BUNCH NORMALIZATION TESTS
// =============================================================================

mod bunch_tests {
    use super::*;

    #[test]
    fn test_single_face_scenario() {
        let b1 = Matrix::from(Array2::<f64>::zeros((1, 3)));
        let b2 = Matrix::from(Array2::<f64>::ones((3, 1)));

        let d2 = compute_d2(&b2).unwrap();
        assert_matrix_close(&d2, &Array2::eye(3), 0.0);
        let d3 = compute_d3(&b2).unwrap();
        assert_matrix_close(&d3, &array![[1.0 / 3.0]], 1e-15);
        let d1 = compute_d1(&b1, &d2).unwrap();
        assert_matrix_close(&d1, &array![[0.0]], 0.0);

        let out = compute_bunch_normalized_matrices(&b1, &b2).unwrap();
        assert_matrix_close(&out.b1, &Array2::zeros((1, 3)), 0.0);
        assert_matrix_close(&out.b2, &Array2::from_elem((3, 1), 1.0 / 3.0), 1e-15);
    }

    #[test]
    fn test_square_complex_values() {
        let (b1, b2) = square_complex();
        let out = compute_bunch_normalized_matrices(&sparse(&b1), &sparse(&b2)).unwrap();

        // D2 = I; node degrees 2, 3, 2, 3
        let d1_pinv = Array2::from_diag(&array![0.25, 1.0 / 6.0, 0.25, 1.0 / 6.0]);
        assert_matrix_close(&out.b1, &d1_pinv.dot(&b1), 1e-12);
        assert_matrix_close(&out.b1t, &b1.t().dot(&d1_pinv), 1e-12);

        // Edges (1,2) and (2,3) have no coface: their D5 entries are zero
        let d5_pinv = Array2::from_diag(&array![1.0, 1.0, 0.0, 1.0, 0.0]);
        assert_matrix_close(&out.b2t, &b2.t().dot(&d5_pinv), 1e-12);
    }

    #[test]
    fn test_heavier_edges_scale_b1t() {
        // Edge 0 bounds two faces, so D2 = diag(2, 1, 1)
        let b1 = array![[-1.0, -1.0, 0.0], [1.0, 0.0, -1.0], [0.0, 1.0, 1.0]];
        let b2 = array![[1.0, 1.0], [0.0, 0.0], [0.0, 0.0]];
        let out = compute_bunch_normalized_matrices(&Matrix::from(b1.clone()), &Matrix::from(b2))
            .unwrap();

        let d2 = Array2::from_diag(&array![2.0, 1.0, 1.0]);
        let d1 = Array2::from_diag(&(b1.mapv(f64::abs).dot(&d2).sum_axis(ndarray::Axis(1)) * 2.0));
        let d1_pinv = d1.mapv(|v| if v == 0.0 { 0.0 } else { 1.0 / v });
        assert_matrix_close(&out.b1t, &d2.dot(&b1.t()).dot(&d1_pinv), 1e-12);
    }
}

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================

mod property_tests {
    use super::*;

    fn entry() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), Just(1.0), Just(-1.0), -3.0f64..3.0]
    }

    fn dense_matrix(rows: usize, cols: usize) -> impl Strategy<Value = Array2<f64>> {
        proptest::collection::vec(entry(), rows * cols)
            .prop_map(move |v| Array2::from_shape_vec((rows, cols), v).unwrap())
    }

    fn any_matrix() -> impl Strategy<Value = Array2<f64>> {
        (1usize..6, 1usize..6).prop_flat_map(|(r, c)| dense_matrix(r, c))
    }

    fn square_matrix() -> impl Strategy<Value = Array2<f64>> {
        (1usize..7).prop_flat_map(|n| dense_matrix(n, n))
    }

    fn boundary_pair() -> impl Strategy<Value = (Array2<f64>, Array2<f64>)> {
        (1usize..5, 1usize..6, 1usize..4)
            .prop_flat_map(|(n0, n1, n2)| (dense_matrix(n0, n1), dense_matrix(n1, n2)))
    }

    fn max_abs_diff(a: &Matrix, b: &Matrix) -> f64 {
        let a = a.to_dense().unwrap();
        let b = b.to_dense().unwrap();
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    proptest! {
        #[test]
        fn prop_d2_is_floored_at_one(b2 in any_matrix()) {
            for m in [Matrix::from(b2.clone()), sparse(&b2)] {
                let d2 = compute_d2(&m).unwrap().to_dense().unwrap();
                prop_assert!(d2.diag().iter().all(|&d| d >= 1.0));
            }
        }

        #[test]
        fn prop_kipf_bounded_and_finite(a in square_matrix(), add_identity in any::<bool>()) {
            let symmetric = a.mapv(f64::abs) + a.t().mapv(f64::abs);
            let out = compute_kipf_adjacency_normalized_matrix(
                &Matrix::from(symmetric.clone()),
                add_identity,
                1.0,
            )
            .unwrap()
            .to_dense()
            .unwrap();

            let mut weighted = symmetric.clone();
            if add_identity {
                weighted = weighted + Array2::<f64>::eye(symmetric.nrows());
            }
            let degrees = weighted.sum_axis(ndarray::Axis(1));
            for ((i, j), &v) in out.indexed_iter() {
                prop_assert!(v.is_finite());
                prop_assert!(v.abs() <= 1.0 + 1e-12);
                if degrees[i] == 0.0 || degrees[j] == 0.0 {
                    prop_assert_eq!(v, 0.0);
                } else {
                    let expected = weighted[[i, j]] / (degrees[i] * degrees[j]).sqrt();
                    prop_assert!((v - expected).abs() < 1e-12);
                }
            }
        }

        #[test]
        fn prop_xu_rows_are_unit_or_zero(b in any_matrix()) {
            let out = compute_xu_asymmetric_normalized_matrix(&Matrix::from(b.clone()), false)
                .unwrap()
                .to_dense()
                .unwrap();
            for (row_in, row_out) in b.rows().into_iter().zip(out.rows()) {
                let degree: f64 = row_in.iter().map(|v| v.abs()).sum();
                let mass: f64 = row_out.iter().map(|v| v.abs()).sum();
                prop_assert!(row_out.iter().all(|v| v.is_finite()));
                if degree == 0.0 {
                    prop_assert_eq!(mass, 0.0);
                } else {
                    prop_assert!((mass - 1.0).abs() < 1e-9);
                }
            }
        }

        #[test]
        fn prop_storage_modes_agree(b in any_matrix(), a in square_matrix()) {
            let dense_b = Matrix::from(b.clone());
            let sparse_b = sparse(&b);
            let xu_dense = compute_xu_asymmetric_normalized_matrix(&dense_b, false).unwrap();
            let xu_sparse = compute_xu_asymmetric_normalized_matrix(&sparse_b, true).unwrap();
            prop_assert!(!xu_dense.is_sparse());
            prop_assert!(xu_sparse.is_sparse());
            prop_assert!(max_abs_diff(&xu_dense, &xu_sparse) < 1e-12);

            let kipf_dense = compute_kipf_adjacency_normalized_matrix(&Matrix::from(a.clone()), true, 2.0).unwrap();
            let kipf_sparse = compute_kipf_adjacency_normalized_matrix(&sparse(&a), true, 2.0).unwrap();
            prop_assert!(kipf_sparse.is_sparse());
            prop_assert!(max_abs_diff(&kipf_dense, &kipf_sparse) < 1e-12);
        }

        #[test]
        fn prop_bunch_shape_law((b1, b2) in boundary_pair()) {
            let (n0, n1) = b1.dim();
            let (_, n2) = b2.dim();

            let dense = compute_bunch_normalized_matrices(&Matrix::from(b1.clone()), &Matrix::from(b2.clone())).unwrap();
            prop_assert_eq!(dense.b1.shape(), (n0, n1));
            prop_assert_eq!(dense.b1t.shape(), (n1, n0));
            prop_assert_eq!(dense.b2.shape(), (n1, n2));
            prop_assert_eq!(dense.b2t.shape(), (n2, n1));

            let sparse_out = compute_bunch_normalized_matrices(&sparse(&b1), &sparse(&b2)).unwrap();
            for (d, s) in [
                (&dense.b1, &sparse_out.b1),
                (&dense.b1t, &sparse_out.b1t),
                (&dense.b2, &sparse_out.b2),
                (&dense.b2t, &sparse_out.b2t),
            ] {
                prop_assert!(s.is_sparse());
                prop_assert_eq!(d.shape(), s.shape());
                prop_assert!(max_abs_diff(d, s) < 1e-9);
            }
        }

        #[test]
        fn prop_normalized_laplacian_has_unit_spectrum(b in any_matrix()) {
            prop_assume!(b.iter().any(|&v| v != 0.0));
            let laplacian = b.dot(&b.t());

            let out = compute_laplacian_normalized_matrix(&Matrix::from(laplacian)).unwrap();
            let out = out.as_dense().unwrap();
            let lambda = dominant_eigenvalue(out, &EigenConfig::default()).unwrap();
            prop_assert!((lambda - 1.0).abs() < 1e-8);
        }
    }
}
