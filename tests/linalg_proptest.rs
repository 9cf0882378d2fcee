// tests/linalg_proptest.rs
use basket_mc::linalg::{
    cholesky, correlation_factor, jacobi_eigen_decomposition, multiply_lower_transpose,
    nearest_correlation_matrix,
};
use basket_mc::math_utils::{idx, max_abs_diff};
use proptest::prelude::*;

/// `B·Bᵀ + εI`, symmetric positive definite
fn spd_from(b: &[f64], n: usize, eps: f64) -> Vec<f64> {
    let mut a = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            let dot: f64 = (0..n).map(|k| b[idx(i, k, n)] * b[idx(j, k, n)]).sum();
            a[idx(i, j, n)] = dot + if i == j { eps } else { 0.0 };
        }
    }
    a
}

/// Unit diagonal, off-diagonals mirrored from the upper triangle
fn symmetric_from(raw: &[f64], n: usize) -> Vec<f64> {
    let mut a = vec![0.0; n * n];
    for i in 0..n {
        a[idx(i, i, n)] = 1.0;
        for j in (i + 1)..n {
            a[idx(i, j, n)] = raw[idx(i, j, n)];
            a[idx(j, i, n)] = raw[idx(i, j, n)];
        }
    }
    a
}

fn matrix_strategy(range: std::ops::Range<f64>) -> impl Strategy<Value = (usize, Vec<f64>)> {
    (1usize..13).prop_flat_map(move |n| (Just(n), prop::collection::vec(range.clone(), n * n)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_cholesky_reconstructs_spd((n, b) in matrix_strategy(-1.0..1.0)) {
        let a = spd_from(&b, n, 0.1);
        let lower = cholesky(&a, n).expect("SPD input");
        let scale = a.iter().fold(1.0f64, |m, v| m.max(v.abs()));
        prop_assert!(max_abs_diff(&multiply_lower_transpose(&lower, n), &a) < 1e-9 * scale);
    }

    #[test]
    fn prop_jacobi_reconstructs_symmetric((n, raw) in matrix_strategy(-2.0..2.0)) {
        let a = symmetric_from(&raw, n);
        let eig = jacobi_eigen_decomposition(&a, n);
        prop_assert_eq!(eig.values.len(), n);
        prop_assert!(max_abs_diff(&eig.reconstruct(), &a) < 1e-8);
    }

    #[test]
    fn prop_nearest_correlation_is_valid((n, raw) in matrix_strategy(-1.0..1.0)) {
        let a = symmetric_from(&raw, n);
        let repaired = nearest_correlation_matrix(&a, n);
        for i in 0..n {
            prop_assert_eq!(repaired.matrix[idx(i, i, n)], 1.0);
            for j in 0..n {
                prop_assert_eq!(repaired.matrix[idx(i, j, n)], repaired.matrix[idx(j, i, n)]);
            }
        }
        let min_eigenvalue = jacobi_eigen_decomposition(&repaired.matrix, n).min_eigenvalue();
        prop_assert!(min_eigenvalue > 0.0, "min eigenvalue {}", min_eigenvalue);
        prop_assert!(cholesky(&repaired.matrix, n).is_ok());
    }

    #[test]
    fn prop_correlation_like_input_always_factors((n, raw) in matrix_strategy(-1.0..1.0)) {
        let a = symmetric_from(&raw, n);
        let factor = correlation_factor(&a, n);
        prop_assert!(factor.is_ok(), "n = {}: {:?}", n, factor.err());
    }

    #[test]
    fn prop_factor_of_spd_correlation_needs_no_repair((n, b) in matrix_strategy(-1.0..1.0)) {
        // normalise an SPD matrix to unit diagonal
        let a = spd_from(&b, n, 0.1);
        let mut corr = a.clone();
        for i in 0..n {
            for j in 0..n {
                corr[idx(i, j, n)] = a[idx(i, j, n)] / (a[idx(i, i, n)] * a[idx(j, j, n)]).sqrt();
            }
        }
        let factor = correlation_factor(&corr, n).expect("valid correlation");
        prop_assert!(!factor.was_repaired());
        prop_assert!(max_abs_diff(&factor.correlation(), &corr) < 1e-9);
    }
}
