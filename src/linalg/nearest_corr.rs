// src/linalg/nearest_corr.rs
//! Nearest correlation matrix (Higham, 2002)
//!
//! # Alternating Projections with Dykstra's Correction
//!
//! Finds the matrix closest to `A` in the intersection of
//! - `S` = symmetric positive semi-definite matrices, and
//! - `U` = symmetric matrices with unit diagonal.
//!
//! ```text
//! ΔS₀ = 0, Y₀ = A
//! for k = 1, 2, ...
//!     R_k  = Y_{k−1} − ΔS_{k−1}
//!     X_k  = P_S(R_k)
//!     ΔS_k = X_k − R_k
//!     Y_k  = P_U(X_k)          (diagonal reset to 1)
//! ```
//! `P_S` clamps eigenvalues to [`EIGENVALUE_FLOOR`] rather than zero, so the
//! result stays strictly positive definite and Cholesky can follow.

use super::jacobi::{compose, jacobi_eigen_decomposition};
use crate::math_utils::{idx, max_abs_diff};
use tracing::{debug, warn};

/// Eigenvalue floor applied by the PSD projection
pub const EIGENVALUE_FLOOR: f64 = 1e-8;

/// Iteration budget of the alternating projections
pub const NEAREST_CORR_MAX_ITERATIONS: usize = 200;

/// Convergence threshold on the maximum entrywise change of `Y`
pub const NEAREST_CORR_TOLERANCE: f64 = 1e-8;

/// Outcome of [`nearest_correlation_matrix`]
#[derive(Debug, Clone, PartialEq)]
pub struct NearestCorrelation {
    /// Repaired flat row-major matrix, unit diagonal
    pub matrix: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// Maximum entrywise change of the last iteration
    pub max_change: f64,
}

/// Project a symmetric matrix onto the (floored) positive-definite cone.
pub fn project_pos_semi_def(matrix: &[f64], n: usize) -> Vec<f64> {
    let eig = jacobi_eigen_decomposition(matrix, n);
    let clamped: Vec<f64> = eig
        .values
        .iter()
        .map(|&lambda| lambda.max(EIGENVALUE_FLOOR))
        .collect();
    compose(&eig.vectors, &clamped, n)
}

/// Scale `matrix` to unit diagonal as `D^-½·X·D^-½`, `D = diag(X)`.
///
/// A congruence, so positive definiteness survives; the diagonal is then
/// written as exactly 1.0.
pub fn rescale_to_unit_diagonal(matrix: &[f64], n: usize) -> Vec<f64> {
    let inv_sqrt_diag: Vec<f64> = (0..n)
        .map(|i| 1.0 / matrix[idx(i, i, n)].sqrt())
        .collect();
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..i {
            let v = matrix[idx(i, j, n)] * inv_sqrt_diag[i] * inv_sqrt_diag[j];
            out[idx(i, j, n)] = v;
            out[idx(j, i, n)] = v;
        }
        out[idx(i, i, n)] = 1.0;
    }
    out
}

/// Higham's nearest correlation matrix to the flat row-major `n x n` input.
///
/// Never fails: when the budget runs out the partially corrected matrix is
/// returned with `converged == false`. Either way the result is projected
/// once more and rescaled to unit diagonal, so its smallest eigenvalue stays
/// above zero and Cholesky succeeds on it.
pub fn nearest_correlation_matrix(matrix: &[f64], n: usize) -> NearestCorrelation {
    debug_assert_eq!(matrix.len(), n * n);
    let mut working = matrix.to_vec();
    let mut adjustment = vec![0.0; n * n];
    let mut max_change = f64::INFINITY;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < NEAREST_CORR_MAX_ITERATIONS {
        iterations += 1;
        let pre_projection: Vec<f64> = working
            .iter()
            .zip(&adjustment)
            .map(|(y, ds)| y - ds)
            .collect();

        let mut projected = project_pos_semi_def(&pre_projection, n);

        for ((ds, x), r) in adjustment.iter_mut().zip(&projected).zip(&pre_projection) {
            *ds = x - r;
        }

        for i in 0..n {
            projected[idx(i, i, n)] = 1.0;
        }

        max_change = max_abs_diff(&projected, &working);
        working = projected;

        if max_change < NEAREST_CORR_TOLERANCE {
            converged = true;
            break;
        }
    }

    if converged {
        debug!(dimension = n, iterations, "nearest correlation converged");
    } else {
        warn!(
            dimension = n,
            iterations,
            max_change,
            "nearest correlation did not converge, returning partial correction"
        );
    }

    // the diagonal reset can leave the smallest eigenvalue just below zero
    let matrix = rescale_to_unit_diagonal(&project_pos_semi_def(&working, n), n);

    NearestCorrelation {
        matrix,
        iterations,
        converged,
        max_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::cholesky::cholesky;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_projection_keeps_positive_definite_input() {
        let a = [1.0, 0.5, 0.5, 1.0];
        let p = project_pos_semi_def(&a, 2);
        for (got, want) in p.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_projection_clamps_negative_eigenvalue() {
        // eigenvalues 7 and −3; the −3 direction is floored
        let p = project_pos_semi_def(&[2.0, 5.0, 5.0, 2.0], 2);
        let eig = jacobi_eigen_decomposition(&p, 2);
        assert!(eig.min_eigenvalue() > 0.0);
        assert_abs_diff_eq!(p[0], 3.5, epsilon = 1e-7);
        assert_abs_diff_eq!(p[1], 3.5, epsilon = 1e-7);
        assert_eq!(p[1], p[2]);
    }

    #[test]
    fn test_valid_correlation_is_fixed_point() {
        let a = [1.0, -0.7, -0.7, 1.0];
        let result = nearest_correlation_matrix(&a, 2);
        assert!(result.converged);
        assert!(result.iterations <= 2);
        for (got, want) in result.matrix.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_repairs_inconsistent_three_asset_matrix() {
        let a = [1.0, 0.9, 0.7, 0.9, 1.0, 0.3, 0.7, 0.3, 1.0];
        assert!(cholesky(&a, 3).is_err());

        let result = nearest_correlation_matrix(&a, 3);
        assert!(result.converged);
        for i in 0..3 {
            assert_eq!(result.matrix[idx(i, i, 3)], 1.0);
        }
        assert!(cholesky(&result.matrix, 3).is_ok());
    }

    #[test]
    fn test_result_is_symmetric() {
        let a = [1.0, 0.95, 0.95, 0.95, 1.0, -0.95, 0.95, -0.95, 1.0];
        let m = nearest_correlation_matrix(&a, 3).matrix;
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[idx(i, j, 3)], m[idx(j, i, 3)]);
            }
        }
    }

    #[test]
    fn test_rescale_gives_exact_unit_diagonal() {
        let m = rescale_to_unit_diagonal(&[4.0, 1.0, 1.0, 9.0], 2);
        assert_eq!(m[0], 1.0);
        assert_eq!(m[3], 1.0);
        assert_abs_diff_eq!(m[1], 1.0 / 6.0, epsilon = 1e-15);
        assert_eq!(m[1], m[2]);
    }

    #[test]
    fn test_near_singular_repair_stays_decomposable() {
        // converges, but the diagonal reset alone leaves an eigenvalue of about −2.6e-10
        let a = [
            1.0,
            -0.9756475905722155,
            -0.36739406331007096,
            -0.9756475905722155,
            1.0,
            0.9452812317395871,
            -0.36739406331007096,
            0.9452812317395871,
            1.0,
        ];
        assert!(cholesky(&a, 3).is_err());

        let result = nearest_correlation_matrix(&a, 3);
        for i in 0..3 {
            assert_eq!(result.matrix[idx(i, i, 3)], 1.0);
        }
        assert!(jacobi_eigen_decomposition(&result.matrix, 3).min_eigenvalue() > 0.0);
        assert!(cholesky(&result.matrix, 3).is_ok());
    }
}
