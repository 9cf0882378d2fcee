// src/linalg/cholesky.rs
//! Cholesky–Crout decomposition of a symmetric matrix
//!
//! # Algorithm
//!
//! For a symmetric positive-definite `A`, find lower-triangular `L` with
//! `A = L·Lᵀ`. Row by row, for `j ≤ i`:
//! ```text
//! L[i,i] = √(A[i,i] − Σ_{k<i} L[i,k]²)
//! L[i,j] = (A[i,j] − Σ_{k<j} L[i,k]·L[j,k]) / L[j,j]
//! ```
//! A radicand `≤ 0` on the diagonal means `A` is not positive definite.
//!
//! Only the lower triangle of `A` is read.

use crate::error::{PricingError, PricingResult};
use crate::math_utils::idx;

/// Decompose the flat row-major `n x n` matrix into its lower Cholesky factor.
///
/// # Errors
///
/// [`PricingError::NotPositiveDefinite`] at the first diagonal whose radicand
/// is not strictly positive (NaN included).
pub fn cholesky(matrix: &[f64], n: usize) -> PricingResult<Vec<f64>> {
    debug_assert_eq!(matrix.len(), n * n);
    let mut lower = vec![0.0; n * n];

    for i in 0..n {
        for j in 0..=i {
            let mut s = 0.0;
            for k in 0..j {
                s += lower[idx(i, k, n)] * lower[idx(j, k, n)];
            }

            if i == j {
                let radicand = matrix[idx(i, i, n)] - s;
                if radicand <= 0.0 || radicand.is_nan() {
                    return Err(PricingError::NotPositiveDefinite { row: i, radicand });
                }
                lower[idx(i, i, n)] = radicand.sqrt();
            } else {
                lower[idx(i, j, n)] = (matrix[idx(i, j, n)] - s) / lower[idx(j, j, n)];
            }
        }
    }

    Ok(lower)
}

/// `L·Lᵀ` for a flat lower-triangular factor
pub fn multiply_lower_transpose(lower: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let s: f64 = (0..=j).map(|k| lower[idx(i, k, n)] * lower[idx(j, k, n)]).sum();
            out[idx(i, j, n)] = s;
            out[idx(j, i, n)] = s;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_two_asset_negative_correlation() {
        let corr = [1.0, -0.7, -0.7, 1.0];
        let l = cholesky(&corr, 2).unwrap();

        assert_abs_diff_eq!(l[0], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(l[1], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(l[2], -0.7, epsilon = 1e-15);
        assert_abs_diff_eq!(l[3], (1.0f64 - 0.49).sqrt(), epsilon = 1e-15);
        assert_abs_diff_eq!(l[3], 0.714143, epsilon = 1e-6);
    }

    #[test]
    fn test_reconstruction_three_by_three() {
        let a = [4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0];
        let l = cholesky(&a, 3).unwrap();

        // textbook factor
        let expected = [2.0, 0.0, 0.0, 6.0, 1.0, 0.0, -8.0, 5.0, 3.0];
        for (got, want) in l.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }

        let back = multiply_lower_transpose(&l, 3);
        for (got, want) in back.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_not_positive_definite() {
        let a = [2.0, 5.0, 5.0, 2.0];
        match cholesky(&a, 2) {
            Err(PricingError::NotPositiveDefinite { row, radicand }) => {
                assert_eq!(row, 1);
                assert!(radicand < 0.0);
            }
            other => panic!("expected NotPositiveDefinite, got {:?}", other),
        }
    }

    #[test]
    fn test_singular_matrix_rejected() {
        // perfectly correlated pair: radicand is exactly zero
        let a = [1.0, 1.0, 1.0, 1.0];
        assert!(matches!(
            cholesky(&a, 2),
            Err(PricingError::NotPositiveDefinite { row: 1, .. })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let a = [f64::NAN, 0.0, 0.0, 1.0];
        assert!(matches!(
            cholesky(&a, 2),
            Err(PricingError::NotPositiveDefinite { row: 0, .. })
        ));
    }

    #[test]
    fn test_upper_triangle_ignored() {
        let sym = [1.0, 0.3, 0.3, 1.0];
        let lower_only = [1.0, 99.0, 0.3, 1.0];
        assert_eq!(cholesky(&sym, 2).unwrap(), cholesky(&lower_only, 2).unwrap());
    }
}
