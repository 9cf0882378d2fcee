// src/linalg/jacobi.rs
//! Classical Jacobi eigenvalue method for symmetric matrices
//!
//! # Algorithm
//!
//! Each rotation picks the off-diagonal pivot `(p, q)` of largest magnitude
//! and applies `A ← Jᵀ·A·J`, `V ← V·J`, where `J` is the plane rotation
//! with `cos φ = c`, `sin φ = s` chosen so that `A'[p,q] = 0`:
//! ```text
//! θ = (A[q,q] − A[p,p]) / (2·A[p,q])
//! t = sign(θ) / (|θ| + √(θ² + 1))
//! c = 1 / √(t² + 1),   s = t·c
//! ```
//! Iteration stops once every off-diagonal magnitude is below
//! [`JACOBI_TOLERANCE`] or after [`JACOBI_MAX_SWEEPS`] sweeps of
//! `n(n−1)/2` rotations. On exit `A ≈ diag(λ)` and `A₀ = V·diag(λ)·Vᵀ`.
//!
//! Cost is O(n³) per decomposition; correlation matrices are small next to
//! path counts.

use crate::math_utils::idx;
use tracing::debug;

/// Stop once the largest off-diagonal magnitude is below this
pub const JACOBI_TOLERANCE: f64 = 1e-10;

/// Sweep budget, one sweep being `n(n−1)/2` rotations
pub const JACOBI_MAX_SWEEPS: usize = 50;

/// Eigenvalues and eigenvectors of a symmetric matrix
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    pub values: Vec<f64>,
    /// Row-major `n x n`; column `k` is the eigenvector of `values[k]`
    pub vectors: Vec<f64>,
    pub rotations: usize,
}

impl EigenDecomposition {
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn min_eigenvalue(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// `V·diag(λ)·Vᵀ` with the stored eigenvalues
    pub fn reconstruct(&self) -> Vec<f64> {
        compose(&self.vectors, &self.values, self.dimension())
    }
}

/// `V·diag(values)·Vᵀ`; the lower half is computed and mirrored
pub fn compose(vectors: &[f64], values: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let s: f64 = (0..n)
                .map(|k| vectors[idx(i, k, n)] * values[k] * vectors[idx(j, k, n)])
                .sum();
            out[idx(i, j, n)] = s;
            out[idx(j, i, n)] = s;
        }
    }
    out
}

fn largest_off_diagonal(a: &[f64], n: usize) -> (usize, usize, f64) {
    let (mut p, mut q, mut largest) = (0, 1, 0.0);
    for i in 0..n {
        for j in (i + 1)..n {
            let v = a[idx(i, j, n)].abs();
            if v > largest {
                largest = v;
                p = i;
                q = j;
            }
        }
    }
    (p, q, largest)
}

/// Eigen-decompose the symmetric flat row-major `n x n` matrix.
pub fn jacobi_eigen_decomposition(matrix: &[f64], n: usize) -> EigenDecomposition {
    debug_assert_eq!(matrix.len(), n * n);
    let mut a = matrix.to_vec();
    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[idx(i, i, n)] = 1.0;
    }

    let max_rotations = JACOBI_MAX_SWEEPS * (n * n.saturating_sub(1) / 2).max(1);
    let mut rotations = 0;

    if n > 1 {
        loop {
            let (p, q, largest) = largest_off_diagonal(&a, n);
            if largest < JACOBI_TOLERANCE {
                break;
            }
            if rotations == max_rotations {
                debug!(
                    dimension = n,
                    rotations,
                    residual = largest,
                    "Jacobi sweep budget exhausted"
                );
                break;
            }

            let apq = a[idx(p, q, n)];
            let theta = (a[idx(q, q, n)] - a[idx(p, p, n)]) / (2.0 * apq);
            let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
            let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            // A·J
            for k in 0..n {
                let akp = a[idx(k, p, n)];
                let akq = a[idx(k, q, n)];
                a[idx(k, p, n)] = c * akp - s * akq;
                a[idx(k, q, n)] = s * akp + c * akq;
            }
            // Jᵀ·(A·J)
            for k in 0..n {
                let apk = a[idx(p, k, n)];
                let aqk = a[idx(q, k, n)];
                a[idx(p, k, n)] = c * apk - s * aqk;
                a[idx(q, k, n)] = s * apk + c * aqk;
            }
            a[idx(p, q, n)] = 0.0;
            a[idx(q, p, n)] = 0.0;

            // V·J
            for k in 0..n {
                let vkp = v[idx(k, p, n)];
                let vkq = v[idx(k, q, n)];
                v[idx(k, p, n)] = c * vkp - s * vkq;
                v[idx(k, q, n)] = s * vkp + c * vkq;
            }

            rotations += 1;
        }
    }

    EigenDecomposition {
        values: (0..n).map(|i| a[idx(i, i, n)]).collect(),
        vectors: v,
        rotations,
    }
}
