// src/linalg/mod.rs
//! Correlation-matrix decomposition for correlated normal sampling
//!
//! All routines are stateless functions over flat row-major `n x n` slices.
//! The entry point for pricing is [`correlation_factor`], which decomposes a
//! correlation matrix and falls back to Higham's nearest correlation matrix
//! when the input is not positive definite.

pub mod cholesky;
pub mod jacobi;
pub mod nearest_corr;

pub use cholesky::{cholesky, multiply_lower_transpose};
pub use jacobi::{jacobi_eigen_decomposition, EigenDecomposition};
pub use nearest_corr::{nearest_correlation_matrix, project_pos_semi_def, NearestCorrelation};

use crate::error::{PricingError, PricingResult};
use crate::math_utils::idx;
use bitflags::bitflags;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Decomposition attempts: the input, then its nearest correlation matrix
pub const MAX_DECOMPOSITION_ATTEMPTS: usize = 2;

bitflags! {
    /// How a [`CholeskyFactor`] was obtained
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FactorFlags: u32 {
        const NONE             = 0;
        const REPAIRED         = 1 << 0;
        const REPAIR_CONVERGED = 1 << 1;
    }
}

/// Lower-triangular `L` with `L·Lᵀ ≈ correlation matrix`, flat row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactor {
    lower: Vec<f64>,
    dimension: usize,
    flags: FactorFlags,
    repair_iterations: usize,
}

impl CholeskyFactor {
    /// Factor of the identity correlation (independent assets)
    pub fn identity(dimension: usize) -> Self {
        let mut lower = vec![0.0; dimension * dimension];
        for i in 0..dimension {
            lower[idx(i, i, dimension)] = 1.0;
        }
        Self {
            lower,
            dimension,
            flags: FactorFlags::NONE,
            repair_iterations: 0,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Row-major lower-triangular entries, length `n²`
    pub fn as_slice(&self) -> &[f64] {
        &self.lower
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.lower
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.lower[idx(i, j, self.dimension)]
    }

    pub fn flags(&self) -> FactorFlags {
        self.flags
    }

    pub fn was_repaired(&self) -> bool {
        self.flags.contains(FactorFlags::REPAIRED)
    }

    /// Higham iterations spent on repair, zero when none was needed
    pub fn repair_iterations(&self) -> usize {
        self.repair_iterations
    }

    /// The correlation matrix this factor actually encodes
    pub fn correlation(&self) -> Vec<f64> {
        multiply_lower_transpose(&self.lower, self.dimension)
    }
}

/// Decompose a correlation matrix, repairing it once if needed.
///
/// Attempt 1 decomposes `matrix` as given. If it is not positive definite,
/// the nearest correlation matrix is computed and decomposed (attempt 2).
///
/// # Errors
///
/// [`PricingError::DecompositionUnrecoverable`] when `matrix.len() != n²`,
/// `n == 0`, an entry is not finite, or the repaired matrix still fails. `NotPositiveDefinite` is
/// never returned.
pub fn correlation_factor(matrix: &[f64], n: usize) -> PricingResult<CholeskyFactor> {
    if n == 0 || matrix.len() != n * n {
        return Err(PricingError::DecompositionUnrecoverable {
            dimension: n,
            reason: format!("expected {} entries, got {}", n * n, matrix.len()),
        });
    }
    if let Some(pos) = matrix.iter().position(|v| !v.is_finite()) {
        return Err(PricingError::DecompositionUnrecoverable {
            dimension: n,
            reason: format!("non-finite entry at ({}, {})", pos / n, pos % n),
        });
    }

    let mut working: Cow<'_, [f64]> = Cow::Borrowed(matrix);
    let mut flags = FactorFlags::NONE;
    let mut repair_iterations = 0;
    let mut last_failure = String::new();

    for attempt in 1..=MAX_DECOMPOSITION_ATTEMPTS {
        debug!(dimension = n, attempt, "cholesky attempt");
        match cholesky(&working, n) {
            Ok(lower) => {
                return Ok(CholeskyFactor {
                    lower,
                    dimension: n,
                    flags,
                    repair_iterations,
                });
            }
            Err(PricingError::NotPositiveDefinite { row, radicand }) => {
                last_failure = format!("radicand {radicand:.3e} at diagonal {row}");
                if attempt == MAX_DECOMPOSITION_ATTEMPTS {
                    break;
                }

                warn!(
                    dimension = n,
                    row, radicand, "correlation matrix not positive definite, repairing"
                );
                let repaired = nearest_correlation_matrix(&working, n);
                flags |= FactorFlags::REPAIRED;
                if repaired.converged {
                    flags |= FactorFlags::REPAIR_CONVERGED;
                }
                repair_iterations = repaired.iterations;
                working = Cow::Owned(repaired.matrix);
            }
            Err(other) => return Err(other),
        }
    }

    Err(PricingError::DecompositionUnrecoverable {
        dimension: n,
        reason: format!(
            "still not positive definite after {} attempts ({})",
            MAX_DECOMPOSITION_ATTEMPTS, last_failure
        ),
    })
}
