// src/error.rs
use thiserror::Error;

/// Error types for the basket-mc library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Cholesky hit a non-positive radicand on the diagonal.
    ///
    /// Raised by [`crate::linalg::cholesky`]. [`crate::linalg::correlation_factor`]
    /// handles it by repairing the matrix, so callers of the factor API never see it.
    #[error("Matrix not positive definite: radicand {radicand:.3e} at diagonal {row}")]
    NotPositiveDefinite { row: usize, radicand: f64 },

    /// The repaired correlation matrix still could not be decomposed
    #[error("Correlation decomposition unrecoverable for {dimension}x{dimension} matrix: {reason}")]
    DecompositionUnrecoverable { dimension: usize, reason: String },

    /// A market data source could not be opened or read
    #[error("Malformed input from '{source_name}': {reason}")]
    MalformedInput { source_name: String, reason: String },

    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },
}

/// Result type alias for basket-mc operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        if value <= 0.0 || value.is_nan() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        if value < 0.0 || value.is_nan() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> PricingResult<()> {
        if paths == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > 1_000_000_000 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "exceeds maximum allowed (1 billion)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> PricingResult<()> {
        if steps == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > 100_000 {
            Err(PricingError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "exceeds maximum allowed (100,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
