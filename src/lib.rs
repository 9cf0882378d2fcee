//! # basket-mc: Monte Carlo Pricing of Basket Options
//!
//! Prices an equally weighted basket call on correlated assets that follow
//! Geometric Brownian Motion.
//!
//! ## Key Features
//!
//! - **Robust Correlation Handling**: Cholesky decomposition with automatic
//!   repair through Higham's nearest correlation matrix
//! - **Log-Space Paths**: one exponentiation per path, no compounding error
//! - **Parallel Monte Carlo**: Rayon fork-join with per-context RNG streams
//!   and reusable scratch buffers
//!
//! ## Quick Start
//!
//! ```rust
//! use basket_mc::linalg::correlation_factor;
//! use basket_mc::mc::{price_basket, BasketMcConfig, BasketPayoff};
//! use basket_mc::models::Asset;
//!
//! let basket = vec![Asset::new(100.0, 0.20, 0.05), Asset::new(100.0, 0.25, 0.05)];
//! let factor = correlation_factor(&[1.0, -0.7, -0.7, 1.0], 2).expect("valid correlation");
//!
//! let cfg = BasketMcConfig {
//!     paths: 10_000,
//!     steps: 52,
//!     payoff: BasketPayoff::Call { k: 100.0 },
//!     ..Default::default()
//! };
//!
//! let estimate = price_basket(&cfg, &basket, &factor).expect("valid configuration");
//! println!("Basket call: {:.4} ± {:.4}", estimate.price, estimate.std_error);
//! ```

// Module declarations
pub mod analytics;
pub mod data;
pub mod error;
pub mod linalg;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

// Re-export commonly used types for convenience
pub use error::{PricingError, PricingResult};
pub use linalg::{correlation_factor, CholeskyFactor};
pub use mc::{price_basket, BasketMcConfig, BasketPricer, McEstimate};
pub use models::Asset;
