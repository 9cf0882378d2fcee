// src/models/gbm.rs
//! Correlated multi-asset Geometric Brownian Motion
//!
//! # Mathematical Framework
//!
//! Each constituent follows
//! ```text
//! dS_i = r_i S_i dt + σ_i S_i dW_i,   d⟨W_i, W_j⟩ = ρ_ij dt
//! ```
//! and is advanced with the exact log-space step
//! ```text
//! ln S_i(t+Δt) = ln S_i(t) + (r_i − σ_i²/2)Δt + σ_i √Δt · X_i
//! X = L·Z,  Z ~ N(0, I),  L·Lᵀ = ρ
//! ```
//! Prices stay in log-space for the whole step loop and are exponentiated
//! once at maturity, so no error compounds through repeated multiplication.

use super::asset::{precompute_basket, Asset, PrecomputedAsset};
use super::path_state::PathState;
use crate::linalg::CholeskyFactor;
use crate::rng;
use rand::Rng;

/// Path generator for a correlated basket
pub struct MultiAssetGbm<'a> {
    num_steps: usize,
    dt: f64,
    factor: &'a CholeskyFactor,
}

impl<'a> MultiAssetGbm<'a> {
    /// `dt = t / num_steps`
    pub fn new(num_steps: usize, t: f64, factor: &'a CholeskyFactor) -> Self {
        MultiAssetGbm {
            num_steps,
            dt: t / num_steps as f64,
            factor,
        }
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn num_assets(&self) -> usize {
        self.factor.dimension()
    }

    /// Drift and diffusion per asset for this step size, computed once per run
    pub fn precompute(&self, basket: &[Asset]) -> Vec<PrecomputedAsset> {
        precompute_basket(basket, self.dt)
    }

    /// Simulate one path and return its terminal prices.
    ///
    /// `assets` and `state` must both match the factor's dimension. The
    /// returned slice borrows `state` and is overwritten by the next call.
    pub fn generate_path<'s, R: Rng + ?Sized>(
        &self,
        assets: &[PrecomputedAsset],
        rng: &mut R,
        state: &'s mut PathState,
    ) -> &'s [f64] {
        let n = self.factor.dimension();
        debug_assert_eq!(assets.len(), n);
        debug_assert_eq!(state.num_assets(), n);

        let lower = self.factor.as_slice();
        state.reset(assets);

        for _ in 0..self.num_steps {
            rng::fill_standard_normals(rng, &mut state.z);

            // X = L·Z over the lower triangle only
            for i in 0..n {
                let row = &lower[i * n..i * n + i + 1];
                state.x[i] = row.iter().zip(&state.z[..=i]).map(|(l, z)| l * z).sum::<f64>();
            }

            for ((log_s, asset), x) in state.prices.iter_mut().zip(assets).zip(&state.x) {
                *log_s += asset.drift + asset.diffusion * x;
            }
        }

        for p in state.prices.iter_mut() {
            *p = p.exp();
        }

        state.terminal_prices()
    }

    /// Single-path convenience that allocates its own scratch
    pub fn generate_path_for_basket<R: Rng + ?Sized>(
        &self,
        basket: &[Asset],
        rng: &mut R,
    ) -> Vec<f64> {
        let assets = self.precompute(basket);
        let mut state = PathState::new(basket.len());
        self.generate_path(&assets, rng, &mut state).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::correlation_factor;
    use crate::rng::RngFactory;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_volatility_is_deterministic() {
        let factor = correlation_factor(&[1.0, -0.7, -0.7, 1.0], 2).unwrap();
        let sim = MultiAssetGbm::new(252, 1.0, &factor);
        let basket = [Asset::new(100.0, 0.0, 0.05), Asset::new(80.0, 0.0, 0.05)];
        let mut rng = RngFactory::new(7).create_std_rng(0);

        let terminal = sim.generate_path_for_basket(&basket, &mut rng);

        assert_relative_eq!(terminal[0], 100.0 * 0.05f64.exp(), max_relative = 1e-11);
        assert_relative_eq!(terminal[1], 80.0 * 0.05f64.exp(), max_relative = 1e-11);
    }

    #[test]
    fn test_state_reused_across_paths() {
        let factor = CholeskyFactor::identity(2);
        let sim = MultiAssetGbm::new(10, 1.0, &factor);
        let basket = [Asset::new(100.0, 0.2, 0.05), Asset::new(100.0, 0.25, 0.05)];
        let assets = sim.precompute(&basket);
        let mut state = PathState::new(2);
        let mut rng = RngFactory::new(11).create_std_rng(0);

        let first = sim.generate_path(&assets, &mut rng, &mut state).to_vec();
        let second = sim.generate_path(&assets, &mut rng, &mut state).to_vec();

        assert_ne!(first, second);
        assert!(first.iter().chain(&second).all(|p| p.is_finite() && *p > 0.0));
    }

    #[test]
    fn test_same_stream_same_path() {
        let factor = correlation_factor(&[1.0, 0.3, 0.3, 1.0], 2).unwrap();
        let sim = MultiAssetGbm::new(50, 1.0, &factor);
        let basket = [Asset::new(100.0, 0.2, 0.05), Asset::new(100.0, 0.25, 0.05)];
        let factory = RngFactory::new(5);

        let a = sim.generate_path_for_basket(&basket, &mut factory.create_std_rng(2));
        let b = sim.generate_path_for_basket(&basket, &mut factory.create_std_rng(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_correlated_draws_follow_factor() {
        let factor = correlation_factor(&[1.0, -0.7, -0.7, 1.0], 2).unwrap();
        let sim = MultiAssetGbm::new(1, 1.0, &factor);
        let basket = [Asset::new(100.0, 0.2, 0.0), Asset::new(100.0, 0.2, 0.0)];
        let assets = sim.precompute(&basket);
        let mut state = PathState::new(2);
        let mut rng = RngFactory::new(3).create_std_rng(0);

        let n = 50_000;
        let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
        for _ in 0..n {
            sim.generate_path(&assets, &mut rng, &mut state);
            let x = state.correlated_draws();
            sxy += x[0] * x[1];
            sxx += x[0] * x[0];
            syy += x[1] * x[1];
        }
        let rho = sxy / (sxx * syy).sqrt();
        assert!((rho + 0.7).abs() < 0.02, "sample correlation {}", rho);
    }
}
