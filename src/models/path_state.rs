// src/models/path_state.rs
use super::asset::PrecomputedAsset;

/// Scratch buffers of one execution context
///
/// Owned by a single worker and reused for every path it simulates, so the
/// step loop never allocates.
#[derive(Debug, Clone)]
pub struct PathState {
    /// Independent standard normal draws `Z`
    pub(crate) z: Vec<f64>,
    /// Correlated draws `X = L·Z`
    pub(crate) x: Vec<f64>,
    /// Log-prices during the step loop, prices once the path completes
    pub(crate) prices: Vec<f64>,
}

impl PathState {
    pub fn new(num_assets: usize) -> Self {
        PathState {
            z: vec![0.0; num_assets],
            x: vec![0.0; num_assets],
            prices: vec![0.0; num_assets],
        }
    }

    pub fn num_assets(&self) -> usize {
        self.prices.len()
    }

    /// Start a new path at the basket's log-spots
    pub(crate) fn reset(&mut self, assets: &[PrecomputedAsset]) {
        for (p, asset) in self.prices.iter_mut().zip(assets) {
            *p = asset.log_spot;
        }
    }

    /// Terminal prices of the last completed path
    pub fn terminal_prices(&self) -> &[f64] {
        &self.prices
    }

    /// Correlated draws of the last step
    pub fn correlated_draws(&self) -> &[f64] {
        &self.x
    }
}
