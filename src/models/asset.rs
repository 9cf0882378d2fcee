// src/models/asset.rs
use crate::error::{validation::*, PricingResult};

/// Market parameters of one basket constituent
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Asset {
    pub spot: f64,
    pub volatility: f64,
    pub risk_free_rate: f64,
}

impl Asset {
    pub fn new(spot: f64, volatility: f64, risk_free_rate: f64) -> Self {
        Asset {
            spot,
            volatility,
            risk_free_rate,
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        validate_positive("spot", self.spot)?;
        validate_finite("spot", self.spot)?;
        validate_non_negative("volatility", self.volatility)?;
        validate_finite("volatility", self.volatility)?;
        validate_finite("risk_free_rate", self.risk_free_rate)?;
        Ok(())
    }

    /// Risk-neutral forward `S·e^{rT}`
    pub fn forward(&self, t: f64) -> f64 {
        self.spot * (self.risk_free_rate * t).exp()
    }
}

/// Per-step log-space coefficients of an [`Asset`]
///
/// ```text
/// drift     = (r − σ²/2)·Δt
/// diffusion = σ·√Δt
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrecomputedAsset {
    pub log_spot: f64,
    pub drift: f64,
    pub diffusion: f64,
}

impl PrecomputedAsset {
    pub fn from_asset(asset: &Asset, dt: f64) -> Self {
        let sigma = asset.volatility;
        PrecomputedAsset {
            log_spot: asset.spot.ln(),
            drift: (asset.risk_free_rate - 0.5 * sigma * sigma) * dt,
            diffusion: sigma * dt.sqrt(),
        }
    }
}

/// Precompute every constituent of a basket for step size `dt`
pub fn precompute_basket(basket: &[Asset], dt: f64) -> Vec<PrecomputedAsset> {
    basket
        .iter()
        .map(|asset| PrecomputedAsset::from_asset(asset, dt))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_precompute_coefficients() {
        let asset = Asset::new(100.0, 0.2, 0.05);
        let dt = 1.0 / 252.0;
        let pre = PrecomputedAsset::from_asset(&asset, dt);

        assert_relative_eq!(pre.log_spot, 100.0f64.ln(), epsilon = 1e-15);
        assert_relative_eq!(pre.drift, (0.05 - 0.02) * dt, epsilon = 1e-15);
        assert_relative_eq!(pre.diffusion, 0.2 * dt.sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn test_validate() {
        assert!(Asset::new(100.0, 0.0, 0.05).validate().is_ok());
        assert!(Asset::new(0.0, 0.2, 0.05).validate().is_err());
        assert!(Asset::new(100.0, -0.2, 0.05).validate().is_err());
        assert!(Asset::new(100.0, 0.2, f64::NAN).validate().is_err());
        assert!(Asset::new(f64::INFINITY, 0.2, 0.05).validate().is_err());
    }

    #[test]
    fn test_forward() {
        let asset = Asset::new(100.0, 0.2, 0.05);
        assert_relative_eq!(asset.forward(1.0), 105.12710963760242, epsilon = 1e-12);
    }

    #[test]
    fn test_precompute_basket_preserves_order() {
        let basket = [Asset::new(100.0, 0.2, 0.05), Asset::new(50.0, 0.3, 0.05)];
        let pre = precompute_basket(&basket, 0.5);
        assert_eq!(pre.len(), 2);
        assert_relative_eq!(pre[1].log_spot, 50.0f64.ln());
    }
}
