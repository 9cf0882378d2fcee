// src/analytics/bs_analytic.rs
//! Closed-form references for single-asset and degenerate baskets
//!
//! # Mathematical Foundation
//!
//! A one-asset basket under GBM is a vanilla European option, so its Monte
//! Carlo price must agree with Black-Scholes:
//! ```text
//! C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
//! d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T),   d₂ = d₁ - σ√T
//! ```
//! For zero volatility every path is the forward, giving the intrinsic value
//! of the discounted forward basket.

use crate::math_utils::norm_cdf;
use crate::models::Asset;

/// Black-Scholes European call option price
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes European put option price
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}

/// Average of the constituents' risk-neutral forwards, `(1/N) Σ S_i e^{r_i T}`
pub fn basket_forward(basket: &[Asset], t: f64) -> f64 {
    basket.iter().map(|a| a.forward(t)).sum::<f64>() / basket.len() as f64
}

/// Basket call value when every volatility is zero:
/// `e^(-rT) · max(F_basket - K, 0)`
pub fn deterministic_basket_call(basket: &[Asset], k: f64, r: f64, t: f64) -> f64 {
    (-r * t).exp() * (basket_forward(basket, t) - k).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_put_call_parity() {
        let (s, k, r, sigma, t) = (100.0, 95.0, 0.05, 0.2, 1.0);
        let lhs = bs_call_price(s, k, r, sigma, t) - bs_put_price(s, k, r, sigma, t);
        let rhs = s - k * (-r * t).exp();
        assert_relative_eq!(lhs, rhs, epsilon = 1e-10);
    }

    #[test]
    fn test_known_call_value() {
        // standard textbook value for S=K=100, r=5%, σ=20%, T=1
        assert_relative_eq!(bs_call_price(100.0, 100.0, 0.05, 0.2, 1.0), 10.4506, epsilon = 1e-4);
    }

    #[test]
    fn test_deterministic_basket() {
        let basket = [Asset::new(100.0, 0.0, 0.05), Asset::new(120.0, 0.0, 0.05)];
        let value = deterministic_basket_call(&basket, 100.0, 0.05, 1.0);
        assert_relative_eq!(value, 110.0 - 100.0 * (-0.05f64).exp(), epsilon = 1e-12);
        assert_eq!(deterministic_basket_call(&basket, 500.0, 0.05, 1.0), 0.0);
    }
}
