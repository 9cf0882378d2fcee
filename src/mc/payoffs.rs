//! Basket Payoff Functions
//!
//! # Mathematical Definitions
//!
//! Payoffs act on the terminal prices `S_1(T), ..., S_N(T)` of one simulated
//! path through the equally weighted basket average
//! ```text
//! A = (1/N) Σ S_i(T)
//! ```
//! - **Call**: max(A − K, 0)
//! - **Put**: max(K − A, 0)

/// Supported basket payoffs
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BasketPayoff {
    /// Basket call: max(A − K, 0)
    Call { k: f64 },

    /// Basket put: max(K − A, 0)
    Put { k: f64 },
}

impl BasketPayoff {
    pub fn strike(&self) -> f64 {
        match self {
            BasketPayoff::Call { k } | BasketPayoff::Put { k } => *k,
        }
    }

    /// Payoff of one path from its terminal prices
    pub fn calculate(&self, terminal_prices: &[f64]) -> f64 {
        let average = basket_average(terminal_prices);
        match self {
            BasketPayoff::Call { k } => positive_part(average - k),
            BasketPayoff::Put { k } => positive_part(k - average),
        }
    }
}

/// `max(x, 0)` that keeps NaN, unlike `f64::max`
#[inline]
fn positive_part(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else {
        x
    }
}

/// Arithmetic mean of the terminal prices
#[inline]
pub fn basket_average(terminal_prices: &[f64]) -> f64 {
    terminal_prices.iter().sum::<f64>() / terminal_prices.len() as f64
}
