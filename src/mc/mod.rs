// src/mc/mod.rs
pub mod mc_engine;
pub mod payoffs;

pub use mc_engine::{price_basket, BasketMcConfig, BasketPricer, McEstimate};
pub use payoffs::BasketPayoff;
