// src/models/mod.rs
pub mod asset;
pub mod gbm;
pub mod path_state;

pub use asset::{Asset, PrecomputedAsset};
pub use gbm::MultiAssetGbm;
pub use path_state::PathState;
