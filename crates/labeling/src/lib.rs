//! Triple-barrier labeling for the information-bar engine.
//!
//! This crate handles:
//! - Exponentially weighted volatility of bar closes
//! - Upper/lower/vertical barrier scanning
//! - Label statistics

pub mod stats;
pub mod triple_barrier;
pub mod volatility;

pub use stats::LabelStats;
pub use triple_barrier::{label_anchor, label_bars, Barriers};
pub use volatility::{volatility_series, EwmaVolatility};
