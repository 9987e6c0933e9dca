//! Sample weighting for the information-bar engine.
//!
//! This crate handles:
//! - Label concurrency (interval sweep)
//! - Uniqueness and absolute-return weighting
//! - Recency decay hook
//! - Normalization to unit mass per partition

pub mod concurrency;
pub mod decay;
pub mod engine;

pub use concurrency::{average_uniqueness, count_concurrency};
pub use decay::{SessionDecay, TimeDecay};
pub use engine::{weigh_labels, weigh_labels_with};
