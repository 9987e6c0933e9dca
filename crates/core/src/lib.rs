//! Core types and configuration for the information-bar engine.
//!
//! This crate provides shared types used across all other crates:
//! - Market data and output records (ticks, bars, labels, weights)
//! - Configuration structures
//! - Common error types
//! - Exponential moving average

pub mod config;
pub mod ema;
pub mod error;
pub mod types;

pub use config::{BarConfig, LabelConfig, PipelineConfig, TieRule, WeightConfig};
pub use ema::{alpha_from_span, Ema};
pub use error::{Error, ErrorKind, Result};
pub use types::*;
