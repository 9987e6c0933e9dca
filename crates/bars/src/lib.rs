//! Information bar construction for the information-bar engine.
//!
//! This crate handles:
//! - Trade direction inference (tick rule)
//! - Adaptive-threshold imbalance bars (dollar or volume flow)

pub mod bar_builder;
pub mod tick_rule;

pub use bar_builder::{build_bars, build_bars_with_report, validate_tick, BarBuildReport, BuilderState};
pub use tick_rule::{DirectionStats, TickRule};
