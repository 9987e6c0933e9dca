//! Trade direction inference using the tick rule.
//!
//! Signs each trade by comparing its price with the previous trade's price.
//! An unchanged price is signed according to [`TieRule`]: the default
//! [`TieRule::Zero`] gives it no direction at all, which departs from the
//! textbook zero-tick continuation and moves bar boundaries accordingly.

use infobar_core::{TickDirection, TieRule};
use serde::{Deserialize, Serialize};

/// Statistics about direction inference over a partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionStats {
    /// Total ticks classified.
    pub total_ticks: u64,
    /// Ticks classified as upticks.
    pub up_ticks: u64,
    /// Ticks classified as downticks.
    pub down_ticks: u64,
    /// Ticks with no direction.
    pub zero_ticks: u64,
    /// Total size processed.
    pub total_volume: u64,
    /// Size traded on upticks.
    pub up_volume: u64,
    /// Size traded on downticks.
    pub down_volume: u64,
    /// Size traded with no direction.
    pub zero_volume: u64,
}

impl DirectionStats {
    /// Fraction of volume that carried no direction.
    pub fn zero_frac(&self) -> f64 {
        if self.total_volume > 0 {
            self.zero_volume as f64 / self.total_volume as f64
        } else {
            0.0
        }
    }

    /// Net signed volume: up volume minus down volume.
    pub fn net_volume(&self) -> i128 {
        self.up_volume as i128 - self.down_volume as i128
    }

    fn record(&mut self, direction: TickDirection, size: u64) {
        self.total_ticks += 1;
        self.total_volume += size;
        match direction {
            TickDirection::Up => {
                self.up_ticks += 1;
                self.up_volume += size;
            }
            TickDirection::Down => {
                self.down_ticks += 1;
                self.down_volume += size;
            }
            TickDirection::Zero => {
                self.zero_ticks += 1;
                self.zero_volume += size;
            }
        }
    }
}

/// Tick-rule classifier state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRule {
    tie_rule: TieRule,
    /// Last trade price; unset before the first tick.
    last_price: Option<f64>,
    /// Last non-zero direction (for [`TieRule::Inherit`]).
    last_direction: TickDirection,
    stats: DirectionStats,
}

impl TickRule {
    pub fn new(tie_rule: TieRule) -> Self {
        Self {
            tie_rule,
            last_price: None,
            last_direction: TickDirection::Zero,
            stats: DirectionStats::default(),
        }
    }

    /// Classify a trade and remember its price.
    pub fn classify(&mut self, price: f64, size: u64) -> TickDirection {
        let direction = match self.last_price {
            Some(last) if price > last => TickDirection::Up,
            Some(last) if price < last => TickDirection::Down,
            Some(_) => match self.tie_rule {
                TieRule::Zero => TickDirection::Zero,
                TieRule::Inherit => self.last_direction,
            },
            None => TickDirection::Zero,
        };

        self.last_price = Some(price);
        if direction != TickDirection::Zero {
            self.last_direction = direction;
        }
        self.stats.record(direction, size);

        direction
    }

    /// Get classification statistics.
    pub fn stats(&self) -> &DirectionStats {
        &self.stats
    }

    pub fn tie_rule(&self) -> TieRule {
        self.tie_rule
    }
}

impl Default for TickRule {
    fn default() -> Self {
        Self::new(TieRule::Zero)
    }
}
