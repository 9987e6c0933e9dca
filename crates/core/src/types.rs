//! Core data types for the information-bar engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// A single trade print for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Timestamp in milliseconds.
    pub ts_ms: TimestampMs,
    /// Trade price.
    pub price: f64,
    /// Trade size (shares/contracts).
    pub size: u64,
}

impl Tick {
    /// Create a new tick.
    pub fn new(ts_ms: TimestampMs, price: f64, size: u64) -> Self {
        Self { ts_ms, price, size }
    }

    /// Traded notional: price × size.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.price * self.size as f64
    }

    /// Wall-clock time of the tick, if the timestamp is representable.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.ts_ms)
    }
}

/// Which flow measure drives bar sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarKind {
    /// Signed traded notional (price × size).
    Dollar,
    /// Signed traded size.
    Volume,
}

impl BarKind {
    /// Unsigned flow contributed by a tick under this bar kind.
    #[inline]
    pub fn flow(self, tick: &Tick) -> f64 {
        match self {
            BarKind::Dollar => tick.notional(),
            BarKind::Volume => tick.size as f64,
        }
    }
}

/// Direction inferred for a tick from the previous traded price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum TickDirection {
    /// Price above the previous trade (uptick).
    Up = 1,
    /// Price below the previous trade (downtick).
    Down = -1,
    /// Unchanged price, or no previous trade.
    Zero = 0,
}

impl TickDirection {
    /// Get the sign as i8.
    #[inline]
    pub fn sign(self) -> i8 {
        self as i8
    }

    /// Get the sign as f64.
    #[inline]
    pub fn sign_f64(self) -> f64 {
        self.sign() as f64
    }
}

/// An information bar closed on accumulated order-flow imbalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Timestamp of the first tick in the bar.
    pub open_ts_ms: TimestampMs,
    /// Timestamp of the last tick in the bar.
    pub close_ts_ms: TimestampMs,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Total traded size.
    pub volume: u64,
    /// Total traded notional (Σ price × size).
    pub dollar_volume: f64,
    /// Number of ticks.
    pub tick_count: u64,
    /// Signed flow accumulated when the bar closed.
    pub closing_imbalance: f64,
    /// Smoothed threshold in force at the bar's last tick.
    pub threshold: f64,
    /// True for the end-of-stream bar that never reached its threshold.
    pub is_flushed: bool,
}

impl Bar {
    /// Volume-weighted average price.
    pub fn vwap(&self) -> Option<f64> {
        if self.volume > 0 {
            Some(self.dollar_volume / self.volume as f64)
        } else {
            None
        }
    }

    /// Time between first and last tick.
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.close_ts_ms - self.open_ts_ms
    }

    /// High-low range.
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Which barrier determined a label's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum OutcomeClass {
    /// Stop-loss barrier touched first.
    LowerBarrier = -1,
    /// Horizon reached without touching either price barrier.
    VerticalBarrier = 0,
    /// Profit-taking barrier touched first.
    UpperBarrier = 1,
}

impl OutcomeClass {
    /// Integer representation: -1, 0, +1.
    #[inline]
    pub fn as_int(self) -> i8 {
        self as i8
    }

    /// Zero-based class index for softmax targets: 0 (lower), 1 (vertical), 2 (upper).
    #[inline]
    pub fn as_class_index(self) -> usize {
        match self {
            OutcomeClass::LowerBarrier => 0,
            OutcomeClass::VerticalBarrier => 1,
            OutcomeClass::UpperBarrier => 2,
        }
    }

    /// Parse the integer representation.
    pub fn from_int(value: i8) -> Option<Self> {
        match value {
            -1 => Some(OutcomeClass::LowerBarrier),
            0 => Some(OutcomeClass::VerticalBarrier),
            1 => Some(OutcomeClass::UpperBarrier),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutcomeClass::LowerBarrier => "lower",
            OutcomeClass::VerticalBarrier => "vertical",
            OutcomeClass::UpperBarrier => "upper",
        }
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Triple-barrier outcome for one anchor bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Close timestamp of the anchor bar.
    pub anchor_ts_ms: TimestampMs,
    /// Close timestamp of the bar that determined the outcome.
    pub horizon_ts_ms: TimestampMs,
    /// Barrier hit first.
    pub outcome: OutcomeClass,
    /// close_at_horizon / close_at_anchor - 1.
    pub realized_return: f64,
    /// Volatility estimate used to size the barriers.
    pub volatility: f64,
}

impl Label {
    /// Length of the outcome-determination interval.
    #[inline]
    pub fn span_ms(&self) -> i64 {
        self.horizon_ts_ms - self.anchor_ts_ms
    }

    /// Whether `ts_ms` lies inside `[anchor, horizon]`.
    #[inline]
    pub fn covers(&self, ts_ms: TimestampMs) -> bool {
        self.anchor_ts_ms <= ts_ms && ts_ms <= self.horizon_ts_ms
    }
}

/// Normalized training weight for one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    /// Anchor timestamp of the weighted label.
    pub anchor_ts_ms: TimestampMs,
    /// Non-negative weight; weights of a partition sum to 1.
    pub weight: f64,
}

/// Identity of a partition: one instrument on one trading session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartitionKey {
    /// Instrument symbol.
    pub symbol: String,
    /// Trading session date.
    pub session: NaiveDate,
}

impl PartitionKey {
    pub fn new(symbol: impl Into<String>, session: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            session,
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.session)
    }
}
