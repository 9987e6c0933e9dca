//! Imbalance bar building from trade ticks.
//!
//! A bar closes once the absolute signed flow accumulated since it opened
//! reaches the smoothed threshold θ. θ starts at the configured target and is
//! pulled toward it on every tick:
//!
//! ```text
//! θ ← α·target + (1 − α)·θ,   α = 2 / (ema_window + 1)
//! ```
//!
//! The update runs per tick, not per bar. Ticks must arrive in non-decreasing
//! timestamp order; out-of-order input is not detected.
//!
//! Ticks sharing a timestamp never straddle a bar boundary. A bar that reaches
//! θ is held open until a tick with a later timestamp arrives (or the stream
//! ends), and same-timestamp ticks keep accumulating into it. Whether it
//! closes is re-decided after each of those ticks, so a closed bar always
//! satisfies `|closing_imbalance| ≥ threshold` at its last tick. Close
//! timestamps are therefore strictly increasing.

use crate::tick_rule::{DirectionStats, TickRule};
use infobar_core::{Bar, BarConfig, BarKind, Ema, Error, Result, Tick, TimestampMs};
use tracing::debug;

/// A bar that's currently being built.
#[derive(Debug, Clone, PartialEq)]
struct BarInProgress {
    open_ts_ms: TimestampMs,
    close_ts_ms: TimestampMs,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
    dollar_volume: f64,
    tick_count: u64,
    imbalance: f64,
}

impl BarInProgress {
    fn new(tick: &Tick) -> Self {
        Self {
            open_ts_ms: tick.ts_ms,
            close_ts_ms: tick.ts_ms,
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            volume: 0,
            dollar_volume: 0.0,
            tick_count: 0,
            imbalance: 0.0,
        }
    }

    fn add_tick(&mut self, tick: &Tick, signed_flow: f64) {
        self.close_ts_ms = tick.ts_ms;
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.volume += tick.size;
        self.dollar_volume += tick.notional();
        self.tick_count += 1;
        self.imbalance += signed_flow;
    }

    fn to_bar(&self, threshold: f64, is_flushed: bool) -> Bar {
        Bar {
            open_ts_ms: self.open_ts_ms,
            close_ts_ms: self.close_ts_ms,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            dollar_volume: self.dollar_volume,
            tick_count: self.tick_count,
            closing_imbalance: self.imbalance,
            threshold,
            is_flushed,
        }
    }
}

/// Accumulator state threaded through [`BuilderState::step`].
///
/// Holds everything that advances tick by tick: the tick-rule memory, the
/// smoothed threshold and the bar under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderState {
    bar_kind: BarKind,
    target_threshold: f64,
    threshold: Ema,
    tick_rule: TickRule,
    current: Option<BarInProgress>,
    /// θ at which `current` reached its threshold; the bar closes once the
    /// timestamp advances.
    pending_close: Option<f64>,
}

impl BuilderState {
    /// Create the initial state for a partition.
    pub fn new(config: &BarConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bar_kind: config.bar_kind,
            target_threshold: config.target_threshold,
            threshold: Ema::from_span(config.ema_window, config.target_threshold),
            tick_rule: TickRule::new(config.tie_rule),
            current: None,
            pending_close: None,
        })
    }

    /// Advance by one tick, returning the next state and the bar it closed, if any.
    ///
    /// A bar that reached θ is returned by the first step whose tick carries a
    /// later timestamp, before that tick opens the next bar.
    pub fn step(mut self, tick: &Tick) -> (Self, Option<Bar>) {
        let closed = self.take_ready_bar(tick.ts_ms);

        let direction = self.tick_rule.classify(tick.price, tick.size);
        let signed_flow = direction.sign_f64() * self.bar_kind.flow(tick);

        let bar = self.current.get_or_insert_with(|| BarInProgress::new(tick));
        bar.add_tick(tick, signed_flow);

        let threshold = self.threshold.update(self.target_threshold);
        self.pending_close = (bar.imbalance.abs() >= threshold).then_some(threshold);

        (self, closed)
    }

    /// Close the held bar if `ts_ms` starts a new timestamp.
    fn take_ready_bar(&mut self, ts_ms: TimestampMs) -> Option<Bar> {
        let threshold = self.pending_close?;
        let ready = self.current.as_ref()?.close_ts_ms < ts_ms;
        if !ready {
            return None;
        }

        self.pending_close = None;
        let closed = self.current.take()?.to_bar(threshold, false);
        debug!(
            close_ts_ms = closed.close_ts_ms,
            ticks = closed.tick_count,
            imbalance = closed.closing_imbalance,
            threshold,
            "bar closed"
        );
        Some(closed)
    }

    /// End the stream. A bar holding at threshold closes normally; any other
    /// partial bar is flushed regardless of threshold.
    pub fn finish(self) -> (Option<Bar>, DirectionStats) {
        let last = match (self.current, self.pending_close) {
            (Some(bar), Some(threshold)) => Some(bar.to_bar(threshold, false)),
            (Some(bar), None) => Some(bar.to_bar(self.threshold.value(), true)),
            (None, _) => None,
        };
        (last, *self.tick_rule.stats())
    }

    /// Whether the open bar has reached θ and waits for the timestamp to advance.
    pub fn is_closing(&self) -> bool {
        self.pending_close.is_some()
    }

    /// Current smoothed threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold.value()
    }

    /// Signed flow accumulated in the open bar.
    pub fn imbalance(&self) -> f64 {
        self.current.as_ref().map_or(0.0, |bar| bar.imbalance)
    }

    /// Ticks accumulated in the open bar.
    pub fn pending_ticks(&self) -> u64 {
        self.current.as_ref().map_or(0, |bar| bar.tick_count)
    }
}

/// Bars for one partition together with direction statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct BarBuildReport {
    pub bars: Vec<Bar>,
    pub direction_stats: DirectionStats,
}

/// Reject ticks with non-positive or non-finite price, or zero size.
pub fn validate_tick(index: usize, tick: &Tick) -> Result<()> {
    if !tick.price.is_finite() || tick.price <= 0.0 {
        return Err(Error::data(format!(
            "tick {} at {}: non-positive price {}",
            index, tick.ts_ms, tick.price
        )));
    }
    if tick.size == 0 {
        return Err(Error::data(format!(
            "tick {} at {}: zero size",
            index, tick.ts_ms
        )));
    }
    Ok(())
}

/// Build imbalance bars for one partition.
pub fn build_bars(ticks: &[Tick], config: &BarConfig) -> Result<Vec<Bar>> {
    build_bars_with_report(ticks, config).map(|report| report.bars)
}

/// Build imbalance bars and collect direction statistics.
///
/// An empty tick sequence yields an empty bar sequence.
pub fn build_bars_with_report(ticks: &[Tick], config: &BarConfig) -> Result<BarBuildReport> {
    let mut state = BuilderState::new(config)?;
    let mut bars = Vec::new();

    for (index, tick) in ticks.iter().enumerate() {
        validate_tick(index, tick)?;
        let (next, closed) = state.step(tick);
        state = next;
        bars.extend(closed);
    }

    let (flushed, direction_stats) = state.finish();
    bars.extend(flushed);

    debug!(
        ticks = ticks.len(),
        bars = bars.len(),
        zero_frac = direction_stats.zero_frac(),
        "bars built"
    );

    Ok(BarBuildReport {
        bars,
        direction_stats,
    })
}
