//! Triple-barrier labeling of bar sequences.
//!
//! For every anchor bar `i` with close `p0` and volatility `σ`:
//!
//! ```text
//! upper = p0 · (1 + profit_multiplier · σ)
//! lower = p0 · (1 − stop_multiplier · σ)
//! ```
//!
//! Forward bars `i+1 ..= min(i + horizon_bars, last)` are scanned in order. The
//! first bar whose high reaches `upper` or whose low reaches `lower` decides the
//! outcome. When one bar touches both, the upper barrier wins. If nothing is
//! touched the label is vertical at the last scanned bar.
//!
//! The last bar of a partition has nothing to scan. It still gets a label:
//! vertical, zero return, horizon equal to its own close. Output therefore has
//! exactly one label per bar.

use crate::volatility::volatility_series;
use infobar_core::{Bar, Label, LabelConfig, OutcomeClass, Result};
use tracing::debug;

/// Price barriers for one anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barriers {
    pub upper: f64,
    pub lower: f64,
}

impl Barriers {
    pub fn new(p0: f64, volatility: f64, config: &LabelConfig) -> Self {
        Self {
            upper: p0 * (1.0 + config.profit_multiplier * volatility),
            lower: p0 * (1.0 - config.stop_multiplier * volatility),
        }
    }

    /// Barrier touched by `bar`, checking the upper barrier first.
    #[inline]
    pub fn touched_by(&self, bar: &Bar) -> Option<OutcomeClass> {
        if bar.high >= self.upper {
            Some(OutcomeClass::UpperBarrier)
        } else if bar.low <= self.lower {
            Some(OutcomeClass::LowerBarrier)
        } else {
            None
        }
    }
}

/// Label one anchor given its volatility estimate.
///
/// [`label_bars`] is the checked entry point for whole partitions.
///
/// # Panics
///
/// Panics if `anchor` is not an index into `bars` (including when `bars` is
/// empty).
pub fn label_anchor(bars: &[Bar], anchor: usize, volatility: f64, config: &LabelConfig) -> Label {
    let anchor_bar = &bars[anchor];
    let p0 = anchor_bar.close;
    let barriers = Barriers::new(p0, volatility, config);

    let last = bars.len() - 1;
    let end = anchor.saturating_add(config.horizon_bars as usize).min(last);

    let mut outcome = OutcomeClass::VerticalBarrier;
    let mut horizon_bar = anchor_bar;

    // Empty when the anchor is the last bar.
    for bar in &bars[anchor + 1..=end] {
        horizon_bar = bar;
        if let Some(touched) = barriers.touched_by(bar) {
            outcome = touched;
            break;
        }
    }

    Label {
        anchor_ts_ms: anchor_bar.close_ts_ms,
        horizon_ts_ms: horizon_bar.close_ts_ms,
        outcome,
        realized_return: horizon_bar.close / p0 - 1.0,
        volatility,
    }
}

/// Label every bar of a partition, in order.
pub fn label_bars(bars: &[Bar], config: &LabelConfig) -> Result<Vec<Label>> {
    config.validate()?;

    let volatilities = volatility_series(bars.iter().map(|b| b.close), config.volatility_window);

    let labels: Vec<Label> = volatilities
        .iter()
        .enumerate()
        .map(|(i, &sigma)| label_anchor(bars, i, sigma, config))
        .collect();

    debug!(
        bars = bars.len(),
        labels = labels.len(),
        upper = labels.iter().filter(|l| l.outcome == OutcomeClass::UpperBarrier).count(),
        lower = labels.iter().filter(|l| l.outcome == OutcomeClass::LowerBarrier).count(),
        "bars labeled"
    );

    Ok(labels)
}
