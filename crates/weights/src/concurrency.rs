//! Label concurrency via an interval sweep.
//!
//! The concurrency of label `i` is the number of labels `j` (itself included)
//! whose closed interval `[anchor_j, horizon_j]` contains `anchor_i`. Counting
//! is done with a single sweep over sorted events instead of an all-pairs test.
//! At equal timestamps intervals open before anchors are queried, and anchors
//! are queried before intervals close, so both interval ends are inclusive.

use infobar_core::{Label, TimestampMs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Open,
    Query,
    Close,
}

/// Concurrency count for every label, in input order.
///
/// Labels must satisfy `anchor <= horizon`; [`crate::weigh_labels`] rejects
/// any that don't before calling this.
pub fn count_concurrency(labels: &[Label]) -> Vec<usize> {
    debug_assert!(
        labels.iter().all(|l| l.anchor_ts_ms <= l.horizon_ts_ms),
        "label horizon precedes anchor"
    );
    let mut events: Vec<(TimestampMs, EventKind, usize)> = Vec::with_capacity(labels.len() * 3);
    for (i, label) in labels.iter().enumerate() {
        events.push((label.anchor_ts_ms, EventKind::Open, i));
        events.push((label.anchor_ts_ms, EventKind::Query, i));
        events.push((label.horizon_ts_ms, EventKind::Close, i));
    }
    events.sort_unstable();

    let mut counts = vec![0; labels.len()];
    let mut open: i64 = 0;
    for (_, kind, i) in events {
        match kind {
            EventKind::Open => open += 1,
            EventKind::Query => counts[i] = open.max(0) as usize,
            EventKind::Close => open -= 1,
        }
    }
    counts
}

/// Mean of `1 / concurrency` over a partition; 0 for no labels.
pub fn average_uniqueness(concurrency: &[usize]) -> f64 {
    if concurrency.is_empty() {
        return 0.0;
    }
    let sum: f64 = concurrency.iter().map(|&c| 1.0 / c.max(1) as f64).sum();
    sum / concurrency.len() as f64
}
