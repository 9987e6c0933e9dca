//! Sample weight computation.
//!
//! ```text
//! raw_i    = |realized_return_i|          if use_abs_return_weight, else 1
//! adj_i    = raw_i / max(1, concurrency_i) if use_uniqueness,        else raw_i
//! adj_i   *= decay.factor(label_i)
//! weight_i = adj_i / Σ adj
//! ```
//!
//! If every adjusted weight is zero the partition falls back to uniform
//! weights so the output still sums to one.

use crate::concurrency::count_concurrency;
use crate::decay::{SessionDecay, TimeDecay};
use infobar_core::{Error, Label, Result, Weight, WeightConfig};
use tracing::{debug, warn};

/// Weigh the labels of one partition with the session decay model.
pub fn weigh_labels(labels: &[Label], config: &WeightConfig) -> Result<Vec<Weight>> {
    weigh_labels_with(labels, config, &SessionDecay::from_config(config))
}

/// Weigh the labels of one partition with a caller-supplied decay model.
pub fn weigh_labels_with<D>(labels: &[Label], config: &WeightConfig, decay: &D) -> Result<Vec<Weight>>
where
    D: TimeDecay + ?Sized,
{
    config.validate()?;

    if labels.is_empty() {
        return Ok(Vec::new());
    }

    if let Some((index, label)) = labels
        .iter()
        .enumerate()
        .find(|(_, l)| l.horizon_ts_ms < l.anchor_ts_ms)
    {
        return Err(Error::data(format!(
            "label {} horizon {} precedes anchor {}",
            index, label.horizon_ts_ms, label.anchor_ts_ms
        )));
    }

    let concurrency = if config.use_uniqueness {
        count_concurrency(labels)
    } else {
        vec![1; labels.len()]
    };

    let mut adjusted = Vec::with_capacity(labels.len());
    for (label, &c) in labels.iter().zip(&concurrency) {
        let raw = if config.use_abs_return_weight {
            label.realized_return.abs()
        } else {
            1.0
        };

        let factor = decay.factor(label);
        if !factor.is_finite() || factor < 0.0 {
            return Err(Error::config(format!(
                "decay factor for label at {} must be finite and non-negative, got {}",
                label.anchor_ts_ms, factor
            )));
        }

        adjusted.push(raw / c.max(1) as f64 * factor);
    }

    let total: f64 = adjusted.iter().sum();
    let weights: Vec<Weight> = if total > 0.0 && total.is_finite() {
        labels
            .iter()
            .zip(&adjusted)
            .map(|(label, &adj)| Weight {
                anchor_ts_ms: label.anchor_ts_ms,
                weight: adj / total,
            })
            .collect()
    } else {
        warn!(
            labels = labels.len(),
            total, "weights have no mass, falling back to uniform"
        );
        let uniform = 1.0 / labels.len() as f64;
        labels
            .iter()
            .map(|label| Weight {
                anchor_ts_ms: label.anchor_ts_ms,
                weight: uniform,
            })
            .collect()
    };

    debug!(
        labels = labels.len(),
        max_concurrency = concurrency.iter().copied().max().unwrap_or(0),
        "labels weighed"
    );

    Ok(weights)
}
