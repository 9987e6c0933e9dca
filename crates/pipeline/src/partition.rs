//! One-partition runner: ticks in, bars/labels/weights out.
//!
//! Each partition (one instrument on one session) is processed independently.
//! A failure carries the partition identity so the caller can report it and
//! move on to the next partition; no partial output is ever returned.

use infobar_bars::{build_bars_with_report, DirectionStats};
use infobar_core::{Bar, Error, ErrorKind, Label, PartitionKey, PipelineConfig, Tick, Weight};
use infobar_labeling::{label_bars, LabelStats};
use infobar_weights::weigh_labels;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, info_span, warn};

/// Thread-safe cancellation flag shared between a controller and workers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Partitions already finished are unaffected.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

/// Failure of a single partition.
#[derive(Debug, Error)]
#[error("partition {partition}: {source}")]
pub struct PartitionError {
    /// Partition that failed.
    pub partition: PartitionKey,
    /// Underlying error.
    #[source]
    pub source: Error,
}

impl PartitionError {
    fn new(partition: &PartitionKey, source: Error) -> Self {
        Self {
            partition: partition.clone(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Everything produced for one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionOutput {
    pub key: PartitionKey,
    pub bars: Vec<Bar>,
    pub labels: Vec<Label>,
    pub weights: Vec<Weight>,
    pub direction_stats: DirectionStats,
    pub label_stats: LabelStats,
}

impl PartitionOutput {
    /// True for an empty tick sequence: a valid result, not an error.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Process one partition to completion.
pub fn process_partition(
    key: &PartitionKey,
    ticks: &[Tick],
    config: &PipelineConfig,
) -> Result<PartitionOutput, PartitionError> {
    process_partition_with_cancel(key, ticks, config, &CancellationToken::new())
}

/// Process one partition, checking `cancel` between stages.
pub fn process_partition_with_cancel(
    key: &PartitionKey,
    ticks: &[Tick],
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<PartitionOutput, PartitionError> {
    let span = info_span!("partition", symbol = %key.symbol, session = %key.session);
    let _enter = span.enter();

    run_stages(key, ticks, config, cancel).map_err(|source| {
        warn!(kind = ?source.kind(), error = %source, "partition failed");
        PartitionError::new(key, source)
    })
}

fn run_stages(
    key: &PartitionKey,
    ticks: &[Tick],
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<PartitionOutput, Error> {
    config.validate()?;

    checkpoint(cancel, "before bar building")?;
    let report = build_bars_with_report(ticks, &config.bars)?;

    checkpoint(cancel, "before labeling")?;
    let labels = label_bars(&report.bars, &config.labels)?;

    checkpoint(cancel, "before weighting")?;
    let weights = weigh_labels(&labels, &config.weights)?;

    let label_stats = LabelStats::from_labels(&labels);

    info!(
        ticks = ticks.len(),
        bars = report.bars.len(),
        labels = labels.len(),
        weights = weights.len(),
        "partition processed"
    );

    Ok(PartitionOutput {
        key: key.clone(),
        bars: report.bars,
        labels,
        weights,
        direction_stats: report.direction_stats,
        label_stats,
    })
}

fn checkpoint(cancel: &CancellationToken, stage: &str) -> Result<(), Error> {
    if cancel.is_cancelled() {
        Err(Error::cancelled(stage.to_string()))
    } else {
        Ok(())
    }
}
