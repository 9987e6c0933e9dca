//! Label statistics for validation and class-balance analysis.

use infobar_core::{Label, OutcomeClass};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Summary of a label sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    /// Total number of labels.
    pub total: usize,
    /// Labels decided by the upper barrier.
    pub upper_count: usize,
    /// Labels decided by the lower barrier.
    pub lower_count: usize,
    /// Labels decided by the vertical barrier.
    pub vertical_count: usize,
    /// Labels with a zero-length horizon.
    pub degenerate_count: usize,
    /// Mean realized return.
    pub mean_return: f64,
    /// Sample standard deviation of realized return.
    pub std_return: f64,
    /// Minimum realized return.
    pub min_return: f64,
    /// Maximum realized return.
    pub max_return: f64,
}

impl LabelStats {
    pub fn from_labels(labels: &[Label]) -> Self {
        if labels.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            total: labels.len(),
            ..Self::default()
        };

        for label in labels {
            match label.outcome {
                OutcomeClass::UpperBarrier => stats.upper_count += 1,
                OutcomeClass::LowerBarrier => stats.lower_count += 1,
                OutcomeClass::VerticalBarrier => stats.vertical_count += 1,
            }
            if label.span_ms() == 0 {
                stats.degenerate_count += 1;
            }
        }

        let returns: Vec<f64> = labels.iter().map(|l| l.realized_return).collect();
        stats.mean_return = returns.iter().mean();
        stats.std_return = if returns.len() > 1 {
            returns.iter().std_dev()
        } else {
            0.0
        };
        stats.min_return = Statistics::min(returns.iter());
        stats.max_return = Statistics::max(returns.iter());

        stats
    }

    /// Class shares as (upper, vertical, lower) fractions.
    pub fn class_balance(&self) -> (f64, f64, f64) {
        if self.total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let n = self.total as f64;
        (
            self.upper_count as f64 / n,
            self.vertical_count as f64 / n,
            self.lower_count as f64 / n,
        )
    }
}
