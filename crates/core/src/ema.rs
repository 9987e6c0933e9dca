//! Exponential moving average.

use serde::{Deserialize, Serialize};

/// Smoothing factor for a span of `span` observations: 2 / (span + 1).
#[inline]
pub fn alpha_from_span(span: u32) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Recursive EMA: `value = alpha * x + (1 - alpha) * value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ema {
    alpha: f64,
    value: f64,
}

impl Ema {
    /// Create an EMA seeded with `initial`.
    pub fn new(alpha: f64, initial: f64) -> Self {
        Self {
            alpha,
            value: initial,
        }
    }

    /// Create an EMA from a span, seeded with `initial`.
    pub fn from_span(span: u32, initial: f64) -> Self {
        Self::new(alpha_from_span(span), initial)
    }

    /// Fold in an observation and return the new value.
    #[inline]
    pub fn update(&mut self, x: f64) -> f64 {
        self.value = self.alpha * x + (1.0 - self.alpha) * self.value;
        self.value
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}
