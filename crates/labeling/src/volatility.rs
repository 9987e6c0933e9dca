//! Exponentially weighted volatility of bar closes.
//!
//! Estimates σ as an exponentially weighted mean of absolute log returns
//! `|ln(close_j / close_{j-1})|` over the trailing window of bars ending at the
//! current bar. The most recent return carries weight 1, the one before it
//! `(1 − α)`, and so on, with `α = 2 / (window + 1)`; the weighted sum is divided
//! by the sum of weights. Near the start of a partition the window simply holds
//! fewer returns.

use infobar_core::alpha_from_span;
use std::collections::VecDeque;

/// Trailing EW mean of absolute log returns.
#[derive(Debug, Clone)]
pub struct EwmaVolatility {
    /// Window size in bars.
    window: usize,
    /// Decay per step back in time: 1 − α.
    decay: f64,
    /// Recent absolute log returns, oldest first.
    returns: VecDeque<f64>,
    /// Previous close.
    prev_price: Option<f64>,
}

impl EwmaVolatility {
    /// Create a new estimator; `window` must be at least 1.
    pub fn new(window: u32) -> Self {
        let window = window.max(1);
        Self {
            window: window as usize,
            decay: 1.0 - alpha_from_span(window),
            returns: VecDeque::with_capacity(window as usize),
            prev_price: None,
        }
    }

    /// Add a close and return the estimate ending at it.
    pub fn add_price(&mut self, price: f64) -> f64 {
        if let Some(prev) = self.prev_price {
            if self.returns.len() >= self.window {
                self.returns.pop_front();
            }
            self.returns.push_back((price / prev).ln().abs());
        }
        self.prev_price = Some(price);
        self.volatility()
    }

    /// Current estimate; 0 before any return is available.
    pub fn volatility(&self) -> f64 {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        let mut weight = 1.0;

        for ret in self.returns.iter().rev() {
            weighted += weight * ret;
            total_weight += weight;
            weight *= self.decay;
        }

        if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        }
    }

    /// Number of returns in the window.
    pub fn count(&self) -> usize {
        self.returns.len()
    }

    /// Check if the window is full.
    pub fn is_ready(&self) -> bool {
        self.returns.len() >= self.window
    }
}

/// Volatility estimate at every close in `closes`.
pub fn volatility_series(closes: impl IntoIterator<Item = f64>, window: u32) -> Vec<f64> {
    let mut estimator = EwmaVolatility::new(window);
    closes.into_iter().map(|c| estimator.add_price(c)).collect()
}
