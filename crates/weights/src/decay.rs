//! Recency decay hook for sample weights.
//!
//! A partition covers a single session, so every label in it is equally
//! recent and [`SessionDecay`] returns 1. Genuine exponential decay needs a
//! timeline spanning many partitions; such a model implements [`TimeDecay`]
//! and is passed to [`crate::weigh_labels_with`].

use infobar_core::{Label, WeightConfig};

/// Multiplicative recency factor applied to each label's weight.
pub trait TimeDecay {
    /// Non-negative factor for `label`.
    fn factor(&self, label: &Label) -> f64;
}

impl<F> TimeDecay for F
where
    F: Fn(&Label) -> f64,
{
    fn factor(&self, label: &Label) -> f64 {
        self(label)
    }
}

/// Decay within one session: identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionDecay {
    half_life_bars: Option<u32>,
}

impl SessionDecay {
    pub fn new(half_life_bars: Option<u32>) -> Self {
        Self { half_life_bars }
    }

    pub fn from_config(config: &WeightConfig) -> Self {
        Self::new(config.half_life_bars)
    }

    pub fn half_life_bars(&self) -> Option<u32> {
        self.half_life_bars
    }
}

impl TimeDecay for SessionDecay {
    fn factor(&self, _label: &Label) -> f64 {
        1.0
    }
}
