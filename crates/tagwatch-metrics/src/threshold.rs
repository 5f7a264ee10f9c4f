//! # Completeness Threshold
//!
//! The completeness score below which a resource is flagged as low
//! compliance. Configurable; the default flags anything with fewer than
//! half of its required tags.

use serde::{Deserialize, Serialize};

/// A completeness threshold in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CompletenessThreshold(f64);

impl CompletenessThreshold {
    /// Threshold used when none is configured.
    pub const DEFAULT: f64 = 0.5;

    /// Create a threshold.
    ///
    /// Values outside `[0, 1]` are clamped: below 0.0 becomes 0.0 (flag
    /// nothing), above 1.0 becomes 1.0 (flag everything not fully tagged).
    /// NaN becomes [`Self::DEFAULT`].
    pub fn new(value: f64) -> Self {
        let value = if value.is_nan() {
            tracing::warn!(default = Self::DEFAULT, "NaN completeness threshold, using default");
            Self::DEFAULT
        } else if value < 0.0 {
            tracing::warn!(value, "completeness threshold < 0.0, clamping to 0.0");
            0.0
        } else if value > 1.0 {
            tracing::warn!(value, "completeness threshold > 1.0, clamping to 1.0");
            1.0
        } else {
            value
        };
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether `score` falls strictly below the threshold.
    pub fn is_below(self, score: f64) -> bool {
        score < self.0
    }
}

impl Default for CompletenessThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl<'de> Deserialize<'de> for CompletenessThreshold {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Self::new)
    }
}
