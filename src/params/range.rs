//! Value range with step and skew for continuous parameters.
//!
//! The stored value of a parameter is always a plain value in natural units.
//! The skewed normalised form (0.0-1.0) is only used by host automation and
//! control surfaces.

use serde::{Deserialize, Serialize};

/// Range of a continuous parameter: `[start, end]` with a step `interval`
/// and a `skew` factor for the normalised mapping.
///
/// `skew == 1.0` is linear; `skew < 1.0` gives more resolution at the low end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalisableRange {
    pub start: f32,
    pub end: f32,
    pub interval: f32,
    pub skew: f32,
}

impl NormalisableRange {
    /// Create a new range.
    ///
    /// # Panics
    ///
    /// Panics if `end <= start` or `skew <= 0`. Ranges are declared in code,
    /// so a bad one is a wiring defect.
    pub fn new(start: f32, end: f32, interval: f32, skew: f32) -> Self {
        assert!(end > start, "range end must be greater than start");
        assert!(skew > 0.0, "skew must be positive");
        Self {
            start,
            end,
            interval: interval.max(0.0),
            skew,
        }
    }

    /// Linear range with the given step.
    pub fn linear(start: f32, end: f32, interval: f32) -> Self {
        Self::new(start, end, interval, 1.0)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// Clamp a plain value into `[start, end]`. NaN maps to `start`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.start;
        }
        value.clamp(self.start, self.end)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        (self.start..=self.end).contains(&value)
    }

    /// Plain value -> normalised 0.0-1.0 (skewed).
    pub fn to_normalised(&self, value: f32) -> f32 {
        let proportion = (self.clamp(value) - self.start) / self.length();
        if self.skew == 1.0 {
            proportion
        } else {
            proportion.powf(self.skew)
        }
    }

    /// Normalised 0.0-1.0 (skewed) -> plain value.
    pub fn from_normalised(&self, normalised: f32) -> f32 {
        let proportion = if normalised.is_nan() {
            0.0
        } else {
            normalised.clamp(0.0, 1.0)
        };
        let proportion = if self.skew == 1.0 || proportion <= 0.0 {
            proportion
        } else {
            (proportion.ln() / self.skew).exp()
        };
        self.start + self.length() * proportion
    }

    /// Snap a plain value onto the step grid, clamped to the range.
    pub fn snap_to_legal_value(&self, value: f32) -> f32 {
        let value = self.clamp(value);
        if self.interval <= 0.0 {
            return value;
        }
        let steps = ((value - self.start) / self.interval).round();
        self.clamp(self.start + steps * self.interval)
    }
}
