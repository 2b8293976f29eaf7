//! Threshold coercion
//!
//! Thresholds arrive from loosely typed configuration. Every numeric input
//! is coerced to a non-negative integer: fractions are floored, negatives
//! and NaN clamp to 0, and values past `u32::MAX` saturate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative integer threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "u32")]
pub struct Threshold(u32);

impl Threshold {
    /// Threshold from an exact count
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Coerce an arbitrary float
    pub fn coerce(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            return Self(0);
        }
        let floored = value.floor();
        if floored >= u32::MAX as f64 {
            Self(u32::MAX)
        } else {
            Self(floored as u32)
        }
    }

    /// Threshold as a count
    pub fn get(self) -> u32 {
        self.0
    }

    /// Threshold as a `usize` for comparisons against hit counts
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Threshold {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<i32> for Threshold {
    fn from(value: i32) -> Self {
        Self(value.max(0) as u32)
    }
}

impl From<i64> for Threshold {
    fn from(value: i64) -> Self {
        Self(value.clamp(0, u32::MAX as i64) as u32)
    }
}

impl From<usize> for Threshold {
    fn from(value: usize) -> Self {
        Self(u32::try_from(value).unwrap_or(u32::MAX))
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Self::coerce(value)
    }
}

impl From<Threshold> for u32 {
    fn from(value: Threshold) -> Self {
        value.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
