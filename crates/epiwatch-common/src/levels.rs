//! Classification enums shared by every analytics engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EpiwatchError;

/// Risk classification for a score in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a composite risk score: <40 low, <70 medium, else high.
    /// Total over 0–100; every score maps to exactly one level.
    pub fn classify(score: u8) -> Self {
        if score < 40 {
            RiskLevel::Low
        } else if score < 70 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = EpiwatchError;

    /// Unknown level strings are rejected at the boundary, never clamped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(EpiwatchError::Precondition(format!(
                "unknown risk level: {other}"
            ))),
        }
    }
}

/// Forecast confidence keyed to historical sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// ≥30 samples → high, ≥14 → medium, else low.
    pub fn from_sample_count(count: usize) -> Self {
        if count >= 30 {
            Confidence::High
        } else if count >= 14 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// Direction of the fitted trend component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
}

impl Trend {
    /// Positive final trend → increasing, else decreasing.
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        }
    }
}
