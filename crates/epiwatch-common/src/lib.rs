//! Shared types, errors, and configuration used across all Epiwatch crates.

pub mod config;
pub mod error;
pub mod levels;
pub mod records;

// Re-export commonly used types
pub use config::{AnalyticsConfig, AnomalyConfig, ForecastConfig, RiskConfig, RiskWeights, WindowConfig};
pub use error::{EpiwatchError, Result};
pub use levels::{Confidence, RiskLevel, Trend};
pub use records::{daily_case_sums, AlertKind, AlertRecord, AlertSource, CaseRecord, RiskScoreResult};
