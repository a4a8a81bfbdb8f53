//! Anomaly Detector.
//!
//! Flags a new observed case count as a statistically significant spike
//! against the trailing 30-day history, via z-score (strict `> 2`) or a
//! ratio threshold when the series has no variance.

pub mod detector;
pub mod stats;
pub mod surveillance;

pub use detector::{spike_risk_level, AnomalyDetector, AnomalyResult};
pub use stats::SeriesStats;
pub use surveillance::{
    area_disease_distribution, detect_high_risk_areas, trending_diseases, AreaRiskSnapshot,
    DiseaseTally,
};
