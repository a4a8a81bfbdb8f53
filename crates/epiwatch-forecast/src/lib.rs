//! Forecast Engine.
//!
//! Fits a double exponential smoothing model (Holt's method) to a daily
//! case series and projects it forward, with intervention-factor scenario
//! simulation and multi-scenario comparison.

pub mod engine;
pub mod intervention;
pub mod smoothing;

pub use engine::{
    ComparisonResult, ForecastEngine, ForecastOutcome, ForecastResult, ForecastTotals,
    InsufficientData, NamedScenario, NamedScenarioOutcome, ScenarioDetail, ScenarioImpact,
    ScenarioOutcome, ScenarioResult,
};
pub use intervention::{reduction_factor, InterventionScenario, InterventionStrength};
pub use smoothing::{holt_fit, project, SmoothingState};
