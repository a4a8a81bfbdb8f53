//! Risk Scoring Engine.
//!
//! Computes a weighted composite 0–100 risk score per (area, disease) pair
//! from four signals: growth rate, case density, static disease severity,
//! and a 90-day historical-outbreak flag.

pub mod engine;
pub mod scoring;
pub mod severity;

pub use engine::{AggregateAreaRisk, RiskEngine, ThreatSummary};
pub use scoring::{compute_risk_score, contributing_factors, growth_rate, normalize, RiskComponents};
pub use severity::severity_for;
