//! Explainability Layer.
//!
//! Turns computed risk scores and issued alerts into structured,
//! human-readable reports: weighted factor breakdowns, short narratives,
//! recommendation lists, and a trust score for alerts.

pub mod buckets;
pub mod explainer;
pub mod recommendations;

pub use explainer::{
    AlertExplanation, AnomalyDetails, DataPoints, ExplanationReport, Explainer,
    FactorExplanation, ReportBody, ReportKind, RiskExplanation,
};
pub use recommendations::recommendations_for;
