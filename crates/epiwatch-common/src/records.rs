//! Domain records shared across the analytics crates.
//!
//! `CaseRecord` is the immutable input to every engine; the derived result
//! types are ephemeral unless a caller persists them through a store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::levels::RiskLevel;

/// One reported observation of disease incidence. Created by an external
/// report-submission action, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Disease identifier; matched case-insensitively.
    pub disease: String,
    /// Free-text region or pincode; substring-matched in some queries.
    pub area: String,
    pub case_count: u32,
    /// Day granularity for aggregation.
    pub report_date: DateTime<Utc>,
}

impl CaseRecord {
    pub fn new(
        disease: impl Into<String>,
        area: impl Into<String>,
        case_count: u32,
        report_date: DateTime<Utc>,
    ) -> Self {
        Self {
            disease: disease.into(),
            area: area.into(),
            case_count,
            report_date,
        }
    }

    /// Canonical case-insensitive match key for the disease.
    pub fn disease_key(&self) -> String {
        self.disease.to_lowercase()
    }
}

/// Composite risk score for one (area, disease) pair.
///
/// Invariant: `risk_score = round(0.4*norm(growth_rate) + 0.3*case_density
/// + 0.2*disease_severity + 0.1*historical_outbreak)`, clamped to [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub id: Uuid,
    pub area: String,
    pub disease: String,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    /// Percent change, current 7-day window vs the previous one.
    pub growth_rate: f64,
    /// Normalized current-window case sum, 0–100.
    pub case_density: f64,
    /// Static lookup by disease name, 0–100.
    pub disease_severity: u8,
    /// 20 or 80 from 90-day spike detection; 0 when no history exists.
    pub historical_outbreak: u8,
    /// Current-window case sum.
    pub total_cases: u64,
    /// Previous-window case sum.
    pub previous_period_cases: u64,
    /// Ordered human-readable explanation strings.
    pub contributing_factors: Vec<String>,
    pub calculated_at: DateTime<Utc>,
}

/// Where an alert came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSource {
    /// Produced by the analytics pipeline.
    Automated,
    /// Issued by a health administrator.
    Manual,
}

/// What triggered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Anomaly,
    Trend,
    General,
}

/// An issued alert, as consumed by the explainability layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub disease: String,
    pub area: String,
    pub risk_level: RiskLevel,
    pub source: AlertSource,
    pub kind: AlertKind,
    pub risk_score: Option<u8>,
    pub spike_percentage: Option<f64>,
    pub explanations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Case sums bucketed by calendar day, ascending by date. Multiple reports
/// on the same day are summed.
pub fn daily_case_sums(records: &[CaseRecord]) -> Vec<(chrono::NaiveDate, u64)> {
    use std::collections::BTreeMap;
    let mut by_day: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
    for record in records {
        *by_day.entry(record.report_date.date_naive()).or_insert(0) +=
            u64::from(record.case_count);
    }
    by_day.into_iter().collect()
}
