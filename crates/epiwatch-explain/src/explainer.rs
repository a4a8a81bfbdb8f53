//! Report generation for risk scores and alerts.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use epiwatch_common::{
    AlertKind, AlertRecord, AlertSource, AnalyticsConfig, EpiwatchError, Result, RiskLevel,
    RiskScoreResult,
};
use epiwatch_store::{AlertStore, RiskScoreStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::buckets::Factor;
use crate::recommendations::recommendations_for;

const DISCLAIMER: &str = "This explanation is generated automatically to help understand \
     health data. Always consult healthcare professionals for medical concerns.";

/// One weighted input to the composite score, with its qualitative text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorExplanation {
    pub factor: String,
    /// Normalized to the 0–100 scale the score formula operates on.
    pub value: f64,
    /// Weight as a percentage string, e.g. "40%".
    pub weight: String,
    pub explanation: String,
    /// `value * weight`, two decimal places.
    pub contribution: f64,
}

/// Raw observation counts behind a risk explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPoints {
    pub cases_last_week: u64,
    pub cases_previous_week: u64,
    pub growth_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskExplanation {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub area: String,
    pub disease: String,
    pub calculated_at: DateTime<Utc>,
    /// All four factors, sorted by contribution descending.
    pub contributing_factors: Vec<FactorExplanation>,
    /// One sentence per top-3 factor.
    pub narrative: Vec<String>,
    pub confidence: String,
    pub data_points: DataPoints,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyDetails {
    pub spike_percentage: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertExplanation {
    pub alert_id: Uuid,
    pub title: String,
    pub disease: String,
    pub area: String,
    pub risk_level: RiskLevel,
    pub source: AlertSource,
    pub kind: AlertKind,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub explanations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly_details: Option<AnomalyDetails>,
    pub narrative: String,
    /// 0–100; higher means more algorithmic backing.
    pub trust_score: u8,
}

/// What kind of record a report request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    RiskScore,
    Alert,
}

impl FromStr for ReportKind {
    type Err = EpiwatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "risk-score" => Ok(ReportKind::RiskScore),
            "alert" => Ok(ReportKind::Alert),
            other => Err(EpiwatchError::Precondition(format!(
                "unknown report kind '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportBody {
    RiskScore(RiskExplanation),
    Alert(AlertExplanation),
}

/// A report body wrapped with provenance fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationReport {
    #[serde(flatten)]
    pub body: ReportBody,
    pub report_type: ReportKind,
    pub generated_at: DateTime<Utc>,
    pub disclaimer: String,
}

/// Builds explanation reports, fetching records by id from the stores.
pub struct Explainer {
    scores: Arc<dyn RiskScoreStore>,
    alerts: Arc<dyn AlertStore>,
    config: AnalyticsConfig,
}

impl Explainer {
    pub fn new(
        scores: Arc<dyn RiskScoreStore>,
        alerts: Arc<dyn AlertStore>,
        config: AnalyticsConfig,
    ) -> Self {
        Self {
            scores,
            alerts,
            config,
        }
    }

    /// Break a stored risk score down into its weighted factors.
    pub fn explain_risk_score(&self, score: &RiskScoreResult) -> RiskExplanation {
        let weights = &self.config.risk.weights;
        let growth_normalized = (score.growth_rate / self.config.risk.growth_norm_max * 100.0)
            .clamp(0.0, 100.0);

        let inputs = [
            (Factor::GrowthRate, growth_normalized, weights.growth_rate),
            (Factor::CaseDensity, score.case_density, weights.case_density),
            (
                Factor::DiseaseSeverity,
                f64::from(score.disease_severity),
                weights.disease_severity,
            ),
            (
                Factor::HistoricalOutbreak,
                f64::from(score.historical_outbreak),
                weights.historical_outbreak,
            ),
        ];

        let mut factors: Vec<FactorExplanation> = inputs
            .iter()
            .map(|&(factor, value, weight)| FactorExplanation {
                factor: factor.name().to_string(),
                value: round2(value),
                weight: format!("{:.0}%", weight * 100.0),
                explanation: factor.describe(value).to_string(),
                contribution: round2(value * weight),
            })
            .collect();
        factors.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));

        let narrative = factors
            .iter()
            .take(3)
            .map(|f| format!("{} (contributes {:.1} to score)", f.explanation, f.contribution))
            .collect();

        RiskExplanation {
            risk_score: score.risk_score,
            risk_level: score.risk_level,
            area: score.area.clone(),
            disease: score.disease.clone(),
            calculated_at: score.calculated_at,
            contributing_factors: factors,
            narrative,
            confidence: "High (based on statistical analysis)".to_string(),
            data_points: DataPoints {
                cases_last_week: score.total_cases,
                cases_previous_week: score.previous_period_cases,
                growth_percentage: score.growth_rate,
            },
            recommendations: recommendations_for(score.risk_level, &score.disease),
        }
    }

    /// Narrate an issued alert and score how much algorithmic backing it has.
    pub fn explain_alert(&self, alert: &AlertRecord) -> AlertExplanation {
        let anomaly_details = alert.spike_percentage.map(|spike| AnomalyDetails {
            spike_percentage: spike,
            interpretation: format!(
                "Cases increased by {spike:.1}% above the normal threshold"
            ),
        });

        AlertExplanation {
            alert_id: alert.id,
            title: alert.title.clone(),
            disease: alert.disease.clone(),
            area: alert.area.clone(),
            risk_level: alert.risk_level,
            source: alert.source,
            kind: alert.kind,
            created_at: alert.created_at,
            explanations: alert.explanations.clone(),
            anomaly_details,
            narrative: alert_narrative(alert),
            trust_score: trust_score(alert),
        }
    }

    /// Fetch the record behind `id` and produce a full report, or `None`
    /// when no such record exists.
    #[instrument(skip(self))]
    pub async fn report(&self, kind: ReportKind, id: Uuid) -> Result<Option<ExplanationReport>> {
        let body = match kind {
            ReportKind::RiskScore => match self.scores.find_by_id(id).await? {
                Some(score) => ReportBody::RiskScore(self.explain_risk_score(&score)),
                None => return Ok(None),
            },
            ReportKind::Alert => match self.alerts.find_by_id(id).await? {
                Some(alert) => ReportBody::Alert(self.explain_alert(&alert)),
                None => return Ok(None),
            },
        };
        debug!(?kind, %id, "built explanation report");

        Ok(Some(ExplanationReport {
            body,
            report_type: kind,
            generated_at: Utc::now(),
            disclaimer: DISCLAIMER.to_string(),
        }))
    }
}

fn alert_narrative(alert: &AlertRecord) -> String {
    let mut narrative = format!(
        "An alert for {} has been issued in {}. ",
        alert.disease, alert.area
    );

    match alert.source {
        AlertSource::Automated => match alert.kind {
            AlertKind::Anomaly => {
                let spike = alert
                    .spike_percentage
                    .map(|s| format!("{s:.1}"))
                    .unwrap_or_else(|| "significant".to_string());
                narrative.push_str(&format!(
                    "Automated analysis detected an unusual increase in cases \
                     ({spike}% above average). "
                ));
            }
            AlertKind::Trend => {
                narrative.push_str("Automated analysis identified concerning disease trends. ");
            }
            AlertKind::General => {
                narrative.push_str(
                    "Automated analysis identified health risks based on available data. ",
                );
            }
        },
        AlertSource::Manual => {
            narrative.push_str("This alert was created by health administrators. ");
        }
    }

    narrative.push_str(&format!(
        "Risk level is classified as {}. ",
        alert.risk_level.as_str().to_uppercase()
    ));
    if let Some(score) = alert.risk_score {
        narrative.push_str(&format!("The composite risk score is {score}/100. "));
    }
    narrative.push_str(
        "This information is provided for community awareness and should not be used \
         for self-diagnosis.",
    );
    narrative
}

/// Base 75; +15 for three or more explanation strings, +10 for automated
/// anomaly alerts, -5 for manual alerts; capped at 100.
fn trust_score(alert: &AlertRecord) -> u8 {
    let mut score: i16 = 75;
    if alert.explanations.len() >= 3 {
        score += 15;
    }
    if alert.source == AlertSource::Automated && alert.kind == AlertKind::Anomaly {
        score += 10;
    }
    if alert.source != AlertSource::Automated {
        score -= 5;
    }
    score.min(100) as u8
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use epiwatch_store::{InMemoryAlertStore, InMemoryRiskScoreStore};

    fn explainer() -> Explainer {
        Explainer::new(
            Arc::new(InMemoryRiskScoreStore::new()),
            Arc::new(InMemoryAlertStore::new()),
            AnalyticsConfig::default(),
        )
    }

    fn zone1_dengue_score() -> RiskScoreResult {
        RiskScoreResult {
            id: Uuid::new_v4(),
            area: "Zone1".to_string(),
            disease: "dengue".to_string(),
            risk_score: 65,
            risk_level: RiskLevel::Medium,
            growth_rate: 100.0,
            case_density: 80.0,
            disease_severity: 60,
            historical_outbreak: 20,
            total_cases: 80,
            previous_period_cases: 40,
            contributing_factors: vec![],
            calculated_at: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    fn alert(source: AlertSource, kind: AlertKind, explanations: usize) -> AlertRecord {
        AlertRecord {
            id: Uuid::new_v4(),
            title: "Dengue Outbreak Alert - Zone1".to_string(),
            message: "Unusual spike detected".to_string(),
            disease: "dengue".to_string(),
            area: "Zone1".to_string(),
            risk_level: RiskLevel::High,
            source,
            kind,
            risk_score: Some(72),
            spike_percentage: Some(140.0),
            explanations: (0..explanations).map(|i| format!("signal {i}")).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_risk_explanation_worked_example() {
        let explanation = explainer().explain_risk_score(&zone1_dengue_score());

        // Sorted by contribution: growth 26.67, density 24, severity 12,
        // outbreak 2.
        let contributions: Vec<f64> = explanation
            .contributing_factors
            .iter()
            .map(|f| f.contribution)
            .collect();
        assert_eq!(contributions, vec![26.67, 24.0, 12.0, 2.0]);

        let top = &explanation.contributing_factors[0];
        assert_eq!(top.factor, "growth_rate");
        assert_eq!(top.value, 66.67);
        assert_eq!(top.weight, "40%");
        assert_eq!(top.explanation, "Rapid case growth detected");

        assert_eq!(explanation.narrative.len(), 3);
        assert!(explanation.narrative[0].contains("contributes 26.7 to score"));
        assert_eq!(explanation.data_points.cases_last_week, 80);
        // Medium base list (4) plus dengue specifics (3).
        assert_eq!(explanation.recommendations.len(), 7);
    }

    #[test]
    fn test_trust_score_combinations() {
        let e = explainer();
        // Automated anomaly with 3 explanations: 75+15+10 = 100.
        assert_eq!(
            e.explain_alert(&alert(AlertSource::Automated, AlertKind::Anomaly, 3)).trust_score,
            100
        );
        // Automated anomaly, no explanations: 75+10 = 85.
        assert_eq!(
            e.explain_alert(&alert(AlertSource::Automated, AlertKind::Anomaly, 0)).trust_score,
            85
        );
        // Manual general, no explanations: 75-5 = 70.
        assert_eq!(
            e.explain_alert(&alert(AlertSource::Manual, AlertKind::General, 0)).trust_score,
            70
        );
        // Manual with many explanations: 75+15-5 = 85, never above 100.
        assert_eq!(
            e.explain_alert(&alert(AlertSource::Manual, AlertKind::General, 5)).trust_score,
            85
        );
    }

    #[test]
    fn test_alert_narrative_mentions_spike_and_level() {
        let explanation =
            explainer().explain_alert(&alert(AlertSource::Automated, AlertKind::Anomaly, 2));
        assert!(explanation.narrative.contains("140.0% above average"));
        assert!(explanation.narrative.contains("classified as HIGH"));
        assert!(explanation.narrative.contains("72/100"));
        let details = explanation.anomaly_details.unwrap();
        assert!(details.interpretation.contains("140.0%"));
    }

    #[test]
    fn test_report_kind_parsing() {
        assert_eq!("risk-score".parse::<ReportKind>().unwrap(), ReportKind::RiskScore);
        assert_eq!("alert".parse::<ReportKind>().unwrap(), ReportKind::Alert);
        assert!(matches!(
            "forecast".parse::<ReportKind>(),
            Err(EpiwatchError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_report_fetches_by_id() {
        let scores = Arc::new(InMemoryRiskScoreStore::new());
        let alerts = Arc::new(InMemoryAlertStore::new());
        let score = zone1_dengue_score();
        let score_id = score.id;
        scores.insert(score).await.unwrap();

        let explainer = Explainer::new(scores, alerts, AnalyticsConfig::default());

        let report = explainer
            .report(ReportKind::RiskScore, score_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.report_type, ReportKind::RiskScore);
        assert!(report.disclaimer.contains("healthcare professionals"));
        assert!(matches!(report.body, ReportBody::RiskScore(_)));

        // Unknown ids produce no report rather than an error.
        let missing = explainer
            .report(ReportKind::Alert, Uuid::new_v4())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
