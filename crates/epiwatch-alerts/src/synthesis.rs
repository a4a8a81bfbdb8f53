//! Alert draft assembly from risk and anomaly outputs.

use chrono::{DateTime, Utc};
use epiwatch_common::{
    AlertKind, AlertRecord, AlertSource, RiskLevel, Result, Trend,
};
use epiwatch_anomaly::{spike_risk_level, AnomalyResult};
use epiwatch_risk::RiskEngine;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::templates::{message_template, preventive_guidance};

const DISCLAIMER: &str = "\n\nDISCLAIMER: This is community health information, NOT medical \
     advice. Consult healthcare professionals for diagnosis or treatment.";

/// Inputs to alert message synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertParams {
    pub disease: String,
    pub area: String,
    pub risk_level: RiskLevel,
    pub risk_score: Option<u8>,
    pub case_count: Option<u64>,
}

impl AlertParams {
    pub fn new(disease: impl Into<String>, area: impl Into<String>, risk_level: RiskLevel) -> Self {
        Self {
            disease: disease.into(),
            area: area.into(),
            risk_level,
            risk_score: None,
            case_count: None,
        }
    }

    pub fn risk_score(mut self, score: u8) -> Self {
        self.risk_score = Some(score);
        self
    }

    pub fn case_count(mut self, count: u64) -> Self {
        self.case_count = Some(count);
        self
    }
}

/// A synthesized alert, not yet persisted. `into_record` assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDraft {
    pub title: String,
    pub message: String,
    pub disease: String,
    pub area: String,
    pub risk_level: RiskLevel,
    pub risk_score: Option<u8>,
    pub case_count: Option<u64>,
    pub source: AlertSource,
    pub kind: AlertKind,
    pub spike_percentage: Option<f64>,
    pub preventive_guidance: Vec<String>,
    pub explanations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AlertDraft {
    pub fn into_record(self) -> AlertRecord {
        AlertRecord {
            id: Uuid::new_v4(),
            title: self.title,
            message: self.message,
            disease: self.disease,
            area: self.area,
            risk_level: self.risk_level,
            source: self.source,
            kind: self.kind,
            risk_score: self.risk_score,
            spike_percentage: self.spike_percentage,
            explanations: self.explanations,
            created_at: self.created_at,
        }
    }
}

/// Fill the (level, disease) template and append trend, spike, and
/// disclaimer suffixes.
pub fn generate_alert_message(
    params: &AlertParams,
    trend: Option<Trend>,
    anomaly: Option<&AnomalyResult>,
) -> String {
    let cases = params
        .case_count
        .map(|c| c.to_string())
        .unwrap_or_else(|| "multiple".to_string());

    let mut message = message_template(params.risk_level, &params.disease)
        .replace("{disease}", &params.disease)
        .replace("{area}", &params.area)
        .replace("{cases}", &cases);

    if trend == Some(Trend::Increasing) {
        message.push_str(" Cases are trending upward - increased vigilance recommended.");
    }
    if let Some(spike) = anomaly.and_then(|a| a.spike_percentage) {
        message.push_str(&format!(" Recent spike of {spike:.1}% detected."));
    }
    message.push_str(DISCLAIMER);
    message
}

/// Turn an anomalous detection into an alert draft. Non-anomalous results
/// produce nothing.
pub fn anomaly_alert(result: &AnomalyResult) -> Option<AlertDraft> {
    if !result.has_anomaly {
        return None;
    }

    let spike = result.spike_percentage.unwrap_or(0.0);
    let average = result.previous_moving_avg.unwrap_or(0.0);

    Some(AlertDraft {
        title: format!("Anomaly Detected: {}", result.disease),
        message: format!(
            "Unusual spike in {} cases in {}. Cases increased to {} ({spike:.1}% above \
             average). Please monitor closely.",
            result.disease, result.area, result.new_case_count
        ),
        disease: result.disease.clone(),
        area: result.area.clone(),
        risk_level: spike_risk_level(spike),
        risk_score: None,
        case_count: Some(result.new_case_count.round() as u64),
        source: AlertSource::Automated,
        kind: AlertKind::Anomaly,
        spike_percentage: result.spike_percentage,
        preventive_guidance: preventive_guidance(&result.disease)
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        explanations: vec![
            format!(
                "Raw case count: {} (previous average: {average:.0})",
                result.new_case_count
            ),
            format!("Spike severity: {spike:.1}% above moving average"),
            "This is an automated alert based on statistical anomaly detection".to_string(),
        ],
        created_at: Utc::now(),
    })
}

/// Builds context-rich alert drafts, pulling area-level risk from the
/// risk engine.
pub struct AlertSynthesizer {
    risk: RiskEngine,
}

impl AlertSynthesizer {
    pub fn new(risk: RiskEngine) -> Self {
        Self { risk }
    }

    /// Full alert draft with preventive guidance and explanation strings,
    /// enriched with the area's current top disease threats.
    #[instrument(skip(self, anomaly))]
    pub async fn generate_alert_with_context(
        &self,
        params: &AlertParams,
        anomaly: Option<&AnomalyResult>,
    ) -> Result<AlertDraft> {
        let area_risk = self.risk.aggregate_area_risk(&params.area).await?;
        debug!(
            area = %params.area,
            threats = area_risk.top_threats.len(),
            "fetched area risk context"
        );

        // A strong composite score reads as an upward trend in messaging.
        let trend = params
            .risk_score
            .filter(|&score| score > 60)
            .map(|_| Trend::Increasing);
        let message = generate_alert_message(params, trend, anomaly);

        let mut explanations = vec![
            format!("Disease: {}", params.disease),
            format!("Affected Area: {}", params.area),
            format!("Risk Level: {}", params.risk_level.as_str().to_uppercase()),
        ];
        if let Some(score) = params.risk_score {
            explanations.push(format!("Risk Score: {score}/100"));
        }
        if let Some(count) = params.case_count {
            explanations.push(format!("Reported Cases: {count}"));
        }
        if let Some(spike) = anomaly.and_then(|a| a.spike_percentage) {
            explanations.push(format!("Spike Detected: {spike:.1}% increase"));
        }
        if !area_risk.top_threats.is_empty() {
            let threats: Vec<&str> = area_risk
                .top_threats
                .iter()
                .map(|t| t.disease.as_str())
                .collect();
            explanations.push(format!("Top Disease Threats: {}", threats.join(", ")));
        }

        Ok(AlertDraft {
            title: format!("Alert: {} in {}", params.disease, params.area),
            message,
            disease: params.disease.clone(),
            area: params.area.clone(),
            risk_level: params.risk_level,
            risk_score: params.risk_score,
            case_count: params.case_count,
            source: AlertSource::Automated,
            kind: if anomaly.is_some() {
                AlertKind::Anomaly
            } else {
                AlertKind::General
            },
            spike_percentage: anomaly.and_then(|a| a.spike_percentage),
            preventive_guidance: preventive_guidance(&params.disease)
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            explanations,
            created_at: Utc::now(),
        })
    }
}

const REWRITES: &[(&str, &str)] = &[
    ("is being", "is currently"),
    ("has been detected", "detected"),
    ("should be taken", "take"),
    ("is recommended", "recommended"),
];

/// Rewrite passive phrasing into active equivalents, case-insensitively.
pub fn refine_message(message: &str) -> String {
    REWRITES
        .iter()
        .fold(message.to_string(), |acc, (from, to)| {
            replace_ignore_ascii_case(&acc, from, to)
        })
}

// Patterns are ASCII, so a matched prefix always ends on a char boundary.
fn replace_ignore_ascii_case(text: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if rest.len() >= from.len()
            && rest.as_bytes()[..from.len()].eq_ignore_ascii_case(from.as_bytes())
        {
            out.push_str(to);
            rest = &rest[from.len()..];
        } else {
            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                out.push(ch);
            }
            rest = chars.as_str();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use epiwatch_common::{AnalyticsConfig, CaseRecord};
    use epiwatch_store::InMemoryRecordStore;

    fn anomaly_result(spike: Option<f64>) -> AnomalyResult {
        AnomalyResult {
            has_anomaly: spike.is_some(),
            disease: "dengue".to_string(),
            area: "Zone1".to_string(),
            new_case_count: 25.0,
            previous_moving_avg: Some(10.0),
            spike_percentage: spike,
            z_score: spike.map(|_| 3.2),
            threshold: spike.map(|_| 14.0),
            reason: "test".to_string(),
        }
    }

    #[test]
    fn test_message_fills_template_and_suffixes() {
        let params = AlertParams::new("dengue", "Zone1", RiskLevel::High).case_count(150);
        let message = generate_alert_message(
            &params,
            Some(Trend::Increasing),
            Some(&anomaly_result(Some(140.0))),
        );
        assert!(message.starts_with("HIGH ALERT: Zone1"));
        assert!(message.contains("Cases: 150"));
        assert!(message.contains("trending upward"));
        assert!(message.contains("Recent spike of 140.0% detected."));
        assert!(message.ends_with("diagnosis or treatment."));
    }

    #[test]
    fn test_missing_case_count_reads_multiple() {
        let params = AlertParams::new("cholera", "Zone2", RiskLevel::Low);
        let message = generate_alert_message(&params, None, None);
        assert!(message.contains("(multiple cases)"));
        assert!(!message.contains("trending upward"));
    }

    #[test]
    fn test_anomaly_alert_from_detection() {
        let draft = anomaly_alert(&anomaly_result(Some(150.0))).unwrap();
        assert_eq!(draft.title, "Anomaly Detected: dengue");
        assert_eq!(draft.risk_level, RiskLevel::High);
        assert_eq!(draft.kind, AlertKind::Anomaly);
        assert_eq!(draft.source, AlertSource::Automated);
        assert_eq!(draft.case_count, Some(25));
        assert_eq!(draft.explanations.len(), 3);
        assert!(draft.explanations[0].contains("previous average: 10"));
        assert!(draft.message.contains("150.0% above average"));

        let record = draft.into_record();
        assert_eq!(record.kind, AlertKind::Anomaly);
        assert_eq!(record.spike_percentage, Some(150.0));
    }

    #[test]
    fn test_no_alert_without_anomaly() {
        assert!(anomaly_alert(&anomaly_result(None)).is_none());
    }

    #[test]
    fn test_moderate_spike_maps_to_medium() {
        let draft = anomaly_alert(&anomaly_result(Some(60.0))).unwrap();
        assert_eq!(draft.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_refine_message_rewrites_passive_phrases() {
        assert_eq!(
            refine_message("An outbreak has been detected. Precautions should be taken."),
            "An outbreak detected. Precautions take."
        );
        // Case-insensitive matching.
        assert_eq!(refine_message("Caution Is Recommended."), "Caution recommended.");
        assert_eq!(refine_message("nothing to rewrite"), "nothing to rewrite");
    }

    #[tokio::test]
    async fn test_alert_with_context_includes_top_threats() {
        let now = Utc::now();
        let mut records = Vec::new();
        for days_back in 1..=7 {
            records.push(CaseRecord::new(
                "dengue",
                "Zone1",
                12,
                now - Duration::days(days_back),
            ));
            records.push(CaseRecord::new(
                "malaria",
                "Zone1",
                9,
                now - Duration::days(days_back),
            ));
        }
        let engine = RiskEngine::new(
            Arc::new(InMemoryRecordStore::with_records(records)),
            AnalyticsConfig::default(),
        );
        let synthesizer = AlertSynthesizer::new(engine);

        let params = AlertParams::new("dengue", "Zone1", RiskLevel::High)
            .risk_score(72)
            .case_count(84);
        let draft = synthesizer
            .generate_alert_with_context(&params, None)
            .await
            .unwrap();

        assert_eq!(draft.title, "Alert: dengue in Zone1");
        assert_eq!(draft.kind, AlertKind::General);
        // Score above 60 adds the upward-trend suffix.
        assert!(draft.message.contains("trending upward"));
        assert!(draft.explanations.contains(&"Risk Score: 72/100".to_string()));
        assert!(draft
            .explanations
            .iter()
            .any(|e| e.starts_with("Top Disease Threats:") && e.contains("dengue")));
        assert_eq!(draft.preventive_guidance.len(), 4);
    }
}
