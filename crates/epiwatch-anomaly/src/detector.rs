//! Spike detection against trailing history.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use epiwatch_common::{
    daily_case_sums, AnalyticsConfig, AnomalyConfig, EpiwatchError, Result, RiskLevel,
};
use epiwatch_store::{RecordFilter, RecordStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::stats::SeriesStats;

/// Outcome of an anomaly check. Absence of history is a normal outcome,
/// reported with `has_anomaly = false` and a reason, never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub has_anomaly: bool,
    pub disease: String,
    pub area: String,
    pub new_case_count: f64,
    pub previous_moving_avg: Option<f64>,
    /// Percent increase over the moving average; set only when anomalous.
    pub spike_percentage: Option<f64>,
    /// Absent when the history had zero variance (ratio rule applied).
    pub z_score: Option<f64>,
    /// `mean + z_threshold * std_dev`, when the z-score rule applied.
    pub threshold: Option<f64>,
    pub reason: String,
}

/// Risk classification of a spike for downstream alert synthesis:
/// above 100% → high, below 30% → low, otherwise medium.
pub fn spike_risk_level(spike_percentage: f64) -> RiskLevel {
    if spike_percentage > 100.0 {
        RiskLevel::High
    } else if spike_percentage < 30.0 {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    }
}

/// Checks new observations for (area, disease) pairs against the trailing
/// daily history fetched from the record store.
pub struct AnomalyDetector {
    records: Arc<dyn RecordStore>,
    config: AnalyticsConfig,
}

impl AnomalyDetector {
    pub fn new(records: Arc<dyn RecordStore>, config: AnalyticsConfig) -> Self {
        Self { records, config }
    }

    /// Decide whether `new_case_count` is a statistically significant spike
    /// for the pair, against the trailing 30-day history.
    pub async fn check_anomaly(
        &self,
        disease: &str,
        area: &str,
        new_case_count: f64,
    ) -> Result<AnomalyResult> {
        self.check_anomaly_at(disease, area, new_case_count, Utc::now())
            .await
    }

    /// As [`Self::check_anomaly`], with an explicit reference time.
    #[instrument(skip(self))]
    pub async fn check_anomaly_at(
        &self,
        disease: &str,
        area: &str,
        new_case_count: f64,
        now: DateTime<Utc>,
    ) -> Result<AnomalyResult> {
        if area.trim().is_empty() || disease.trim().is_empty() {
            return Err(EpiwatchError::Precondition(
                "area and disease must not be empty".to_string(),
            ));
        }

        let start = now - Duration::days(self.config.windows.anomaly_days);
        let filter = RecordFilter::new().area(area).disease(disease).since(start);
        let records = self.records.find(&filter).await?;
        let daily: Vec<f64> = daily_case_sums(&records)
            .into_iter()
            .map(|(_, cases)| cases as f64)
            .collect();

        let stats = match SeriesStats::compute(&daily, self.config.anomaly.moving_avg_window) {
            Some(stats) => stats,
            None => {
                debug!(area, disease, "no history for anomaly check");
                return Ok(AnomalyResult {
                    has_anomaly: false,
                    disease: disease.to_string(),
                    area: area.to_string(),
                    new_case_count,
                    previous_moving_avg: None,
                    spike_percentage: None,
                    z_score: None,
                    threshold: None,
                    reason: "Insufficient historical data".to_string(),
                });
            }
        };

        Ok(evaluate(disease, area, new_case_count, &stats, &self.config.anomaly))
    }
}

/// Pure spike decision over precomputed statistics.
pub(crate) fn evaluate(
    disease: &str,
    area: &str,
    new_case_count: f64,
    stats: &SeriesStats,
    config: &AnomalyConfig,
) -> AnomalyResult {
    let (is_anomaly, z_score, threshold) = if stats.std_dev == 0.0 {
        // Zero variance: fall back to the ratio-over-mean rule.
        (new_case_count > stats.mean * config.flat_series_ratio, None, None)
    } else {
        let z = (new_case_count - stats.mean) / stats.std_dev;
        (
            z > config.z_threshold,
            Some(round2(z)),
            Some(round2(stats.mean + config.z_threshold * stats.std_dev)),
        )
    };

    let moving_avg = round2(stats.moving_avg);
    if !is_anomaly {
        return AnomalyResult {
            has_anomaly: false,
            disease: disease.to_string(),
            area: area.to_string(),
            new_case_count,
            previous_moving_avg: Some(moving_avg),
            spike_percentage: None,
            z_score,
            threshold,
            reason: "Normal case count variation".to_string(),
        };
    }

    let spike = spike_percentage(new_case_count, stats.moving_avg);
    let reason = match z_score {
        Some(z) => format!(
            "Cases spiked {:.0}% above moving average (Z-score: {z:.2})",
            spike.round()
        ),
        None => format!("Cases spiked {:.0}% above moving average", spike.round()),
    };

    AnomalyResult {
        has_anomaly: true,
        disease: disease.to_string(),
        area: area.to_string(),
        new_case_count,
        previous_moving_avg: Some(moving_avg),
        spike_percentage: Some(round2(spike)),
        z_score,
        threshold,
        reason,
    }
}

/// Percent increase over the moving average. A zero average maps to 100%
/// when any cases were observed, 0% otherwise.
fn spike_percentage(new_case_count: f64, moving_avg: f64) -> f64 {
    if moving_avg == 0.0 {
        return if new_case_count > 0.0 { 100.0 } else { 0.0 };
    }
    (new_case_count - moving_avg) / moving_avg * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
