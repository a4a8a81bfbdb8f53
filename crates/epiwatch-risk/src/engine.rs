//! Risk engine: window partitioning, per-disease scoring, aggregation and
//! debounced persistence.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use epiwatch_common::{AnalyticsConfig, EpiwatchError, Result, RiskLevel, RiskScoreResult};
use epiwatch_store::{RecordFilter, RecordStore, RiskScoreStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::scoring::{compute_risk_score, contributing_factors, growth_rate, normalize, RiskComponents};
use crate::severity::severity_for;

/// One entry in an area's top-threat list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatSummary {
    pub disease: String,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
}

/// Aggregate risk for an area across all scored diseases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateAreaRisk {
    pub area: String,
    pub aggregate_risk_score: u8,
    pub aggregate_risk_level: RiskLevel,
    /// Up to three non-low threats, highest score first.
    pub top_threats: Vec<ThreatSummary>,
    pub last_calculated: Option<DateTime<Utc>>,
}

/// Computes [`RiskScoreResult`]s for an area from the record store.
///
/// When a [`RiskScoreStore`] is attached, recalculated scores are persisted
/// only if no prior score exists for the (area, disease) pair or the score
/// moved by more than the configured delta. The read-then-write sequence is
/// unlocked; concurrent callers for the same pair may duplicate a write.
pub struct RiskEngine {
    records: Arc<dyn RecordStore>,
    scores: Option<Arc<dyn RiskScoreStore>>,
    config: AnalyticsConfig,
}

impl RiskEngine {
    pub fn new(records: Arc<dyn RecordStore>, config: AnalyticsConfig) -> Self {
        Self {
            records,
            scores: None,
            config,
        }
    }

    /// Attach a score store, enabling calculate-and-persist mode.
    pub fn with_score_store(mut self, scores: Arc<dyn RiskScoreStore>) -> Self {
        self.scores = Some(scores);
        self
    }

    /// Score every disease observed in the area's current window.
    ///
    /// Returns `None` when the current window holds no data at all, an
    /// expected steady state for quiet areas rather than an error.
    pub async fn compute_area_risk_scores(
        &self,
        area: &str,
        disease: Option<&str>,
    ) -> Result<Option<Vec<RiskScoreResult>>> {
        self.compute_area_risk_scores_at(area, disease, Utc::now()).await
    }

    /// As [`Self::compute_area_risk_scores`], with an explicit reference
    /// time for the window partitioning.
    #[instrument(skip(self))]
    pub async fn compute_area_risk_scores_at(
        &self,
        area: &str,
        disease: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<Vec<RiskScoreResult>>> {
        let area = non_empty(area)?;
        let windows = &self.config.windows;
        let current_start = now - Duration::days(windows.current_days);
        let previous_start = now - Duration::days(windows.previous_days);

        let mut current_filter = RecordFilter::new().area(area).since(current_start);
        let mut previous_filter = RecordFilter::new()
            .area(area)
            .since(previous_start)
            .before(current_start);
        if let Some(disease) = disease {
            current_filter = current_filter.disease(disease);
            previous_filter = previous_filter.disease(disease);
        }

        let current = self.records.sum_cases_by_disease(&current_filter).await?;
        if current.is_empty() {
            debug!(area, "no current-window data, skipping risk calculation");
            return Ok(None);
        }
        let previous = self.records.sum_cases_by_disease(&previous_filter).await?;

        let mut results = Vec::with_capacity(current.len());
        for entry in &current {
            let previous_cases = previous
                .iter()
                .find(|p| p.disease == entry.disease)
                .map(|p| p.cases)
                .unwrap_or(0);

            let components = RiskComponents {
                growth_rate: growth_rate(entry.cases, previous_cases),
                case_density: normalize(entry.cases as f64, self.config.risk.case_density_max),
                disease_severity: severity_for(&entry.disease),
                historical_outbreak: self.historical_outbreak(area, &entry.disease, now).await?,
            };
            let risk_score = compute_risk_score(&components, &self.config.risk);

            results.push(RiskScoreResult {
                id: Uuid::new_v4(),
                area: area.to_string(),
                disease: entry.disease.clone(),
                risk_score,
                risk_level: RiskLevel::classify(risk_score),
                growth_rate: round2(components.growth_rate),
                case_density: round2(components.case_density),
                disease_severity: components.disease_severity,
                historical_outbreak: components.historical_outbreak,
                total_cases: entry.cases,
                previous_period_cases: previous_cases,
                contributing_factors: contributing_factors(&components),
                calculated_at: now,
            });
        }

        debug!(area, count = results.len(), "computed risk scores");
        if let Some(store) = &self.scores {
            self.persist_debounced(store, &results).await?;
        }
        Ok(Some(results))
    }

    /// Aggregate risk across all diseases scored for the area.
    ///
    /// Prefers the latest persisted scores; falls back to a fresh
    /// calculation when no score store is attached.
    #[instrument(skip(self))]
    pub async fn aggregate_area_risk(&self, area: &str) -> Result<AggregateAreaRisk> {
        let area = non_empty(area)?;

        let scores = match &self.scores {
            Some(store) => store.latest_for_area(area).await?,
            None => self
                .compute_area_risk_scores(area, None)
                .await?
                .unwrap_or_default(),
        };

        if scores.is_empty() {
            return Ok(AggregateAreaRisk {
                area: area.to_string(),
                aggregate_risk_score: 0,
                aggregate_risk_level: RiskLevel::Low,
                top_threats: vec![],
                last_calculated: None,
            });
        }

        let sum: u32 = scores.iter().map(|s| u32::from(s.risk_score)).sum();
        let aggregate = (f64::from(sum) / scores.len() as f64).round() as u8;

        let mut threats: Vec<ThreatSummary> = scores
            .iter()
            .filter(|s| s.risk_level != RiskLevel::Low)
            .map(|s| ThreatSummary {
                disease: s.disease.clone(),
                risk_score: s.risk_score,
                risk_level: s.risk_level,
            })
            .collect();
        threats.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
        threats.truncate(3);

        Ok(AggregateAreaRisk {
            area: area.to_string(),
            aggregate_risk_score: aggregate,
            aggregate_risk_level: RiskLevel::classify(aggregate),
            top_threats: threats,
            last_calculated: scores.iter().map(|s| s.calculated_at).max(),
        })
    }

    /// 90-day spike signal for one (area, disease) pair: 80 when the peak
    /// daily sum exceeds twice the mean daily sum, 20 when history is
    /// quiet, 0 when there is no history at all.
    async fn historical_outbreak(
        &self,
        area: &str,
        disease: &str,
        now: DateTime<Utc>,
    ) -> Result<u8> {
        let start = now - Duration::days(self.config.windows.outbreak_days);
        let filter = RecordFilter::new().area(area).disease(disease).since(start);
        let records = self.records.find(&filter).await?;
        if records.is_empty() {
            return Ok(0);
        }

        let daily = epiwatch_common::daily_case_sums(&records);
        let total: u64 = daily.iter().map(|(_, cases)| cases).sum();
        let avg = total as f64 / daily.len() as f64;
        let max = daily.iter().map(|(_, cases)| *cases).max().unwrap_or(0) as f64;
        Ok(if max > avg * 2.0 { 80 } else { 20 })
    }

    async fn persist_debounced(
        &self,
        store: &Arc<dyn RiskScoreStore>,
        results: &[RiskScoreResult],
    ) -> Result<()> {
        for result in results {
            let latest = store.find_latest(&result.area, &result.disease).await?;
            let should_insert = match &latest {
                None => true,
                Some(prev) => {
                    (i16::from(prev.risk_score) - i16::from(result.risk_score)).unsigned_abs()
                        > u16::from(self.config.risk.persist_delta)
                }
            };
            if should_insert {
                store.insert(result.clone()).await?;
            } else {
                debug!(
                    area = %result.area,
                    disease = %result.disease,
                    "score unchanged within delta, skipping persist"
                );
            }
        }
        Ok(())
    }
}

fn non_empty(area: &str) -> Result<&str> {
    let trimmed = area.trim();
    if trimmed.is_empty() {
        return Err(EpiwatchError::Precondition("area must not be empty".to_string()));
    }
    Ok(trimmed)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use epiwatch_common::CaseRecord;
    use epiwatch_store::{InMemoryRecordStore, InMemoryRiskScoreStore};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(disease: &str, area: &str, count: u32, days_ago: i64) -> CaseRecord {
        CaseRecord::new(disease, area, count, now() - Duration::days(days_ago))
    }

    fn engine(records: Vec<CaseRecord>) -> RiskEngine {
        RiskEngine::new(
            Arc::new(InMemoryRecordStore::with_records(records)),
            AnalyticsConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_empty_area_is_precondition_error() {
        let engine = engine(vec![]);
        let err = engine
            .compute_area_risk_scores_at("  ", None, now())
            .await
            .unwrap_err();
        assert!(matches!(err, EpiwatchError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_no_current_data_returns_none() {
        // Only stale records, outside the current window.
        let engine = engine(vec![record("dengue", "Zone1", 30, 20)]);
        let result = engine
            .compute_area_risk_scores_at("Zone1", None, now())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_worked_example_zone1_dengue_scores_65() {
        // 80 cases this week vs 40 the week before, no 90-day spike.
        let engine = engine(vec![
            record("dengue", "Zone1", 50, 2),
            record("dengue", "Zone1", 30, 4),
            record("dengue", "Zone1", 40, 10),
        ]);
        let scores = engine
            .compute_area_risk_scores_at("Zone1", None, now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scores.len(), 1);
        let score = &scores[0];
        assert_eq!(score.total_cases, 80);
        assert_eq!(score.previous_period_cases, 40);
        assert_eq!(score.growth_rate, 100.0);
        assert_eq!(score.case_density, 80.0);
        assert_eq!(score.disease_severity, 60);
        assert_eq!(score.historical_outbreak, 20);
        assert_eq!(score.risk_score, 65);
        assert_eq!(score.risk_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_disease_only_in_previous_window_is_not_scored() {
        let engine = engine(vec![
            record("dengue", "Zone1", 10, 2),
            record("malaria", "Zone1", 25, 10),
        ]);
        let scores = engine
            .compute_area_risk_scores_at("Zone1", None, now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].disease, "dengue");
        // New disease with no previous-window cases: growth defaults to 100%.
        assert_eq!(scores[0].growth_rate, 100.0);
    }

    #[tokio::test]
    async fn test_outbreak_spike_sets_signal_to_80() {
        let mut records = vec![record("dengue", "Zone1", 10, 2)];
        // Quiet 60-day history with one huge spike day.
        for days_ago in 30..40 {
            records.push(record("dengue", "Zone1", 5, days_ago));
        }
        records.push(record("dengue", "Zone1", 90, 45));
        let engine = engine(records);
        let scores = engine
            .compute_area_risk_scores_at("Zone1", Some("dengue"), now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scores[0].historical_outbreak, 80);
    }

    #[tokio::test]
    async fn test_persist_is_debounced() {
        let score_store = Arc::new(InMemoryRiskScoreStore::new());
        let engine = engine(vec![
            record("dengue", "Zone1", 50, 2),
            record("dengue", "Zone1", 30, 4),
            record("dengue", "Zone1", 40, 10),
        ])
        .with_score_store(score_store.clone());

        engine
            .compute_area_risk_scores_at("Zone1", None, now())
            .await
            .unwrap();
        assert_eq!(score_store.len().await, 1);

        // Identical recalculation lands within the delta and is skipped.
        engine
            .compute_area_risk_scores_at("Zone1", None, now())
            .await
            .unwrap();
        assert_eq!(score_store.len().await, 1);
    }

    #[tokio::test]
    async fn test_aggregate_with_no_scores_is_zero_low() {
        let engine = engine(vec![]);
        let aggregate = engine.aggregate_area_risk("Zone9").await.unwrap();
        assert_eq!(aggregate.aggregate_risk_score, 0);
        assert_eq!(aggregate.aggregate_risk_level, RiskLevel::Low);
        assert!(aggregate.top_threats.is_empty());
        assert!(aggregate.last_calculated.is_none());
    }

    #[tokio::test]
    async fn test_aggregate_top_threats_sorted_and_capped() {
        let engine = engine(vec![
            // dengue: strong growth and density
            record("dengue", "Zone1", 90, 2),
            record("dengue", "Zone1", 30, 10),
            // tuberculosis: severe disease, modest counts
            record("tuberculosis", "Zone1", 20, 3),
            record("tuberculosis", "Zone1", 15, 9),
            // chickenpox: mild, low counts → low risk, excluded
            record("chickenpox", "Zone1", 2, 1),
            record("chickenpox", "Zone1", 2, 9),
        ]);
        let aggregate = engine.aggregate_area_risk("Zone1").await.unwrap();
        assert!(aggregate.aggregate_risk_score > 0);
        assert!(!aggregate.top_threats.is_empty());
        assert!(aggregate.top_threats.len() <= 3);
        for pair in aggregate.top_threats.windows(2) {
            assert!(pair[0].risk_score >= pair[1].risk_score);
        }
        assert!(aggregate
            .top_threats
            .iter()
            .all(|t| t.risk_level != RiskLevel::Low));
        assert!(aggregate.last_calculated.is_some());
    }
}
