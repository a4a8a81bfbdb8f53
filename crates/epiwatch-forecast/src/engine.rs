//! Forecast engine: historical aggregation, baseline projection, scenario
//! simulation and comparison.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use epiwatch_common::{
    daily_case_sums, AnalyticsConfig, Confidence, EpiwatchError, Result, Trend,
};
use epiwatch_store::{RecordFilter, RecordStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::intervention::{reduction_factor, InterventionScenario, InterventionStrength};
use crate::smoothing::{holt_fit, project};

/// Forecast horizons must satisfy `1 <= days < MAX_FORECAST_DAYS`.
pub const MAX_FORECAST_DAYS: u32 = 30;

/// Structured non-error outcome for series too short to fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsufficientData {
    pub area: String,
    pub disease: String,
    pub message: String,
}

/// Baseline forecast outcome. A short history is an expected steady state
/// for new (area, disease) pairs, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Success(ForecastResult),
    InsufficientData(InsufficientData),
}

/// Fitted baseline projection for an (area, disease) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub area: String,
    pub disease: String,
    /// Mean daily cases over the fitted history.
    pub historical_average: f64,
    pub current_trend: Trend,
    /// Magnitude of the final fitted trend component.
    pub trend_strength: f64,
    /// One non-negative prediction per requested day.
    pub baseline_forecast: Vec<u32>,
    pub forecast_days: u32,
    pub confidence: Confidence,
    pub recommendations: Vec<String>,
}

/// Scenario simulation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Success(ScenarioResult),
    InsufficientData(InsufficientData),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastTotals {
    pub forecast: Vec<u32>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDetail {
    pub interventions: InterventionScenario,
    pub factor: f64,
    pub forecast: Vec<u32>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioImpact {
    /// Negative when the scenario projects more cases than the baseline.
    pub cases_prevented: i64,
    /// Percent of the baseline total prevented, one decimal place.
    pub percent_reduction: f64,
    pub intervention_strength: InterventionStrength,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub area: String,
    pub disease: String,
    pub baseline: ForecastTotals,
    pub scenario: ScenarioDetail,
    pub impact: ScenarioImpact,
    pub forecast_days: u32,
    pub generated_at: DateTime<Utc>,
}

/// A labeled scenario for comparison runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    pub interventions: InterventionScenario,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedScenarioOutcome {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ScenarioOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub area: String,
    pub disease: String,
    pub scenarios: Vec<NamedScenarioOutcome>,
    /// Name of the scenario preventing the most cases; ties resolve to the
    /// first encountered.
    pub best_scenario: Option<String>,
    pub forecast_days: u32,
}

/// Projects case trajectories from the record store's daily history.
pub struct ForecastEngine {
    records: Arc<dyn RecordStore>,
    config: AnalyticsConfig,
}

impl ForecastEngine {
    pub fn new(records: Arc<dyn RecordStore>, config: AnalyticsConfig) -> Self {
        Self { records, config }
    }

    /// Baseline N-day forecast from up to 60 days of history.
    pub async fn baseline_forecast(
        &self,
        area: &str,
        disease: &str,
        forecast_days: u32,
    ) -> Result<ForecastOutcome> {
        self.baseline_forecast_at(area, disease, forecast_days, Utc::now())
            .await
    }

    /// As [`Self::baseline_forecast`], with an explicit reference time.
    #[instrument(skip(self))]
    pub async fn baseline_forecast_at(
        &self,
        area: &str,
        disease: &str,
        forecast_days: u32,
        now: DateTime<Utc>,
    ) -> Result<ForecastOutcome> {
        validate_inputs(area, disease, forecast_days)?;

        let start = now - Duration::days(self.config.windows.forecast_days);
        let filter = RecordFilter::new().area(area).disease(disease).since(start);
        let records = self.records.find(&filter).await?;
        let daily = daily_case_sums(&records);
        debug!(area, disease, days = daily.len(), "fetched forecast history");

        if daily.len() < 2 {
            return Ok(ForecastOutcome::InsufficientData(InsufficientData {
                area: area.to_string(),
                disease: disease.to_string(),
                message: "Insufficient historical data for forecasting".to_string(),
            }));
        }

        let cases: Vec<f64> = daily.iter().map(|(_, cases)| *cases as f64).collect();
        let state = holt_fit(&cases, self.config.forecast.alpha, self.config.forecast.beta)
            .ok_or_else(|| {
                EpiwatchError::Precondition("smoothing requires a non-empty series".to_string())
            })?;

        let baseline_forecast = project(state, forecast_days);
        let historical_average = cases.iter().sum::<f64>() / cases.len() as f64;
        let current_trend = Trend::from_slope(state.trend);

        Ok(ForecastOutcome::Success(ForecastResult {
            area: area.to_string(),
            disease: disease.to_string(),
            historical_average: round2(historical_average),
            current_trend,
            trend_strength: round2(state.trend.abs()),
            baseline_forecast,
            forecast_days,
            confidence: Confidence::from_sample_count(cases.len()),
            recommendations: recommendations(current_trend, state.trend),
        }))
    }

    /// Apply an intervention scenario to the baseline forecast.
    pub async fn simulate_scenario(
        &self,
        area: &str,
        disease: &str,
        interventions: &InterventionScenario,
        forecast_days: u32,
    ) -> Result<ScenarioOutcome> {
        self.simulate_scenario_at(area, disease, interventions, forecast_days, Utc::now())
            .await
    }

    /// As [`Self::simulate_scenario`], with an explicit reference time.
    pub async fn simulate_scenario_at(
        &self,
        area: &str,
        disease: &str,
        interventions: &InterventionScenario,
        forecast_days: u32,
        now: DateTime<Utc>,
    ) -> Result<ScenarioOutcome> {
        let baseline = match self
            .baseline_forecast_at(area, disease, forecast_days, now)
            .await?
        {
            ForecastOutcome::Success(result) => result,
            ForecastOutcome::InsufficientData(info) => {
                return Ok(ScenarioOutcome::InsufficientData(info));
            }
        };

        let factor = reduction_factor(interventions, &self.config.forecast);
        let simulated: Vec<u32> = baseline
            .baseline_forecast
            .iter()
            .map(|&cases| (f64::from(cases) * factor).round() as u32)
            .collect();

        let baseline_total: u64 = baseline.baseline_forecast.iter().map(|&c| u64::from(c)).sum();
        let simulated_total: u64 = simulated.iter().map(|&c| u64::from(c)).sum();
        let cases_prevented = baseline_total as i64 - simulated_total as i64;
        let percent_reduction = if baseline_total == 0 {
            0.0
        } else {
            round1(cases_prevented as f64 / baseline_total as f64 * 100.0)
        };

        Ok(ScenarioOutcome::Success(ScenarioResult {
            area: area.to_string(),
            disease: disease.to_string(),
            baseline: ForecastTotals {
                forecast: baseline.baseline_forecast,
                total: baseline_total,
            },
            scenario: ScenarioDetail {
                interventions: interventions.clone(),
                factor: round2(factor),
                forecast: simulated,
                total: simulated_total,
            },
            impact: ScenarioImpact {
                cases_prevented,
                percent_reduction,
                intervention_strength: interventions.strength(),
            },
            forecast_days,
            generated_at: now,
        }))
    }

    /// Run each named scenario independently and pick the one preventing
    /// the most cases. Ties keep the first encountered.
    #[instrument(skip(self, scenarios))]
    pub async fn compare_scenarios(
        &self,
        area: &str,
        disease: &str,
        scenarios: &[NamedScenario],
        forecast_days: u32,
    ) -> Result<ComparisonResult> {
        self.compare_scenarios_at(area, disease, scenarios, forecast_days, Utc::now())
            .await
    }

    /// As [`Self::compare_scenarios`], with an explicit reference time.
    pub async fn compare_scenarios_at(
        &self,
        area: &str,
        disease: &str,
        scenarios: &[NamedScenario],
        forecast_days: u32,
        now: DateTime<Utc>,
    ) -> Result<ComparisonResult> {
        let mut outcomes = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let outcome = self
                .simulate_scenario_at(area, disease, &scenario.interventions, forecast_days, now)
                .await?;
            outcomes.push(NamedScenarioOutcome {
                name: scenario.name.clone(),
                outcome,
            });
        }

        let mut best: Option<(&str, i64)> = None;
        for entry in &outcomes {
            if let ScenarioOutcome::Success(result) = &entry.outcome {
                let prevented = result.impact.cases_prevented;
                if best.map_or(true, |(_, best_prevented)| prevented > best_prevented) {
                    best = Some((&entry.name, prevented));
                }
            }
        }

        Ok(ComparisonResult {
            area: area.to_string(),
            disease: disease.to_string(),
            best_scenario: best.map(|(name, _)| name.to_string()),
            scenarios: outcomes,
            forecast_days,
        })
    }
}

fn validate_inputs(area: &str, disease: &str, forecast_days: u32) -> Result<()> {
    if area.trim().is_empty() || disease.trim().is_empty() {
        return Err(EpiwatchError::Precondition(
            "area and disease must not be empty".to_string(),
        ));
    }
    if forecast_days == 0 || forecast_days >= MAX_FORECAST_DAYS {
        return Err(EpiwatchError::Precondition(format!(
            "forecast_days must be in [1, {MAX_FORECAST_DAYS})"
        )));
    }
    Ok(())
}

fn recommendations(trend: Trend, slope: f64) -> Vec<String> {
    let mut out = Vec::new();
    match trend {
        Trend::Increasing => {
            out.push("Cases are increasing - immediate action recommended".to_string());
            if slope > 2.0 {
                out.push("Rapid growth detected - escalate interventions".to_string());
            }
        }
        Trend::Decreasing => {
            out.push("Cases are decreasing - continue current measures".to_string());
        }
    }
    out.push("Monitor forecasts daily for changes in trajectory".to_string());
    out.push("Be prepared to adjust interventions based on actual data".to_string());
    out
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use epiwatch_common::CaseRecord;
    use epiwatch_store::InMemoryRecordStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    /// Daily dengue counts for Zone1 ending yesterday.
    fn engine_with_series(counts: &[u32]) -> ForecastEngine {
        let records: Vec<CaseRecord> = counts
            .iter()
            .rev()
            .enumerate()
            .map(|(days_back, &count)| {
                CaseRecord::new(
                    "dengue",
                    "Zone1",
                    count,
                    now() - Duration::days(days_back as i64 + 1),
                )
            })
            .collect();
        ForecastEngine::new(
            Arc::new(InMemoryRecordStore::with_records(records)),
            AnalyticsConfig::default(),
        )
    }

    async fn baseline(engine: &ForecastEngine, days: u32) -> ForecastOutcome {
        engine
            .baseline_forecast_at("Zone1", "dengue", days, now())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reference_series_forecast() {
        let engine = engine_with_series(&[10, 12, 11, 13, 12, 14, 13]);
        let outcome = baseline(&engine, 3).await;
        let ForecastOutcome::Success(result) = outcome else {
            panic!("expected a successful forecast");
        };
        assert_eq!(result.baseline_forecast, vec![17, 18, 19]);
        assert_eq!(result.historical_average, 12.14);
        assert_eq!(result.current_trend, Trend::Increasing);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.recommendations[0].contains("increasing"));
    }

    #[tokio::test]
    async fn test_short_history_is_insufficient_data() {
        let engine = engine_with_series(&[5]);
        let outcome = baseline(&engine, 7).await;
        assert!(matches!(outcome, ForecastOutcome::InsufficientData(_)));
    }

    #[tokio::test]
    async fn test_horizon_bounds_rejected() {
        let engine = engine_with_series(&[1, 2, 3]);
        for days in [0, 30, 31] {
            let err = engine
                .baseline_forecast_at("Zone1", "dengue", days, now())
                .await
                .unwrap_err();
            assert!(matches!(err, EpiwatchError::Precondition(_)));
        }
        assert!(matches!(baseline(&engine, 29).await, ForecastOutcome::Success(_)));
    }

    #[tokio::test]
    async fn test_identity_scenario_reproduces_baseline() {
        let engine = engine_with_series(&[10, 12, 11, 13, 12, 14, 13]);
        let outcome = engine
            .simulate_scenario_at(
                "Zone1",
                "dengue",
                &InterventionScenario {
                    awareness_level: Some(0.0),
                    medical_intervention: false,
                    environmental_control: false,
                },
                3,
                now(),
            )
            .await
            .unwrap();
        let ScenarioOutcome::Success(result) = outcome else {
            panic!("expected a successful simulation");
        };
        assert_eq!(result.scenario.factor, 1.0);
        assert_eq!(result.scenario.forecast, result.baseline.forecast);
        assert_eq!(result.impact.cases_prevented, 0);
        assert_eq!(result.impact.percent_reduction, 0.0);
    }

    #[tokio::test]
    async fn test_full_intervention_reduces_cases() {
        let engine = engine_with_series(&[10, 12, 11, 13, 12, 14, 13]);
        let outcome = engine
            .simulate_scenario_at(
                "Zone1",
                "dengue",
                &InterventionScenario {
                    awareness_level: Some(100.0),
                    medical_intervention: true,
                    environmental_control: true,
                },
                3,
                now(),
            )
            .await
            .unwrap();
        let ScenarioOutcome::Success(result) = outcome else {
            panic!("expected a successful simulation");
        };
        // Baseline [17,18,19] * 0.39375, rounded per day: [7,7,7].
        assert_eq!(result.scenario.forecast, vec![7, 7, 7]);
        assert_eq!(result.impact.cases_prevented, 33);
        assert_eq!(result.impact.percent_reduction, 61.1);
        assert_eq!(
            result.impact.intervention_strength,
            InterventionStrength::VeryStrong
        );
    }

    #[tokio::test]
    async fn test_comparison_picks_max_prevention_stably() {
        let engine = engine_with_series(&[10, 12, 11, 13, 12, 14, 13]);
        let scenarios = vec![
            NamedScenario {
                name: "do-nothing".to_string(),
                interventions: InterventionScenario::default(),
            },
            NamedScenario {
                name: "medical".to_string(),
                interventions: InterventionScenario {
                    medical_intervention: true,
                    ..Default::default()
                },
            },
            NamedScenario {
                name: "medical-again".to_string(),
                interventions: InterventionScenario {
                    medical_intervention: true,
                    ..Default::default()
                },
            },
        ];
        let comparison = engine
            .compare_scenarios_at("Zone1", "dengue", &scenarios, 3, now())
            .await
            .unwrap();
        // Both medical scenarios prevent the same count; the first wins.
        assert_eq!(comparison.best_scenario.as_deref(), Some("medical"));
        assert_eq!(comparison.scenarios.len(), 3);
    }

    #[tokio::test]
    async fn test_insufficient_data_propagates_to_scenarios() {
        let engine = engine_with_series(&[]);
        let outcome = engine
            .simulate_scenario_at(
                "Zone1",
                "dengue",
                &InterventionScenario::default(),
                7,
                now(),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, ScenarioOutcome::InsufficientData(_)));

        let comparison = engine
            .compare_scenarios_at(
                "Zone1",
                "dengue",
                &[NamedScenario {
                    name: "any".to_string(),
                    interventions: InterventionScenario::default(),
                }],
                7,
                now(),
            )
            .await
            .unwrap();
        assert!(comparison.best_scenario.is_none());
    }
}
