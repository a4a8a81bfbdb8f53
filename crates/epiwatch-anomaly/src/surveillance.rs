//! Batch surveillance helpers.
//!
//! Pure scans over already-fetched record batches, used by dashboard-style
//! callers: per-area threshold checks against the 7-day average, trending
//! diseases, and area × disease distributions.

use std::collections::BTreeMap;

use epiwatch_common::{CaseRecord, RiskLevel};
use serde::{Deserialize, Serialize};

/// Per-area comparison of today's cases against the trailing week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaRiskSnapshot {
    pub area: String,
    pub today_cases: u64,
    pub seven_day_average: u64,
    pub risk_level: RiskLevel,
    /// Percent change of today vs the 7-day average, rounded.
    pub percentage_change: i64,
}

/// Total case count for one disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseTally {
    pub disease: String,
    pub count: u64,
}

/// Flag areas whose today-count exceeds `threshold` times their 7-day
/// average; above twice the average the area is high risk, otherwise
/// medium. Areas below the threshold are reported as low.
pub fn detect_high_risk_areas(
    today_reports: &[CaseRecord],
    last_7_days_reports: &[CaseRecord],
    threshold: f64,
) -> Vec<AreaRiskSnapshot> {
    let mut today_by_area: BTreeMap<String, u64> = BTreeMap::new();
    for report in today_reports {
        *today_by_area.entry(report.area.clone()).or_insert(0) +=
            u64::from(report.case_count);
    }

    let mut week_by_area: BTreeMap<String, u64> = BTreeMap::new();
    for report in last_7_days_reports {
        *week_by_area.entry(report.area.clone()).or_insert(0) +=
            u64::from(report.case_count);
    }

    let mut areas: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for (area, today) in today_by_area {
        areas.entry(area).or_insert((0, 0)).0 = today;
    }
    for (area, week_total) in week_by_area {
        areas.entry(area).or_insert((0, 0)).1 = week_total;
    }

    areas
        .into_iter()
        .map(|(area, (today, week_total))| {
            let average = ((week_total as f64) / 7.0).round() as u64;
            let today_f = today as f64;
            let average_f = average as f64;

            let risk_level = if today_f > average_f * threshold {
                if today_f > average_f * 2.0 {
                    RiskLevel::High
                } else {
                    RiskLevel::Medium
                }
            } else {
                RiskLevel::Low
            };

            let percentage_change = if average > 0 {
                ((today_f - average_f) / average_f * 100.0).round() as i64
            } else {
                0
            };

            AreaRiskSnapshot {
                area,
                today_cases: today,
                seven_day_average: average,
                risk_level,
                percentage_change,
            }
        })
        .collect()
}

/// Top diseases by total case count, highest first, capped at ten.
pub fn trending_diseases(reports: &[CaseRecord]) -> Vec<DiseaseTally> {
    let mut tallies: BTreeMap<String, u64> = BTreeMap::new();
    for report in reports {
        *tallies.entry(report.disease_key()).or_insert(0) += u64::from(report.case_count);
    }

    let mut ranked: Vec<DiseaseTally> = tallies
        .into_iter()
        .map(|(disease, count)| DiseaseTally { disease, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(10);
    ranked
}

/// Case totals per area and disease.
pub fn area_disease_distribution(
    reports: &[CaseRecord],
) -> BTreeMap<String, BTreeMap<String, u64>> {
    let mut distribution: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for report in reports {
        *distribution
            .entry(report.area.clone())
            .or_default()
            .entry(report.disease_key())
            .or_insert(0) += u64::from(report.case_count);
    }
    distribution
}
