//! Composite risk score computation.
//!
//! `score = round(w_g*norm(growth) + w_d*density + w_s*severity + w_o*outbreak)`
//! with every component and the final score clamped into [0, 100].

use epiwatch_common::{RiskConfig, RiskWeights};

/// Raw component values for one (area, disease) pair.
#[derive(Debug, Clone)]
pub struct RiskComponents {
    /// Percent change vs the previous window; may be negative or above 100.
    pub growth_rate: f64,
    /// Already normalized to [0, 100].
    pub case_density: f64,
    pub disease_severity: u8,
    /// 0 (no history), 20 (quiet) or 80 (spike in the last 90 days).
    pub historical_outbreak: u8,
}

/// Percent change current-period vs previous-period case sum.
/// A previous period of zero maps to 100% when new cases appeared, 0% otherwise.
pub fn growth_rate(current_cases: u64, previous_cases: u64) -> f64 {
    if previous_cases == 0 {
        return if current_cases > 0 { 100.0 } else { 0.0 };
    }
    let current = current_cases as f64;
    let previous = previous_cases as f64;
    (current - previous) / previous * 100.0
}

/// Scale `value` against `max` onto [0, 100], clamped.
pub fn normalize(value: f64, max: f64) -> f64 {
    (value / max * 100.0).clamp(0.0, 100.0)
}

/// Weighted composite score, rounded and clamped to [0, 100].
pub fn compute_risk_score(components: &RiskComponents, config: &RiskConfig) -> u8 {
    let RiskWeights {
        growth_rate: w_growth,
        case_density: w_density,
        disease_severity: w_severity,
        historical_outbreak: w_outbreak,
    } = config.weights;

    let normalized_growth = normalize(components.growth_rate, config.growth_norm_max);
    let score = normalized_growth * w_growth
        + components.case_density * w_density
        + f64::from(components.disease_severity) * w_severity
        + f64::from(components.historical_outbreak) * w_outbreak;

    score.round().clamp(0.0, 100.0) as u8
}

/// Ordered explanation strings for the score's contributing factors.
pub fn contributing_factors(components: &RiskComponents) -> Vec<String> {
    let mut explanations = Vec::new();

    if components.growth_rate > 50.0 {
        explanations.push(format!(
            "Cases increased by {:.1}% in last 7 days",
            components.growth_rate
        ));
    } else if components.growth_rate > 20.0 {
        explanations.push(format!(
            "Moderate growth: {:.1}% increase in cases",
            components.growth_rate
        ));
    }

    if components.case_density > 70.0 {
        explanations.push("High case density detected in the area".to_string());
    } else if components.case_density > 40.0 {
        explanations.push("Moderate case count in the area".to_string());
    }

    if components.disease_severity > 70 {
        explanations.push("High disease severity detected".to_string());
    }

    if components.historical_outbreak > 60 {
        explanations.push("Previous outbreak occurred in last 90 days".to_string());
    }

    if explanations.is_empty() {
        explanations.push("Low activity in area".to_string());
    }

    explanations
}
