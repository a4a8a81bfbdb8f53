//! Intervention scenarios and their reduction factors.

use epiwatch_common::ForecastConfig;
use serde::{Deserialize, Serialize};

/// Levers a scenario can pull to reduce projected cases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterventionScenario {
    /// Community awareness campaign intensity, 0–100. Values outside the
    /// range are clamped before use.
    pub awareness_level: Option<f64>,
    pub medical_intervention: bool,
    pub environmental_control: bool,
}

/// Categorical label for how many levers a scenario activates.
/// Awareness counts as active above level 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterventionStrength {
    Minimal,
    Moderate,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl InterventionScenario {
    /// How many levers are active: awareness above 50, medical,
    /// environmental.
    fn active_levers(&self) -> u8 {
        let mut count = 0;
        if self.awareness_level.is_some_and(|a| a > 50.0) {
            count += 1;
        }
        if self.medical_intervention {
            count += 1;
        }
        if self.environmental_control {
            count += 1;
        }
        count
    }

    pub fn strength(&self) -> InterventionStrength {
        match self.active_levers() {
            0 => InterventionStrength::Minimal,
            1 => InterventionStrength::Moderate,
            2 => InterventionStrength::Strong,
            _ => InterventionStrength::VeryStrong,
        }
    }
}

/// Multiplicative factor applied to each baseline forecast day.
///
/// Full awareness removes up to 25% of cases, medical intervention 30%,
/// environmental control 25%; the combined factor is clamped into
/// `[factor_floor, factor_ceil]` (default [0.3, 1.5]).
pub fn reduction_factor(scenario: &InterventionScenario, config: &ForecastConfig) -> f64 {
    let mut factor = 1.0;

    if let Some(awareness) = scenario.awareness_level {
        let awareness = awareness.clamp(0.0, 100.0);
        factor *= 1.0 - (awareness / 100.0) * config.awareness_max_reduction;
    }
    if scenario.medical_intervention {
        factor *= config.medical_factor;
    }
    if scenario.environmental_control {
        factor *= config.environmental_factor;
    }

    factor.clamp(config.factor_floor, config.factor_ceil)
}
