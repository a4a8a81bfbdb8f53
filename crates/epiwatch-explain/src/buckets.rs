//! Qualitative bucket tables for the four risk factors.
//!
//! Each table maps a handful of reference points on the 0–100 scale to a
//! short description; a value resolves to the numerically closest key.
//! Keys are pre-spaced so ties only occur at exact midpoints, which keep
//! the lower key.

/// The four weighted inputs to a composite risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    GrowthRate,
    CaseDensity,
    DiseaseSeverity,
    HistoricalOutbreak,
}

const GROWTH_RATE: &[(f64, &str)] = &[
    (0.0, "No growth in cases"),
    (30.0, "Slow growth in case count"),
    (50.0, "Moderate growth detected"),
    (75.0, "Rapid case growth detected"),
    (100.0, "Extremely rapid growth - urgent attention needed"),
];

const CASE_DENSITY: &[(f64, &str)] = &[
    (0.0, "No reported cases"),
    (25.0, "Low case count"),
    (50.0, "Moderate case density"),
    (75.0, "High case density"),
    (100.0, "Very high case density - cluster detected"),
];

const DISEASE_SEVERITY: &[(f64, &str)] = &[
    (0.0, "Low severity disease"),
    (30.0, "Moderate severity disease"),
    (60.0, "High severity disease"),
    (80.0, "Very high severity disease"),
    (100.0, "Critical severity disease"),
];

const HISTORICAL_OUTBREAK: &[(f64, &str)] = &[
    (0.0, "No previous outbreaks"),
    (30.0, "Minor outbreak history"),
    (60.0, "Significant outbreak in past 90 days"),
    (80.0, "Recent major outbreak"),
    (100.0, "Ongoing outbreak situation"),
];

impl Factor {
    /// Field name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Factor::GrowthRate => "growth_rate",
            Factor::CaseDensity => "case_density",
            Factor::DiseaseSeverity => "disease_severity",
            Factor::HistoricalOutbreak => "historical_outbreak",
        }
    }

    fn table(self) -> &'static [(f64, &'static str)] {
        match self {
            Factor::GrowthRate => GROWTH_RATE,
            Factor::CaseDensity => CASE_DENSITY,
            Factor::DiseaseSeverity => DISEASE_SEVERITY,
            Factor::HistoricalOutbreak => HISTORICAL_OUTBREAK,
        }
    }

    /// Description for the table key nearest to `value`.
    pub fn describe(self, value: f64) -> &'static str {
        let table = self.table();
        let mut best = table[0];
        for &entry in &table[1..] {
            if (entry.0 - value).abs() < (best.0 - value).abs() {
                best = entry;
            }
        }
        best.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_keys() {
        assert_eq!(Factor::GrowthRate.describe(0.0), "No growth in cases");
        assert_eq!(
            Factor::GrowthRate.describe(100.0),
            "Extremely rapid growth - urgent attention needed"
        );
        assert_eq!(
            Factor::HistoricalOutbreak.describe(80.0),
            "Recent major outbreak"
        );
    }

    #[test]
    fn test_nearest_neighbour_not_floor() {
        // 66.67 sits between 50 and 75; 75 is closer.
        assert_eq!(
            Factor::GrowthRate.describe(66.67),
            "Rapid case growth detected"
        );
        // 10 is closer to 0 than to 25.
        assert_eq!(Factor::CaseDensity.describe(10.0), "No reported cases");
    }

    #[test]
    fn test_midpoint_keeps_lower_key() {
        assert_eq!(Factor::GrowthRate.describe(40.0), "Slow growth in case count");
    }

    #[test]
    fn test_out_of_range_values_snap_to_ends() {
        assert_eq!(
            Factor::GrowthRate.describe(250.0),
            "Extremely rapid growth - urgent attention needed"
        );
        assert_eq!(Factor::DiseaseSeverity.describe(-5.0), "Low severity disease");
    }
}
