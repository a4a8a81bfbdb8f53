//! Record query filter.
//!
//! The minimal query surface the engines need: equality/substring on area,
//! equality on disease, range on report date. All string matching is
//! case-insensitive.

use chrono::{DateTime, Utc};
use epiwatch_common::CaseRecord;

/// Filter over [`CaseRecord`]s. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    area: Option<String>,
    area_contains: Option<String>,
    disease: Option<String>,
    since: Option<DateTime<Utc>>,
    before: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact area match (case-insensitive).
    pub fn area(mut self, area: &str) -> Self {
        self.area = Some(area.to_lowercase());
        self
    }

    /// Substring area match (case-insensitive).
    pub fn area_contains(mut self, fragment: &str) -> Self {
        self.area_contains = Some(fragment.to_lowercase());
        self
    }

    /// Exact disease match (case-insensitive).
    pub fn disease(mut self, disease: &str) -> Self {
        self.disease = Some(disease.to_lowercase());
        self
    }

    /// Inclusive lower bound on report date.
    pub fn since(mut self, at: DateTime<Utc>) -> Self {
        self.since = Some(at);
        self
    }

    /// Exclusive upper bound on report date.
    pub fn before(mut self, at: DateTime<Utc>) -> Self {
        self.before = Some(at);
        self
    }

    pub fn matches(&self, record: &CaseRecord) -> bool {
        if let Some(area) = &self.area {
            if record.area.to_lowercase() != *area {
                return false;
            }
        }
        if let Some(fragment) = &self.area_contains {
            if !record.area.to_lowercase().contains(fragment) {
                return false;
            }
        }
        if let Some(disease) = &self.disease {
            if record.disease_key() != *disease {
                return false;
            }
        }
        if let Some(since) = &self.since {
            if record.report_date < *since {
                return false;
            }
        }
        if let Some(before) = &self.before {
            if record.report_date >= *before {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(disease: &str, area: &str, day: u32) -> CaseRecord {
        CaseRecord::new(
            disease,
            area,
            5,
            Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(RecordFilter::new().matches(&record("dengue", "Zone1", 1)));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let filter = RecordFilter::new().area("zone1").disease("DENGUE");
        assert!(filter.matches(&record("Dengue", "ZONE1", 1)));
        assert!(!filter.matches(&record("malaria", "ZONE1", 1)));
    }

    #[test]
    fn test_area_substring() {
        let filter = RecordFilter::new().area_contains("110");
        assert!(filter.matches(&record("dengue", "Delhi-110032", 1)));
        assert!(!filter.matches(&record("dengue", "Mumbai-400001", 1)));
    }

    #[test]
    fn test_date_range_bounds() {
        let since = Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let filter = RecordFilter::new().since(since).before(before);
        assert!(!filter.matches(&record("dengue", "Zone1", 4)));
        assert!(filter.matches(&record("dengue", "Zone1", 5)));
        assert!(filter.matches(&record("dengue", "Zone1", 9)));
        assert!(!filter.matches(&record("dengue", "Zone1", 10)));
    }
}
