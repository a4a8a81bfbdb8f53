//! Store traits consumed by the analytics engines.
//!
//! Implementations may be backed by anything that can answer the filter
//! queries; the engines only depend on these traits. Fetch failures must be
//! surfaced as `EpiwatchError::Store`; the core never retries.

use async_trait::async_trait;
use epiwatch_common::{AlertRecord, CaseRecord, Result, RiskScoreResult};
use uuid::Uuid;

use crate::filter::RecordFilter;

/// Per-disease case sum from an aggregation query.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseCases {
    pub disease: String,
    pub cases: u64,
}

/// Read access to the population of case records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records matching the filter, ordered chronologically.
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<CaseRecord>>;

    /// Sum of `case_count` grouped by disease key over matching records.
    async fn sum_cases_by_disease(&self, filter: &RecordFilter) -> Result<Vec<DiseaseCases>>;
}

/// Optional persistence for computed risk scores.
#[async_trait]
pub trait RiskScoreStore: Send + Sync {
    async fn insert(&self, score: RiskScoreResult) -> Result<()>;

    /// Most recently calculated score for an (area, disease) pair.
    async fn find_latest(&self, area: &str, disease: &str) -> Result<Option<RiskScoreResult>>;

    /// Latest score per disease for an area.
    async fn latest_for_area(&self, area: &str) -> Result<Vec<RiskScoreResult>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RiskScoreResult>>;
}

/// Read access to issued alerts, for explanation reports.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AlertRecord>>;
}
