//! Embedded in-memory store implementations.
//!
//! Used by unit tests and single-process deployments. Records are held in a
//! `tokio::sync::RwLock`; reads sort chronologically to honor the
//! [`RecordStore::find`] ordering contract.

use std::collections::BTreeMap;

use async_trait::async_trait;
use epiwatch_common::{AlertRecord, CaseRecord, Result, RiskScoreResult};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::filter::RecordFilter;
use crate::traits::{AlertStore, DiseaseCases, RecordStore, RiskScoreStore};

/// In-memory [`RecordStore`].
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<CaseRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with an initial batch of records.
    pub fn with_records(records: Vec<CaseRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn push(&self, record: CaseRecord) {
        self.records.write().await.push(record);
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<CaseRecord>> {
        let records = self.records.read().await;
        let mut matched: Vec<CaseRecord> = records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matched.sort_by_key(|r| r.report_date);
        Ok(matched)
    }

    async fn sum_cases_by_disease(&self, filter: &RecordFilter) -> Result<Vec<DiseaseCases>> {
        let records = self.find(filter).await?;
        let mut sums: BTreeMap<String, u64> = BTreeMap::new();
        for record in &records {
            *sums.entry(record.disease_key()).or_insert(0) += u64::from(record.case_count);
        }
        Ok(sums
            .into_iter()
            .map(|(disease, cases)| DiseaseCases { disease, cases })
            .collect())
    }
}

/// In-memory [`RiskScoreStore`]. Insertion order doubles as calculation
/// order, so "latest" is the last inserted entry for the pair.
#[derive(Default)]
pub struct InMemoryRiskScoreStore {
    scores: RwLock<Vec<RiskScoreResult>>,
}

impl InMemoryRiskScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.scores.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RiskScoreStore for InMemoryRiskScoreStore {
    async fn insert(&self, score: RiskScoreResult) -> Result<()> {
        self.scores.write().await.push(score);
        Ok(())
    }

    async fn find_latest(&self, area: &str, disease: &str) -> Result<Option<RiskScoreResult>> {
        let area = area.to_lowercase();
        let disease = disease.to_lowercase();
        let scores = self.scores.read().await;
        Ok(scores
            .iter()
            .rev()
            .find(|s| s.area.to_lowercase() == area && s.disease.to_lowercase() == disease)
            .cloned())
    }

    async fn latest_for_area(&self, area: &str) -> Result<Vec<RiskScoreResult>> {
        let area = area.to_lowercase();
        let scores = self.scores.read().await;
        let mut latest: BTreeMap<String, RiskScoreResult> = BTreeMap::new();
        for score in scores.iter() {
            if score.area.to_lowercase() == area {
                latest.insert(score.disease.to_lowercase(), score.clone());
            }
        }
        Ok(latest.into_values().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RiskScoreResult>> {
        let scores = self.scores.read().await;
        Ok(scores.iter().find(|s| s.id == id).cloned())
    }
}

/// In-memory [`AlertStore`].
#[derive(Default)]
pub struct InMemoryAlertStore {
    alerts: RwLock<Vec<AlertRecord>>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, alert: AlertRecord) {
        self.alerts.write().await.push(alert);
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AlertRecord>> {
        let alerts = self.alerts.read().await;
        Ok(alerts.iter().find(|a| a.id == id).cloned())
    }
}
