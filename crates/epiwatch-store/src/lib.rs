//! Epiwatch storage layer.
//!
//! The analytics engines never reach for ambient global state: each engine
//! receives its store handle as an `Arc<dyn Trait>` at construction time.
//! This crate defines those traits plus embedded in-memory implementations
//! used by tests and small single-process deployments.

pub mod filter;
pub mod memory;
pub mod traits;

pub use filter::RecordFilter;
pub use memory::{InMemoryAlertStore, InMemoryRecordStore, InMemoryRiskScoreStore};
pub use traits::{AlertStore, DiseaseCases, RecordStore, RiskScoreStore};
