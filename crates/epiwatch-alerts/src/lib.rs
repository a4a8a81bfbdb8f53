//! Alert Synthesis.
//!
//! Thin templating consumer over the risk and anomaly engines: fills
//! severity- and disease-keyed message templates, drafts alerts from
//! anomaly detections, and attaches preventive guidance.

pub mod synthesis;
pub mod templates;

pub use synthesis::{
    anomaly_alert, generate_alert_message, refine_message, AlertDraft, AlertParams,
    AlertSynthesizer,
};
pub use templates::{message_template, preventive_guidance};
