//! Static disease-severity lookup.
//!
//! Typical severity of common communicable diseases on a 0–100 scale.
//! Unknown diseases fall back to [`DEFAULT_SEVERITY`].

/// Immutable severity table, keyed by lowercase disease name.
const DISEASE_SEVERITY: &[(&str, u8)] = &[
    ("chickenpox", 30),
    ("cholera", 90),
    ("covid-19", 65),
    ("dengue", 60),
    ("flu", 40),
    ("hepatitis", 65),
    ("influenza", 40),
    ("malaria", 70),
    ("measles", 75),
    ("tuberculosis", 85),
    ("typhoid", 55),
];

pub const DEFAULT_SEVERITY: u8 = 50;

/// Severity weight for a disease, case-insensitive.
pub fn severity_for(disease: &str) -> u8 {
    let key = disease.to_lowercase();
    DISEASE_SEVERITY
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, severity)| *severity)
        .unwrap_or(DEFAULT_SEVERITY)
}
