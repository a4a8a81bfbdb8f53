//! Recommendation lists keyed by risk level and disease.

use epiwatch_common::RiskLevel;

const LOW: &[&str] = &[
    "Continue routine health monitoring",
    "Maintain standard preventive practices",
    "Stay informed about disease updates",
];

const MEDIUM: &[&str] = &[
    "Increase health awareness in community",
    "Ensure vaccination status is current",
    "Monitor symptoms closely",
    "Consult healthcare provider if symptoms develop",
];

const HIGH: &[&str] = &[
    "Activate emergency health protocols",
    "Increase surveillance and testing",
    "Implement community health measures",
    "Provide immediate access to healthcare",
    "Distribute preventive measures",
];

/// Sorted by disease key for readability; lookup is a linear scan.
const DISEASE_SPECIFIC: &[(&str, &[&str])] = &[
    (
        "covid-19",
        &[
            "Boost vaccination campaigns",
            "Increase testing capacity",
            "Advise on isolation procedures",
        ],
    ),
    (
        "dengue",
        &[
            "Eliminate mosquito breeding sites",
            "Distribute insect repellents",
            "Advise on protective clothing",
        ],
    ),
    (
        "malaria",
        &[
            "Distribute bed nets",
            "Arrange prophylaxis programs",
            "Increase testing availability",
        ],
    ),
    (
        "measles",
        &[
            "Organize vaccination drives",
            "Isolate confirmed cases",
            "Monitor contacts",
        ],
    ),
    (
        "tuberculosis",
        &[
            "Screen at-risk populations",
            "Ensure treatment access",
            "Implement infection control",
        ],
    ),
];

/// Risk-level base list followed by disease-specific additions, if any.
/// Disease matching is case-insensitive; unknown diseases get the base
/// list only.
pub fn recommendations_for(level: RiskLevel, disease: &str) -> Vec<String> {
    let base = match level {
        RiskLevel::Low => LOW,
        RiskLevel::Medium => MEDIUM,
        RiskLevel::High => HIGH,
    };
    let key = disease.to_lowercase();
    let specific = DISEASE_SPECIFIC
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, items)| *items)
        .unwrap_or(&[]);

    base.iter()
        .chain(specific.iter())
        .map(|s| (*s).to_string())
        .collect()
}
