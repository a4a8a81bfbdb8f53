//! Message templates and preventive guidance, keyed by risk level and
//! disease.
//!
//! Templates carry `{disease}`, `{area}` and `{cases}` placeholders filled
//! in at synthesis time. Disease keys are lowercase; unknown diseases fall
//! back to the level's default template.

use epiwatch_common::RiskLevel;

const HIGH: &[(&str, &str)] = &[
    (
        "covid-19",
        "HIGH ALERT: {area} - {disease} transmission at critical levels ({cases} cases). \
         ESSENTIAL - Practice hygiene, maintain distance, get vaccinated if eligible.",
    ),
    (
        "dengue",
        "HIGH ALERT: {area} is experiencing a significant {disease} outbreak. Cases: {cases}. \
         IMMEDIATE PRECAUTIONS REQUIRED - Seek shelter, avoid mosquito breeding spots, \
         use repellents.",
    ),
    (
        "malaria",
        "HIGH ALERT: {area} - {disease} cases surging to {cases}. CRITICAL - Use bed nets, \
         take prophylaxis if recommended, report symptoms immediately.",
    ),
    (
        "measles",
        "HIGH ALERT: {area} - {disease} spreading rapidly ({cases} cases reported). URGENT - \
         Ensure vaccination status, avoid contact with sick individuals.",
    ),
    (
        "tuberculosis",
        "HIGH ALERT: {area} - {disease} active transmission ({cases} cases). IMPORTANT - \
         Medical screening advised, proper respiratory protection in public spaces.",
    ),
];

const HIGH_DEFAULT: &str = "HIGH ALERT: {area} is experiencing elevated {disease} activity \
     with {cases} reported cases. Community precautions and medical consultation recommended.";

const MEDIUM: &[(&str, &str)] = &[
    (
        "covid-19",
        "MODERATE ALERT: {area} showing {disease} increase ({cases} cases). Advised: \
         Maintain hygiene, home isolation if symptomatic, health monitoring.",
    ),
    (
        "dengue",
        "MODERATE ALERT: {disease} activity detected in {area} with {cases} cases. \
         Recommended: Use mosquito repellents, clean water containers, monitor symptoms.",
    ),
    (
        "malaria",
        "MODERATE ALERT: {disease} cases identified in {area} ({cases} reported). \
         Recommendation: Use bed nets, consult health facility if symptoms appear.",
    ),
    (
        "measles",
        "MODERATE ALERT: {disease} presence in {area} ({cases} cases). Caution: Verify \
         vaccination status, avoid crowded places, monitor for symptoms.",
    ),
    (
        "tuberculosis",
        "MODERATE ALERT: {disease} cases reported in {area} ({cases} cases). Guidance: \
         Health screening available, respiratory precautions recommended.",
    ),
];

const MEDIUM_DEFAULT: &str = "MODERATE ALERT: {area} has {disease} activity. Please stay \
     informed and follow basic health precautions.";

const LOW_DEFAULT: &str = "INFORMATION: {area} has {disease} under observation ({cases} \
     cases). Continue normal preventive practices.";

/// Template for a (risk level, disease) pair.
pub fn message_template(level: RiskLevel, disease: &str) -> &'static str {
    let key = disease.to_lowercase();
    let (table, fallback) = match level {
        RiskLevel::High => (HIGH, HIGH_DEFAULT),
        RiskLevel::Medium => (MEDIUM, MEDIUM_DEFAULT),
        RiskLevel::Low => (&[][..], LOW_DEFAULT),
    };
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, template)| *template)
        .unwrap_or(fallback)
}

const GUIDANCE: &[(&str, &[&str])] = &[
    (
        "covid-19",
        &[
            "Get vaccinated and booster doses",
            "Practice regular hand hygiene",
            "Wear masks in crowded settings",
            "Maintain physical distance when possible",
        ],
    ),
    (
        "dengue",
        &[
            "Apply mosquito repellents containing DEET",
            "Clear stagnant water from containers",
            "Use bed nets and air-conditioned spaces",
            "Wear full-sleeve clothing during peak mosquito hours",
        ],
    ),
    (
        "malaria",
        &[
            "Sleep under insecticide-treated bed nets",
            "Take malaria prophylaxis if traveling to endemic areas",
            "Avoid being outdoors during dusk and dawn",
            "Seek medical attention if experiencing fever",
        ],
    ),
    (
        "measles",
        &[
            "Ensure MMR vaccination status",
            "Avoid close contact with confirmed cases",
            "Practice respiratory hygiene",
            "Seek immediate care if symptoms appear",
        ],
    ),
    (
        "tuberculosis",
        &[
            "Get TB screening if at risk",
            "Use respiratory protection around infected individuals",
            "Complete full TB treatment if prescribed",
            "Report persistent cough lasting 3+ weeks",
        ],
    ),
];

const GUIDANCE_DEFAULT: &[&str] = &[
    "Consult healthcare provider if symptoms develop",
    "Practice good hand hygiene",
    "Follow basic respiratory etiquette",
    "Monitor health status regularly",
];

/// Disease-specific preventive steps, with a generic fallback.
pub fn preventive_guidance(disease: &str) -> &'static [&'static str] {
    let key = disease.to_lowercase();
    GUIDANCE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, items)| *items)
        .unwrap_or(GUIDANCE_DEFAULT)
}
