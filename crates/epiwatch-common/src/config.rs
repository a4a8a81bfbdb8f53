//! Analytics configuration.
//!
//! Every tunable the engines consume lives here so deployments can override
//! defaults via YAML/JSON config instead of recompiling. Defaults reproduce
//! the canonical pipeline behavior exactly.

use serde::{Deserialize, Serialize};

/// Complete analytics pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Window lengths for record fetches
    #[serde(default)]
    pub windows: WindowConfig,

    /// Risk scoring parameters
    #[serde(default)]
    pub risk: RiskConfig,

    /// Anomaly detection parameters
    #[serde(default)]
    pub anomaly: AnomalyConfig,

    /// Forecasting and scenario parameters
    #[serde(default)]
    pub forecast: ForecastConfig,
}

// ── Windows ──────────────────────────────────────────────────────────────────

/// Fetch-window lengths, in days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Current scoring period
    #[serde(default = "default_current_days")]
    pub current_days: i64,

    /// End of the previous scoring period (8–14 days ago by default)
    #[serde(default = "default_previous_days")]
    pub previous_days: i64,

    /// Historical-outbreak lookback
    #[serde(default = "default_outbreak_days")]
    pub outbreak_days: i64,

    /// Anomaly-detection history
    #[serde(default = "default_anomaly_days")]
    pub anomaly_days: i64,

    /// Forecast history
    #[serde(default = "default_forecast_days")]
    pub forecast_days: i64,
}

fn default_current_days() -> i64 { 7 }
fn default_previous_days() -> i64 { 14 }
fn default_outbreak_days() -> i64 { 90 }
fn default_anomaly_days() -> i64 { 30 }
fn default_forecast_days() -> i64 { 60 }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            current_days: default_current_days(),
            previous_days: default_previous_days(),
            outbreak_days: default_outbreak_days(),
            anomaly_days: default_anomaly_days(),
            forecast_days: default_forecast_days(),
        }
    }
}

// ── Risk scoring ─────────────────────────────────────────────────────────────

/// Risk scoring parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub weights: RiskWeights,

    /// Divisor for growth-rate normalization. The canonical value is 150;
    /// the 100-divisor variant that also existed upstream is not supported.
    #[serde(default = "default_growth_norm_max")]
    pub growth_norm_max: f64,

    /// Case count treated as 100% density. Counts above this clamp to 100.
    #[serde(default = "default_case_density_max")]
    pub case_density_max: f64,

    /// Minimum score change before a recalculated result is persisted.
    #[serde(default = "default_persist_delta")]
    pub persist_delta: u8,
}

fn default_growth_norm_max() -> f64 { 150.0 }
fn default_case_density_max() -> f64 { 100.0 }
fn default_persist_delta() -> u8 { 5 }

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            growth_norm_max: default_growth_norm_max(),
            case_density_max: default_case_density_max(),
            persist_delta: default_persist_delta(),
        }
    }
}

/// The 4-component weight vector for the composite risk score.
/// Weights sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Current-vs-previous window growth rate
    pub growth_rate: f64,
    /// Normalized current-window case sum
    pub case_density: f64,
    /// Static per-disease severity
    pub disease_severity: f64,
    /// 90-day historical outbreak signal
    pub historical_outbreak: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            growth_rate:         0.40,
            case_density:        0.30,
            disease_severity:    0.20,
            historical_outbreak: 0.10,
        }
    }
}

impl RiskWeights {
    /// Validate that all weights sum to ~1.0
    pub fn validate(&self) -> bool {
        let sum = self.growth_rate
            + self.case_density
            + self.disease_severity
            + self.historical_outbreak;
        (sum - 1.0).abs() < 1e-6
    }

    /// Renormalise weights so they sum to 1.0
    pub fn normalise(&mut self) {
        let sum = self.growth_rate
            + self.case_density
            + self.disease_severity
            + self.historical_outbreak;
        if sum > 0.0 {
            self.growth_rate         /= sum;
            self.case_density        /= sum;
            self.disease_severity    /= sum;
            self.historical_outbreak /= sum;
        }
    }

    /// Convert to array for iteration.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.growth_rate,
            self.case_density,
            self.disease_severity,
            self.historical_outbreak,
        ]
    }
}

// ── Anomaly detection ────────────────────────────────────────────────────────

/// Anomaly detection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Z-score above which an observation is anomalous. Strictly exclusive:
    /// z equal to the threshold is NOT an anomaly.
    #[serde(default = "default_z_threshold")]
    pub z_threshold: f64,

    /// Ratio-over-mean fallback used when the series has zero variance.
    #[serde(default = "default_flat_series_ratio")]
    pub flat_series_ratio: f64,

    /// Trailing values included in the moving average.
    #[serde(default = "default_moving_avg_window")]
    pub moving_avg_window: usize,
}

fn default_z_threshold() -> f64 { 2.0 }
fn default_flat_series_ratio() -> f64 { 1.5 }
fn default_moving_avg_window() -> usize { 7 }

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            z_threshold: default_z_threshold(),
            flat_series_ratio: default_flat_series_ratio(),
            moving_avg_window: default_moving_avg_window(),
        }
    }
}

// ── Forecasting ──────────────────────────────────────────────────────────────

/// Holt smoothing and intervention-scenario parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Level smoothing coefficient
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Trend smoothing coefficient
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Maximum reduction from full awareness (25% at awareness 100)
    #[serde(default = "default_awareness_max_reduction")]
    pub awareness_max_reduction: f64,

    /// Multiplier applied when medical intervention is active
    #[serde(default = "default_medical_factor")]
    pub medical_factor: f64,

    /// Multiplier applied when environmental control is active
    #[serde(default = "default_environmental_factor")]
    pub environmental_factor: f64,

    /// Clamp bounds for the combined reduction factor
    #[serde(default = "default_factor_floor")]
    pub factor_floor: f64,
    #[serde(default = "default_factor_ceil")]
    pub factor_ceil: f64,
}

fn default_alpha() -> f64 { 0.3 }
fn default_beta() -> f64 { 0.2 }
fn default_awareness_max_reduction() -> f64 { 0.25 }
fn default_medical_factor() -> f64 { 0.70 }
fn default_environmental_factor() -> f64 { 0.75 }
fn default_factor_floor() -> f64 { 0.3 }
fn default_factor_ceil() -> f64 { 1.5 }

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            awareness_max_reduction: default_awareness_max_reduction(),
            medical_factor: default_medical_factor(),
            environmental_factor: default_environmental_factor(),
            factor_floor: default_factor_floor(),
            factor_ceil: default_factor_ceil(),
        }
    }
}

// ── Helper methods ───────────────────────────────────────────────────────────

impl AnalyticsConfig {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::EpiwatchError::Config(format!("{path}: {e}")))?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| crate::EpiwatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::EpiwatchError::Config(format!("{path}: {e}")))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &str) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| crate::EpiwatchError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| crate::EpiwatchError::Config(format!("{path}: {e}")))?;
        Ok(())
    }

    /// Reject configurations the engines cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.risk.weights.validate() {
            return Err(crate::EpiwatchError::Config(
                "risk weights must sum to 1.0".to_string(),
            ));
        }
        if self.risk.growth_norm_max <= 0.0 || self.risk.case_density_max <= 0.0 {
            return Err(crate::EpiwatchError::Config(
                "normalization divisors must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.forecast.alpha) || !(0.0..=1.0).contains(&self.forecast.beta) {
            return Err(crate::EpiwatchError::Config(
                "smoothing coefficients must be in [0, 1]".to_string(),
            ));
        }
        if self.forecast.factor_floor > self.forecast.factor_ceil {
            return Err(crate::EpiwatchError::Config(
                "factor_floor must not exceed factor_ceil".to_string(),
            ));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
