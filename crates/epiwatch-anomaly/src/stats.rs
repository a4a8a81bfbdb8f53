//! Population statistics over a daily case-count series.

/// Mean, population standard deviation and trailing moving average of a
/// chronologically ordered series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub mean: f64,
    pub std_dev: f64,
    /// Mean of the trailing window (or of the whole series when shorter).
    pub moving_avg: f64,
    pub sample_count: usize,
}

impl SeriesStats {
    /// Compute stats over `values`; `None` for an empty series.
    pub fn compute(values: &[f64], moving_avg_window: usize) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let tail_start = values.len().saturating_sub(moving_avg_window);
        let tail = &values[tail_start..];
        let moving_avg = tail.iter().sum::<f64>() / tail.len() as f64;

        Some(Self {
            mean,
            std_dev,
            moving_avg,
            sample_count: values.len(),
        })
    }
}
