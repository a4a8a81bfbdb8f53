//! Double exponential smoothing (Holt's method).

/// Final level and trend of a fitted series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingState {
    pub level: f64,
    pub trend: f64,
}

/// Fit Holt's linear method over a case series.
///
/// `level[0] = cases[0]`, `trend[0] = cases[1] - cases[0]` (0 for a
/// single-point series); then for each subsequent observation:
/// `level = alpha*case + (1-alpha)*(level+trend)`,
/// `trend = beta*(level-prev_level) + (1-beta)*trend`.
///
/// Returns `None` for an empty series.
pub fn holt_fit(cases: &[f64], alpha: f64, beta: f64) -> Option<SmoothingState> {
    let first = *cases.first()?;
    let mut level = first;
    let mut trend = if cases.len() > 1 { cases[1] - first } else { 0.0 };

    for &case in &cases[1..] {
        let prev_level = level;
        level = alpha * case + (1.0 - alpha) * (level + trend);
        trend = beta * (level - prev_level) + (1.0 - beta) * trend;
    }

    Some(SmoothingState { level, trend })
}

/// Project the fitted state `days` steps ahead. Day k predicts
/// `max(0, round(level + trend*k))`.
pub fn project(state: SmoothingState, days: u32) -> Vec<u32> {
    (1..=days)
        .map(|k| {
            let predicted = state.level + state.trend * f64::from(k);
            predicted.round().max(0.0) as u32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        assert!(holt_fit(&[], 0.3, 0.2).is_none());
    }

    #[test]
    fn test_single_point_has_zero_trend() {
        let state = holt_fit(&[8.0], 0.3, 0.2).unwrap();
        assert_eq!(state.level, 8.0);
        assert_eq!(state.trend, 0.0);
    }

    #[test]
    fn test_reference_series_fit() {
        // [10,12,11,13,12,14,13] with alpha=0.3, beta=0.2, worked through
        // the recurrence by hand.
        let series = [10.0, 12.0, 11.0, 13.0, 12.0, 14.0, 13.0];
        let state = holt_fit(&series, 0.3, 0.2).unwrap();
        assert!((state.level - 15.751932736).abs() < 1e-9);
        assert!((state.trend - 1.0882301312).abs() < 1e-9);
        assert_eq!(project(state, 3), vec![17, 18, 19]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let series = [3.0, 7.0, 4.0, 9.0, 6.0];
        let a = holt_fit(&series, 0.3, 0.2).unwrap();
        let b = holt_fit(&series, 0.3, 0.2).unwrap();
        assert_eq!(a, b);
        assert_eq!(project(a, 10), project(b, 10));
    }

    #[test]
    fn test_projection_never_negative() {
        let state = SmoothingState { level: 3.0, trend: -2.5 };
        let forecast = project(state, 5);
        assert_eq!(forecast, vec![1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_projection_round_half_up() {
        let state = SmoothingState { level: 1.0, trend: 0.5 };
        // 1.5 → 2, 2.0 → 2, 2.5 → 3
        assert_eq!(project(state, 3), vec![2, 2, 3]);
    }
}
