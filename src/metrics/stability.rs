//! Day-over-day stability metrics
//!
//! Compares today's features against yesterday's. With no prior day the
//! calculator returns a neutral default (similarity 1, everything else 0):
//! absent evidence, the user is assumed stable. This is policy, not a
//! missing-data error.

use crate::types::DailyBehaviorFeatures;
use serde::{Deserialize, Serialize};

/// Weight of the capped screen-time delta in the volatility score
const VOLATILITY_DELTA_WEIGHT: f64 = 0.3;
/// Weight of the top-app change flag
const VOLATILITY_APP_CHANGE_WEIGHT: f64 = 0.2;
/// Weight of the temporal shift score
const VOLATILITY_SHIFT_WEIGHT: f64 = 0.3;
/// Weight of the dissimilarity term
const VOLATILITY_DISSIMILARITY_WEIGHT: f64 = 0.2;

/// Stability statistics for one day relative to the previous day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMetrics {
    /// (today - yesterday) / yesterday screen time. 1.0 when yesterday was
    /// zero and today is not. Returned uncapped; capped to [-1, 1] only
    /// inside the volatility score.
    pub screen_time_delta_ratio: f64,
    /// 1 if the top app changed since yesterday, else 0 (0 if either name
    /// is absent)
    pub top_app_change_flag: f64,
    /// Euclidean distance between the two days' window-ratio vectors,
    /// normalized by sqrt(2) and clamped to 0-1
    pub time_window_shift_score: f64,
    /// Cosine similarity between the two full feature vectors (0 on zero
    /// norm), clamped to 0-1
    pub day_similarity_score: f64,
    /// Weighted day-over-day volatility, clamped to 0-1
    pub volatility_score: f64,
}

impl StabilityMetrics {
    /// Neutral result used when no prior day exists.
    pub fn neutral() -> Self {
        Self {
            screen_time_delta_ratio: 0.0,
            top_app_change_flag: 0.0,
            time_window_shift_score: 0.0,
            day_similarity_score: 1.0,
            volatility_score: 0.0,
        }
    }
}

impl Default for StabilityMetrics {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Calculator for [`StabilityMetrics`]
pub struct StabilityMetricsCalculator;

impl StabilityMetricsCalculator {
    /// Compare today's features against yesterday's.
    ///
    /// Top-app names travel separately because the numeric feature vector
    /// does not carry them.
    pub fn compute(
        today: &DailyBehaviorFeatures,
        yesterday: Option<&DailyBehaviorFeatures>,
        today_top_app: Option<&str>,
        yesterday_top_app: Option<&str>,
    ) -> StabilityMetrics {
        let yesterday = match yesterday {
            Some(y) => y,
            None => return StabilityMetrics::neutral(),
        };

        let screen_time_delta_ratio = screen_time_delta(
            today.total_screen_time_minutes,
            yesterday.total_screen_time_minutes,
        );
        let capped_delta = screen_time_delta_ratio.clamp(-1.0, 1.0);

        let top_app_change_flag = match (today_top_app, yesterday_top_app) {
            (Some(a), Some(b)) if a != b => 1.0,
            _ => 0.0,
        };

        let time_window_shift_score =
            window_shift(&today.window_ratios(), &yesterday.window_ratios());

        let day_similarity_score = cosine_similarity(&today.to_vec(), &yesterday.to_vec());

        let volatility_score = (VOLATILITY_DELTA_WEIGHT * capped_delta.abs()
            + VOLATILITY_APP_CHANGE_WEIGHT * top_app_change_flag
            + VOLATILITY_SHIFT_WEIGHT * time_window_shift_score
            + VOLATILITY_DISSIMILARITY_WEIGHT * (1.0 - day_similarity_score))
            .clamp(0.0, 1.0);

        StabilityMetrics {
            screen_time_delta_ratio,
            top_app_change_flag,
            time_window_shift_score,
            day_similarity_score,
            volatility_score,
        }
    }
}

/// Relative day-over-day change in screen time.
///
/// Yesterday zero and today positive is reported as 1.0 ("infinite increase
/// from zero"); both zero is 0.0.
fn screen_time_delta(today: f64, yesterday: f64) -> f64 {
    if yesterday == 0.0 {
        if today > 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        (today - yesterday) / yesterday
    }
}

/// Euclidean distance between two 4-bucket ratio vectors, normalized by
/// sqrt(2) (the maximum distance between two unit L1-normalized 4-vectors)
/// and clamped to 0-1.
fn window_shift(today: &[f64; 4], yesterday: &[f64; 4]) -> f64 {
    let distance: f64 = today
        .iter()
        .zip(yesterday.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt();
    (distance / std::f64::consts::SQRT_2).clamp(0.0, 1.0)
}

/// Cosine similarity between two equal-length vectors, 0 when either norm
/// is zero, clamped to 0-1.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn features_with(total: f64, ratios: [f64; 4]) -> DailyBehaviorFeatures {
        DailyBehaviorFeatures {
            total_screen_time_minutes: total,
            morning_usage_ratio: ratios[0],
            afternoon_usage_ratio: ratios[1],
            evening_usage_ratio: ratios[2],
            night_usage_ratio: ratios[3],
            ..Default::default()
        }
    }

    #[test]
    fn test_no_yesterday_is_neutral() {
        let today = features_with(900.0, [0.1, 0.2, 0.3, 0.4]);
        let metrics = StabilityMetricsCalculator::compute(&today, None, Some("a"), None);
        assert_eq!(metrics.day_similarity_score, 1.0);
        assert_eq!(metrics.volatility_score, 0.0);
        assert_eq!(metrics.screen_time_delta_ratio, 0.0);
    }

    #[test]
    fn test_delta_from_zero_yesterday() {
        let today = features_with(120.0, [1.0, 0.0, 0.0, 0.0]);
        let yesterday = features_with(0.0, [0.0, 0.0, 0.0, 0.0]);
        let metrics =
            StabilityMetricsCalculator::compute(&today, Some(&yesterday), Some("a"), Some("a"));
        assert_eq!(metrics.screen_time_delta_ratio, 1.0);
    }

    #[test]
    fn test_delta_is_returned_uncapped() {
        let today = features_with(300.0, [1.0, 0.0, 0.0, 0.0]);
        let yesterday = features_with(100.0, [1.0, 0.0, 0.0, 0.0]);
        let metrics =
            StabilityMetricsCalculator::compute(&today, Some(&yesterday), Some("a"), Some("a"));
        // Raw ratio is +2.0 even though volatility caps it at 1.0.
        assert!((metrics.screen_time_delta_ratio - 2.0).abs() < 1e-9);
        assert!(metrics.volatility_score <= 1.0);
    }

    #[test]
    fn test_top_app_change_flag() {
        let today = features_with(100.0, [1.0, 0.0, 0.0, 0.0]);
        let yesterday = today.clone();

        let changed =
            StabilityMetricsCalculator::compute(&today, Some(&yesterday), Some("a"), Some("b"));
        assert_eq!(changed.top_app_change_flag, 1.0);

        let same =
            StabilityMetricsCalculator::compute(&today, Some(&yesterday), Some("a"), Some("a"));
        assert_eq!(same.top_app_change_flag, 0.0);

        let missing =
            StabilityMetricsCalculator::compute(&today, Some(&yesterday), None, Some("b"));
        assert_eq!(missing.top_app_change_flag, 0.0);
    }

    #[test]
    fn test_window_shift_opposite_spikes() {
        // All-morning vs all-night: distance sqrt(2), normalized to 1.0.
        let today = features_with(100.0, [1.0, 0.0, 0.0, 0.0]);
        let yesterday = features_with(100.0, [0.0, 0.0, 0.0, 1.0]);
        let metrics =
            StabilityMetricsCalculator::compute(&today, Some(&yesterday), Some("a"), Some("a"));
        assert!((metrics.time_window_shift_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_days_are_similar() {
        let today = features_with(100.0, [0.25, 0.25, 0.25, 0.25]);
        let metrics =
            StabilityMetricsCalculator::compute(&today, Some(&today.clone()), Some("a"), Some("a"));
        assert!((metrics.day_similarity_score - 1.0).abs() < 1e-9);
        assert!(metrics.volatility_score.abs() < 1e-9);
    }

    #[test]
    fn test_zero_norm_yesterday_similarity_is_zero() {
        let today = features_with(100.0, [1.0, 0.0, 0.0, 0.0]);
        let yesterday = DailyBehaviorFeatures::default();
        let metrics =
            StabilityMetricsCalculator::compute(&today, Some(&yesterday), Some("a"), Some("a"));
        assert_eq!(metrics.day_similarity_score, 0.0);
    }
}
