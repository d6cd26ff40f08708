//! Core types for the HabitLens pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: usage sessions, daily feature vectors, model outputs, and weekly
//! summaries.

use crate::error::AnalyticsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of scalar fields in a [`DailyBehaviorFeatures`] vector.
///
/// This is a wire contract shared with the external inference/training engine
/// and must never change without a version bump.
pub const FEATURE_DIMENSION: usize = 34;

/// One continuous foreground interval for a single app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSession {
    /// Package or display name of the app
    pub app_name: String,
    /// Foreground start time (UTC)
    pub start_time: DateTime<Utc>,
    /// Foreground end time (UTC)
    pub end_time: DateTime<Utc>,
}

impl AppSession {
    /// Create a session from raw log fields.
    pub fn new(app_name: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            app_name: app_name.into(),
            start_time,
            end_time,
        }
    }

    /// Session duration in minutes.
    ///
    /// May be negative for malformed log entries; calculators clamp to zero.
    pub fn duration_minutes(&self) -> f64 {
        (self.end_time - self.start_time).num_seconds() as f64 / 60.0
    }
}

/// One day's behavior, reduced to 34 ordered scalar fields.
///
/// Fields are grouped into five semantic blocks: volume/intensity (6),
/// temporal structure (8), interaction (8), stability (6), and cognitive
/// signals (6). The field order is load-bearing: [`DailyBehaviorFeatures::to_vec`]
/// flattens in declaration order and every downstream consumer (windowing,
/// training, inference) depends on it.
///
/// Several slots are deliberate placeholders or proxies carried over from the
/// original product for behavioral compatibility; see the field notes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyBehaviorFeatures {
    // -- Volume / intensity --
    /// Total foreground minutes across all apps
    pub total_screen_time_minutes: f64,
    /// Number of sessions
    pub session_count: f64,
    /// Average session length (minutes)
    pub avg_session_length_minutes: f64,
    /// Longest session (minutes)
    pub max_session_length_minutes: f64,
    /// Placeholder, always 0
    pub short_session_count: f64,
    /// Placeholder, always 0
    pub long_session_count: f64,

    // -- Temporal structure --
    /// Share of usage between 05:00 and 12:00
    pub morning_usage_ratio: f64,
    /// Share of usage between 12:00 and 17:00
    pub afternoon_usage_ratio: f64,
    /// Share of usage between 17:00 and 22:00
    pub evening_usage_ratio: f64,
    /// Share of usage between 22:00 and 05:00
    pub night_usage_ratio: f64,
    /// Normalized Shannon entropy over the four window ratios (0-1)
    pub time_window_entropy: f64,
    /// Proxy: 1 - night_usage_ratio
    pub circadian_alignment_score: f64,
    /// Placeholder, always 0
    pub wake_time_offset_minutes: f64,
    /// Placeholder, always 0
    pub sleep_time_offset_minutes: f64,

    // -- Interaction --
    /// Number of distinct apps used
    pub unique_app_count: f64,
    /// Unique apps / session count (0-1)
    pub app_diversity_ratio: f64,
    /// App switches per hour of screen time
    pub app_switch_rate: f64,
    /// Quick reopens / (session count - 1) (0-1)
    pub app_reopen_ratio: f64,
    /// Top app minutes / total minutes (0-1)
    pub top_app_usage_ratio: f64,
    /// Switches landing back on the top app / total switches (0-1)
    pub top_app_reentry_ratio: f64,
    /// Minutes in launcher-like apps / total minutes (0-1)
    pub launcher_usage_ratio: f64,
    /// Placeholder, always 0
    pub avg_inter_session_interval_minutes: f64,

    // -- Stability (vs. previous day) --
    /// (today - yesterday) / yesterday screen time, uncapped
    pub screen_time_delta_ratio: f64,
    /// 1 if the top app changed since yesterday, else 0
    pub top_app_change_flag: f64,
    /// Normalized Euclidean shift of the four window ratios (0-1)
    pub time_window_shift_score: f64,
    /// Cosine similarity of the two full feature vectors (0-1)
    pub day_similarity_score: f64,
    /// Weighted day-over-day volatility (0-1)
    pub volatility_score: f64,
    /// Placeholder, always 0
    pub session_length_variance: f64,

    // -- Cognitive signals --
    /// Composite fragmentation score (0-1)
    pub usage_fragmentation_score: f64,
    /// Composite distraction load (0-1)
    pub distraction_load_index: f64,
    /// Composite routine rigidity (0-1)
    pub routine_rigidity_score: f64,
    /// Composite habit strength (0-1)
    pub habit_strength_index: f64,
    /// Proxy: 1 - distraction_load_index
    pub derived_focus_score: f64,
    /// Proxy: reuses habit_strength_index
    pub doomscrolling_risk: f64,
}

impl DailyBehaviorFeatures {
    /// Flatten to the 34-length ordered float vector consumed by the
    /// inference/training engine.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.total_screen_time_minutes,
            self.session_count,
            self.avg_session_length_minutes,
            self.max_session_length_minutes,
            self.short_session_count,
            self.long_session_count,
            self.morning_usage_ratio,
            self.afternoon_usage_ratio,
            self.evening_usage_ratio,
            self.night_usage_ratio,
            self.time_window_entropy,
            self.circadian_alignment_score,
            self.wake_time_offset_minutes,
            self.sleep_time_offset_minutes,
            self.unique_app_count,
            self.app_diversity_ratio,
            self.app_switch_rate,
            self.app_reopen_ratio,
            self.top_app_usage_ratio,
            self.top_app_reentry_ratio,
            self.launcher_usage_ratio,
            self.avg_inter_session_interval_minutes,
            self.screen_time_delta_ratio,
            self.top_app_change_flag,
            self.time_window_shift_score,
            self.day_similarity_score,
            self.volatility_score,
            self.session_length_variance,
            self.usage_fragmentation_score,
            self.distraction_load_index,
            self.routine_rigidity_score,
            self.habit_strength_index,
            self.derived_focus_score,
            self.doomscrolling_risk,
        ]
    }

    /// Rebuild a feature struct from a flattened vector (store boundary).
    pub fn from_vec(values: &[f64]) -> Result<Self, AnalyticsError> {
        if values.len() != FEATURE_DIMENSION {
            return Err(AnalyticsError::ShapeMismatch {
                expected: format!("{FEATURE_DIMENSION} features"),
                actual: format!("{} features", values.len()),
            });
        }
        Ok(Self {
            total_screen_time_minutes: values[0],
            session_count: values[1],
            avg_session_length_minutes: values[2],
            max_session_length_minutes: values[3],
            short_session_count: values[4],
            long_session_count: values[5],
            morning_usage_ratio: values[6],
            afternoon_usage_ratio: values[7],
            evening_usage_ratio: values[8],
            night_usage_ratio: values[9],
            time_window_entropy: values[10],
            circadian_alignment_score: values[11],
            wake_time_offset_minutes: values[12],
            sleep_time_offset_minutes: values[13],
            unique_app_count: values[14],
            app_diversity_ratio: values[15],
            app_switch_rate: values[16],
            app_reopen_ratio: values[17],
            top_app_usage_ratio: values[18],
            top_app_reentry_ratio: values[19],
            launcher_usage_ratio: values[20],
            avg_inter_session_interval_minutes: values[21],
            screen_time_delta_ratio: values[22],
            top_app_change_flag: values[23],
            time_window_shift_score: values[24],
            day_similarity_score: values[25],
            volatility_score: values[26],
            session_length_variance: values[27],
            usage_fragmentation_score: values[28],
            distraction_load_index: values[29],
            routine_rigidity_score: values[30],
            habit_strength_index: values[31],
            derived_focus_score: values[32],
            doomscrolling_risk: values[33],
        })
    }

    /// The four temporal window ratios in scan order
    /// (morning, afternoon, evening, night).
    pub fn window_ratios(&self) -> [f64; 4] {
        [
            self.morning_usage_ratio,
            self.afternoon_usage_ratio,
            self.evening_usage_ratio,
            self.night_usage_ratio,
        ]
    }
}

/// Stability classification emitted by the behavior model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StabilityLabel {
    Stable,
    Drifting,
    Chaotic,
}

impl StabilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StabilityLabel::Stable => "Stable",
            StabilityLabel::Drifting => "Drifting",
            StabilityLabel::Chaotic => "Chaotic",
        }
    }
}

/// One day's output from the external inference collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    /// How habitual/entrenched the day's usage was (0-1)
    pub habituality_score: f64,
    /// How distracted/fragmented the day's usage was (0-1)
    pub distraction_score: f64,
    /// Stability classification
    pub stability_label: StabilityLabel,
}

/// Direction of the habituality trend over a week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLabel {
    Increasing,
    Decreasing,
    Flat,
    InsufficientData,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Increasing => "Increasing",
            TrendLabel::Decreasing => "Decreasing",
            TrendLabel::Flat => "Flat",
            TrendLabel::InsufficientData => "Insufficient Data",
        }
    }
}

/// Aggregated view of a week of model outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBehaviorSummary {
    /// Mean habituality score (0-1)
    pub average_habituality: f64,
    /// Mean distraction score (0-1)
    pub average_distraction: f64,
    /// Most frequent stability label (first-seen wins ties)
    pub dominant_stability: StabilityLabel,
    /// Habituality trend across the week
    pub habituality_trend: TrendLabel,
}

/// Flattened training pairs assembled from contiguous feature windows.
///
/// `inputs[i]` has length `window_size * feature_dimension`; `targets[i]`
/// has length 2 (habituality proxy, distraction). Read-only after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDataset {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
    pub window_size: usize,
    pub feature_dimension: usize,
    pub sample_count: usize,
}

impl TrainingDataset {
    /// An empty dataset for the given window size (no valid windows found).
    pub fn empty(window_size: usize) -> Self {
        Self {
            inputs: Vec::new(),
            targets: Vec::new(),
            window_size,
            feature_dimension: FEATURE_DIMENSION,
            sample_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_duration() {
        let session = AppSession::new(
            "com.example.app",
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        );
        assert!((session.duration_minutes() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_duration_is_preserved_raw() {
        let session = AppSession::new(
            "com.example.app",
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        );
        assert!(session.duration_minutes() < 0.0);
    }

    #[test]
    fn test_feature_vector_dimension() {
        let features = DailyBehaviorFeatures::default();
        assert_eq!(features.to_vec().len(), FEATURE_DIMENSION);
    }

    #[test]
    fn test_feature_vector_round_trip() {
        let mut features = DailyBehaviorFeatures::default();
        features.total_screen_time_minutes = 245.5;
        features.night_usage_ratio = 0.4;
        features.day_similarity_score = 0.92;
        features.doomscrolling_risk = 0.71;

        let rebuilt = DailyBehaviorFeatures::from_vec(&features.to_vec()).unwrap();
        assert_eq!(rebuilt, features);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = DailyBehaviorFeatures::from_vec(&[0.0; 10]).unwrap_err();
        match err {
            AnalyticsError::ShapeMismatch { expected, actual } => {
                assert!(expected.contains("34"));
                assert!(actual.contains("10"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_stability_label_serialization() {
        let json = serde_json::to_string(&StabilityLabel::Drifting).unwrap();
        assert_eq!(json, "\"Drifting\"");
        let parsed: StabilityLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, StabilityLabel::Drifting);
    }

    #[test]
    fn test_trend_label_display_form() {
        assert_eq!(TrendLabel::InsufficientData.as_str(), "Insufficient Data");
    }
}
