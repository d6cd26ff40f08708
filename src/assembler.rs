//! Daily feature assembly
//!
//! Orchestrates the volume, temporal, interaction, stability, and cognitive
//! calculators into one [`DailyBehaviorFeatures`] per calendar day.
//!
//! Several feature slots are deliberate placeholders or proxies carried over
//! from the original product (short/long session counts, offsets, variance
//! fixed at 0; derived focus as 1 - distraction; circadian alignment as
//! 1 - night ratio; doomscrolling risk reusing habit strength). Downstream
//! consumers, the target extractor in particular, depend on these exact
//! mappings, so they must not be "fixed" here.

use crate::metrics::{
    CognitiveSignals, CognitiveSignalsCalculator, InteractionMetricsCalculator, StabilityMetrics,
    StabilityMetricsCalculator, TemporalMetricsCalculator, UsageVolumeCalculator,
};
use crate::types::{AppSession, DailyBehaviorFeatures};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One assembled day: the feature vector plus the top-app name that the next
/// day's stability computation needs (app names are not part of the numeric
/// vector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledDay {
    pub date: NaiveDate,
    pub features: DailyBehaviorFeatures,
    pub top_app: Option<String>,
}

/// Assembler for [`DailyBehaviorFeatures`]
pub struct DailyFeatureAssembler;

impl DailyFeatureAssembler {
    /// Assemble one day's feature vector from its sessions.
    ///
    /// `yesterday` and `yesterday_top_app` feed the stability block; both
    /// absent means the neutral "assume stability" default applies.
    ///
    /// Deterministic: identical input yields a bit-identical result.
    pub fn assemble(
        date: NaiveDate,
        sessions: &[AppSession],
        yesterday: Option<&DailyBehaviorFeatures>,
        yesterday_top_app: Option<&str>,
    ) -> AssembledDay {
        let volume = UsageVolumeCalculator::compute(sessions);
        let temporal = TemporalMetricsCalculator::compute(sessions, date);
        let interaction = InteractionMetricsCalculator::compute(sessions);

        // Day similarity needs today's full vector, which in turn contains the
        // stability block. First pass: assemble with the neutral stability
        // block and the cognitive signals it induces. Second pass: compute the
        // real stability against that preliminary vector, re-derive cognitive
        // signals, and splice both in.
        let neutral = StabilityMetrics::neutral();
        let preliminary_cognitive =
            CognitiveSignalsCalculator::derive(&volume, &temporal, &interaction, &neutral);
        let preliminary = build_features(
            &volume,
            &temporal,
            &interaction,
            &neutral,
            &preliminary_cognitive,
        );

        let stability = StabilityMetricsCalculator::compute(
            &preliminary,
            yesterday,
            volume.top_app_name(),
            yesterday_top_app,
        );
        let cognitive =
            CognitiveSignalsCalculator::derive(&volume, &temporal, &interaction, &stability);

        let features = build_features(&volume, &temporal, &interaction, &stability, &cognitive);

        AssembledDay {
            date,
            features,
            top_app: volume.top_app_name().map(|s| s.to_string()),
        }
    }

    /// Assemble a chronological history of (date, sessions) days, threading
    /// each day's result into the next day's stability computation.
    ///
    /// Days are processed in ascending date order regardless of input order.
    /// Returns a date-keyed feature map suitable for windowing.
    pub fn assemble_history(
        days: &[(NaiveDate, Vec<AppSession>)],
    ) -> HashMap<NaiveDate, DailyBehaviorFeatures> {
        let mut ordered: Vec<&(NaiveDate, Vec<AppSession>)> = days.iter().collect();
        ordered.sort_by_key(|(date, _)| *date);

        let mut result = HashMap::new();
        let mut previous: Option<AssembledDay> = None;

        for (date, sessions) in ordered {
            let yesterday = previous
                .as_ref()
                .filter(|p| p.date.succ_opt() == Some(*date));
            let assembled = Self::assemble(
                *date,
                sessions,
                yesterday.map(|p| &p.features),
                yesterday.and_then(|p| p.top_app.as_deref()),
            );
            result.insert(*date, assembled.features.clone());
            previous = Some(assembled);
        }

        result
    }
}

fn build_features(
    volume: &crate::metrics::UsageVolumeMetrics,
    temporal: &crate::metrics::TemporalMetrics,
    interaction: &crate::metrics::InteractionMetrics,
    stability: &StabilityMetrics,
    cognitive: &CognitiveSignals,
) -> DailyBehaviorFeatures {
    DailyBehaviorFeatures {
        total_screen_time_minutes: volume.total_screen_time_minutes,
        session_count: volume.session_count as f64,
        avg_session_length_minutes: volume.avg_session_length_minutes,
        max_session_length_minutes: volume.max_session_length_minutes,
        short_session_count: 0.0,
        long_session_count: 0.0,

        morning_usage_ratio: temporal.morning_ratio,
        afternoon_usage_ratio: temporal.afternoon_ratio,
        evening_usage_ratio: temporal.evening_ratio,
        night_usage_ratio: temporal.night_ratio,
        time_window_entropy: temporal.time_window_entropy,
        circadian_alignment_score: 1.0 - temporal.night_ratio,
        wake_time_offset_minutes: 0.0,
        sleep_time_offset_minutes: 0.0,

        unique_app_count: interaction.unique_app_count as f64,
        app_diversity_ratio: interaction.app_diversity_ratio,
        app_switch_rate: interaction.switch_rate,
        app_reopen_ratio: interaction.reopen_ratio,
        top_app_usage_ratio: volume.top_app_ratio,
        top_app_reentry_ratio: interaction.top_app_reentry_ratio,
        launcher_usage_ratio: interaction.launcher_usage_ratio,
        avg_inter_session_interval_minutes: 0.0,

        screen_time_delta_ratio: stability.screen_time_delta_ratio,
        top_app_change_flag: stability.top_app_change_flag,
        time_window_shift_score: stability.time_window_shift_score,
        day_similarity_score: stability.day_similarity_score,
        volatility_score: stability.volatility_score,
        session_length_variance: 0.0,

        usage_fragmentation_score: cognitive.usage_fragmentation_score,
        distraction_load_index: cognitive.distraction_load_index,
        routine_rigidity_score: cognitive.routine_rigidity_score,
        habit_strength_index: cognitive.habit_strength_index,
        derived_focus_score: 1.0 - cognitive.distraction_load_index,
        doomscrolling_risk: cognitive.habit_strength_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn sessions_for(day: u32) -> Vec<AppSession> {
        vec![
            AppSession::new(
                "com.social.app",
                Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, day, 9, 45, 0).unwrap(),
            ),
            AppSession::new(
                "com.mail.app",
                Utc.with_ymd_and_hms(2024, 3, day, 13, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, day, 13, 20, 0).unwrap(),
            ),
            AppSession::new(
                "com.social.app",
                Utc.with_ymd_and_hms(2024, 3, day, 21, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, day, 21, 30, 0).unwrap(),
            ),
        ]
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let sessions = sessions_for(1);
        let first = DailyFeatureAssembler::assemble(date(), &sessions, None, None);
        let second = DailyFeatureAssembler::assemble(date(), &sessions, None, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_placeholder_slots_are_zero() {
        let assembled = DailyFeatureAssembler::assemble(date(), &sessions_for(1), None, None);
        let f = &assembled.features;
        assert_eq!(f.short_session_count, 0.0);
        assert_eq!(f.long_session_count, 0.0);
        assert_eq!(f.wake_time_offset_minutes, 0.0);
        assert_eq!(f.sleep_time_offset_minutes, 0.0);
        assert_eq!(f.avg_inter_session_interval_minutes, 0.0);
        assert_eq!(f.session_length_variance, 0.0);
    }

    #[test]
    fn test_proxy_mappings() {
        let assembled = DailyFeatureAssembler::assemble(date(), &sessions_for(1), None, None);
        let f = &assembled.features;
        assert!((f.derived_focus_score - (1.0 - f.distraction_load_index)).abs() < 1e-9);
        assert!((f.circadian_alignment_score - (1.0 - f.night_usage_ratio)).abs() < 1e-9);
        assert_eq!(f.doomscrolling_risk, f.habit_strength_index);
    }

    #[test]
    fn test_no_yesterday_uses_neutral_stability() {
        let assembled = DailyFeatureAssembler::assemble(date(), &sessions_for(1), None, None);
        assert_eq!(assembled.features.day_similarity_score, 1.0);
        assert_eq!(assembled.features.volatility_score, 0.0);
    }

    #[test]
    fn test_top_app_reported() {
        let assembled = DailyFeatureAssembler::assemble(date(), &sessions_for(1), None, None);
        assert_eq!(assembled.top_app.as_deref(), Some("com.social.app"));
    }

    #[test]
    fn test_empty_day_is_valid() {
        let assembled = DailyFeatureAssembler::assemble(date(), &[], None, None);
        assert_eq!(assembled.features.total_screen_time_minutes, 0.0);
        assert_eq!(assembled.top_app, None);
        // Neutral stability still applies with no history.
        assert_eq!(assembled.features.day_similarity_score, 1.0);
    }

    #[test]
    fn test_history_threads_yesterday() {
        let days = vec![
            (date(), sessions_for(1)),
            (date().succ_opt().unwrap(), sessions_for(2)),
        ];
        let map = DailyFeatureAssembler::assemble_history(&days);

        let day1 = &map[&date()];
        let day2 = &map[&date().succ_opt().unwrap()];
        // First day has no history; second day was compared against the first.
        assert_eq!(day1.day_similarity_score, 1.0);
        assert!(day2.day_similarity_score > 0.0);
        assert!(day2.day_similarity_score < 1.0 + 1e-9);
        // Same sessions both days: top app unchanged.
        assert_eq!(day2.top_app_change_flag, 0.0);
    }

    #[test]
    fn test_history_gap_resets_to_neutral() {
        let gap_day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let days = vec![(date(), sessions_for(1)), (gap_day, sessions_for(5))];
        let map = DailyFeatureAssembler::assemble_history(&days);
        // March 5 is not adjacent to March 1, so it gets no yesterday.
        assert_eq!(map[&gap_day].day_similarity_score, 1.0);
        assert_eq!(map[&gap_day].volatility_score, 0.0);
    }
}
