//! Cognitive behavior signals
//!
//! Combines the four per-day metrics structs into composite scores via fixed
//! weighted formulas. The normalization denominators are calibration
//! constants shared with the trained model; changing them changes the
//! product's behavior, not just its implementation.

use crate::metrics::interaction::InteractionMetrics;
use crate::metrics::stability::StabilityMetrics;
use crate::metrics::temporal::TemporalMetrics;
use crate::metrics::volume::UsageVolumeMetrics;
use serde::{Deserialize, Serialize};

/// Session length (minutes) treated as fully focused
const MAX_FOCUS_SESSION_MINUTES: f64 = 20.0;
/// Switches per hour treated as fully fragmented
const MAX_SWITCH_RATE_PER_HOUR: f64 = 60.0;
/// Daily screen time (minutes) treated as maximum intensity (8 hours)
const INTENSITY_CEILING_MINUTES: f64 = 480.0;

/// Composite cognitive scores for one day, all in 0-1
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CognitiveSignals {
    /// How fragmented usage was: short sessions, rapid switching, reopens
    pub usage_fragmentation_score: f64,
    /// How scattered attention was across apps and days
    pub distraction_load_index: f64,
    /// How rigid the daily routine was
    pub routine_rigidity_score: f64,
    /// How entrenched/repetitive usage was
    pub habit_strength_index: f64,
}

/// Calculator for [`CognitiveSignals`]
pub struct CognitiveSignalsCalculator;

impl CognitiveSignalsCalculator {
    /// Combine the four metrics structs into composite scores.
    ///
    /// Formulas (weights are exact contract, not tunable defaults):
    ///
    /// ```text
    /// fragmentation = 0.4 * (1 - clamp(avg_session/20)) + 0.4 * clamp(switch_rate/60) + 0.2 * reopen_ratio
    /// distraction   = 0.5 * fragmentation + 0.3 * diversity + 0.2 * volatility
    /// rigidity      = 0.4 * similarity + 0.3 * (1 - entropy) + 0.3 * top_app_ratio
    /// habit         = 0.4 * rigidity + 0.3 * reentry + 0.3 * clamp(total/480)
    /// ```
    pub fn derive(
        volume: &UsageVolumeMetrics,
        temporal: &TemporalMetrics,
        interaction: &InteractionMetrics,
        stability: &StabilityMetrics,
    ) -> CognitiveSignals {
        let focus_term =
            1.0 - (volume.avg_session_length_minutes / MAX_FOCUS_SESSION_MINUTES).clamp(0.0, 1.0);
        let switch_term = (interaction.switch_rate / MAX_SWITCH_RATE_PER_HOUR).clamp(0.0, 1.0);

        let usage_fragmentation_score =
            (0.4 * focus_term + 0.4 * switch_term + 0.2 * interaction.reopen_ratio)
                .clamp(0.0, 1.0);

        let distraction_load_index = (0.5 * usage_fragmentation_score
            + 0.3 * interaction.app_diversity_ratio
            + 0.2 * stability.volatility_score)
            .clamp(0.0, 1.0);

        let routine_rigidity_score = (0.4 * stability.day_similarity_score
            + 0.3 * (1.0 - temporal.time_window_entropy)
            + 0.3 * volume.top_app_ratio)
            .clamp(0.0, 1.0);

        let intensity_term =
            (volume.total_screen_time_minutes / INTENSITY_CEILING_MINUTES).clamp(0.0, 1.0);
        let habit_strength_index = (0.4 * routine_rigidity_score
            + 0.3 * interaction.top_app_reentry_ratio
            + 0.3 * intensity_term)
            .clamp(0.0, 1.0);

        CognitiveSignals {
            usage_fragmentation_score,
            distraction_load_index,
            routine_rigidity_score,
            habit_strength_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(total: f64, avg: f64, top_ratio: f64) -> UsageVolumeMetrics {
        UsageVolumeMetrics {
            total_screen_time_minutes: total,
            avg_session_length_minutes: avg,
            top_app_ratio: top_ratio,
            ..Default::default()
        }
    }

    fn interaction(switch_rate: f64, reopen: f64, diversity: f64, reentry: f64) -> InteractionMetrics {
        InteractionMetrics {
            switch_rate,
            reopen_ratio: reopen,
            app_diversity_ratio: diversity,
            top_app_reentry_ratio: reentry,
            ..Default::default()
        }
    }

    fn temporal(entropy: f64) -> TemporalMetrics {
        TemporalMetrics {
            time_window_entropy: entropy,
            ..Default::default()
        }
    }

    #[test]
    fn test_fragmentation_formula() {
        // avg 10 min -> focus term 0.5; 30 switches/hr -> 0.5; reopen 0.5.
        let signals = CognitiveSignalsCalculator::derive(
            &volume(100.0, 10.0, 0.0),
            &temporal(0.0),
            &interaction(30.0, 0.5, 0.0, 0.0),
            &StabilityMetrics {
                day_similarity_score: 0.0,
                ..StabilityMetrics::neutral()
            },
        );
        let expected = 0.4 * 0.5 + 0.4 * 0.5 + 0.2 * 0.5;
        assert!((signals.usage_fragmentation_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fragmentation_saturates_at_ceilings() {
        // Long sessions and extreme switching saturate their clamps.
        let signals = CognitiveSignalsCalculator::derive(
            &volume(100.0, 45.0, 0.0),
            &temporal(0.0),
            &interaction(200.0, 1.0, 0.0, 0.0),
            &StabilityMetrics::neutral(),
        );
        let expected = 0.4 * 0.0 + 0.4 * 1.0 + 0.2 * 1.0;
        assert!((signals.usage_fragmentation_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rigidity_formula() {
        let stability = StabilityMetrics {
            day_similarity_score: 0.8,
            ..StabilityMetrics::neutral()
        };
        let signals = CognitiveSignalsCalculator::derive(
            &volume(0.0, 0.0, 0.6),
            &temporal(0.5),
            &interaction(0.0, 0.0, 0.0, 0.0),
            &stability,
        );
        let expected = 0.4 * 0.8 + 0.3 * 0.5 + 0.3 * 0.6;
        assert!((signals.routine_rigidity_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_habit_strength_intensity_ceiling() {
        // 480 minutes of screen time hits the intensity ceiling exactly.
        let signals = CognitiveSignalsCalculator::derive(
            &volume(480.0, 0.0, 0.0),
            &temporal(1.0),
            &interaction(0.0, 0.0, 0.0, 1.0),
            &StabilityMetrics {
                day_similarity_score: 0.0,
                ..StabilityMetrics::neutral()
            },
        );
        let expected = 0.4 * 0.0 + 0.3 * 1.0 + 0.3 * 1.0;
        assert!((signals.habit_strength_index - expected).abs() < 1e-9);
    }

    #[test]
    fn test_all_scores_in_range() {
        let stability = StabilityMetrics {
            screen_time_delta_ratio: 5.0,
            top_app_change_flag: 1.0,
            time_window_shift_score: 1.0,
            day_similarity_score: 0.1,
            volatility_score: 1.0,
        };
        let signals = CognitiveSignalsCalculator::derive(
            &volume(2000.0, 1.0, 1.0),
            &temporal(0.0),
            &interaction(500.0, 1.0, 1.0, 1.0),
            &stability,
        );
        for score in [
            signals.usage_fragmentation_score,
            signals.distraction_load_index,
            signals.routine_rigidity_score,
            signals.habit_strength_index,
        ] {
            assert!((0.0..=1.0).contains(&score));
        }
    }
}
