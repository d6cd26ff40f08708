//! Weekly behavior analysis
//!
//! Aggregates a chronological list of per-day model outputs into a weekly
//! summary: average scores, the dominant stability mode, and the habituality
//! trend.

use crate::types::{ModelOutput, StabilityLabel, TrendLabel, WeeklyBehaviorSummary};

/// Minimum half-to-half habituality difference to call a trend
const TREND_THRESHOLD: f64 = 0.05;

/// Analyzer for [`WeeklyBehaviorSummary`]
pub struct WeeklyAnalyzer;

impl WeeklyAnalyzer {
    /// Summarize a week of model outputs, ordered oldest to newest.
    ///
    /// An empty list yields the "insufficient data" sentinel summary rather
    /// than an error.
    pub fn analyze(outputs: &[ModelOutput]) -> WeeklyBehaviorSummary {
        if outputs.is_empty() {
            return WeeklyBehaviorSummary {
                average_habituality: 0.0,
                average_distraction: 0.0,
                dominant_stability: StabilityLabel::Stable,
                habituality_trend: TrendLabel::InsufficientData,
            };
        }

        let count = outputs.len() as f64;
        let average_habituality =
            outputs.iter().map(|o| o.habituality_score).sum::<f64>() / count;
        let average_distraction =
            outputs.iter().map(|o| o.distraction_score).sum::<f64>() / count;

        WeeklyBehaviorSummary {
            average_habituality,
            average_distraction,
            dominant_stability: dominant_stability(outputs),
            habituality_trend: habituality_trend(outputs),
        }
    }
}

/// Mode of the stability labels. Ties go to the first-seen label because the
/// max count is tracked with a strict greater-than.
fn dominant_stability(outputs: &[ModelOutput]) -> StabilityLabel {
    let mut seen: Vec<(StabilityLabel, u32)> = Vec::new();
    for output in outputs {
        match seen.iter_mut().find(|(label, _)| *label == output.stability_label) {
            Some((_, count)) => *count += 1,
            None => seen.push((output.stability_label, 1)),
        }
    }

    let mut dominant = outputs[0].stability_label;
    let mut best = 0u32;
    for (label, count) in seen {
        if count > best {
            best = count;
            dominant = label;
        }
    }
    dominant
}

/// Habituality trend across the week.
///
/// Requires at least two outputs. The list splits at floor(len/2); on
/// odd-length lists the midpoint belongs to the recent half, a deliberate
/// recency bias. The half-mean difference is compared against the 0.05
/// threshold.
fn habituality_trend(outputs: &[ModelOutput]) -> TrendLabel {
    if outputs.len() < 2 {
        return TrendLabel::InsufficientData;
    }

    let mid = outputs.len() / 2;
    let first_half = &outputs[..mid];
    let second_half = &outputs[mid..];

    let mean = |half: &[ModelOutput]| {
        half.iter().map(|o| o.habituality_score).sum::<f64>() / half.len() as f64
    };
    let diff = mean(second_half) - mean(first_half);

    if diff > TREND_THRESHOLD {
        TrendLabel::Increasing
    } else if diff < -TREND_THRESHOLD {
        TrendLabel::Decreasing
    } else {
        TrendLabel::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(habituality: f64, distraction: f64, label: StabilityLabel) -> ModelOutput {
        ModelOutput {
            habituality_score: habituality,
            distraction_score: distraction,
            stability_label: label,
        }
    }

    #[test]
    fn test_empty_is_insufficient_data() {
        let summary = WeeklyAnalyzer::analyze(&[]);
        assert_eq!(summary.habituality_trend, TrendLabel::InsufficientData);
        assert_eq!(summary.average_habituality, 0.0);
        assert_eq!(summary.average_distraction, 0.0);
    }

    #[test]
    fn test_single_output_averages_but_no_trend() {
        let summary = WeeklyAnalyzer::analyze(&[output(0.7, 0.3, StabilityLabel::Drifting)]);
        assert!((summary.average_habituality - 0.7).abs() < 1e-9);
        assert_eq!(summary.dominant_stability, StabilityLabel::Drifting);
        assert_eq!(summary.habituality_trend, TrendLabel::InsufficientData);
    }

    #[test]
    fn test_even_split_increasing_trend() {
        // [0.2, 0.2, 0.2, 0.8, 0.8, 0.8]: second-half mean 0.8 - 0.2 = 0.6.
        let outputs: Vec<ModelOutput> = [0.2, 0.2, 0.2, 0.8, 0.8, 0.8]
            .iter()
            .map(|h| output(*h, 0.5, StabilityLabel::Stable))
            .collect();
        let summary = WeeklyAnalyzer::analyze(&outputs);
        assert_eq!(summary.habituality_trend, TrendLabel::Increasing);
        assert!((summary.average_habituality - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_decreasing_trend() {
        let outputs: Vec<ModelOutput> = [0.9, 0.8, 0.3, 0.2]
            .iter()
            .map(|h| output(*h, 0.5, StabilityLabel::Stable))
            .collect();
        let summary = WeeklyAnalyzer::analyze(&outputs);
        assert_eq!(summary.habituality_trend, TrendLabel::Decreasing);
    }

    #[test]
    fn test_flat_within_threshold() {
        let outputs: Vec<ModelOutput> = [0.50, 0.52, 0.51, 0.53]
            .iter()
            .map(|h| output(*h, 0.5, StabilityLabel::Stable))
            .collect();
        let summary = WeeklyAnalyzer::analyze(&outputs);
        assert_eq!(summary.habituality_trend, TrendLabel::Flat);
    }

    #[test]
    fn test_odd_length_midpoint_in_recent_half() {
        // len 5 splits 2/3, midpoint in the recent half:
        // [0.8, 0.8] vs [0.8, 0.2, 0.2], diff = 0.4 - 0.8 = -0.4.
        let outputs: Vec<ModelOutput> = [0.8, 0.8, 0.8, 0.2, 0.2]
            .iter()
            .map(|h| output(*h, 0.5, StabilityLabel::Stable))
            .collect();
        let summary = WeeklyAnalyzer::analyze(&outputs);
        assert_eq!(summary.habituality_trend, TrendLabel::Decreasing);
    }

    #[test]
    fn test_dominant_stability_mode() {
        let outputs = vec![
            output(0.5, 0.5, StabilityLabel::Chaotic),
            output(0.5, 0.5, StabilityLabel::Stable),
            output(0.5, 0.5, StabilityLabel::Stable),
        ];
        let summary = WeeklyAnalyzer::analyze(&outputs);
        assert_eq!(summary.dominant_stability, StabilityLabel::Stable);
    }

    #[test]
    fn test_dominant_stability_tie_first_seen_wins() {
        let outputs = vec![
            output(0.5, 0.5, StabilityLabel::Drifting),
            output(0.5, 0.5, StabilityLabel::Stable),
            output(0.5, 0.5, StabilityLabel::Stable),
            output(0.5, 0.5, StabilityLabel::Drifting),
        ];
        let summary = WeeklyAnalyzer::analyze(&outputs);
        assert_eq!(summary.dominant_stability, StabilityLabel::Drifting);
    }
}
