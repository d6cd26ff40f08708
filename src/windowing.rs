//! Gap-aware temporal windowing and training dataset assembly
//!
//! Scans a sparse date-to-features map and emits only strictly contiguous
//! runs of calendar days. Missing days are never padded or interpolated:
//! a window either covers exactly N consecutive real days or it does not
//! exist. Zero-usage days are valid window members (a real signal, not
//! missing data).

use crate::types::{DailyBehaviorFeatures, TrainingDataset, FEATURE_DIMENSION};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of target values per training sample
pub const TARGET_DIMENSION: usize = 2;

/// One strictly contiguous run of daily feature vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWindow {
    /// First calendar day in the window
    pub start_date: NaiveDate,
    /// Last calendar day in the window
    pub end_date: NaiveDate,
    /// Feature vectors in chronological order, exactly window-size long
    pub days: Vec<DailyBehaviorFeatures>,
}

/// Emit every strictly contiguous `window_size`-day window in `features`.
///
/// Fewer than `window_size` total days yields no windows. A gap between two
/// stored dates invalidates only the windows whose span crosses it; runs on
/// either side still produce their own windows.
pub fn contiguous_windows(
    features: &HashMap<NaiveDate, DailyBehaviorFeatures>,
    window_size: usize,
) -> Vec<FeatureWindow> {
    if window_size == 0 || features.len() < window_size {
        return Vec::new();
    }

    let mut dates: Vec<NaiveDate> = features.keys().copied().collect();
    dates.sort();

    let mut windows = Vec::new();
    for start in 0..=(dates.len() - window_size) {
        let candidate = &dates[start..start + window_size];
        let contiguous = candidate
            .iter()
            .enumerate()
            .all(|(offset, date)| *date == candidate[0] + Duration::days(offset as i64));
        if !contiguous {
            continue;
        }
        windows.push(FeatureWindow {
            start_date: candidate[0],
            end_date: candidate[window_size - 1],
            days: candidate.iter().map(|d| features[d].clone()).collect(),
        });
    }
    windows
}

/// Extract the 2-dim training label from a window.
///
/// Last-step alignment: the window is labeled by its final day's state
/// (habituality via the doomscrolling-risk proxy, plus the derived
/// distraction load), not a forecast of the day after. An empty window
/// yields `[0, 0]`.
pub fn extract_target(days: &[DailyBehaviorFeatures]) -> [f64; TARGET_DIMENSION] {
    match days.last() {
        Some(last) => [last.doomscrolling_risk, last.distraction_load_index],
        None => [0.0, 0.0],
    }
}

/// Assembler for [`TrainingDataset`]
pub struct TrainingDatasetAssembler;

impl TrainingDatasetAssembler {
    /// Flatten every valid window into a training pair.
    ///
    /// Each input concatenates the window's daily vectors in chronological
    /// order (window_size x 34 values); each target comes from
    /// [`extract_target`]. No valid windows yields an empty dataset, not an
    /// error.
    pub fn assemble(
        features: &HashMap<NaiveDate, DailyBehaviorFeatures>,
        window_size: usize,
    ) -> TrainingDataset {
        let windows = contiguous_windows(features, window_size);
        if windows.is_empty() {
            return TrainingDataset::empty(window_size);
        }

        let mut inputs = Vec::with_capacity(windows.len());
        let mut targets = Vec::with_capacity(windows.len());
        for window in &windows {
            let mut input = Vec::with_capacity(window_size * FEATURE_DIMENSION);
            for day in &window.days {
                input.extend(day.to_vec());
            }
            inputs.push(input);
            targets.push(extract_target(&window.days).to_vec());
        }

        let sample_count = inputs.len();
        TrainingDataset {
            inputs,
            targets,
            window_size,
            feature_dimension: FEATURE_DIMENSION,
            sample_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, n).unwrap()
    }

    fn features(marker: f64) -> DailyBehaviorFeatures {
        DailyBehaviorFeatures {
            total_screen_time_minutes: marker,
            doomscrolling_risk: marker / 1000.0,
            distraction_load_index: marker / 2000.0,
            ..Default::default()
        }
    }

    fn map_of(days: &[u32]) -> HashMap<NaiveDate, DailyBehaviorFeatures> {
        days.iter()
            .map(|n| (day(*n), features(*n as f64 * 10.0)))
            .collect()
    }

    #[test]
    fn test_too_few_days_yields_nothing() {
        let map = map_of(&[1, 2]);
        assert!(contiguous_windows(&map, 3).is_empty());
    }

    #[test]
    fn test_contiguous_run_emits_sliding_windows() {
        let map = map_of(&[1, 2, 3, 4, 5]);
        let windows = contiguous_windows(&map, 3);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].start_date, day(1));
        assert_eq!(windows[0].end_date, day(3));
        assert_eq!(windows[2].start_date, day(3));
    }

    #[test]
    fn test_gap_invalidates_only_crossing_windows() {
        // Gap between day 2 and day 4: no window may cross it, but the run
        // 4..=6 still yields one window of size 3.
        let map = map_of(&[1, 2, 4, 5, 6]);
        let windows = contiguous_windows(&map, 3);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start_date, day(4));
        assert_eq!(windows[0].end_date, day(6));
    }

    #[test]
    fn test_zero_usage_day_is_valid_member() {
        let mut map = map_of(&[1, 3]);
        map.insert(day(2), DailyBehaviorFeatures::default());
        let windows = contiguous_windows(&map, 3);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].days[1].total_screen_time_minutes, 0.0);
    }

    #[test]
    fn test_strict_day_equality_not_just_monotonic() {
        // Dates ascending but with a two-day jump still fail the check.
        let map = map_of(&[1, 3, 5]);
        assert!(contiguous_windows(&map, 2).is_empty());
    }

    #[test]
    fn test_target_last_day_alignment() {
        let days = vec![features(10.0), features(20.0), features(30.0)];
        let target = extract_target(&days);
        assert!((target[0] - 0.03).abs() < 1e-9);
        assert!((target[1] - 0.015).abs() < 1e-9);
    }

    #[test]
    fn test_target_empty_window() {
        assert_eq!(extract_target(&[]), [0.0, 0.0]);
    }

    #[test]
    fn test_dataset_shapes() {
        let map = map_of(&[1, 2, 3, 4]);
        let dataset = TrainingDatasetAssembler::assemble(&map, 3);

        assert_eq!(dataset.sample_count, 2);
        assert_eq!(dataset.window_size, 3);
        assert_eq!(dataset.feature_dimension, FEATURE_DIMENSION);
        for input in &dataset.inputs {
            assert_eq!(input.len(), 3 * FEATURE_DIMENSION);
        }
        for target in &dataset.targets {
            assert_eq!(target.len(), TARGET_DIMENSION);
        }
    }

    #[test]
    fn test_dataset_input_is_chronological() {
        let map = map_of(&[1, 2, 3]);
        let dataset = TrainingDatasetAssembler::assemble(&map, 3);
        // First slot of each day block is total_screen_time_minutes.
        let input = &dataset.inputs[0];
        assert_eq!(input[0], 10.0);
        assert_eq!(input[FEATURE_DIMENSION], 20.0);
        assert_eq!(input[2 * FEATURE_DIMENSION], 30.0);
    }

    #[test]
    fn test_no_windows_is_empty_dataset() {
        let map = map_of(&[1, 5]);
        let dataset = TrainingDatasetAssembler::assemble(&map, 3);
        assert_eq!(dataset, TrainingDataset::empty(3));
    }
}
