//! Temporal structure metrics
//!
//! Buckets a day's usage into four fixed clock windows and derives the
//! distribution shape: window ratios, dominant window, off-peak share, and
//! normalized entropy.

use crate::types::AppSession;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Night-early window end, minutes from midnight (05:00)
const NIGHT_EARLY_END_MIN: f64 = 5.0 * 60.0;
/// Morning window end (12:00)
const MORNING_END_MIN: f64 = 12.0 * 60.0;
/// Afternoon window end (17:00)
const AFTERNOON_END_MIN: f64 = 17.0 * 60.0;
/// Evening window end (22:00)
const EVENING_END_MIN: f64 = 22.0 * 60.0;
/// End of day (24:00)
const DAY_END_MIN: f64 = 24.0 * 60.0;

/// The four clock windows a day's usage is bucketed into.
///
/// Night covers both the early (00:00-05:00) and late (22:00-24:00) segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Morning => "morning",
            TimeWindow::Afternoon => "afternoon",
            TimeWindow::Evening => "evening",
            TimeWindow::Night => "night",
        }
    }
}

/// Temporal distribution of one day's usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalMetrics {
    /// Share of usage between 05:00 and 12:00 (0-1)
    pub morning_ratio: f64,
    /// Share of usage between 12:00 and 17:00 (0-1)
    pub afternoon_ratio: f64,
    /// Share of usage between 17:00 and 22:00 (0-1)
    pub evening_ratio: f64,
    /// Share of usage between 22:00 and 05:00 (0-1)
    pub night_ratio: f64,
    /// Window with the highest ratio (first-max-wins on ties)
    pub dominant_window: TimeWindow,
    /// Lowest window ratio (0-1)
    pub off_peak_ratio: f64,
    /// Shannon entropy over the four ratios, normalized to 0-1
    pub time_window_entropy: f64,
}

impl Default for TemporalMetrics {
    fn default() -> Self {
        Self {
            morning_ratio: 0.0,
            afternoon_ratio: 0.0,
            evening_ratio: 0.0,
            night_ratio: 0.0,
            dominant_window: TimeWindow::Morning,
            off_peak_ratio: 0.0,
            time_window_entropy: 0.0,
        }
    }
}

/// Calculator for [`TemporalMetrics`]
pub struct TemporalMetricsCalculator;

impl TemporalMetricsCalculator {
    /// Compute the temporal distribution of `sessions` on `date`.
    ///
    /// Each session contributes its overlap-in-minutes with each clock window
    /// of that calendar date; sessions spanning a window boundary are split
    /// proportionally by the overlap computation, with no double counting.
    pub fn compute(sessions: &[AppSession], date: NaiveDate) -> TemporalMetrics {
        let midnight = date.and_time(NaiveTime::MIN).and_utc();

        let mut morning_min = 0.0;
        let mut afternoon_min = 0.0;
        let mut evening_min = 0.0;
        let mut night_min = 0.0;

        for session in sessions {
            // Session bounds as minutes from this date's midnight.
            let start = (session.start_time - midnight).num_seconds() as f64 / 60.0;
            let end = (session.end_time - midnight).num_seconds() as f64 / 60.0;

            night_min += overlap_minutes(start, end, 0.0, NIGHT_EARLY_END_MIN);
            morning_min += overlap_minutes(start, end, NIGHT_EARLY_END_MIN, MORNING_END_MIN);
            afternoon_min += overlap_minutes(start, end, MORNING_END_MIN, AFTERNOON_END_MIN);
            evening_min += overlap_minutes(start, end, AFTERNOON_END_MIN, EVENING_END_MIN);
            night_min += overlap_minutes(start, end, EVENING_END_MIN, DAY_END_MIN);
        }

        let total = morning_min + afternoon_min + evening_min + night_min;

        let (morning_ratio, afternoon_ratio, evening_ratio, night_ratio) = if total > 0.0 {
            (
                morning_min / total,
                afternoon_min / total,
                evening_min / total,
                night_min / total,
            )
        } else {
            (0.0, 0.0, 0.0, 0.0)
        };

        // Scan order morning, afternoon, evening, night; first max wins.
        let ratios = [morning_ratio, afternoon_ratio, evening_ratio, night_ratio];
        let windows = [
            TimeWindow::Morning,
            TimeWindow::Afternoon,
            TimeWindow::Evening,
            TimeWindow::Night,
        ];
        let mut dominant = TimeWindow::Morning;
        let mut best = f64::NEG_INFINITY;
        for (window, ratio) in windows.iter().zip(ratios.iter()) {
            if *ratio > best {
                best = *ratio;
                dominant = *window;
            }
        }

        let off_peak_ratio = ratios.iter().copied().fold(ratios[0], f64::min);

        TemporalMetrics {
            morning_ratio,
            afternoon_ratio,
            evening_ratio,
            night_ratio,
            dominant_window: dominant,
            off_peak_ratio,
            time_window_entropy: normalized_entropy(&ratios),
        }
    }
}

/// Overlap in minutes between [start, end) and the window [window_start, window_end).
fn overlap_minutes(start: f64, end: f64, window_start: f64, window_end: f64) -> f64 {
    (end.min(window_end) - start.max(window_start)).max(0.0)
}

/// Shannon entropy over the four window ratios in base 2, divided by
/// log2(4) = 2.0 and clamped to 0-1.
///
/// 0.0 when all usage lands in a single window, 1.0 when usage is spread
/// evenly across all four. The p * log2(p) term is treated as 0 when p = 0.
fn normalized_entropy(ratios: &[f64; 4]) -> f64 {
    let entropy: f64 = ratios
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| -p * p.log2())
        .sum();
    (entropy / 2.0).clamp(0.0, 1.0)
}
