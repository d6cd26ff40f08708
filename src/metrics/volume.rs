//! Usage volume metrics
//!
//! Reduces a day's sessions to raw volume statistics: total screen time,
//! session counts, per-app durations, and app concentration.

use crate::types::AppSession;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Volume and intensity statistics for one day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageVolumeMetrics {
    /// Sum of non-negative session durations (minutes)
    pub total_screen_time_minutes: f64,
    /// Number of sessions
    pub session_count: u32,
    /// Mean session length (minutes)
    pub avg_session_length_minutes: f64,
    /// Longest session (minutes)
    pub max_session_length_minutes: f64,
    /// Minutes per app
    pub per_app_minutes: HashMap<String, f64>,
    /// Up to two (app, minutes) pairs sorted by minutes descending
    pub top_apps: Vec<(String, f64)>,
    /// Top app minutes / total minutes (0 when total is 0)
    pub top_app_ratio: f64,
    /// Herfindahl-Hirschman concentration index over app time shares
    pub concentration_index: f64,
}

impl UsageVolumeMetrics {
    /// Name of the most-used app, if any usage was recorded.
    pub fn top_app_name(&self) -> Option<&str> {
        self.top_apps.first().map(|(name, _)| name.as_str())
    }
}

/// Calculator for [`UsageVolumeMetrics`]
pub struct UsageVolumeCalculator;

impl UsageVolumeCalculator {
    /// Compute volume metrics for one day's sessions.
    ///
    /// Negative durations are clamped to zero. Empty input yields an
    /// all-zero result.
    pub fn compute(sessions: &[AppSession]) -> UsageVolumeMetrics {
        if sessions.is_empty() {
            return UsageVolumeMetrics::default();
        }

        let mut per_app_minutes: HashMap<String, f64> = HashMap::new();
        let mut total = 0.0;
        let mut max_len = 0.0_f64;

        for session in sessions {
            let minutes = session.duration_minutes().max(0.0);
            total += minutes;
            max_len = max_len.max(minutes);
            *per_app_minutes.entry(session.app_name.clone()).or_insert(0.0) += minutes;
        }

        let session_count = sessions.len() as u32;
        let avg = total / session_count as f64;

        // Sorted by minutes descending, app name as tie-break so results are
        // deterministic regardless of map iteration order.
        let mut ranked: Vec<(String, f64)> = per_app_minutes
            .iter()
            .map(|(app, minutes)| (app.clone(), *minutes))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        let top_apps: Vec<(String, f64)> = ranked.into_iter().take(2).collect();

        let top_app_ratio = if total > 0.0 {
            (top_apps.first().map(|(_, m)| *m).unwrap_or(0.0) / total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let concentration_index = compute_concentration_index(&per_app_minutes, total);

        UsageVolumeMetrics {
            total_screen_time_minutes: total,
            session_count,
            avg_session_length_minutes: avg,
            max_session_length_minutes: max_len,
            per_app_minutes,
            top_apps,
            top_app_ratio,
            concentration_index,
        }
    }
}

/// Herfindahl-Hirschman index: the sum of squared app time shares.
///
/// Lies in (0, 1] for any day with usage and equals 1.0 exactly when a
/// single app accounts for all screen time.
fn compute_concentration_index(per_app_minutes: &HashMap<String, f64>, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    per_app_minutes
        .values()
        .map(|minutes| {
            let share = minutes / total;
            share * share
        })
        .sum()
}
