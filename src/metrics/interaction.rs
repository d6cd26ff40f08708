//! Interaction metrics
//!
//! Measures how a day's usage moves between apps: diversity, switching,
//! quick reopens, and launcher time. Sessions are sorted chronologically
//! internally, so input order does not matter.

use crate::types::AppSession;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::HashSet;

/// App names matching any of these substrings (case-insensitive) count as
/// launcher usage.
const LAUNCHER_KEYWORDS: [&str; 6] = [
    "launcher",
    "home",
    "nexuslauncher",
    "pixellauncher",
    "trebuchet",
    "quickstep",
];

/// Reopen gap upper bound in seconds (exclusive). A 0-second gap is a log
/// artifact, not a reopen.
const REOPEN_GAP_MAX_SEC: f64 = 60.0;

/// Interaction statistics for one day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionMetrics {
    /// Number of distinct apps used
    pub unique_app_count: u32,
    /// Unique apps / total sessions (0-1)
    pub app_diversity_ratio: f64,
    /// App with the highest total duration
    pub top_app: Option<String>,
    /// Adjacent-session app changes in chronological order
    pub switch_count: u32,
    /// Switches per hour of total screen time
    pub switch_rate: f64,
    /// Adjacent same-app sessions with a gap strictly between 0 and 60 seconds
    pub reopen_count: u32,
    /// Reopens / (session count - 1) (0-1)
    pub reopen_ratio: f64,
    /// Switches landing back on the top app / total switches (0-1)
    pub top_app_reentry_ratio: f64,
    /// Minutes in launcher-like apps / total minutes (0-1)
    pub launcher_usage_ratio: f64,
}

/// Calculator for [`InteractionMetrics`]
pub struct InteractionMetricsCalculator;

impl InteractionMetricsCalculator {
    /// Compute interaction metrics for one day's sessions.
    pub fn compute(sessions: &[AppSession]) -> InteractionMetrics {
        if sessions.is_empty() {
            return InteractionMetrics::default();
        }

        let mut ordered: Vec<&AppSession> = sessions.iter().collect();
        ordered.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then(a.end_time.cmp(&b.end_time))
                .then(a.app_name.cmp(&b.app_name))
        });

        let session_count = ordered.len() as u32;
        let unique_apps: HashSet<&str> = ordered.iter().map(|s| s.app_name.as_str()).collect();
        let unique_app_count = unique_apps.len() as u32;
        let app_diversity_ratio =
            (unique_app_count as f64 / session_count as f64).clamp(0.0, 1.0);

        let mut per_app_minutes: HashMap<&str, f64> = HashMap::new();
        let mut total_minutes = 0.0;
        let mut launcher_minutes = 0.0;
        for session in &ordered {
            let minutes = session.duration_minutes().max(0.0);
            total_minutes += minutes;
            *per_app_minutes.entry(session.app_name.as_str()).or_insert(0.0) += minutes;
            if is_launcher(&session.app_name) {
                launcher_minutes += minutes;
            }
        }

        // Name tie-break keeps the top app deterministic.
        let top_app = per_app_minutes
            .iter()
            .max_by(|a, b| {
                a.1.partial_cmp(b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.0.cmp(a.0))
            })
            .map(|(app, _)| app.to_string());

        let mut switch_count = 0u32;
        let mut reentry_count = 0u32;
        let mut reopen_count = 0u32;
        for pair in ordered.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if prev.app_name != next.app_name {
                switch_count += 1;
                if Some(next.app_name.as_str()) == top_app.as_deref() {
                    reentry_count += 1;
                }
            } else {
                let gap_sec = (next.start_time - prev.end_time).num_milliseconds() as f64 / 1000.0;
                if gap_sec > 0.0 && gap_sec < REOPEN_GAP_MAX_SEC {
                    reopen_count += 1;
                }
            }
        }

        let switch_rate = if total_minutes > 0.0 {
            switch_count as f64 / (total_minutes / 60.0)
        } else {
            0.0
        };

        let reopen_ratio = if session_count > 1 {
            (reopen_count as f64 / (session_count - 1) as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let top_app_reentry_ratio = if switch_count > 0 {
            (reentry_count as f64 / switch_count as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let launcher_usage_ratio = if total_minutes > 0.0 {
            (launcher_minutes / total_minutes).clamp(0.0, 1.0)
        } else {
            0.0
        };

        InteractionMetrics {
            unique_app_count,
            app_diversity_ratio,
            top_app,
            switch_count,
            switch_rate,
            reopen_count,
            reopen_ratio,
            top_app_reentry_ratio,
            launcher_usage_ratio,
        }
    }
}

/// Case-insensitive substring match against the launcher keyword list.
fn is_launcher(app_name: &str) -> bool {
    let lowered = app_name.to_lowercase();
    LAUNCHER_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
