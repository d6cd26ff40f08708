//! Advice trigger context
//!
//! Read-only bundle of weekly aggregates handed into rule evaluation. Built
//! once per evaluation cycle and never mutated by the engine.

use crate::types::{TrendLabel, WeeklyBehaviorSummary};
use serde::{Deserialize, Serialize};

/// Everything a trigger rule may look at when deciding whether to fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceTriggerContext {
    /// The weekly summary this context was derived from
    pub weekly_summary: WeeklyBehaviorSummary,
    /// Mean habit strength across the observed days (0-1)
    pub average_habit_strength: f64,
    /// Mean distraction score across the observed days (0-1)
    pub average_distraction_score: f64,
    /// Most-used app over the week, if known
    pub dominant_app: Option<String>,
    /// Clock window with the most usage, if known (e.g. "evening")
    pub dominant_time_window: Option<String>,
    /// Habituality trend over the week
    pub habit_trend: TrendLabel,
    /// Number of days with data behind this context
    pub days_observed: u32,
}

impl AdviceTriggerContext {
    /// Build a context directly from a weekly summary, using its averages as
    /// the habit/distraction scalars.
    pub fn from_summary(summary: WeeklyBehaviorSummary, days_observed: u32) -> Self {
        Self {
            average_habit_strength: summary.average_habituality,
            average_distraction_score: summary.average_distraction,
            dominant_app: None,
            dominant_time_window: None,
            habit_trend: summary.habituality_trend,
            weekly_summary: summary,
            days_observed,
        }
    }

    /// Attach the dominant app name.
    pub fn with_dominant_app(mut self, app: impl Into<String>) -> Self {
        self.dominant_app = Some(app.into());
        self
    }

    /// Attach the dominant time window name.
    pub fn with_dominant_time_window(mut self, window: impl Into<String>) -> Self {
        self.dominant_time_window = Some(window.into());
        self
    }
}
