//! Advice trigger rules
//!
//! A closed tagged-variant set of rules, each carrying its own pure
//! match/confidence functions. The evaluator dispatches over the enum, so
//! the ranking logic stays independent of how many rule kinds exist.

use crate::advice::context::AdviceTriggerContext;
use serde::{Deserialize, Serialize};

/// Habit rule: minimum average habit strength to fire
const HABIT_STRENGTH_THRESHOLD: f64 = 0.65;
/// Habit and positive rules: minimum days of data to fire
const MIN_DAYS_OBSERVED: u32 = 5;
/// Distraction rule: minimum average distraction score to fire
const DISTRACTION_THRESHOLD: f64 = 0.6;
/// Positive rule: maximum average distraction score to fire
const POSITIVE_DISTRACTION_CEILING: f64 = 0.3;

/// Advice category, also the key of the redundancy ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceCategory {
    Habit,
    Distraction,
    Positive,
}

impl AdviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceCategory::Habit => "habit",
            AdviceCategory::Distraction => "distraction",
            AdviceCategory::Positive => "positive",
        }
    }
}

/// Trigger rule variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerRule {
    /// Entrenched usage: strong habits observed over enough days
    Habit,
    /// Scattered attention: sustained high distraction
    Distraction,
    /// Balanced week worth reinforcing
    Positive,
}

impl TriggerRule {
    /// The default registered rule set. `Positive` exists for future
    /// registration but does not fire by default.
    pub fn default_rules() -> Vec<TriggerRule> {
        vec![TriggerRule::Habit, TriggerRule::Distraction]
    }

    /// Category this rule's advice belongs to.
    pub fn category(&self) -> AdviceCategory {
        match self {
            TriggerRule::Habit => AdviceCategory::Habit,
            TriggerRule::Distraction => AdviceCategory::Distraction,
            TriggerRule::Positive => AdviceCategory::Positive,
        }
    }

    /// Whether this rule fires for the given context.
    pub fn matches(&self, ctx: &AdviceTriggerContext) -> bool {
        match self {
            TriggerRule::Habit => {
                ctx.average_habit_strength > HABIT_STRENGTH_THRESHOLD
                    && ctx.days_observed >= MIN_DAYS_OBSERVED
            }
            TriggerRule::Distraction => ctx.average_distraction_score > DISTRACTION_THRESHOLD,
            TriggerRule::Positive => {
                ctx.average_distraction_score <= POSITIVE_DISTRACTION_CEILING
                    && ctx.days_observed >= MIN_DAYS_OBSERVED
            }
        }
    }

    /// Confidence in the match: the identity mapping of the triggering
    /// metric, clamped to 0-1.
    pub fn confidence(&self, ctx: &AdviceTriggerContext) -> f64 {
        let raw = match self {
            TriggerRule::Habit => ctx.average_habit_strength,
            TriggerRule::Distraction => ctx.average_distraction_score,
            TriggerRule::Positive => 1.0 - ctx.average_distraction_score,
        };
        raw.clamp(0.0, 1.0)
    }
}
