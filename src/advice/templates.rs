//! Advice template registry
//!
//! A fixed, hand-authored catalog of advice content. Bodies carry
//! `{placeholder}` tokens that the wording module resolves per evaluation;
//! the `placeholders` list declares which tokens a body uses. The static
//! confidence weight ranks templates within a category.

use crate::advice::rules::AdviceCategory;
use serde::Serialize;

/// Static advice content. Serializes for inspection and reports; never
/// deserialized, the catalog is compiled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceTemplate {
    /// Stable identifier, unique within the catalog
    pub id: &'static str,
    /// Category this template serves
    pub category: AdviceCategory,
    /// Short headline shown to the user
    pub title: &'static str,
    /// Body text with `{placeholder}` tokens
    pub body_template: &'static str,
    /// Tokens the body declares; only these are resolved
    pub placeholders: &'static [&'static str],
    /// Static quality weight (0-1) used for ranking and final confidence
    pub confidence_weight: f64,
}

/// The built-in catalog.
///
/// At least three templates per registered category so the top-3 random
/// draw has a real pool to work with.
pub fn builtin_templates() -> Vec<AdviceTemplate> {
    vec![
        // -- Habit --
        AdviceTemplate {
            id: "habit_anchor_window",
            category: AdviceCategory::Habit,
            title: "Your routine has a center of gravity",
            body_template: "You {qualifier} reach for {app} during {timeWindow}. {suggestionPrefix} moving one of those check-ins to a planned break instead.",
            placeholders: &["qualifier", "app", "timeWindow", "suggestionPrefix"],
            confidence_weight: 0.9,
        },
        AdviceTemplate {
            id: "habit_trend_mirror",
            category: AdviceCategory::Habit,
            title: "A habit is settling in",
            body_template: "Your usage of {app} has been {trend} this week. {suggestionPrefix} deciding in advance when {app} fits your day, rather than the other way around.",
            placeholders: &["app", "trend", "suggestionPrefix"],
            confidence_weight: 0.85,
        },
        AdviceTemplate {
            id: "habit_first_reach",
            category: AdviceCategory::Habit,
            title: "The automatic first reach",
            body_template: "You {qualifier} return to {app} right after leaving it. {suggestionPrefix} a {minutes}-minute pause before reopening it.",
            placeholders: &["qualifier", "app", "suggestionPrefix", "minutes"],
            confidence_weight: 0.8,
        },
        AdviceTemplate {
            id: "habit_window_swap",
            category: AdviceCategory::Habit,
            title: "One window, one swap",
            body_template: "Most of your screen time lands in {timeWindow}. {suggestionPrefix} swapping {count} of those sessions for something off-screen.",
            placeholders: &["timeWindow", "suggestionPrefix", "count"],
            confidence_weight: 0.7,
        },
        // -- Distraction --
        AdviceTemplate {
            id: "distraction_fragmentation",
            category: AdviceCategory::Distraction,
            title: "Your attention is being sliced thin",
            body_template: "You {qualifier} bounce between {app} and {app2} in short bursts. {suggestionPrefix} batching those check-ins into {count} longer visits.",
            placeholders: &["qualifier", "app", "app2", "suggestionPrefix", "count"],
            confidence_weight: 0.9,
        },
        AdviceTemplate {
            id: "distraction_switch_cost",
            category: AdviceCategory::Distraction,
            title: "Switching has a cost",
            body_template: "A {percentage} share of your sessions end within a minute. {suggestionPrefix} staying with one app until you finish what you opened it for.",
            placeholders: &["percentage", "suggestionPrefix"],
            confidence_weight: 0.85,
        },
        AdviceTemplate {
            id: "distraction_peak_window",
            category: AdviceCategory::Distraction,
            title: "One window drives the scatter",
            body_template: "Distraction peaks during {timeWindow}, mostly in {app}. {suggestionPrefix} silencing notifications for that window.",
            placeholders: &["timeWindow", "app", "suggestionPrefix"],
            confidence_weight: 0.8,
        },
        AdviceTemplate {
            id: "distraction_reopen_loop",
            category: AdviceCategory::Distraction,
            title: "The reopen loop",
            body_template: "You {qualifier} reopen {app} within a minute of closing it. {suggestionPrefix} moving it off your home screen for a few days.",
            placeholders: &["qualifier", "app", "suggestionPrefix"],
            confidence_weight: 0.75,
        },
        // -- Positive (unregistered rule; templates ready for it) --
        AdviceTemplate {
            id: "positive_balanced_week",
            category: AdviceCategory::Positive,
            title: "A balanced week",
            body_template: "Your usage stayed {trend} and unfragmented this week. Whatever you are doing during {timeWindow}, it is working.",
            placeholders: &["trend", "timeWindow"],
            confidence_weight: 0.8,
        },
        AdviceTemplate {
            id: "positive_steady_focus",
            category: AdviceCategory::Positive,
            title: "Focus held steady",
            body_template: "You {qualifier} finished what you opened {app} for without detours. Keep the streak going.",
            placeholders: &["qualifier", "app"],
            confidence_weight: 0.7,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let templates = builtin_templates();
        let ids: HashSet<&str> = templates.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_registered_categories_have_at_least_three() {
        let templates = builtin_templates();
        for category in [AdviceCategory::Habit, AdviceCategory::Distraction] {
            let count = templates.iter().filter(|t| t.category == category).count();
            assert!(count >= 3, "{category:?} has only {count} templates");
        }
    }

    #[test]
    fn test_weights_in_range() {
        for template in builtin_templates() {
            assert!((0.0..=1.0).contains(&template.confidence_weight));
        }
    }

    #[test]
    fn test_catalog_serializes_to_json() {
        let json = serde_json::to_string(&builtin_templates()).unwrap();
        assert!(json.contains("habit_anchor_window"));
        assert!(json.contains("\"category\":\"habit\""));
    }

    #[test]
    fn test_declared_placeholders_appear_in_body() {
        for template in builtin_templates() {
            for placeholder in template.placeholders {
                let token = format!("{{{placeholder}}}");
                assert!(
                    template.body_template.contains(&token),
                    "{} declares {token} but the body does not use it",
                    template.id
                );
            }
        }
    }
}
