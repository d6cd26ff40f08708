//! Placeholder resolution and confidence wording
//!
//! A small closed-vocabulary templating function: each declared placeholder
//! gets a single-pass substring replacement. No general templating engine
//! is needed for this vocabulary.

use crate::advice::context::AdviceTriggerContext;
use crate::advice::templates::AdviceTemplate;

/// Frequency qualifier for the advice body, bucketed by rule confidence.
pub fn qualifier_for(confidence: f64) -> &'static str {
    if confidence < 0.5 {
        "occasionally"
    } else if confidence < 0.75 {
        "often"
    } else {
        "consistently"
    }
}

/// Suggestion opener for the advice body, bucketed by rule confidence.
pub fn suggestion_prefix_for(confidence: f64) -> &'static str {
    if confidence < 0.5 {
        "you might consider"
    } else if confidence < 0.75 {
        "it could help to try"
    } else {
        "a small change that may help is"
    }
}

/// Resolve a template body against the context and rule confidence.
///
/// Only placeholders the template declares are replaced. Context-derived
/// values fall back to neutral wording when absent; the generic tokens
/// (`app2`, `count`, `minutes`, `percentage`) always use their fixed
/// fallbacks.
pub fn resolve_placeholders(
    template: &AdviceTemplate,
    ctx: &AdviceTriggerContext,
    confidence: f64,
) -> String {
    let mut body = template.body_template.to_string();

    for placeholder in template.placeholders {
        let value: &str = match *placeholder {
            "app" => ctx.dominant_app.as_deref().unwrap_or("your most used app"),
            "timeWindow" => ctx.dominant_time_window.as_deref().unwrap_or("the evening"),
            "trend" => trend_wording(ctx),
            "qualifier" => qualifier_for(confidence),
            "suggestionPrefix" => suggestion_prefix_for(confidence),
            "app2" => "other apps",
            "count" => "multiple",
            "minutes" => "several",
            "percentage" => "significant",
            _ => continue,
        };
        body = body.replace(&format!("{{{placeholder}}}"), value);
    }

    body
}

fn trend_wording(ctx: &AdviceTriggerContext) -> &'static str {
    use crate::types::TrendLabel;
    match ctx.habit_trend {
        TrendLabel::Increasing => "increasing",
        TrendLabel::Decreasing => "decreasing",
        TrendLabel::Flat => "steady",
        TrendLabel::InsufficientData => "steady",
    }
}
