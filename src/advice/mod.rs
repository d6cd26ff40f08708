//! Weekly advice generation
//!
//! Turns a weekly behavior summary into gated, de-duplicated natural-language
//! advice: trigger rules match on the context, templates are drawn per
//! category, placeholders are resolved, and redundancy suppression keeps the
//! output from repeating itself week over week.

pub mod context;
pub mod engine;
pub mod rules;
pub mod templates;
pub mod wording;

pub use context::AdviceTriggerContext;
pub use engine::{AdviceEngine, AdviceSession, GeneratedAdvice};
pub use rules::{AdviceCategory, TriggerRule};
pub use templates::{builtin_templates, AdviceTemplate};
