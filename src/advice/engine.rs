//! Advice engine
//!
//! Stateful rule evaluation per cycle: gating against the last generation
//! time, independent rule matching, confidence ranking with a per-category
//! cap, a weighted-random template draw, placeholder resolution, and
//! redundancy suppression against the previous cycle's scores.
//!
//! All engine state lives in a caller-owned [`AdviceSession`] passed into
//! each call, so concurrency and testing stay tractable; callers persist the
//! session externally if cross-run memory is required.

use crate::advice::context::AdviceTriggerContext;
use crate::advice::rules::{AdviceCategory, TriggerRule};
use crate::advice::templates::{builtin_templates, AdviceTemplate};
use crate::advice::wording::resolve_placeholders;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Advice is held constant for this many days unless a refresh is forced.
/// Weekly cadence keeps the advice from appearing erratic.
const GATING_WINDOW_DAYS: i64 = 7;

/// At most this many advice items per cycle
const MAX_ADVICE_ITEMS: usize = 3;

/// Random draw pool: top templates per category by static weight
const TEMPLATE_POOL_SIZE: usize = 3;

/// A repeat of last cycle's advice is suppressed unless its score improved
/// by more than this delta.
const REDUNDANCY_DELTA: f64 = 0.1;

/// One resolved advice item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAdvice {
    /// Headline from the template
    pub title: String,
    /// Body with all declared placeholders resolved
    pub body: String,
    /// Category of the triggering rule
    pub category: AdviceCategory,
    /// When this advice was generated
    pub generated_at: DateTime<Utc>,
    /// Rule confidence x template weight (0-1)
    pub confidence_score: f64,
}

/// Caller-owned engine state: the weekly cache and the redundancy ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceSession {
    /// Instance identifier stamped for provenance
    pub instance_id: Uuid,
    /// When the cached advice was generated
    pub last_generated_at: Option<DateTime<Utc>>,
    /// Advice returned verbatim while the gating window holds
    pub cached_advice: Vec<GeneratedAdvice>,
    /// Best score shown per category in the previous cycle
    pub last_category_scores: HashMap<AdviceCategory, f64>,
}

impl AdviceSession {
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            last_generated_at: None,
            cached_advice: Vec::new(),
            last_category_scores: HashMap::new(),
        }
    }
}

impl Default for AdviceSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Rule and template evaluation engine
pub struct AdviceEngine {
    rules: Vec<TriggerRule>,
    templates: Vec<AdviceTemplate>,
    rng: StdRng,
}

impl Default for AdviceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceEngine {
    /// Engine with the default rule set and built-in template catalog.
    pub fn new() -> Self {
        Self {
            rules: TriggerRule::default_rules(),
            templates: builtin_templates(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a deterministic template draw.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rules: TriggerRule::default_rules(),
            templates: builtin_templates(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the rule set.
    pub fn with_rules(mut self, rules: Vec<TriggerRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the template catalog.
    pub fn with_templates(mut self, templates: Vec<AdviceTemplate>) -> Self {
        self.templates = templates;
        self
    }

    /// Run one evaluation cycle against the caller-owned session.
    ///
    /// Within the gating window the cached advice is returned verbatim
    /// unless `force_refresh` is set. An empty result is the positive
    /// "balanced" state, not an error.
    pub fn evaluate(
        &mut self,
        session: &mut AdviceSession,
        ctx: &AdviceTriggerContext,
        now: DateTime<Utc>,
        force_refresh: bool,
    ) -> Vec<GeneratedAdvice> {
        // 1. Gating.
        if !force_refresh {
            if let Some(generated_at) = session.last_generated_at {
                if now.signed_duration_since(generated_at) < Duration::days(GATING_WINDOW_DAYS) {
                    return session.cached_advice.clone();
                }
            }
        }

        // 2. Independent rule evaluation.
        let mut matches: Vec<(TriggerRule, f64)> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(ctx))
            .map(|rule| (*rule, rule.confidence(ctx)))
            .collect();

        // 3. Rank by confidence, cap at one per category and three total.
        matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let mut winners: Vec<(TriggerRule, f64)> = Vec::new();
        for (rule, confidence) in matches {
            if winners.len() >= MAX_ADVICE_ITEMS {
                break;
            }
            if winners.iter().any(|(w, _)| w.category() == rule.category()) {
                continue;
            }
            winners.push((rule, confidence));
        }

        // 4-5. Template draw and placeholder resolution per winner. A
        // category without templates degrades by skipping, not failing.
        let mut candidates: Vec<GeneratedAdvice> = Vec::new();
        for (rule, confidence) in winners {
            if let Some(advice) = self.render(rule, confidence, ctx, now) {
                candidates.push(advice);
            }
        }

        // 6. Redundancy suppression against the previous cycle's scores;
        // force-keep the best candidate if suppression would empty the set.
        let kept = suppress_redundant(&candidates, &session.last_category_scores);

        // 7. Cache and ledger update only when advice was produced.
        if !kept.is_empty() {
            session.last_generated_at = Some(now);
            session.cached_advice = kept.clone();
            let mut scores: HashMap<AdviceCategory, f64> = HashMap::new();
            for advice in &kept {
                let entry = scores.entry(advice.category).or_insert(advice.confidence_score);
                if advice.confidence_score > *entry {
                    *entry = advice.confidence_score;
                }
            }
            session.last_category_scores = scores;
        }

        kept
    }

    /// Draw a template for the rule's category and resolve it.
    fn render(
        &mut self,
        rule: TriggerRule,
        confidence: f64,
        ctx: &AdviceTriggerContext,
        now: DateTime<Utc>,
    ) -> Option<GeneratedAdvice> {
        let mut pool: Vec<&AdviceTemplate> = self
            .templates
            .iter()
            .filter(|t| t.category == rule.category())
            .collect();
        if pool.is_empty() {
            return None;
        }
        pool.sort_by(|a, b| {
            b.confidence_weight
                .partial_cmp(&a.confidence_weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(b.id))
        });
        pool.truncate(TEMPLATE_POOL_SIZE);

        // Uniform draw among the top templates balances quality against
        // repetition fatigue.
        let template = pool[self.rng.gen_range(0..pool.len())];

        let body = resolve_placeholders(template, ctx, confidence);
        Some(GeneratedAdvice {
            title: template.title.to_string(),
            body,
            category: template.category,
            generated_at: now,
            confidence_score: (confidence * template.confidence_weight).clamp(0.0, 1.0),
        })
    }
}

/// Keep candidates whose score beats the previous cycle's best for the same
/// category by more than the redundancy delta. Categories with no previous
/// score always pass. If everything is suppressed but candidates existed,
/// the single highest-confidence original candidate is force-kept so a
/// detected signal is never rendered as nothing.
fn suppress_redundant(
    candidates: &[GeneratedAdvice],
    last_scores: &HashMap<AdviceCategory, f64>,
) -> Vec<GeneratedAdvice> {
    let mut kept: Vec<GeneratedAdvice> = candidates
        .iter()
        .filter(|advice| match last_scores.get(&advice.category) {
            Some(previous) => advice.confidence_score > previous + REDUNDANCY_DELTA,
            None => true,
        })
        .cloned()
        .collect();

    if kept.is_empty() && !candidates.is_empty() {
        let best = candidates
            .iter()
            .max_by(|a, b| {
                a.confidence_score
                    .partial_cmp(&b.confidence_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned();
        if let Some(best) = best {
            kept.push(best);
        }
    }

    kept
}
