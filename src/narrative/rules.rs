use tracing::debug;

use crate::input::DerivedFeatures;
use crate::scoring::{classify, SatisfactionLevel, ScoreBreakdown};

/// Everything a narrative rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeContext<'a> {
    pub score: u8,
    pub level: SatisfactionLevel,
    pub features: &'a DerivedFeatures,
    pub breakdown: &'a ScoreBreakdown,
}

impl<'a> NarrativeContext<'a> {
    pub fn new(score: u8, features: &'a DerivedFeatures, breakdown: &'a ScoreBreakdown) -> Self {
        Self {
            score,
            level: classify(score),
            features,
            breakdown,
        }
    }
}

/// A `(predicate, template)` pair.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&NarrativeContext<'_>) -> bool,
    pub render: fn(&NarrativeContext<'_>) -> String,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

pub fn always(_: &NarrativeContext<'_>) -> bool {
    true
}

/// Evaluate `rules` in order, collecting every firing rule, then keep the
/// first `limit`. Later rules are dropped, never reordered.
pub fn evaluate(rules: &[Rule], ctx: &NarrativeContext<'_>, limit: usize) -> Vec<String> {
    let candidates: Vec<(&'static str, String)> = rules
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| (rule.name, (rule.render)(ctx)))
        .collect();

    if candidates.len() > limit {
        let dropped: Vec<&str> = candidates[limit..].iter().map(|(name, _)| *name).collect();
        debug!(fired = candidates.len(), limit, ?dropped, "narrative rules truncated");
    }

    candidates
        .into_iter()
        .take(limit)
        .map(|(_, text)| text)
        .collect()
}
