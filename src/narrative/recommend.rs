use super::rules::{always, evaluate, NarrativeContext, Rule};
use crate::input::{Budget, DerivedFeatures, Lifestyle, LossLevel};
use crate::scoring::ScoreBreakdown;

pub const MAX_RECOMMENDATIONS: usize = 5;

/// Scores below this, combined with a low budget, trigger the subsidy hint.
const SUBSIDY_SCORE_CEILING: u8 = 60;

pub const RECOMMENDATION_RULES: &[Rule] = &[
    Rule {
        name: "baseline",
        applies: always,
        render: baseline,
    },
    Rule {
        name: "profound_loss",
        applies: is_profound,
        render: profound_loss,
    },
    Rule {
        name: "mild_loss",
        applies: is_mild,
        render: mild_loss,
    },
    Rule {
        name: "auditory_training",
        applies: has_very_low_speech_score,
        render: auditory_training,
    },
    Rule {
        name: "directional_microphones",
        applies: is_noisy,
        render: directional_microphones,
    },
    Rule {
        name: "gradual_wearing_schedule",
        applies: is_first_time,
        render: gradual_wearing_schedule,
    },
    Rule {
        name: "subsidy_programmes",
        applies: is_budget_constrained,
        render: subsidy_programmes,
    },
    Rule {
        name: "tinnitus_therapy",
        applies: has_tinnitus,
        render: tinnitus_therapy,
    },
    Rule {
        name: "reconsider_bilateral",
        applies: is_unilateral,
        render: reconsider_bilateral,
    },
];

/// Ordered follow-up recommendations, at most five.
pub fn recommend(score: u8, features: &DerivedFeatures, breakdown: &ScoreBreakdown) -> Vec<String> {
    let ctx = NarrativeContext::new(score, features, breakdown);
    evaluate(RECOMMENDATION_RULES, &ctx, MAX_RECOMMENDATIONS)
}

fn baseline(ctx: &NarrativeContext<'_>) -> String {
    let text = match ctx.score {
        85.. => "Satisfaction is expected to be high under current conditions. Keep it that way with regular check-ups.",
        70..=84 => "Good satisfaction is expected. If anything feels uncomfortable during the first weeks, have it adjusted right away.",
        55..=69 => "Allow plenty of time to adapt and meet your professional regularly to improve step by step.",
        _ => "Close consultation with a professional is needed. Set realistic expectations and ask for tailored counselling.",
    };
    text.to_string()
}

fn is_profound(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.loss_level == LossLevel::Profound
}

fn profound_loss(_: &NarrativeContext<'_>) -> String {
    "With a profound loss, also ask about other rehabilitation options such as a cochlear implant evaluation.".to_string()
}

fn is_mild(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.loss_level == LossLevel::Mild
}

fn mild_loss(_: &NarrativeContext<'_>) -> String {
    "With a mild loss you can expect a clear improvement in everyday conversation.".to_string()
}

fn has_very_low_speech_score(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.speech_score < 40.0
}

fn auditory_training(_: &NarrativeContext<'_>) -> String {
    "Auditory training (a listening rehabilitation program) alongside the hearing aids can improve results when speech recognition is low.".to_string()
}

fn is_noisy(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.lifestyle == Lifestyle::Noisy
}

fn directional_microphones(_: &NarrativeContext<'_>) -> String {
    "For noisy environments, consider a higher-tier model with directional microphones.".to_string()
}

fn is_first_time(ctx: &NarrativeContext<'_>) -> bool {
    !ctx.features.experience
}

fn gradual_wearing_schedule(_: &NarrativeContext<'_>) -> String {
    "For the first two weeks start with 2-4 hours a day and increase wearing time gradually.".to_string()
}

fn is_budget_constrained(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.budget == Budget::Low && ctx.score < SUBSIDY_SCORE_CEILING
}

fn subsidy_programmes(_: &NarrativeContext<'_>) -> String {
    "If budget is limited, check hearing-aid subsidy programs first.".to_string()
}

fn has_tinnitus(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.tinnitus
}

fn tinnitus_therapy(_: &NarrativeContext<'_>) -> String {
    "Tinnitus retraining therapy (TRT) or sound therapy alongside the hearing aids can help manage tinnitus.".to_string()
}

fn is_unilateral(ctx: &NarrativeContext<'_>) -> bool {
    ctx.breakdown.unilateral_detail.is_unilateral
}

fn reconsider_bilateral(_: &NarrativeContext<'_>) -> String {
    "With hearing loss in both ears, a single aid can cost you sound localisation and hearing in noise. Reconsider a bilateral fitting if possible.".to_string()
}
