//! Patient-facing summary paragraph.
//!
//! Rules fire in priority order and the paragraph keeps at most
//! [`MAX_SUMMARY_SENTENCES`] of them.

use super::rules::{always, evaluate, NarrativeContext, Rule};
use crate::input::{DerivedFeatures, Lifestyle};
use crate::scoring::{Factor, SatisfactionLevel, ScoreBreakdown};

pub const MAX_SUMMARY_SENTENCES: usize = 6;

pub const SUMMARY_RULES: &[Rule] = &[
    Rule {
        name: "opening",
        applies: always,
        render: opening,
    },
    Rule {
        name: "realistic_goal",
        applies: always,
        render: realistic_goal,
    },
    Rule {
        name: "noisy_lifestyle",
        applies: is_noisy,
        render: noisy_lifestyle,
    },
    Rule {
        name: "quiet_lifestyle",
        applies: is_quiet,
        render: quiet_lifestyle,
    },
    Rule {
        name: "low_speech_score",
        applies: has_low_speech_score,
        render: low_speech_score,
    },
    Rule {
        name: "tinnitus",
        applies: has_tinnitus,
        render: tinnitus,
    },
    Rule {
        name: "first_time_user",
        applies: is_first_time,
        render: first_time_user,
    },
    Rule {
        name: "experienced_user",
        applies: is_experienced,
        render: experienced_user,
    },
    Rule {
        name: "unilateral_fitting",
        applies: is_unilateral,
        render: unilateral_fitting,
    },
    Rule {
        name: "large_asymmetry",
        applies: has_large_asymmetry,
        render: large_asymmetry,
    },
    Rule {
        name: "device_form_mismatch",
        applies: has_type_mismatch,
        render: device_form_mismatch,
    },
];

/// Summarize a prediction as a short paragraph (at most six sentences).
pub fn summarize(score: u8, features: &DerivedFeatures, breakdown: &ScoreBreakdown) -> String {
    let ctx = NarrativeContext::new(score, features, breakdown);
    evaluate(SUMMARY_RULES, &ctx, MAX_SUMMARY_SENTENCES).join(" ")
}

fn opening(ctx: &NarrativeContext<'_>) -> String {
    let expectation = match ctx.level {
        SatisfactionLevel::VeryHigh => "you are likely to be very satisfied with your hearing aids.",
        SatisfactionLevel::High => "getting used to hearing aids should go relatively smoothly.",
        SatisfactionLevel::Moderate => {
            "consistent daily wear and follow-up fine-tuning can raise satisfaction further."
        }
        SatisfactionLevel::Low => {
            "the first weeks may be challenging, but counselling and fine-tuning can improve the outcome."
        }
        SatisfactionLevel::VeryLow => {
            "close follow-up with your hearing care professional is needed, together with adjusted expectations."
        }
    };
    format!(
        "Predicted satisfaction is {} out of 100, a {} level: {}",
        ctx.score, ctx.level, expectation
    )
}

fn realistic_goal(ctx: &NarrativeContext<'_>) -> String {
    if ctx.features.loss_level.is_severe_or_worse() {
        "Hearing aids will not restore normal hearing; the goal is better understanding in conversation and less listening fatigue.".to_string()
    } else {
        "Hearing aids can make everyday conversation clearer and make social situations easier to take part in.".to_string()
    }
}

fn is_noisy(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.lifestyle == Lifestyle::Noisy
}

fn noisy_lifestyle(_: &NarrativeContext<'_>) -> String {
    "In noisy places hearing aids alone may not give perfect clarity, so noise programs and adjusting your surroundings will matter.".to_string()
}

fn is_quiet(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.lifestyle == Lifestyle::Quiet
}

fn quiet_lifestyle(_: &NarrativeContext<'_>) -> String {
    "Because you mostly spend time in quiet settings, you are likely to notice the benefit of hearing aids more easily.".to_string()
}

fn has_low_speech_score(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.speech_score < 50.0
}

fn low_speech_score(_: &NarrativeContext<'_>) -> String {
    "With lower speech recognition, getting used to the new sound matters more at first than instant clarity; wear the aids steadily through a 2-4 week adjustment period.".to_string()
}

fn has_tinnitus(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.tinnitus
}

fn tinnitus(_: &NarrativeContext<'_>) -> String {
    "Since you experience tinnitus, consider hearing aids with tinnitus relief features such as sound generators, or a specialist consultation.".to_string()
}

fn is_first_time(ctx: &NarrativeContext<'_>) -> bool {
    !ctx.features.experience
}

fn first_time_user(_: &NarrativeContext<'_>) -> String {
    "For first-time users the first 2-4 weeks largely decide long-term satisfaction; increase daily wearing time gradually and ask for adjustments as soon as something feels wrong.".to_string()
}

fn is_experienced(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.experience
}

fn experienced_user(_: &NarrativeContext<'_>) -> String {
    "Your previous hearing-aid experience should help you adapt to new devices fairly quickly.".to_string()
}

fn is_unilateral(ctx: &NarrativeContext<'_>) -> bool {
    ctx.breakdown.unilateral_detail.is_unilateral
}

fn unilateral_fitting(_: &NarrativeContext<'_>) -> String {
    "Fitting only one ear when both have hearing loss can reduce sound localisation and hearing in noise, lowering satisfaction; discuss a bilateral fitting with your professional before deciding.".to_string()
}

fn has_large_asymmetry(ctx: &NarrativeContext<'_>) -> bool {
    ctx.features.asymmetry_db > 20.0
}

fn large_asymmetry(_: &NarrativeContext<'_>) -> String {
    "The difference between your ears is large, so balancing two hearing aids may take extra time.".to_string()
}

fn has_type_mismatch(ctx: &NarrativeContext<'_>) -> bool {
    ctx.breakdown.get(Factor::TypeFit) < 0
}

fn device_form_mismatch(ctx: &NarrativeContext<'_>) -> String {
    format!(
        "The {} ({}) style you asked for may not be ideal for your current hearing; ask your professional about better-suited forms.",
        ctx.features.desired_type.description(),
        ctx.features.desired_type.code()
    )
}
