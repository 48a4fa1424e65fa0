use std::io::IsTerminal;

use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::input::{ConsultationNotes, DerivedFeatures};
use crate::narrative::{recommend, summarize};
use crate::scoring::{classify, Factor, SatisfactionLevel, ScoreBreakdown};

/// Wrap width used when stdout is not a terminal.
const DEFAULT_WIDTH: usize = 80;
/// Paragraphs never grow wider than this, even on wide terminals.
const MAX_WIDTH: usize = 100;
const INDENT: &str = "  ";
const LABEL_WIDTH: usize = 24;

/// Everything shown to the user for one prediction.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub score: u8,
    pub level: SatisfactionLevel,
    pub features: &'a DerivedFeatures,
    pub breakdown: &'a ScoreBreakdown,
    pub summary: String,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a ConsultationNotes>,
}

impl<'a> Report<'a> {
    /// Run the narrative layer over a finished prediction.
    pub fn new(
        score: u8,
        features: &'a DerivedFeatures,
        breakdown: &'a ScoreBreakdown,
        notes: Option<&'a ConsultationNotes>,
    ) -> Self {
        Self {
            score,
            level: classify(score),
            features,
            breakdown,
            summary: summarize(score, features, breakdown),
            recommendations: recommend(score, features, breakdown),
            notes: notes.filter(|n| !is_empty_notes(n)),
        }
    }
}

fn is_empty_notes(notes: &ConsultationNotes) -> bool {
    notes.customer_name.is_none() && notes.main_complaints.is_empty() && notes.wearing_goal.is_none()
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render points with an explicit sign ("+5", "-12", "0").
pub fn format_points(points: i32) -> String {
    if points > 0 {
        format!("+{}", points)
    } else {
        points.to_string()
    }
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

fn colored_points(points: i32, use_colors: bool) -> String {
    let text = format!("{:>5}", format_points(points));
    if !use_colors {
        return text;
    }
    match points {
        p if p > 0 => text.green().to_string(),
        p if p < 0 => text.red().to_string(),
        _ => text.dimmed().to_string(),
    }
}

fn colored_score(score: u8, level: SatisfactionLevel, use_colors: bool) -> String {
    let text = format!("{} / 100 ({})", score, level);
    if !use_colors {
        return text;
    }
    match level {
        SatisfactionLevel::VeryHigh | SatisfactionLevel::High => text.green().bold().to_string(),
        SatisfactionLevel::Moderate => text.yellow().bold().to_string(),
        SatisfactionLevel::Low | SatisfactionLevel::VeryLow => text.red().bold().to_string(),
    }
}

fn format_profile(features: &DerivedFeatures) -> Vec<String> {
    vec![
        format!(
            "PTA: left {:.1} / right {:.1} dB HL (average {:.1}, {})",
            features.pta_left,
            features.pta_right,
            features.pta_avg,
            features.loss_level.description()
        ),
        format!("Asymmetry: {:.1} dB", features.asymmetry_db),
        format!(
            "Speech recognition: {:.1}% (left {} / right {})",
            features.speech_score, features.speech_score_left, features.speech_score_right
        ),
        format!(
            "Age {}, {} lifestyle, {}, {}",
            features.age,
            features.lifestyle.as_str(),
            if features.experience { "experienced user" } else { "first-time user" },
            if features.tinnitus { "tinnitus" } else { "no tinnitus" }
        ),
        format!(
            "Device: {} ({}), {} fitting, {} budget",
            features.desired_type.code(),
            features.desired_type.description(),
            features.fitting_plan.as_str(),
            features.budget.as_str()
        ),
    ]
}

fn format_notes(notes: &ConsultationNotes) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(name) = &notes.customer_name {
        lines.push(format!("Customer: {}", name));
    }
    if !notes.main_complaints.is_empty() {
        lines.push(format!("Main complaints: {}", notes.main_complaints.join(", ")));
    }
    if let Some(goal) = &notes.wearing_goal {
        lines.push(format!("Wearing goal: {}", goal));
    }
    lines
}

/// Format the per-factor breakdown, one factor per line plus a total line.
pub fn format_breakdown(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let mut lines: Vec<String> = breakdown
        .contributions
        .iter()
        .map(|c| {
            format!(
                "{}{:<width$}{}",
                INDENT,
                c.factor.label(),
                colored_points(c.points, use_colors),
                width = LABEL_WIDTH
            )
        })
        .collect();

    let total = if breakdown.is_clamped() {
        format!(
            "{}{:<width$}{:>5}  (raw {}, clamped to 0-100)",
            INDENT,
            "Total",
            breakdown.final_score,
            breakdown.raw_total(),
            width = LABEL_WIDTH
        )
    } else {
        format!(
            "{}{:<width$}{:>5}",
            INDENT,
            "Total",
            breakdown.final_score,
            width = LABEL_WIDTH
        )
    };
    lines.push(if use_colors { total.bold().to_string() } else { total });

    let detail = &breakdown.unilateral_detail;
    if detail.is_unilateral {
        let text = format!(
            "{}{} detail: plan {}, need {:.2}, asymmetry relief {:.2}, budget relief {:.2}, raw penalty {:.2}",
            INDENT,
            Factor::UnilateralPenalty.label(),
            detail.fitting_plan.as_str(),
            detail.need,
            detail.asymmetry_relief,
            detail.budget_relief,
            detail.raw_penalty
        );
        lines.push(if use_colors { text.dimmed().to_string() } else { text });
    }

    lines.join("\n")
}

/// Format a full report for the terminal.
///
/// `width` is the wrap width for the summary paragraph; `None` uses the
/// terminal width (or 80 columns for pipes).
pub fn format_report(report: &Report<'_>, width: Option<usize>, use_colors: bool) -> String {
    let width = width
        .or_else(get_terminal_width)
        .unwrap_or(DEFAULT_WIDTH)
        .min(MAX_WIDTH)
        .saturating_sub(INDENT.len());

    let mut sections = Vec::new();

    let mut header = vec![
        heading("Satisfaction prediction", use_colors),
        format!(
            "{}Score: {}",
            INDENT,
            colored_score(report.score, report.level, use_colors)
        ),
    ];
    if let Some(notes) = report.notes {
        header.extend(format_notes(notes).into_iter().map(|l| format!("{}{}", INDENT, l)));
    }
    sections.push(header.join("\n"));

    let mut profile = vec![heading("Patient profile", use_colors)];
    profile.extend(
        format_profile(report.features)
            .into_iter()
            .map(|l| format!("{}{}", INDENT, l)),
    );
    sections.push(profile.join("\n"));

    sections.push(format!(
        "{}\n{}",
        heading("Score breakdown", use_colors),
        format_breakdown(report.breakdown, use_colors)
    ));

    let mut summary = vec![heading("Summary", use_colors)];
    summary.extend(
        wrap_text(&report.summary, width)
            .into_iter()
            .map(|l| format!("{}{}", INDENT, l)),
    );
    sections.push(summary.join("\n"));

    let mut recs = vec![heading("Recommendations", use_colors)];
    for (i, rec) in report.recommendations.iter().enumerate() {
        let prefix = format!("{}{}. ", INDENT, i + 1);
        let continuation = " ".repeat(prefix.len());
        let wrapped = wrap_text(rec, width.saturating_sub(prefix.len() - INDENT.len()));
        for (j, line) in wrapped.into_iter().enumerate() {
            let lead = if j == 0 { &prefix } else { &continuation };
            recs.push(format!("{}{}", lead, line));
        }
    }
    sections.push(recs.join("\n"));

    sections.join("\n\n")
}

/// Format a report as pretty-printed JSON for scripting.
pub fn format_json(report: &Report<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
