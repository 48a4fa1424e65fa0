use semver::Version;

use super::config::{RangeTable, WeightConfig};
use crate::input::LossLevel;

/// Major version of the weight table layout this build understands.
pub const SUPPORTED_MAJOR_VERSION: u64 = 1;

const SPEECH_SCORE_DOMAIN: (u32, u32) = (0, 100);
const AGE_DOMAIN: (u32, u32) = (0, 110);

/// Every integer weight, and the unilateral penalty cap, stays within
/// `-MAX_WEIGHT_MAGNITUDE..=MAX_WEIGHT_MAGNITUDE`.
pub const MAX_WEIGHT_MAGNITUDE: i32 = 100;

/// Validate a weight table at load time.
/// Returns all validation errors at once (not just the first).
pub fn validate_weights(config: &WeightConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    match Version::parse(&config.version) {
        Ok(version) if version.major == SUPPORTED_MAJOR_VERSION => {}
        Ok(version) => errors.push(format!(
            "version: unsupported major version {} (expected {})",
            version.major, SUPPORTED_MAJOR_VERSION
        )),
        Err(e) => errors.push(format!("version: invalid '{}' - {}", config.version, e)),
    }

    if !(0..=100).contains(&config.base_score) {
        errors.push("base_score: must be within 0-100".to_string());
    }

    for (name, value) in named_weights(config) {
        if !(-MAX_WEIGHT_MAGNITUDE..=MAX_WEIGHT_MAGNITUDE).contains(&value) {
            errors.push(format!(
                "{}: {} is outside -{}..={}",
                name, value, MAX_WEIGHT_MAGNITUDE, MAX_WEIGHT_MAGNITUDE
            ));
        }
    }

    validate_ranges(
        "speech_score_weights",
        &config.speech_score_weights,
        SPEECH_SCORE_DOMAIN,
        &mut errors,
    );
    validate_ranges("age_adjustment", &config.age_adjustment, AGE_DOMAIN, &mut errors);

    let asym = &config.asymmetry_penalty;
    if !(asym.threshold_db >= 0.0) {
        errors.push("asymmetry_penalty.threshold_db: must be non-negative".to_string());
    }
    if !(asym.penalty_per_10db <= 0.0) {
        errors.push("asymmetry_penalty.penalty_per_10db: must be zero or negative".to_string());
    }
    if asym.max_penalty > 0 {
        errors.push("asymmetry_penalty.max_penalty: must be zero or negative".to_string());
    }

    let bin = &config.binaural;
    if !(bin.pta_need_threshold_db >= 0.0) {
        errors.push("binaural.pta_need_threshold_db: must be non-negative".to_string());
    }
    for (name, value) in [
        ("noisy_env_need_bonus", bin.noisy_env_need_bonus),
        ("mixed_env_need_bonus", bin.mixed_env_need_bonus),
        ("first_time_need_bonus", bin.first_time_need_bonus),
        ("low_budget_penalty_relief", bin.low_budget_penalty_relief),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(format!("binaural.{}: must be within 0-1", name));
        }
    }
    if !(bin.asymmetry_relief_start_db < bin.asymmetry_relief_full_db) {
        errors.push(
            "binaural.asymmetry_relief_start_db: must be below asymmetry_relief_full_db"
                .to_string(),
        );
    }
    if !(bin.base_unilateral_penalty >= 0.0) {
        errors.push("binaural.base_unilateral_penalty: must be non-negative".to_string());
    }
    if !(bin.max_unilateral_penalty >= 0.0) {
        errors.push("binaural.max_unilateral_penalty: must be non-negative".to_string());
    } else if bin.max_unilateral_penalty > f64::from(MAX_WEIGHT_MAGNITUDE) {
        errors.push(format!(
            "binaural.max_unilateral_penalty: must not exceed {}",
            MAX_WEIGHT_MAGNITUDE
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every integer weight in the table, named by its document path.
fn named_weights(config: &WeightConfig) -> Vec<(String, i32)> {
    let loss = &config.loss_level_weights;
    let life = &config.lifestyle_weights;
    let budget = &config.budget_weights;
    let mut weights: Vec<(String, i32)> = [
        ("loss_level_weights.mild", loss.mild),
        ("loss_level_weights.moderate", loss.moderate),
        ("loss_level_weights.severe", loss.severe),
        ("loss_level_weights.profound", loss.profound),
        ("lifestyle_weights.quiet", life.quiet),
        ("lifestyle_weights.mixed", life.mixed),
        ("lifestyle_weights.noisy", life.noisy),
        ("experience_weight.has_experience", config.experience_weight.has_experience),
        ("experience_weight.no_experience", config.experience_weight.no_experience),
        ("tinnitus_weight.has_tinnitus", config.tinnitus_weight.has_tinnitus),
        ("tinnitus_weight.no_tinnitus", config.tinnitus_weight.no_tinnitus),
        ("budget_weights.low", budget.low),
        ("budget_weights.mid", budget.mid),
        ("budget_weights.high", budget.high),
        ("asymmetry_penalty.max_penalty", config.asymmetry_penalty.max_penalty),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();

    for level in [LossLevel::Mild, LossLevel::Moderate, LossLevel::Severe, LossLevel::Profound] {
        for (device, value) in config.type_mismatch_penalties.row(level).entries() {
            weights.push((
                format!("type_mismatch_penalties.{}.{}", level.as_str(), device.code()),
                value,
            ));
        }
    }

    for (name, table) in [
        ("speech_score_weights", &config.speech_score_weights),
        ("age_adjustment", &config.age_adjustment),
    ] {
        for (i, range) in table.ranges.iter().enumerate() {
            weights.push((format!("{}.ranges[{}].weight", name, i), range.weight));
        }
    }

    weights
}

/// Buckets must be well-formed, disjoint, and cover every whole value of the domain.
fn validate_ranges(name: &str, table: &RangeTable, domain: (u32, u32), errors: &mut Vec<String>) {
    if table.ranges.is_empty() {
        errors.push(format!("{}.ranges: must not be empty", name));
        return;
    }

    for (i, range) in table.ranges.iter().enumerate() {
        if !(range.min <= range.max) {
            errors.push(format!(
                "{}.ranges[{}]: min {} is greater than max {}",
                name, i, range.min, range.max
            ));
        }
    }

    for (i, a) in table.ranges.iter().enumerate() {
        for (j, b) in table.ranges.iter().enumerate().skip(i + 1) {
            if a.min <= b.max && b.min <= a.max {
                errors.push(format!("{}.ranges[{}] overlaps ranges[{}]", name, i, j));
            }
        }
    }

    let uncovered: Vec<u32> = (domain.0..=domain.1)
        .filter(|&v| !table.ranges.iter().any(|r| r.contains(v as f64)))
        .collect();
    if let (Some(first), Some(last)) = (uncovered.first(), uncovered.last()) {
        errors.push(format!(
            "{}.ranges: {} value(s) in {}-{} not covered (first {}, last {})",
            name,
            uncovered.len(),
            domain.0,
            domain.1,
            first,
            last
        ));
    }
}
