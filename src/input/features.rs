use serde::Serialize;
use tracing::debug;

use super::types::{
    Budget, DeviceType, Ear, EarInput, FittingPlan, Lifestyle, LossLevel, RawInput, Thresholds,
};
use crate::error::InputError;

const MAX_THRESHOLD_DB: f64 = 120.0;
const MAX_SPEECH_SCORE: f64 = 100.0;
const MAX_AGE: f64 = 110.0;
const MIN_CONSULT_AGE: u32 = 10;

/// Engine-ready view of one patient. Produced by [`derive_features`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFeatures {
    pub pta_left: f64,
    pub pta_right: f64,
    pub pta_avg: f64,
    pub loss_level: LossLevel,
    pub asymmetry_db: f64,
    /// Unrounded mean of the two ear scores
    pub speech_score: f64,
    pub speech_score_left: u32,
    pub speech_score_right: u32,
    pub age: u32,
    pub lifestyle: Lifestyle,
    pub experience: bool,
    pub tinnitus: bool,
    pub budget: Budget,
    pub desired_type: DeviceType,
    pub fitting_plan: FittingPlan,
    pub thresholds_left: Thresholds,
    pub thresholds_right: Thresholds,
}

impl DerivedFeatures {
    pub fn pta(&self, ear: Ear) -> f64 {
        match ear {
            Ear::Left => self.pta_left,
            Ear::Right => self.pta_right,
        }
    }
}

/// Classify an average PTA into its loss band. Upper edges are exclusive.
pub fn classify_loss_level(pta: f64) -> LossLevel {
    if pta < 40.0 {
        LossLevel::Mild
    } else if pta < 55.0 {
        LossLevel::Moderate
    } else if pta < 70.0 {
        LossLevel::Severe
    } else {
        LossLevel::Profound
    }
}

/// Resolve the PTA for one ear: direct value first, otherwise the mean of the
/// 500/1000/2000/4000 Hz thresholds.
pub fn ear_pta(ear: Ear, input: &EarInput) -> Result<f64, InputError> {
    if let Some(pta) = input.pta {
        return Ok(pta);
    }
    match input.thresholds.core() {
        Some(core) => Ok(core.iter().sum::<f64>() / 4.0),
        None => Err(InputError::MissingAudiometricData { ear }),
    }
}

/// Convert a raw intake record into the feature set consumed by scoring.
///
/// Range violations are collected and reported together; a missing
/// audiometric source stops derivation at the first ear that lacks one.
pub fn derive_features(input: &RawInput) -> Result<DerivedFeatures, InputError> {
    validate_ranges(input)?;

    let pta_left = ear_pta(Ear::Left, &input.left)?;
    let pta_right = ear_pta(Ear::Right, &input.right)?;
    let pta_avg = (pta_left + pta_right) / 2.0;

    let asymmetry_db = input
        .asymmetry_db
        .unwrap_or_else(|| (pta_left - pta_right).abs());

    let speech_score =
        (input.left.speech_score as f64 + input.right.speech_score as f64) / 2.0;

    let loss_level = classify_loss_level(pta_avg);
    debug!(
        pta_left,
        pta_right,
        pta_avg,
        asymmetry_db,
        speech_score,
        loss_level = loss_level.as_str(),
        "derived features"
    );

    Ok(DerivedFeatures {
        pta_left,
        pta_right,
        pta_avg,
        loss_level,
        asymmetry_db,
        speech_score,
        speech_score_left: input.left.speech_score,
        speech_score_right: input.right.speech_score,
        age: input.age,
        lifestyle: input.lifestyle,
        experience: input.experience,
        tinnitus: input.tinnitus,
        budget: input.budget,
        desired_type: input.desired_type,
        fitting_plan: input.fitting_plan,
        thresholds_left: input.left.thresholds.clone(),
        thresholds_right: input.right.thresholds.clone(),
    })
}

fn validate_ranges(input: &RawInput) -> Result<(), InputError> {
    let mut errors = Vec::new();

    for ear in [Ear::Left, Ear::Right] {
        let ear_input = input.ear(ear);
        for (hz, value) in ear_input.thresholds.points() {
            check_range(&mut errors, format!("{ear}.{hz}hz"), value, MAX_THRESHOLD_DB);
        }
        if let Some(pta) = ear_input.pta {
            check_range(&mut errors, format!("{ear}.pta"), pta, MAX_THRESHOLD_DB);
        }
        check_range(
            &mut errors,
            format!("{ear}.speech_score"),
            ear_input.speech_score as f64,
            MAX_SPEECH_SCORE,
        );
    }

    if let Some(asymmetry) = input.asymmetry_db {
        check_range(&mut errors, "asymmetry_db".to_string(), asymmetry, MAX_THRESHOLD_DB);
    }

    if input.age as f64 > MAX_AGE {
        check_range(&mut errors, "age".to_string(), input.age as f64, MAX_AGE);
    } else if input.age < MIN_CONSULT_AGE {
        errors.push(InputError::AgeBelowMinimum { age: input.age });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(InputError::Invalid(errors)),
    }
}

fn check_range(errors: &mut Vec<InputError>, field: String, value: f64, max: f64) {
    if !(0.0..=max).contains(&value) {
        errors.push(InputError::OutOfRange {
            field,
            value,
            min: 0.0,
            max,
        });
    }
}
