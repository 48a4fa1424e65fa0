use serde::Serialize;
use tracing::debug;

use super::config::WeightConfig;
use super::factors::{self, UnilateralDetail};
use crate::input::DerivedFeatures;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Named scoring contributions, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Base,
    LossLevel,
    SpeechScore,
    Lifestyle,
    Experience,
    Tinnitus,
    AsymmetryPenalty,
    Budget,
    TypeFit,
    AgeAdjustment,
    UnilateralPenalty,
}

impl Factor {
    pub const ALL: [Factor; 11] = [
        Factor::Base,
        Factor::LossLevel,
        Factor::SpeechScore,
        Factor::Lifestyle,
        Factor::Experience,
        Factor::Tinnitus,
        Factor::AsymmetryPenalty,
        Factor::Budget,
        Factor::TypeFit,
        Factor::AgeAdjustment,
        Factor::UnilateralPenalty,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Factor::Base => "base",
            Factor::LossLevel => "loss_level",
            Factor::SpeechScore => "speech_score",
            Factor::Lifestyle => "lifestyle",
            Factor::Experience => "experience",
            Factor::Tinnitus => "tinnitus",
            Factor::AsymmetryPenalty => "asymmetry_penalty",
            Factor::Budget => "budget",
            Factor::TypeFit => "type_fit",
            Factor::AgeAdjustment => "age_adjustment",
            Factor::UnilateralPenalty => "unilateral_penalty",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Factor::Base => "Base score",
            Factor::LossLevel => "Hearing loss level",
            Factor::SpeechScore => "Speech recognition",
            Factor::Lifestyle => "Listening environment",
            Factor::Experience => "Hearing-aid experience",
            Factor::Tinnitus => "Tinnitus",
            Factor::AsymmetryPenalty => "Left/right asymmetry",
            Factor::Budget => "Budget",
            Factor::TypeFit => "Device form fit",
            Factor::AgeAdjustment => "Age adjustment",
            Factor::UnilateralPenalty => "Unilateral fitting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub points: i32,
}

/// Itemized result of one scoring call.
///
/// `contributions` hold the unclamped points of every factor. Once the total
/// leaves 0..=100 they no longer add up to `final_score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub contributions: Vec<FactorContribution>,
    pub unilateral_detail: UnilateralDetail,
    pub final_score: u8,
}

impl ScoreBreakdown {
    /// Points contributed by `factor`; 0 if it was not recorded.
    pub fn get(&self, factor: Factor) -> i32 {
        self.contributions
            .iter()
            .find(|c| c.factor == factor)
            .map(|c| c.points)
            .unwrap_or(0)
    }

    /// Sum of all contributions before clamping, saturating at the `i32` limits.
    pub fn raw_total(&self) -> i32 {
        saturating_total(&self.contributions)
    }

    pub fn is_clamped(&self) -> bool {
        self.raw_total() != i32::from(self.final_score)
    }
}

fn saturating_total(contributions: &[FactorContribution]) -> i32 {
    contributions
        .iter()
        .fold(0i32, |acc, c| acc.saturating_add(c.points))
}

/// Score a patient against a weight table.
///
/// Returns the clamped score in `0..=100` and the per-factor breakdown.
pub fn predict(features: &DerivedFeatures, config: &WeightConfig) -> (u8, ScoreBreakdown) {
    let (unilateral, unilateral_detail) = factors::unilateral_penalty(features, &config.binaural);

    let contributions: Vec<FactorContribution> = Factor::ALL
        .iter()
        .map(|&factor| {
            let points = match factor {
                Factor::Base => config.base_score,
                Factor::LossLevel => factors::loss_level_weight(features, config),
                Factor::SpeechScore => factors::speech_score_weight(features, config),
                Factor::Lifestyle => factors::lifestyle_weight(features, config),
                Factor::Experience => factors::experience_weight(features, config),
                Factor::Tinnitus => factors::tinnitus_weight(features, config),
                Factor::AsymmetryPenalty => {
                    factors::asymmetry_penalty(features.asymmetry_db, &config.asymmetry_penalty)
                }
                Factor::Budget => factors::budget_weight(features, config),
                Factor::TypeFit => factors::type_fit_weight(features, config),
                Factor::AgeAdjustment => factors::age_adjustment(features, config),
                Factor::UnilateralPenalty => unilateral,
            };
            debug!(factor = factor.key(), points, "factor contribution");
            FactorContribution { factor, points }
        })
        .collect();

    let raw_total = saturating_total(&contributions);
    let final_score = raw_total.clamp(MIN_SCORE, MAX_SCORE) as u8;
    debug!(raw_total, final_score, "score aggregated");

    (
        final_score,
        ScoreBreakdown {
            contributions,
            unilateral_detail,
            final_score,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{
        Budget, DeviceType, FittingPlan, Lifestyle, LossLevel, Thresholds,
    };

    fn config() -> WeightConfig {
        WeightConfig::bundled().unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    fn features(
        pta_avg: f64,
        loss_level: LossLevel,
        asymmetry_db: f64,
        speech_score: f64,
        tinnitus: bool,
        experience: bool,
        lifestyle: Lifestyle,
        budget: Budget,
        desired_type: DeviceType,
        age: u32,
    ) -> DerivedFeatures {
        DerivedFeatures {
            pta_left: pta_avg - asymmetry_db / 2.0,
            pta_right: pta_avg + asymmetry_db / 2.0,
            pta_avg,
            loss_level,
            asymmetry_db,
            speech_score,
            speech_score_left: speech_score as u32,
            speech_score_right: speech_score as u32,
            age,
            lifestyle,
            experience,
            tinnitus,
            budget,
            desired_type,
            fitting_plan: FittingPlan::Bilateral,
            thresholds_left: Thresholds::default(),
            thresholds_right: Thresholds::default(),
        }
    }

    fn favourable() -> DerivedFeatures {
        features(
            35.0,
            LossLevel::Mild,
            0.0,
            90.0,
            false,
            true,
            Lifestyle::Quiet,
            Budget::High,
            DeviceType::Ric,
            60,
        )
    }

    fn unfavourable() -> DerivedFeatures {
        features(
            80.0,
            LossLevel::Profound,
            10.0,
            25.0,
            true,
            false,
            Lifestyle::Noisy,
            Budget::Low,
            DeviceType::Cic,
            75,
        )
    }

    #[test]
    fn test_predict_basic() {
        let input = features(
            42.5,
            LossLevel::Moderate,
            5.0,
            75.0,
            false,
            true,
            Lifestyle::Mixed,
            Budget::Mid,
            DeviceType::Ric,
            65,
        );
        let (score, breakdown) = predict(&input, &config());
        // 50 + 5 + 10 + 0 + 5 + 0 + 0 + 0 + 0 + 8 + 0
        assert_eq!(score, 78);
        assert_eq!(breakdown.final_score, score);
        assert!(!breakdown.is_clamped());
    }

    #[test]
    fn test_predict_high_score_anchor() {
        let (score, _) = predict(&favourable(), &config());
        assert!(score >= 80, "score was {score}");
    }

    #[test]
    fn test_predict_low_score_anchor() {
        let (score, _) = predict(&unfavourable(), &config());
        assert!(score <= 60, "score was {score}");
    }

    #[test]
    fn test_breakdown_completeness_and_order() {
        let (_, breakdown) = predict(&favourable(), &config());
        let order: Vec<Factor> = breakdown.contributions.iter().map(|c| c.factor).collect();
        assert_eq!(order, Factor::ALL.to_vec());
    }

    #[test]
    fn test_clamped_breakdown_keeps_raw_points() {
        let mut input = unfavourable();
        input.pta_avg = 90.0;
        input.asymmetry_db = 40.0;
        input.speech_score = 10.0;
        input.age = 80;
        let (score, breakdown) = predict(&input, &config());
        assert_eq!(score, 0);
        assert!(breakdown.raw_total() < 0);
        assert!(breakdown.is_clamped());
        assert_eq!(breakdown.get(Factor::AsymmetryPenalty), -12);
    }

    #[test]
    fn test_score_clamped_at_top() {
        let mut config = config();
        config.base_score = 500;
        let (score, breakdown) = predict(&favourable(), &config);
        assert_eq!(score, 100);
        assert_eq!(breakdown.get(Factor::Base), 500);
    }

    #[test]
    fn test_extreme_weights_saturate_instead_of_overflowing() {
        let mut config = config();
        config.loss_level_weights.mild = i32::MAX;
        config.lifestyle_weights.quiet = i32::MAX;
        let (score, breakdown) = predict(&favourable(), &config);
        assert_eq!(score, 100);
        assert_eq!(breakdown.raw_total(), i32::MAX);

        config.loss_level_weights.mild = i32::MIN;
        config.lifestyle_weights.quiet = i32::MIN;
        let (score, breakdown) = predict(&favourable(), &config);
        assert_eq!(score, 0);
        assert!(breakdown.raw_total() < i32::MIN / 2);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let config = config();
        let input = unfavourable();
        let first = predict(&input, &config);
        let second = predict(&input, &config);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.1).unwrap(),
            serde_json::to_string(&second.1).unwrap()
        );
    }

    #[test]
    fn test_unilateral_contribution_recorded() {
        let mut input = favourable();
        input.fitting_plan = FittingPlan::UnilateralRight;
        input.pta_left = 60.0;
        input.pta_right = 60.0;
        let (_, breakdown) = predict(&input, &config());
        assert!(breakdown.unilateral_detail.is_unilateral);
        assert_eq!(
            breakdown.get(Factor::UnilateralPenalty),
            breakdown.unilateral_detail.penalty
        );
        assert!(breakdown.get(Factor::UnilateralPenalty) < 0);
    }

    #[test]
    fn test_score_in_range_across_grid() {
        let config = config();
        for level in [LossLevel::Mild, LossLevel::Moderate, LossLevel::Severe, LossLevel::Profound] {
            for device in [DeviceType::Bte, DeviceType::Ric, DeviceType::Ite, DeviceType::Cic] {
                for plan in [FittingPlan::Bilateral, FittingPlan::UnilateralLeft] {
                    let mut input = unfavourable();
                    input.loss_level = level;
                    input.desired_type = device;
                    input.fitting_plan = plan;
                    let (score, breakdown) = predict(&input, &config);
                    assert_eq!(i32::from(score), breakdown.raw_total().clamp(0, 100));
                }
            }
        }
    }
}
