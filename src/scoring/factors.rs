use serde::Serialize;

use super::config::{AsymmetryPenalty, BinauralConfig, RangeTable, WeightConfig};
use crate::input::{Budget, DerivedFeatures, FittingPlan, Lifestyle};

/// Share of the unilateral penalty that full asymmetry relief removes.
const ASYMMETRY_RELIEF_FACTOR: f64 = 0.7;

/// dB span over which a single ear's need rises from 0 to 1.
const NEED_SPAN_DB: f64 = 40.0;

/// Result of a range-table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMatch {
    Matched(i32),
    /// No bucket contains the value; contributes nothing.
    Unmatched,
}

impl RangeMatch {
    pub fn weight(self) -> i32 {
        match self {
            RangeMatch::Matched(weight) => weight,
            RangeMatch::Unmatched => 0,
        }
    }
}

impl RangeTable {
    /// First bucket in declaration order whose inclusive bounds contain `value`.
    pub fn lookup(&self, value: f64) -> RangeMatch {
        self.ranges
            .iter()
            .find(|range| range.contains(value))
            .map(|range| RangeMatch::Matched(range.weight))
            .unwrap_or(RangeMatch::Unmatched)
    }
}

pub fn loss_level_weight(features: &DerivedFeatures, config: &WeightConfig) -> i32 {
    config.loss_level_weights.get(features.loss_level)
}

pub fn speech_score_weight(features: &DerivedFeatures, config: &WeightConfig) -> i32 {
    config.speech_score_weights.lookup(features.speech_score).weight()
}

pub fn lifestyle_weight(features: &DerivedFeatures, config: &WeightConfig) -> i32 {
    config.lifestyle_weights.get(features.lifestyle)
}

pub fn experience_weight(features: &DerivedFeatures, config: &WeightConfig) -> i32 {
    if features.experience {
        config.experience_weight.has_experience
    } else {
        config.experience_weight.no_experience
    }
}

pub fn tinnitus_weight(features: &DerivedFeatures, config: &WeightConfig) -> i32 {
    if features.tinnitus {
        config.tinnitus_weight.has_tinnitus
    } else {
        config.tinnitus_weight.no_tinnitus
    }
}

pub fn budget_weight(features: &DerivedFeatures, config: &WeightConfig) -> i32 {
    config.budget_weights.get(features.budget)
}

pub fn type_fit_weight(features: &DerivedFeatures, config: &WeightConfig) -> i32 {
    config
        .type_mismatch_penalties
        .get(features.loss_level, features.desired_type)
}

pub fn age_adjustment(features: &DerivedFeatures, config: &WeightConfig) -> i32 {
    config.age_adjustment.lookup(features.age as f64).weight()
}

/// Penalty for left/right asymmetry beyond the configured threshold.
///
/// The result is floored toward negative infinity and then held at or above
/// `max_penalty` (the most negative value allowed).
pub fn asymmetry_penalty(asymmetry_db: f64, config: &AsymmetryPenalty) -> i32 {
    if asymmetry_db <= config.threshold_db {
        return 0;
    }
    let excess_db = asymmetry_db - config.threshold_db;
    let raw = (excess_db / 10.0 * config.penalty_per_10db).floor() as i32;
    raw.max(config.max_penalty)
}

/// Intermediate values of the unilateral-fitting penalty, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnilateralDetail {
    pub is_unilateral: bool,
    pub fitting_plan: FittingPlan,
    pub need: f64,
    pub asymmetry_relief: f64,
    pub budget_relief: f64,
    /// Clamped magnitude before flooring
    pub raw_penalty: f64,
    pub penalty: i32,
}

impl UnilateralDetail {
    pub fn bilateral() -> Self {
        Self {
            is_unilateral: false,
            fitting_plan: FittingPlan::Bilateral,
            need: 0.0,
            asymmetry_relief: 0.0,
            budget_relief: 0.0,
            raw_penalty: 0.0,
            penalty: 0,
        }
    }
}

/// Penalty for fitting a single ear when both would benefit.
///
/// Need rises with each ear's PTA above `pta_need_threshold_db`, plus
/// lifestyle and first-time bonuses. Large asymmetry and a low budget relieve
/// part of the penalty. Always `<= 0`.
pub fn unilateral_penalty(features: &DerivedFeatures, config: &BinauralConfig) -> (i32, UnilateralDetail) {
    if features.fitting_plan.is_bilateral() {
        return (0, UnilateralDetail::bilateral());
    }

    let need = binaural_need(features, config);
    let relief = asymmetry_relief(features.asymmetry_db, config);
    let budget_relief = match features.budget {
        Budget::Low => config.low_budget_penalty_relief,
        Budget::Mid | Budget::High => 0.0,
    };

    let magnitude = (config.base_unilateral_penalty
        * need
        * (1.0 - ASYMMETRY_RELIEF_FACTOR * relief)
        * (1.0 - budget_relief))
        .clamp(0.0, config.max_unilateral_penalty.max(0.0));
    let penalty = -(magnitude.floor() as i32);

    let detail = UnilateralDetail {
        is_unilateral: true,
        fitting_plan: features.fitting_plan,
        need: round2(need),
        asymmetry_relief: round2(relief),
        budget_relief: round2(budget_relief),
        raw_penalty: round2(magnitude),
        penalty,
    };
    (penalty, detail)
}

fn binaural_need(features: &DerivedFeatures, config: &BinauralConfig) -> f64 {
    let side_need =
        |pta: f64| ((pta - config.pta_need_threshold_db) / NEED_SPAN_DB).clamp(0.0, 1.0);
    let mut need = (side_need(features.pta_left) + side_need(features.pta_right)) / 2.0;

    need += match features.lifestyle {
        Lifestyle::Noisy => config.noisy_env_need_bonus,
        Lifestyle::Mixed => config.mixed_env_need_bonus,
        Lifestyle::Quiet => 0.0,
    };
    if !features.experience {
        need += config.first_time_need_bonus;
    }
    need.clamp(0.0, 1.0)
}

fn asymmetry_relief(asymmetry_db: f64, config: &BinauralConfig) -> f64 {
    let start = config.asymmetry_relief_start_db;
    let full = config.asymmetry_relief_full_db;
    if asymmetry_db <= start {
        0.0
    } else if asymmetry_db >= full {
        1.0
    } else {
        (asymmetry_db - start) / (full - start)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DeviceType, LossLevel, Thresholds};
    use crate::scoring::WeightRange;

    fn config() -> WeightConfig {
        WeightConfig::bundled().unwrap()
    }

    fn sample_features(pta_left: f64, pta_right: f64) -> DerivedFeatures {
        DerivedFeatures {
            pta_left,
            pta_right,
            pta_avg: (pta_left + pta_right) / 2.0,
            loss_level: LossLevel::Moderate,
            asymmetry_db: (pta_left - pta_right).abs(),
            speech_score: 70.0,
            speech_score_left: 70,
            speech_score_right: 70,
            age: 65,
            lifestyle: Lifestyle::Quiet,
            experience: true,
            tinnitus: false,
            budget: Budget::Mid,
            desired_type: DeviceType::Ric,
            fitting_plan: FittingPlan::UnilateralLeft,
            thresholds_left: Thresholds::default(),
            thresholds_right: Thresholds::default(),
        }
    }

    #[test]
    fn test_speech_score_weight_buckets() {
        let config = config();
        assert_eq!(config.speech_score_weights.lookup(90.0), RangeMatch::Matched(15));
        assert_eq!(config.speech_score_weights.lookup(60.0), RangeMatch::Matched(5));
        assert_eq!(config.speech_score_weights.lookup(20.0), RangeMatch::Matched(-15));
    }

    #[test]
    fn test_fractional_value_between_buckets_is_unmatched() {
        let config = config();
        let result = config.speech_score_weights.lookup(70.5);
        assert_eq!(result, RangeMatch::Unmatched);
        assert_eq!(result.weight(), 0);
    }

    #[test]
    fn test_age_adjustment_buckets() {
        let config = config();
        let mut features = sample_features(40.0, 40.0);
        features.age = 65;
        assert_eq!(age_adjustment(&features, &config), 8);
        features.age = 30;
        assert_eq!(age_adjustment(&features, &config), 3);
    }

    #[test]
    fn test_range_first_match_wins() {
        let table = RangeTable {
            ranges: vec![
                WeightRange { min: 0.0, max: 50.0, weight: 1 },
                WeightRange { min: 40.0, max: 100.0, weight: 2 },
            ],
        };
        assert_eq!(table.lookup(45.0), RangeMatch::Matched(1));
        assert_eq!(table.lookup(150.0), RangeMatch::Unmatched);
    }

    #[test]
    fn test_asymmetry_penalty_at_threshold_is_zero() {
        let config = config();
        assert_eq!(asymmetry_penalty(10.0, &config.asymmetry_penalty), 0);
        assert_eq!(asymmetry_penalty(15.0, &config.asymmetry_penalty), 0);
    }

    #[test]
    fn test_asymmetry_penalty_one_db_over_is_negative() {
        let config = config();
        // 0.1 * -5 = -0.5, floored to -1
        assert_eq!(asymmetry_penalty(16.0, &config.asymmetry_penalty), -1);
        assert_eq!(asymmetry_penalty(25.0, &config.asymmetry_penalty), -5);
    }

    #[test]
    fn test_asymmetry_penalty_floored_at_max() {
        let config = config();
        assert_eq!(asymmetry_penalty(100.0, &config.asymmetry_penalty), -12);
        assert_eq!(asymmetry_penalty(120.0, &config.asymmetry_penalty), -12);
    }

    #[test]
    fn test_unilateral_bilateral_is_zero() {
        let config = config();
        let mut features = sample_features(90.0, 90.0);
        features.fitting_plan = FittingPlan::Bilateral;
        features.lifestyle = Lifestyle::Noisy;
        features.experience = false;
        let (penalty, detail) = unilateral_penalty(&features, &config.binaural);
        assert_eq!(penalty, 0);
        assert!(!detail.is_unilateral);
    }

    #[test]
    fn test_unilateral_penalty_capped() {
        let config = config();
        let mut features = sample_features(60.0, 60.0);
        features.lifestyle = Lifestyle::Noisy;
        features.experience = false;
        // need = 0.875 + 0.2 + 0.1 -> clamped to 1; 20 * 1 -> capped at 15
        let (penalty, detail) = unilateral_penalty(&features, &config.binaural);
        assert_eq!(penalty, -15);
        assert!(detail.is_unilateral);
        assert_eq!(detail.need, 1.0);
        assert_eq!(detail.raw_penalty, 15.0);
    }

    #[test]
    fn test_unilateral_penalty_with_reliefs() {
        let config = config();
        let mut features = sample_features(45.0, 45.0);
        features.asymmetry_db = 25.0;
        features.budget = Budget::Low;
        // need 0.5, relief 0.5, budget 0.3: 20 * 0.5 * 0.65 * 0.7 = 4.55
        let (penalty, detail) = unilateral_penalty(&features, &config.binaural);
        assert_eq!(penalty, -4);
        assert_eq!(detail.need, 0.5);
        assert_eq!(detail.asymmetry_relief, 0.5);
        assert_eq!(detail.budget_relief, 0.3);
        assert_eq!(detail.raw_penalty, 4.55);
    }

    #[test]
    fn test_unilateral_full_relief() {
        let config = config();
        let mut features = sample_features(65.0, 65.0);
        features.asymmetry_db = 40.0;
        // need 1.0, relief 1.0: 20 * 0.3 = 6
        let (penalty, detail) = unilateral_penalty(&features, &config.binaural);
        assert_eq!(detail.asymmetry_relief, 1.0);
        assert_eq!(penalty, -6);
    }

    #[test]
    fn test_unilateral_no_need_below_threshold() {
        let config = config();
        let features = sample_features(20.0, 25.0);
        let (penalty, detail) = unilateral_penalty(&features, &config.binaural);
        assert_eq!(penalty, 0);
        assert!(detail.is_unilateral);
        assert_eq!(detail.need, 0.0);
    }

    #[test]
    fn test_unilateral_never_positive() {
        let config = config();
        for pta in [0.0, 30.0, 60.0, 120.0] {
            let (penalty, _) = unilateral_penalty(&sample_features(pta, pta), &config.binaural);
            assert!(penalty <= 0);
        }
    }
}
