use serde::{Deserialize, Serialize};

use crate::input::{Budget, DeviceType, Lifestyle, LossLevel};

/// The weight table shipped with the crate.
pub const BUNDLED_WEIGHTS_JSON: &str = include_str!("../../data/weights.default.json");

/// Complete weight table for the satisfaction model.
///
/// Every categorical table is a record keyed by the enumerated values, so a
/// document that misses a key (or adds an unknown one) fails to parse rather
/// than scoring silently as zero.
///
/// Example (abridged) YAML:
/// ```yaml
/// version: "1.0.0"
/// base_score: 50
/// loss_level_weights: { mild: 10, moderate: 5, severe: -5, profound: -15 }
/// speech_score_weights:
///   ranges:
///     - { min: 0, max: 30, weight: -15 }
///     - { min: 31, max: 100, weight: 10 }
/// asymmetry_penalty: { threshold_db: 15, penalty_per_10db: -5, max_penalty: -12 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    /// Semantic version of the table layout
    pub version: String,
    pub base_score: i32,
    pub loss_level_weights: LossLevelWeights,
    pub speech_score_weights: RangeTable,
    pub lifestyle_weights: LifestyleWeights,
    pub experience_weight: ExperienceWeights,
    pub tinnitus_weight: TinnitusWeights,
    pub asymmetry_penalty: AsymmetryPenalty,
    pub budget_weights: BudgetWeights,
    pub type_mismatch_penalties: TypeMismatchTable,
    pub age_adjustment: RangeTable,
    pub binaural: BinauralConfig,
}

impl WeightConfig {
    /// Parse the bundled default table.
    ///
    /// The bundled document is covered by tests, so parsing it cannot fail in
    /// a released build; callers that want validation go through
    /// [`crate::config::load_weights`].
    pub fn bundled() -> Result<Self, serde_json::Error> {
        serde_json::from_str(BUNDLED_WEIGHTS_JSON)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LossLevelWeights {
    pub mild: i32,
    pub moderate: i32,
    pub severe: i32,
    pub profound: i32,
}

impl LossLevelWeights {
    pub fn get(&self, level: LossLevel) -> i32 {
        match level {
            LossLevel::Mild => self.mild,
            LossLevel::Moderate => self.moderate,
            LossLevel::Severe => self.severe,
            LossLevel::Profound => self.profound,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LifestyleWeights {
    pub quiet: i32,
    pub mixed: i32,
    pub noisy: i32,
}

impl LifestyleWeights {
    pub fn get(&self, lifestyle: Lifestyle) -> i32 {
        match lifestyle {
            Lifestyle::Quiet => self.quiet,
            Lifestyle::Mixed => self.mixed,
            Lifestyle::Noisy => self.noisy,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExperienceWeights {
    pub has_experience: i32,
    pub no_experience: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TinnitusWeights {
    pub has_tinnitus: i32,
    pub no_tinnitus: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BudgetWeights {
    pub low: i32,
    pub mid: i32,
    pub high: i32,
}

impl BudgetWeights {
    pub fn get(&self, budget: Budget) -> i32 {
        match budget {
            Budget::Low => self.low,
            Budget::Mid => self.mid,
            Budget::High => self.high,
        }
    }
}

/// Weight for a desired device form, per loss level.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeviceWeights {
    #[serde(rename = "BTE")]
    pub bte: i32,
    #[serde(rename = "RIC")]
    pub ric: i32,
    #[serde(rename = "ITE")]
    pub ite: i32,
    #[serde(rename = "CIC")]
    pub cic: i32,
}

impl DeviceWeights {
    pub fn get(&self, device: DeviceType) -> i32 {
        match device {
            DeviceType::Bte => self.bte,
            DeviceType::Ric => self.ric,
            DeviceType::Ite => self.ite,
            DeviceType::Cic => self.cic,
        }
    }

    pub fn entries(&self) -> [(DeviceType, i32); 4] {
        [
            (DeviceType::Bte, self.bte),
            (DeviceType::Ric, self.ric),
            (DeviceType::Ite, self.ite),
            (DeviceType::Cic, self.cic),
        ]
    }
}

/// 2-D table of device-form fit keyed by (loss level, desired device).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TypeMismatchTable {
    pub mild: DeviceWeights,
    pub moderate: DeviceWeights,
    pub severe: DeviceWeights,
    pub profound: DeviceWeights,
}

impl TypeMismatchTable {
    pub fn row(&self, level: LossLevel) -> &DeviceWeights {
        match level {
            LossLevel::Mild => &self.mild,
            LossLevel::Moderate => &self.moderate,
            LossLevel::Severe => &self.severe,
            LossLevel::Profound => &self.profound,
        }
    }

    pub fn get(&self, level: LossLevel, device: DeviceType) -> i32 {
        self.row(level).get(device)
    }
}

/// Ordered list of inclusive `[min, max]` buckets. First match wins.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RangeTable {
    pub ranges: Vec<WeightRange>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
    pub weight: i32,
}

impl WeightRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AsymmetryPenalty {
    /// Asymmetry at or below this many dB carries no penalty
    pub threshold_db: f64,
    /// Points per 10 dB of excess; expected to be negative
    pub penalty_per_10db: f64,
    /// Most negative penalty allowed
    pub max_penalty: i32,
}

/// Constants for the unilateral-fitting need model.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BinauralConfig {
    pub pta_need_threshold_db: f64,
    pub noisy_env_need_bonus: f64,
    pub mixed_env_need_bonus: f64,
    pub first_time_need_bonus: f64,
    pub asymmetry_relief_start_db: f64,
    pub asymmetry_relief_full_db: f64,
    pub base_unilateral_penalty: f64,
    pub max_unilateral_penalty: f64,
    pub low_budget_penalty_relief: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_weights_parse() {
        let config = WeightConfig::bundled().unwrap();
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.base_score, 50);
        assert_eq!(config.speech_score_weights.ranges.len(), 5);
        assert_eq!(config.asymmetry_penalty.max_penalty, -12);
    }

    #[test]
    fn test_categorical_lookups() {
        let config = WeightConfig::bundled().unwrap();
        assert_eq!(config.loss_level_weights.get(LossLevel::Profound), -15);
        assert_eq!(config.lifestyle_weights.get(Lifestyle::Noisy), -10);
        assert_eq!(config.budget_weights.get(Budget::High), 5);
        assert_eq!(
            config
                .type_mismatch_penalties
                .get(LossLevel::Profound, DeviceType::Cic),
            -15
        );
    }

    #[test]
    fn test_weights_serde_yaml_roundtrip() {
        let config = WeightConfig::bundled().unwrap();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: WeightConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_missing_category_key_rejected() {
        let yaml = r#"
mild: 10
moderate: 5
severe: -5
"#;
        let result: Result<LossLevelWeights, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_category_key_rejected() {
        let json = r#"{"quiet": 5, "mixed": 0, "noisy": -10, "concert": -20}"#;
        assert!(serde_json::from_str::<LifestyleWeights>(json).is_err());
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = WeightRange {
            min: 51.0,
            max: 70.0,
            weight: 5,
        };
        assert!(range.contains(51.0));
        assert!(range.contains(70.0));
        assert!(!range.contains(70.5));
        assert!(!range.contains(50.9));
    }
}
