use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the head an audiometric measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ear {
    Left,
    Right,
}

impl fmt::Display for Ear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ear::Left => write!(f, "left"),
            Ear::Right => write!(f, "right"),
        }
    }
}

/// Where the patient spends most of their listening time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifestyle {
    Quiet,
    Mixed,
    Noisy,
}

impl Lifestyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifestyle::Quiet => "quiet",
            Lifestyle::Mixed => "mixed",
            Lifestyle::Noisy => "noisy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Low,
    Mid,
    High,
}

impl Budget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Low => "low",
            Budget::Mid => "mid",
            Budget::High => "high",
        }
    }
}

/// Hearing-aid form factor the patient asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Behind the ear
    #[serde(rename = "BTE")]
    Bte,
    /// Receiver in canal
    #[serde(rename = "RIC")]
    Ric,
    /// In the ear
    #[serde(rename = "ITE")]
    Ite,
    /// Completely in canal
    #[serde(rename = "CIC")]
    Cic,
}

impl DeviceType {
    pub fn code(&self) -> &'static str {
        match self {
            DeviceType::Bte => "BTE",
            DeviceType::Ric => "RIC",
            DeviceType::Ite => "ITE",
            DeviceType::Cic => "CIC",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DeviceType::Bte => "behind-the-ear",
            DeviceType::Ric => "receiver-in-canal",
            DeviceType::Ite => "in-the-ear",
            DeviceType::Cic => "completely-in-canal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittingPlan {
    Bilateral,
    UnilateralLeft,
    UnilateralRight,
}

impl FittingPlan {
    pub fn is_bilateral(&self) -> bool {
        matches!(self, FittingPlan::Bilateral)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FittingPlan::Bilateral => "bilateral",
            FittingPlan::UnilateralLeft => "unilateral (left)",
            FittingPlan::UnilateralRight => "unilateral (right)",
        }
    }
}

/// Ordinal hearing-loss band derived from the average PTA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossLevel {
    Mild,
    Moderate,
    Severe,
    Profound,
}

impl LossLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossLevel::Mild => "mild",
            LossLevel::Moderate => "moderate",
            LossLevel::Severe => "severe",
            LossLevel::Profound => "profound",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LossLevel::Mild => "mild (< 40 dB)",
            LossLevel::Moderate => "moderate (40-55 dB)",
            LossLevel::Severe => "severe (55-70 dB)",
            LossLevel::Profound => "profound (>= 70 dB)",
        }
    }

    /// Severe and profound losses, where full restoration is not a realistic goal.
    pub fn is_severe_or_worse(&self) -> bool {
        *self >= LossLevel::Severe
    }
}

impl fmt::Display for LossLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Air-conduction thresholds (dB HL) at the six standard audiometric frequencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    #[serde(default, rename = "250hz")]
    pub hz250: Option<f64>,
    #[serde(default, rename = "500hz")]
    pub hz500: Option<f64>,
    #[serde(default, rename = "1000hz")]
    pub hz1000: Option<f64>,
    #[serde(default, rename = "2000hz")]
    pub hz2000: Option<f64>,
    #[serde(default, rename = "4000hz")]
    pub hz4000: Option<f64>,
    #[serde(default, rename = "8000hz")]
    pub hz8000: Option<f64>,
}

impl Thresholds {
    /// The four frequencies the PTA is averaged over, if all are present.
    pub fn core(&self) -> Option<[f64; 4]> {
        Some([self.hz500?, self.hz1000?, self.hz2000?, self.hz4000?])
    }

    /// All measured points as `(frequency_hz, threshold)` pairs, lowest frequency first.
    pub fn points(&self) -> Vec<(u32, f64)> {
        [
            (250, self.hz250),
            (500, self.hz500),
            (1000, self.hz1000),
            (2000, self.hz2000),
            (4000, self.hz4000),
            (8000, self.hz8000),
        ]
        .into_iter()
        .filter_map(|(hz, value)| value.map(|v| (hz, v)))
        .collect()
    }
}

/// Per-ear intake data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EarInput {
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Pure-tone average supplied directly; takes precedence over `thresholds`.
    #[serde(default)]
    pub pta: Option<f64>,

    /// Speech recognition score in percent
    pub speech_score: u32,
}

/// Free-text consultation context. Carried through for display, never scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsultationNotes {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub main_complaints: Vec<String>,
    #[serde(default)]
    pub wearing_goal: Option<String>,
}

/// A complete intake record as entered by the clinician.
///
/// Example YAML:
/// ```yaml
/// left:  { pta: 45, speech_score: 72 }
/// right:
///   thresholds: { 500hz: 40, 1000hz: 45, 2000hz: 50, 4000hz: 60 }
///   speech_score: 68
/// age: 67
/// lifestyle: mixed
/// experience: false
/// tinnitus: true
/// desired_type: RIC
/// budget: mid
/// fitting_plan: bilateral
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawInput {
    pub left: EarInput,
    pub right: EarInput,
    pub age: u32,
    pub lifestyle: Lifestyle,
    pub experience: bool,
    pub tinnitus: bool,

    /// Overrides the computed left/right PTA difference when present.
    #[serde(default)]
    pub asymmetry_db: Option<f64>,

    pub desired_type: DeviceType,
    pub budget: Budget,
    pub fitting_plan: FittingPlan,

    #[serde(default)]
    pub notes: ConsultationNotes,
}

impl RawInput {
    pub fn ear(&self, ear: Ear) -> &EarInput {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }
}
