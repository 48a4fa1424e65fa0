pub mod features;
pub mod types;

pub use features::{classify_loss_level, derive_features, ear_pta, DerivedFeatures};
pub use types::{
    Budget, ConsultationNotes, DeviceType, Ear, EarInput, FittingPlan, Lifestyle, LossLevel,
    RawInput, Thresholds,
};
