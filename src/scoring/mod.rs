pub mod config;
pub mod engine;
pub mod factors;
pub mod level;
pub mod validation;

pub use config::*;
pub use engine::{predict, Factor, FactorContribution, ScoreBreakdown};
pub use factors::{RangeMatch, UnilateralDetail};
pub use level::{classify, SatisfactionLevel};
pub use validation::validate_weights;
