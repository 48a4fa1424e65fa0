//! Deterministic satisfaction prediction for hearing-aid fittings.
//!
//! The pipeline is `derive_features` -> `predict` -> `classify` ->
//! `summarize` / `recommend`, driven by an external [`WeightConfig`].

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod narrative;
pub mod output;
pub mod scoring;
pub mod telemetry;

pub use config::load_weights;
pub use error::{ConfigError, InputError};
pub use input::{derive_features, DerivedFeatures, RawInput};
pub use narrative::{recommend, summarize};
pub use scoring::{classify, predict, SatisfactionLevel, ScoreBreakdown, WeightConfig};
