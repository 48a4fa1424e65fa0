use std::path::PathBuf;
use thiserror::Error;

use crate::input::Ear;

/// Errors raised while turning a raw intake record into derived features.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error(
        "{ear} ear: audiometric data incomplete. Provide all of 500, 1000, 2000 and 4000 Hz, or the PTA directly"
    )]
    MissingAudiometricData { ear: Ear },

    #[error("{field}: {value} is outside the allowed range {min}-{max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("age: {age} is below 10; refer the patient to a specialist")]
    AgeBelowMinimum { age: u32 },

    #[error("{} invalid input field(s): {}", .0.len(), join_errors(.0))]
    Invalid(Vec<InputError>),
}

fn join_errors(errors: &[InputError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while locating, parsing or validating a weight table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Weights file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed weights in {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Invalid weights in {origin}:\n  - {}", .errors.join("\n  - "))]
    Invalid { origin: String, errors: Vec<String> },
}

impl ConfigError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the "file absent" case, as opposed to malformed content.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_audiometric_names_ear() {
        let err = InputError::MissingAudiometricData { ear: Ear::Right };
        assert!(err.to_string().starts_with("right ear"));
    }

    #[test]
    fn test_invalid_lists_every_field() {
        let err = InputError::Invalid(vec![
            InputError::AgeBelowMinimum { age: 5 },
            InputError::OutOfRange {
                field: "speech_score_left".to_string(),
                value: 120.0,
                min: 0.0,
                max: 100.0,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 invalid"));
        assert!(msg.contains("age: 5"));
        assert!(msg.contains("speech_score_left: 120"));
    }

    #[test]
    fn test_config_error_kinds_are_distinct() {
        let missing = ConfigError::not_found("/nope/weights.json");
        assert!(missing.is_not_found());
        assert!(missing.to_string().contains("not found"));

        let malformed = ConfigError::Parse {
            origin: "weights.json".to_string(),
            message: "expected value".to_string(),
        };
        assert!(!malformed.is_not_found());
        assert!(malformed.to_string().starts_with("Malformed"));
    }

    #[test]
    fn test_invalid_config_lists_all_errors() {
        let err = ConfigError::Invalid {
            origin: "bundled".to_string(),
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Invalid weights in bundled:\n  - a\n  - b");
    }
}
