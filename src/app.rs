//! Command runners behind the `hearing-fit` binary.
//!
//! Each runner writes its report to the given writer and returns a
//! [`RunError`] that knows its process exit code.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use thiserror::Error;

use crate::config::{self, DocumentFormat};
use crate::error::{ConfigError, InputError};
use crate::input::{derive_features, RawInput};
use crate::output::{self, Report};
use crate::scoring::predict;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INPUT: i32 = 2;
pub const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The input file could not be read or parsed.
    #[error("Input error: {0:#}")]
    Read(anyhow::Error),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl RunError {
    /// A closed stdout (e.g. piped into `head`) is not a failure.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, RunError::Output(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Config(_) => EXIT_CONFIG,
            RunError::Read(_) | RunError::Input(_) => EXIT_INPUT,
            _ if self.is_broken_pipe() => EXIT_SUCCESS,
            RunError::Serialize(_) | RunError::Output(_) => EXIT_FAILURE,
        }
    }
}

/// Exit code for a finished run, reporting the error on stderr.
pub fn exit_code(result: Result<(), RunError>) -> i32 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) if e.is_broken_pipe() => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

/// Read a patient record, choosing JSON or YAML by file extension.
pub fn read_input(path: &Path) -> anyhow::Result<RawInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file at {}", path.display()))?;

    let raw = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse input: invalid JSON in {}", path.display()))?,
        DocumentFormat::Yaml => serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse input: invalid YAML in {}", path.display()))?,
    };

    Ok(raw)
}

/// Load weights, score the patient in `input` and write the report to `out`.
///
/// `weights` is the already-resolved weights path; `None` uses the bundled
/// table. Weights are loaded before the input is read, so a bad table is
/// reported even when the input is also broken.
pub fn run_predict(
    input: &Path,
    weights: Option<&Path>,
    format: OutputFormat,
    use_colors: bool,
    out: &mut impl Write,
) -> Result<(), RunError> {
    let weights = config::load_weights(weights)?;
    let raw = read_input(input).map_err(RunError::Read)?;
    let features = derive_features(&raw)?;

    let (score, breakdown) = predict(&features, &weights);
    let report = Report::new(score, &features, &breakdown, Some(&raw.notes));

    let rendered = match format {
        OutputFormat::Text => output::format_report(&report, None, use_colors),
        OutputFormat::Json => output::format_json(&report)?,
    };
    writeln!(out, "{}", rendered)?;
    out.flush()?;
    Ok(())
}

/// Check a weights file and write a one-line verdict to `out`.
pub fn run_validate(path: &Path, out: &mut impl Write) -> Result<(), RunError> {
    let weights = config::load_weights(Some(path))?;
    writeln!(out, "{}: valid (version {})", path.display(), weights.version)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    const PATIENT: &str = r#"
left:  { pta: 30, speech_score: 90 }
right: { pta: 30, speech_score: 90 }
age: 60
lifestyle: quiet
experience: true
tinnitus: false
desired_type: RIC
budget: high
fitting_plan: bilateral
"#;

    fn patient_file(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("patient.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    /// Writer whose reader has gone away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_predict_writes_json_report() {
        let dir = tempdir().unwrap();
        let input = patient_file(&dir, PATIENT);
        let mut out = Vec::new();
        run_predict(&input, None, OutputFormat::Json, false, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["score"], 95);
        assert_eq!(value["level"], "very high");
    }

    #[test]
    fn test_predict_writes_text_report() {
        let dir = tempdir().unwrap();
        let input = patient_file(&dir, PATIENT);
        let mut out = Vec::new();
        run_predict(&input, None, OutputFormat::Text, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Score: 95 / 100 (very high)"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_missing_weights_file_exits_with_config_code() {
        let dir = tempdir().unwrap();
        let input = patient_file(&dir, PATIENT);
        let weights = dir.path().join("missing.yaml");
        let err = run_predict(&input, Some(&weights), OutputFormat::Text, false, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, RunError::Config(ConfigError::NotFound { .. })));
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn test_unreadable_weights_exits_with_config_code() {
        let dir = tempdir().unwrap();
        let input = patient_file(&dir, PATIENT);
        // A directory exists but cannot be read as a file
        let err = run_predict(&input, Some(dir.path()), OutputFormat::Text, false, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, RunError::Config(ConfigError::Io { .. })));
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn test_bad_input_exits_with_input_code() {
        let dir = tempdir().unwrap();

        let malformed = patient_file(&dir, "left: [not, an, ear]\n");
        let err = run_predict(&malformed, None, OutputFormat::Text, false, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, RunError::Read(_)));
        assert_eq!(err.exit_code(), EXIT_INPUT);

        let too_young = patient_file(&dir, &PATIENT.replace("age: 60", "age: 5"));
        let err = run_predict(&too_young, None, OutputFormat::Text, false, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, RunError::Input(InputError::AgeBelowMinimum { age: 5 })));
        assert_eq!(err.exit_code(), EXIT_INPUT);

        let missing = dir.path().join("nobody.yaml");
        let err = run_predict(&missing, None, OutputFormat::Text, false, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn test_broken_pipe_is_a_clean_exit() {
        let dir = tempdir().unwrap();
        let input = patient_file(&dir, PATIENT);
        let result = run_predict(&input, None, OutputFormat::Text, false, &mut ClosedPipe);
        let err = result.unwrap_err();
        assert!(err.is_broken_pipe());
        assert_eq!(exit_code(Err(err)), EXIT_SUCCESS);
    }

    #[test]
    fn test_other_write_errors_fail() {
        let err = RunError::Output(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(!err.is_broken_pipe());
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_validate_reports_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.json");
        fs::write(&path, crate::scoring::BUNDLED_WEIGHTS_JSON).unwrap();
        let mut out = Vec::new();
        run_validate(&path, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("valid (version 1.0.0)"));
    }

    #[test]
    fn test_validate_invalid_file_exits_with_config_code() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.json");
        fs::write(&path, "{}").unwrap();
        let err = run_validate(&path, &mut Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
        assert_eq!(exit_code(Ok(())), EXIT_SUCCESS);
    }
}
