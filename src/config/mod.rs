pub mod init;

pub use init::{save_weights, write_default_weights};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::scoring::{validate_weights, WeightConfig};

/// File name of the user's weight table inside the config directory.
pub const WEIGHTS_FILE_NAME: &str = "weights.yaml";

/// Serialization format of a weights or input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.json` is JSON; everything else (`.yaml`, `.yml`, no extension) is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Get the config directory path (~/.config/hearing-fit/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("hearing-fit"))
}

/// Get the default weights file path (~/.config/hearing-fit/weights.yaml)
pub fn get_weights_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(WEIGHTS_FILE_NAME))
}

/// Pick the weights file to load.
///
/// An explicit path always wins, even if it does not exist (so the caller
/// gets a `NotFound`). Otherwise the user's config file is used when present,
/// and `None` means "use the bundled table".
pub fn resolve_weights_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    get_weights_path().filter(|path| path.exists())
}

/// Load and validate a weight table.
///
/// # Arguments
///
/// * `path` - Optional path to a JSON or YAML weights file. If None, the
///   bundled default table is used.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file cannot be read
/// - The document cannot be parsed, or has missing or unknown keys
/// - The table fails validation (every violation is reported)
pub fn load_weights(path: Option<&Path>) -> Result<WeightConfig, ConfigError> {
    let Some(path) = path else {
        let config = parse_weights(
            crate::scoring::BUNDLED_WEIGHTS_JSON,
            DocumentFormat::Json,
            "bundled weights",
        )?;
        debug!(version = %config.version, "loaded bundled weights");
        return Ok(config);
    };

    if !path.exists() {
        return Err(ConfigError::not_found(path));
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let config = parse_weights(
        &content,
        DocumentFormat::from_path(path),
        &path.display().to_string(),
    )?;

    info!(path = %path.display(), version = %config.version, "loaded weights");
    Ok(config)
}

/// Parse a weights document and validate it.
///
/// `origin` names the document in error messages.
pub fn parse_weights(
    content: &str,
    format: DocumentFormat,
    origin: &str,
) -> Result<WeightConfig, ConfigError> {
    let parsed = match format {
        DocumentFormat::Json => {
            serde_json::from_str::<WeightConfig>(content).map_err(|e| e.to_string())
        }
        DocumentFormat::Yaml => {
            serde_saphyr::from_str::<WeightConfig>(content).map_err(|e| e.to_string())
        }
    };
    let config = parsed.map_err(|message| ConfigError::Parse {
        origin: origin.to_string(),
        message,
    })?;

    validate_weights(&config).map_err(|errors| ConfigError::Invalid {
        origin: origin.to_string(),
        errors,
    })?;

    Ok(config)
}
