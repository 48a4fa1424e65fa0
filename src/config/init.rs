use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_weights_path, DocumentFormat};
use crate::scoring::WeightConfig;

const TEMPLATE_HEADER: &str = "\
# hearing-fit weight table
# Edit the weights below, then check them with `hearing-fit validate <path>`.
";

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Write the bundled weight table to disk so it can be tuned locally.
///
/// Without `path` the user is asked where to save it (defaulting to
/// ~/.config/hearing-fit/weights.yaml). An existing file is only replaced
/// after confirmation, or unconditionally with `force`.
///
/// Returns the written path, or `None` if the user declined to overwrite.
pub fn write_default_weights(path: Option<PathBuf>, force: bool) -> Result<Option<PathBuf>> {
    let target = match path {
        Some(path) => path,
        None => {
            let default = get_weights_path()
                .context("Could not determine home directory; pass --path explicitly")?;
            if force {
                default
            } else {
                PathBuf::from(prompt_with_default(
                    "Where should the weights be saved?",
                    &default.display().to_string(),
                )?)
            }
        }
    };

    if target.exists() && !force {
        let overwrite = prompt_yes_no(
            &format!("Weights already exist at {}. Overwrite?", target.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(None);
        }
    }

    let config = WeightConfig::bundled().context("Bundled weights are malformed")?;
    save_weights(&target, &config)?;
    Ok(Some(target))
}

/// Serialize `config` and replace `path` atomically.
///
/// The format follows the extension, as in [`load_weights`]: `.json` gets
/// pretty JSON, anything else commented YAML.
///
/// [`load_weights`]: crate::config::load_weights
pub fn save_weights(path: &Path, config: &WeightConfig) -> Result<()> {
    let content = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => {
            let json =
                serde_json::to_string_pretty(config).context("Failed to serialize weights")?;
            format!("{}\n", json)
        }
        DocumentFormat::Yaml => {
            let yaml = serde_saphyr::to_string(config)
                .map_err(|e| anyhow::anyhow!("Failed to serialize weights: {}", e))?;
            format!("{}{}", TEMPLATE_HEADER, yaml)
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write weights to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save weights to {}", path.display()))?;

    Ok(())
}
