use crate::constants::path::SEPARATOR;
use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Validates that a file exists and is readable
pub fn validate_input_file(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(ConfigError::InvalidInput(format!(
            "{} is not a file",
            path.display()
        )));
    }

    fs::metadata(path).map_err(ConfigError::Io)?;

    Ok(path.to_path_buf())
}

/// Validates that the output path is writable
pub fn validate_output_path(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            return Err(ConfigError::InvalidInput(format!(
                "Parent directory {} does not exist",
                parent.display()
            )));
        }

        if !parent.is_dir() {
            return Err(ConfigError::InvalidInput(format!(
                "{} is not a directory",
                parent.display()
            )));
        }
    }

    if path.exists() && !path.is_file() {
        return Err(ConfigError::InvalidInput(format!(
            "{} exists but is not a file",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

/// Validates that a configuration document has a YAML (or JSON) extension
pub fn validate_document_extension(path: &Path) -> Result<()> {
    let valid_extensions = ["yaml", "yml", "json"];

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension {
        Some(ext) if valid_extensions.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(ConfigError::InvalidInput(format!(
            "Unsupported document format: .{}. Supported formats: {}",
            ext,
            valid_extensions.join(", ")
        ))),
        None => Err(ConfigError::InvalidInput(
            "File has no extension. Please specify a .yaml, .yml or .json document".to_string(),
        )),
    }
}

/// Validates a dotted selection path such as `model.discriminator.0`
pub fn validate_select_path(path: &str) -> Result<&str> {
    if path.is_empty() || path.split(SEPARATOR).any(str::is_empty) {
        return Err(ConfigError::InvalidParameter(format!(
            "Invalid selection path '{}': segments must be non-empty",
            path
        )));
    }
    Ok(path)
}
