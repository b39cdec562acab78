use std::fs;
use std::path::Path;
use crate::error::{ConfigError, Result};
use crate::utils::error_helpers::IoErrorMapper;

pub fn read_file_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_io_err()
}

pub fn write_file_string<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    fs::write(path, contents).map_io_err()
}

/// Picks the settings format from the file extension; anything but `.json` is TOML
pub fn is_json_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}
