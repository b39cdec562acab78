use crate::config_file::SettingsFile;
use crate::constants::file::DEFAULT_SETTINGS_FILE;
use crate::error::{ConfigError, Result};
use crate::utils::file_io::write_file_string;
use crate::validation::validate_output_path;
use clap::ArgMatches;
use log::info;
use std::path::Path;

pub fn generate_config(app_m: &ArgMatches) -> Result<()> {
	let output_path = app_m.value_of("OUTPUT_FILE").unwrap_or(DEFAULT_SETTINGS_FILE);
	let format = app_m.value_of("FORMAT").unwrap_or("toml");
	let example = app_m.is_present("EXAMPLE");

	if Path::new(output_path).exists() && !app_m.is_present("FORCE") {
		return Err(ConfigError::InvalidInput(format!(
			"File {} already exists. Use --force to overwrite",
			output_path
		)));
	}
	validate_output_path(output_path)?;

	if example {
		if format != "toml" {
			return Err(ConfigError::InvalidParameter(
				"Example settings with comments are only available in TOML format".to_string(),
			));
		}
		write_file_string(output_path, &SettingsFile::create_example_toml())?;
		info!("Generated example settings file with comments: {}", output_path);
	} else {
		let settings = SettingsFile::generate_default();
		match format {
			"toml" => {
				settings.to_toml_file(output_path)?;
				info!("Generated TOML settings file: {}", output_path);
			}
			"json" => {
				settings.to_json_file(output_path)?;
				info!("Generated JSON settings file: {}", output_path);
			}
			_ => {
				return Err(ConfigError::InvalidParameter(format!(
					"Unknown format: {}. Use 'toml' or 'json'",
					format
				)))
			}
		}
	}

	info!("You can now edit the settings file and use it with:");
	info!("  srgan-config build --settings {} CONFIG", output_path);

	Ok(())
}
