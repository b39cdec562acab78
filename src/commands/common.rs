use crate::config_file::SettingsFile;
use crate::document::{DocumentLoader, Node, NodeRef};
use crate::error::{ConfigError, Result};
use crate::graph::Registry;
use crate::validation::{validate_document_extension, validate_input_file, validate_select_path};
use clap::ArgMatches;
use log::{debug, info};

/// Settings named by `--settings`, or the defaults
pub fn settings_from_args(app_m: &ArgMatches) -> Result<SettingsFile> {
	match app_m.value_of("SETTINGS") {
		Some(path) => {
			let path = validate_input_file(path)?;
			let settings = SettingsFile::from_file(&path)?;
			debug!("Loaded settings from: {}", path.display());
			Ok(settings)
		}
		None => Ok(SettingsFile::default()),
	}
}

/// Built-in targets (unless `--no-builtins`) plus the targets declared in the settings
pub(crate) fn registry_from_args(app_m: &ArgMatches, settings: &SettingsFile) -> Result<Registry> {
	let mut registry = if app_m.is_present("NO_BUILTINS") {
		Registry::new()
	} else {
		Registry::with_builtins()
	};
	for declared in &settings.targets {
		registry.register_declared(declared)?;
	}
	debug!("{} targets registered", registry.len());
	Ok(registry)
}

/// Loads the CONFIG document and applies `--select`
pub(crate) fn document_from_args(app_m: &ArgMatches, settings: &SettingsFile) -> Result<NodeRef> {
	let config_path = app_m
		.value_of("CONFIG")
		.ok_or_else(|| ConfigError::InvalidParameter("No configuration file given".to_string()))?;
	let path = validate_input_file(config_path)?;
	validate_document_extension(&path)?;

	let loader = DocumentLoader::new(settings.to_loader_config()?);
	let root = loader.load_file(&path)?;
	info!("Loaded configuration from: {}", path.display());

	match app_m.value_of("SELECT") {
		Some(select) => {
			let select = validate_select_path(select)?;
			Node::select(&root, select)
				.ok_or_else(|| ConfigError::InvalidInput(format!("Nothing found at '{}' in {}", select, config_path)))
		}
		None => Ok(root),
	}
}

pub(crate) fn print_json(json: &serde_json::Value, compact: bool) -> Result<()> {
	let text = if compact {
		serde_json::to_string(json)?
	} else {
		serde_json::to_string_pretty(json)?
	};
	println!("{}", text);
	Ok(())
}
