use crate::commands::common::{document_from_args, registry_from_args, settings_from_args};
use crate::error::{ConfigError, Result};
use crate::graph::ObjectGraphBuilder;
use clap::ArgMatches;
use log::{error, info};

pub fn check(app_m: &ArgMatches) -> Result<()> {
	let settings = settings_from_args(app_m)?;
	let registry = registry_from_args(app_m, &settings)?;
	let node = document_from_args(app_m, &settings)?;

	let builder = ObjectGraphBuilder::with_config(&registry, settings.to_build_config()?);
	let problems = builder.validate(&node);
	if problems.is_empty() {
		info!("No problems found");
		return Ok(());
	}

	for problem in &problems {
		error!("{}", problem);
	}
	Err(ConfigError::InvalidInput(format!(
		"{} problem{} found",
		problems.len(),
		if problems.len() == 1 { "" } else { "s" }
	)))
}
