use crate::commands::common::{registry_from_args, settings_from_args};
use crate::error::Result;
use clap::ArgMatches;

pub fn targets(app_m: &ArgMatches) -> Result<()> {
	let settings = settings_from_args(app_m)?;
	let registry = registry_from_args(app_m, &settings)?;
	for name in registry.names() {
		if let Some(constructor) = registry.get(name) {
			println!("{}{}", name, constructor.signature());
		}
	}
	Ok(())
}
