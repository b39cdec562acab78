use crate::commands::common::{document_from_args, print_json, settings_from_args};
use crate::error::Result;
use clap::ArgMatches;

pub fn resolve(app_m: &ArgMatches) -> Result<()> {
	let settings = settings_from_args(app_m)?;
	let node = document_from_args(app_m, &settings)?;
	print_json(&serde_json::to_value(&*node)?, app_m.is_present("COMPACT"))
}
