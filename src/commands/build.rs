use crate::commands::common::{document_from_args, print_json, registry_from_args, settings_from_args};
use crate::error::Result;
use crate::graph::ObjectGraphBuilder;
use crate::logging::OperationLogger;
use clap::ArgMatches;
use log::info;

pub fn build(app_m: &ArgMatches) -> Result<()> {
	let mut operation = OperationLogger::new("build");
	let settings = settings_from_args(app_m)?;
	let registry = registry_from_args(app_m, &settings)?;
	let node = document_from_args(app_m, &settings)?;
	operation.log_progress("document loaded");

	let builder = ObjectGraphBuilder::with_config(&registry, settings.to_build_config()?);
	let report = match builder.build_report(&node) {
		Ok(report) => report,
		Err(err) => {
			operation.log_error(&err);
			return Err(err.into());
		}
	};

	info!(
		"Instantiated {} objects and {} partials; {} shared references reused",
		report.stats.instantiated, report.stats.partials, report.stats.reused
	);
	operation.add_metadata("instantiated", report.stats.instantiated);
	operation.add_metadata("reused", report.stats.reused);
	operation.complete();

	print_json(&report.value.to_json(), app_m.is_present("COMPACT"))
}
