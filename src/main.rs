extern crate srgan_config;
#[macro_use]
extern crate log;

use clap::ArgMatches;
use srgan_config::logging::{LogConfig, LogFormat};
use srgan_config::{cli, commands, logging};
use std::str::FromStr;

fn main() {
	let app_m = cli::build_cli();
	init_logger(&app_m);

	let result = match app_m.subcommand() {
		("resolve", Some(sub_m)) => commands::resolve(sub_m),
		("build", Some(sub_m)) => commands::build(sub_m),
		("check", Some(sub_m)) => commands::check(sub_m),
		("targets", Some(sub_m)) => commands::targets(sub_m),
		("generate-config", Some(sub_m)) => commands::generate_config(sub_m),
		_ => unreachable!("clap requires a subcommand"),
	};

	if let Err(err) = result {
		error!("Error: {}", err);
		std::process::exit(1);
	}
}

/// `--log-format` selects structured output; otherwise the `[logging]` section of
/// `--settings` does, and without either plain messages are printed.
fn init_logger(app_m: &ArgMatches) {
	let sub_m = app_m.subcommand().1;
	let flag = |name: &str| app_m.is_present(name) || sub_m.map_or(false, |m| m.is_present(name));
	let verbose = flag("VERBOSE");
	let log_format = app_m
		.value_of("LOG_FORMAT")
		.or_else(|| sub_m.and_then(|m| m.value_of("LOG_FORMAT")));

	let config = match (log_format, sub_m) {
		(Some(format), _) => LogFormat::from_str(format).ok().map(|format| LogConfig {
			format,
			..LogConfig::default()
		}),
		(None, Some(m)) if m.is_present("SETTINGS") => commands::settings_from_args(m)
			.and_then(|settings| settings.to_log_config())
			.ok(),
		_ => None,
	};

	match config {
		Some(mut config) => {
			if verbose {
				config.level = tracing::Level::DEBUG;
			}
			if logging::init_logging(config).is_err() {
				logging::init_simple_logger(verbose);
			}
		}
		None => logging::init_simple_logger(verbose),
	}
}
