use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

pub fn build_cli() -> ArgMatches<'static> {
	build_app().get_matches()
}

pub fn build_app() -> App<'static, 'static> {
	App::new("srgan-config")
		.version("v0.2.0")
		.author("ktheindifferent")
		.about("Resolves ESRGAN configuration documents and builds their object graphs")
		.settings(&[
			AppSettings::SubcommandRequiredElseHelp,
			AppSettings::VersionlessSubcommands,
		])
		.arg(build_log_format_arg())
		.arg(build_verbose_arg())
		.subcommand(build_resolve_subcommand())
		.subcommand(build_build_subcommand())
		.subcommand(build_check_subcommand())
		.subcommand(build_targets_subcommand())
		.subcommand(build_generate_config_subcommand())
}

fn build_log_format_arg() -> Arg<'static, 'static> {
	Arg::with_name("LOG_FORMAT")
		.long("log-format")
		.value_name("FORMAT")
		.help("Structured log output instead of plain messages")
		.possible_values(&["compact", "pretty", "json"])
		.global(true)
		.empty_values(false)
}

fn build_verbose_arg() -> Arg<'static, 'static> {
	Arg::with_name("VERBOSE")
		.short("v")
		.long("verbose")
		.help("Log debug messages, including every instantiated target")
		.global(true)
}

fn build_config_arg() -> Arg<'static, 'static> {
	Arg::with_name("CONFIG")
		.required(true)
		.index(1)
		.help("Configuration document to read (.yaml, .yml or .json)")
}

fn build_select_arg() -> Arg<'static, 'static> {
	Arg::with_name("SELECT")
		.short("s")
		.long("select")
		.value_name("PATH")
		.help("Only output the node at this dotted path, e.g. model.discriminator")
		.empty_values(false)
}

fn build_compact_arg() -> Arg<'static, 'static> {
	Arg::with_name("COMPACT")
		.short("c")
		.long("compact")
		.help("Print JSON on a single line")
}

fn build_settings_arg() -> Arg<'static, 'static> {
	Arg::with_name("SETTINGS")
		.long("settings")
		.value_name("SETTINGS_FILE")
		.help("Settings file (.toml or .json) with reserved keys, loader options and extra targets")
		.empty_values(false)
}

fn build_no_builtins_arg() -> Arg<'static, 'static> {
	Arg::with_name("NO_BUILTINS")
		.long("no-builtins")
		.help("Do not register the built-in ESRGAN targets")
}

fn build_resolve_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("resolve")
		.about("Resolve anchors, aliases and merge keys and print the document as JSON")
		.arg(build_config_arg())
		.arg(build_settings_arg())
		.arg(build_select_arg())
		.arg(build_compact_arg())
}

fn build_build_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("build")
		.about("Instantiate every target in the document and print the object graph as JSON")
		.arg(build_config_arg())
		.arg(build_settings_arg())
		.arg(build_select_arg())
		.arg(build_no_builtins_arg())
		.arg(build_compact_arg())
}

fn build_check_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("check")
		.about("Report every unknown target and argument error without building anything")
		.arg(build_config_arg())
		.arg(build_settings_arg())
		.arg(build_no_builtins_arg())
}

fn build_targets_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("targets")
		.about("List the registered targets and their signatures")
		.arg(build_settings_arg())
		.arg(build_no_builtins_arg())
}

fn build_generate_config_subcommand() -> App<'static, 'static> {
	SubCommand::with_name("generate-config")
		.about("Generate a settings file")
		.arg(
			Arg::with_name("OUTPUT_FILE")
				.index(1)
				.help("Where to write the settings. Default: srgan_config.toml"),
		)
		.arg(
			Arg::with_name("FORMAT")
				.short("f")
				.long("format")
				.value_name("FORMAT")
				.possible_values(&["toml", "json"])
				.default_value("toml")
				.help("Output format"),
		)
		.arg(
			Arg::with_name("EXAMPLE")
				.short("e")
				.long("example")
				.help("Write a commented example (TOML only)"),
		)
		.arg(
			Arg::with_name("FORCE")
				.long("force")
				.help("Overwrite an existing file"),
		)
}
