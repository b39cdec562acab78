use test_helpers::*;

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/esrgan.yaml");

fn run(args: &[&str]) -> Output {
    assert_ok(
        Command::new(env!("CARGO_BIN_EXE_srgan-config")).args(args).output(),
        "spawning srgan-config",
    )
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert_ok(serde_json::from_slice(&output.stdout), "parsing stdout as JSON")
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert_command_success(&output, "srgan-config --help");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "srgan-config", "help output");
    assert_contains(&stdout, "generate-config", "help output");
}

#[test]
fn test_invalid_command() {
    let output = run(&["invalid_command"]);
    assert_command_failure(&output, "srgan-config invalid_command");
}

#[test]
fn test_resolve_sample() {
    let output = run(&["resolve", SAMPLE, "--select", "model.encoder.conv", "--compact"]);
    assert_command_success(&output, "resolve");
    let json = stdout_json(&output);
    assert_eq!(json["_target_"], "esrgan.nn.Conv2d");
    assert_eq!(json["kernel_size"], 3);
    assert_eq!(json["bias"], false);
}

#[test]
fn test_resolve_missing_selection() {
    let output = run(&["resolve", SAMPLE, "--select", "model.nothing"]);
    assert_command_failure(&output, "resolve --select model.nothing");
}

#[test]
fn test_build_sample() {
    let output = run(&["build", SAMPLE, "--select", "model"]);
    assert_command_success(&output, "build");
    let json = stdout_json(&output);
    assert_eq!(json["_target_"], "esrgan.models.VGGConv");
    assert_eq!(json["head"]["out_channels"], 1);
    assert_eq!(json["encoder"]["blocks"].as_array().map(Vec::len), Some(7));
}

#[test]
fn test_build_without_builtins_fails() {
    let output = run(&["build", SAMPLE, "--no-builtins"]);
    assert_command_failure(&output, "build --no-builtins");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_contains(&stderr, "Unknown target", "build error");
}

#[test]
fn test_check_reports_every_problem() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(
        dir.path(),
        "broken.yaml",
        "a: {_target_: Missing}\nb: {_target_: esrgan.models.LinearHead, in_channels: 3}\n",
    );
    let output = run(&["check", config.to_str().unwrap()]);
    assert_command_failure(&output, "check");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_contains(&stderr, "Unknown target 'Missing' at a", "check output");
    assert_contains(&stderr, "missing required argument 'out_channels'", "check output");
    assert_contains(&stderr, "2 problems found", "check output");

    let output = run(&["check", SAMPLE]);
    assert_command_success(&output, "check sample");
}

#[test]
fn test_targets_lists_signatures() {
    let output = run(&["targets"]);
    assert_command_success(&output, "targets");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "esrgan.models.LinearHead(in_channels, out_channels", "targets output");
    assert_contains(&stdout, "torch.nn.Dropout(**kwargs)", "targets output");
}

#[test]
fn test_generate_config_and_use_it() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("settings.toml");
    let settings_arg = settings.to_str().unwrap();

    let output = run(&["generate-config", settings_arg, "--example"]);
    assert_command_success(&output, "generate-config --example");
    assert!(Path::new(settings_arg).exists());

    let output = run(&["generate-config", settings_arg]);
    assert_command_failure(&output, "generate-config without --force");

    let output = run(&["targets", "--settings", settings_arg, "--no-builtins"]);
    assert_command_success(&output, "targets --settings");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "torch.optim.lr_scheduler.StepLR(optimizer, step_size=30, gamma=0.1)", "declared");
    assert_contains(&stdout, "Adam(params, lr=0.001, **kwargs)", "alias");
}

#[test]
fn test_generate_json_config() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("settings.json");
    let output = run(&["generate-config", settings.to_str().unwrap(), "--format", "json"]);
    assert_command_success(&output, "generate-config --format json");
    let contents = assert_ok(std::fs::read_to_string(&settings), "reading generated json");
    let json: serde_json::Value = assert_ok(serde_json::from_str(&contents), "parsing generated json");
    assert_eq!(json["keys"]["target"], "_target_");

    let output = run(&["generate-config", settings.to_str().unwrap(), "--format", "json", "--example", "--force"]);
    assert_command_failure(&output, "json example");
}
