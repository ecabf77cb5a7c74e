use std::fs;

use clap::Parser;
use kut::cli::commands::{cmd_config, cmd_demo};
use kut::cli::config::{Cli, Commands, KutConfig, build_runner_config, load_config, resolve_config};
use kut::KutError;

mod common;
use crate::common::utils::temp_path;

// ============================================================================
// Argument parsing
// ============================================================================

#[test]
fn parses_demo_subcommand() {
    let cli = Cli::parse_from(["kut", "demo"]);
    assert!(matches!(cli.command, Commands::Demo { broken: false }));
    assert_eq!(cli.verbose, 0);
    assert!(!cli.quiet);

    let cli = Cli::parse_from(["kut", "demo", "--broken"]);
    assert!(matches!(cli.command, Commands::Demo { broken: true }));
}

#[test]
fn parses_global_options() {
    let cli = Cli::parse_from([
        "kut",
        "-vv",
        "--quiet",
        "--log-file",
        "out.txt",
        "--diag-file",
        "diag.txt",
        "--epsilon",
        "1e-6",
        "--trace",
        "trace.jsonl",
        "config",
    ]);

    assert!(matches!(cli.command, Commands::Config));
    assert_eq!(cli.verbose, 2);
    assert!(cli.quiet);
    assert_eq!(cli.log_file.as_deref(), Some("out.txt"));
    assert_eq!(cli.diag_file.as_deref(), Some("diag.txt"));
    assert_eq!(cli.epsilon, Some(1e-6));
    assert_eq!(cli.trace.as_deref(), Some("trace.jsonl"));
}

#[test]
fn global_options_after_subcommand() {
    let cli = Cli::parse_from(["kut", "demo", "--log-file", "x.txt", "-v"]);
    assert_eq!(cli.log_file.as_deref(), Some("x.txt"));
    assert_eq!(cli.verbose, 1);
}

#[test]
fn rejects_missing_subcommand() {
    assert!(Cli::try_parse_from(["kut"]).is_err());
}

// ============================================================================
// Config file
// ============================================================================

#[test]
fn missing_config_yields_defaults() {
    let config = load_config(Some("/nonexistent-kut-dir/kut.yaml")).unwrap();
    assert_eq!(config, KutConfig::default());
    assert_eq!(config.log_file, "kut_logfile.txt");
    assert_eq!(config.diag_file, "stderr.txt");
    assert!(config.verbose);
    assert_eq!(config.epsilon, 1e-9);
    assert!(config.trace.is_none());
}

#[test]
fn empty_config_yields_defaults() {
    let path = temp_path("empty.yaml");
    fs::write(&path, "\n").unwrap();
    assert_eq!(load_config(Some(&path)).unwrap(), KutConfig::default());
}

#[test]
fn partial_config_keeps_other_defaults() {
    let path = temp_path("partial.yaml");
    fs::write(&path, "log_file: custom.txt\nverbose: false\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.log_file, "custom.txt");
    assert!(!config.verbose);
    assert_eq!(config.diag_file, "stderr.txt");
    assert_eq!(config.epsilon, 1e-9);
}

#[test]
fn malformed_config_is_an_error() {
    let path = temp_path("malformed.yaml");
    fs::write(&path, "epsilon: [1, 2\n").unwrap();

    match load_config(Some(&path)) {
        Err(KutError::Config { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Config error, got {:?}", other),
    }
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn cli_overrides_config_file() {
    let file = KutConfig {
        log_file: "file.txt".to_string(),
        trace: Some("file.jsonl".to_string()),
        ..KutConfig::default()
    };
    let cli = Cli::parse_from(["kut", "--log-file", "cli.txt", "--epsilon", "0.5", "demo"]);

    let config = resolve_config(&cli, file);
    assert_eq!(config.log_file, "cli.txt");
    assert_eq!(config.epsilon, 0.5);
    assert_eq!(config.trace.as_deref(), Some("file.jsonl"));
    assert!(config.verbose);
}

#[test]
fn quiet_flag_disables_verbose() {
    let cli = Cli::parse_from(["kut", "--quiet", "demo"]);
    let config = resolve_config(&cli, KutConfig::default());
    assert!(!config.verbose);

    let runner_config = build_runner_config(&config);
    assert!(!runner_config.verbose);
    assert_eq!(runner_config.log_file, config.log_file);
    assert_eq!(runner_config.epsilon, config.epsilon);
}

#[test]
fn config_command_round_trips() {
    let config = KutConfig {
        diag_file: "diag.txt".to_string(),
        trace: Some("trace.jsonl".to_string()),
        ..KutConfig::default()
    };
    let yaml = cmd_config(&config).unwrap();
    assert!(yaml.contains("diag_file: diag.txt"));

    let back: KutConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, config);
}

#[test]
fn demo_command_writes_configured_log() {
    let config = KutConfig {
        log_file: temp_path("demo_log.txt"),
        diag_file: temp_path("demo_diag.txt"),
        ..KutConfig::default()
    };

    assert_eq!(cmd_demo(&config, false, 1).unwrap(), 0);
    assert_eq!(cmd_demo(&config, true, 0).unwrap(), 3);

    let detail = fs::read_to_string(&config.log_file).unwrap();
    assert!(detail.contains("- END unit test of function broken_expectations, 3 tests done and 3 failure(s)"));
}
