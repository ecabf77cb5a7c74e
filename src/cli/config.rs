use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::assertion::evaluator::DEFAULT_EPSILON;
use crate::suite::error::KutError;
use crate::suite::runner::RunnerConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "kut", version, about = "Minimal unit-test runner with a dual-stream report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: kut.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Detail log file
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    /// Diagnostic stream file
    #[arg(long, global = true)]
    pub diag_file: Option<String>,

    /// Only log unit test boundaries, not every assertion
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Tolerance for approximate floating-point equality
    #[arg(long, global = true)]
    pub epsilon: Option<f64>,

    /// Append a JSONL execution trace to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bundled demonstration suite
    Demo {
        /// Also run a unit test with deliberate failures
        #[arg(long)]
        broken: bool,
    },

    /// Print the resolved configuration as YAML
    Config,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `kut.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KutConfig {
    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default = "default_diag_file")]
    pub diag_file: String,

    #[serde(default = "default_true")]
    pub verbose: bool,

    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    #[serde(default)]
    pub trace: Option<String>,
}

impl Default for KutConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            diag_file: default_diag_file(),
            verbose: true,
            epsilon: DEFAULT_EPSILON,
            trace: None,
        }
    }
}

// Serde default helpers
fn default_log_file() -> String { "kut_logfile.txt".to_string() }
fn default_diag_file() -> String { "stderr.txt".to_string() }
fn default_true() -> bool { true }
fn default_epsilon() -> f64 { DEFAULT_EPSILON }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. A missing file yields the defaults; a file
/// that exists but does not parse is an error.
pub fn load_config(path: Option<&str>) -> Result<KutConfig, KutError> {
    let config_path = path.unwrap_or("kut.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) if content.trim().is_empty() => Ok(KutConfig::default()),
        Ok(content) => serde_yaml::from_str(&content).map_err(|source| KutError::Config {
            path: config_path.to_string(),
            source,
        }),
        Err(_) => Ok(KutConfig::default()),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Apply CLI overrides on top of the file configuration.
pub fn resolve_config(cli: &Cli, file: KutConfig) -> KutConfig {
    KutConfig {
        log_file: cli.log_file.clone().unwrap_or(file.log_file),
        diag_file: cli.diag_file.clone().unwrap_or(file.diag_file),
        verbose: file.verbose && !cli.quiet,
        epsilon: cli.epsilon.unwrap_or(file.epsilon),
        trace: cli.trace.clone().or(file.trace),
    }
}

/// Build a RunnerConfig from resolved CLI/config values.
pub fn build_runner_config(config: &KutConfig) -> RunnerConfig {
    RunnerConfig {
        log_file: config.log_file.clone(),
        diag_file: config.diag_file.clone(),
        verbose: config.verbose,
        epsilon: config.epsilon,
    }
}
