use crate::cli::config::{KutConfig, build_runner_config};
use crate::demo::suite::run_demo_suite;
use crate::suite::error::KutError;
use crate::suite::runner::SuiteRunner;
use crate::trace::logger::TraceLogger;

// ============================================================================
// demo subcommand
// ============================================================================

/// Run the demonstration suite and return the process exit status: the total
/// failure count, or 1 when the suite could not start or was aborted.
pub fn cmd_demo(config: &KutConfig, broken: bool, verbose: u8) -> Result<i32, KutError> {
    let mut runner = SuiteRunner::new(build_runner_config(config));
    if let Some(path) = &config.trace {
        runner = runner.with_tracer(TraceLogger::new(path));
    }

    if verbose > 0 {
        let settings = runner.config();
        eprintln!(
            "Running demo suite (log: {}, diagnostics: {})...",
            settings.log_file, settings.diag_file
        );
    }

    runner.start()?;
    if let Err(e) = run_demo_suite(&mut runner, broken) {
        if verbose > 0 {
            eprintln!("  {}", e);
        }
        return Ok(1);
    }
    let report = runner.finish()?;

    if verbose > 0 {
        eprintln!(
            "Done: {} unit tests, {} assertions, {} failure(s)",
            report.totals.unit_tests_run, report.totals.total_assertions, report.totals.total_failures
        );
    }
    Ok(report.exit_status())
}

// ============================================================================
// config subcommand
// ============================================================================

/// Render the resolved configuration as YAML.
pub fn cmd_config(config: &KutConfig) -> Result<String, KutError> {
    serde_yaml::to_string(config).map_err(|source| KutError::Config {
        path: "<resolved>".to_string(),
        source,
    })
}
