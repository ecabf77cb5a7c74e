use std::any;
use std::panic::Location;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::assertion::evaluator::DEFAULT_EPSILON;
use crate::context::context::{TestFlow, UnitOutcome, UnitTestContext};
use crate::output::channels::Channels;
use crate::report::console::{format_detail_report, format_summary_report};
use crate::report::report_model::SuiteReport;
use crate::suite::error::KutError;
use crate::suite::suite_model::{SuiteTotals, TestKind};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

const BANNER: &str = "*****************************************************";

/// A type that carries its own unit test.
///
/// The runner builds a fresh value with `Default` for every run, so the type
/// under test needs a no-argument constructor.
pub trait TestedClass: Default {
    /// Name shown in the logs. Defaults to the last segment of the type path.
    fn test_name() -> String {
        let full = any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base).to_string()
    }

    fn unit_test(&mut self, t: &mut UnitTestContext<'_>) -> TestFlow;
}

/// Lifecycle of a suite run. Transitions only move forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunnerState {
    Idle,
    Running,
    Reporting,
    Done,

    /// A stop-on-failure abort escaped a unit test; nothing else may run
    Aborted,
}

/// Settings the runner needs, resolved from the CLI and config file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub log_file: String,
    pub diag_file: String,
    pub verbose: bool,
    pub epsilon: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_file: "kut_logfile.txt".to_string(),
            diag_file: "stderr.txt".to_string(),
            verbose: true,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Runs unit tests one after another, in the order they are submitted, and
/// accumulates the suite totals.
pub struct SuiteRunner {
    config: RunnerConfig,
    state: RunnerState,
    channels: Option<Channels>,
    totals: SuiteTotals,
    tracer: Option<TraceLogger>,
    step: u64,
}

impl SuiteRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            state: RunnerState::Idle,
            channels: None,
            totals: SuiteTotals::new(),
            tracer: None,
            step: 0,
        }
    }

    /// Also record every unit test in a JSONL execution trace.
    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn totals(&self) -> &SuiteTotals {
        &self.totals
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    // ========================================================================
    // Idle -> Running
    // ========================================================================

    /// Open the detail log and diagnostic files and start the suite.
    ///
    /// A file that cannot be opened is reported on stdout and stderr and
    /// returned as [`KutError::ChannelOpen`]; no test may run afterwards.
    pub fn start(&mut self) -> Result<(), KutError> {
        self.expect_state(RunnerState::Idle, "start")?;
        let channels = match Channels::open(&self.config.log_file, &self.config.diag_file, self.config.verbose) {
            Ok(channels) => channels,
            Err(e) => {
                println!("KUT: {}, exiting...", e);
                eprintln!("KUT: {}, exiting...", e);
                return Err(e);
            }
        };
        self.start_with(channels)
    }

    /// Start the suite on already opened channels.
    pub fn start_with(&mut self, mut channels: Channels) -> Result<(), KutError> {
        self.expect_state(RunnerState::Idle, "start")?;

        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        channels.summary.line(" Test : start");
        channels
            .detail
            .line(&format!("KUT logfile, created at unix time {}", created));
        channels
            .detail
            .line(&format!(" - version of KUT is {}", env!("CARGO_PKG_VERSION")));

        self.channels = Some(channels);
        self.state = RunnerState::Running;
        self.trace(TraceEvent::now(self.step, "suite_start"));
        Ok(())
    }

    // ========================================================================
    // Running
    // ========================================================================

    /// Build a fresh `T` and run its unit test.
    #[track_caller]
    pub fn run_class_test<T: TestedClass>(&mut self) -> Result<UnitOutcome, KutError> {
        let file = Location::caller().file();
        let name = T::test_name();
        self.run_unit(&name, TestKind::Class, file, |t| {
            let mut subject = T::default();
            subject.unit_test(t)
        })
    }

    /// Run a free test function under `name`.
    #[track_caller]
    pub fn run_function_test<F>(&mut self, name: &str, test: F) -> Result<UnitOutcome, KutError>
    where
        F: FnOnce(&mut UnitTestContext<'_>) -> TestFlow,
    {
        let file = Location::caller().file();
        self.run_unit(name, TestKind::Function, file, test)
    }

    fn run_unit<F>(&mut self, name: &str, kind: TestKind, file: &str, test: F) -> Result<UnitOutcome, KutError>
    where
        F: FnOnce(&mut UnitTestContext<'_>) -> TestFlow,
    {
        self.expect_state(RunnerState::Running, "run a unit test")?;
        let state = self.state;
        let channels = self.channels.as_mut().ok_or(KutError::InvalidState {
            operation: "run a unit test",
            state,
        })?;

        let index = self.totals.unit_tests_run + 1;
        channels.detail.line(BANNER);
        channels
            .detail
            .line(&format!("* Unit test no {}, testing {} {}", index, kind, name));

        let mut ctx = UnitTestContext::new(channels, name, kind, file, self.config.epsilon);
        let _ = test(&mut ctx);
        // END is the next line written
        let end_line = ctx.log_position() + 1;
        let outcome = ctx.finalize();

        let status = if outcome.failures == 0 {
            "success".to_string()
        } else {
            format!("{} failure(s)", outcome.failures)
        };
        channels.summary.line(&format!(
            "{}: Unit test of {} {}: {} tests: {}",
            index, kind, name, outcome.tests_run, status
        ));

        self.totals.absorb(name, kind, &outcome, end_line);

        if outcome.aborted {
            channels.summary.line(" -premature ending of test !");
            channels.flush();
        }

        self.step += 1;
        let event = TraceEvent::now(self.step, "unit_test")
            .with_test(name, kind)
            .with_counts(outcome.tests_run, outcome.failures);
        let event = if outcome.aborted {
            event.with_detail("aborted on failure")
        } else {
            event
        };
        self.trace(event);

        if outcome.aborted {
            self.state = RunnerState::Aborted;
            return Err(KutError::Aborted {
                test: name.to_string(),
                tests_run: outcome.tests_run,
                failures: outcome.failures,
            });
        }
        Ok(outcome)
    }

    // ========================================================================
    // Running -> Reporting -> Done
    // ========================================================================

    /// Write the totals to the detail log and the summary stream and close
    /// the suite. The report's exit status is the total failure count.
    pub fn finish(&mut self) -> Result<SuiteReport, KutError> {
        self.expect_state(RunnerState::Running, "finish")?;
        self.state = RunnerState::Reporting;

        let mut channels = self.channels.take().ok_or(KutError::InvalidState {
            operation: "finish",
            state: RunnerState::Reporting,
        })?;
        channels.detail.line(&format_detail_report(&self.totals));
        channels
            .summary
            .line(&format_summary_report(&self.totals, &self.config.log_file));
        channels.flush();

        self.state = RunnerState::Done;
        self.step += 1;
        let event = TraceEvent::now(self.step, "suite_end")
            .with_counts(self.totals.total_assertions, self.totals.total_failures);
        self.trace(event);

        if let Some(e) = channels.take_error() {
            return Err(KutError::LogWrite(e));
        }
        Ok(SuiteReport::new(&self.config.log_file, self.totals.clone()))
    }

    fn expect_state(&self, expected: RunnerState, operation: &'static str) -> Result<(), KutError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(KutError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn trace(&self, event: TraceEvent) {
        if let Some(tracer) = &self.tracer {
            tracer.log(&event);
        }
    }
}
