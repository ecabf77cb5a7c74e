use std::fmt::{Debug, Display};
use std::panic::{self, Location};

use serde::{Deserialize, Serialize};

use crate::assertion::assertion_model::AssertionResult;
use crate::assertion::evaluator::{self, Evaluated};
use crate::looping::aggregator::LoopAggregator;
use crate::output::channels::Channels;
use crate::suite::suite_model::TestKind;

/// Signal returned once a failure under the stop-on-failure policy has ended
/// the unit test. Only this crate can create it; test bodies pass it on with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort {
    _private: (),
}

/// What every assertion and test body returns.
pub type TestFlow = Result<(), Abort>;

/// Source location of a failing assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureSite {
    pub file: String,
    pub line: u32,
}

impl FailureSite {
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&Location<'_>> for FailureSite {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}

/// Final counters of one unit test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitOutcome {
    pub tests_run: usize,
    pub failures: usize,
    pub failure_sites: Vec<FailureSite>,

    /// The test ended early under the stop-on-failure policy
    pub aborted: bool,
}

/// Tracks the counters and failure records of one running unit test.
///
/// Assertions are numbered hierarchically: [`message`](Self::message) opens a
/// new major group, each assertion bumps the minor index. Once a failure
/// happens with stop-on-failure enabled the context is terminal: every later
/// call returns [`Abort`] without touching any counter.
pub struct UnitTestContext<'a> {
    channels: &'a mut Channels,
    name: String,
    kind: TestKind,
    epsilon: f64,

    tests_run: usize,
    failures: usize,
    major: usize,
    minor: usize,

    stop_on_failure: bool,
    should_abort: bool,
    last_failed: bool,
    failure_sites: Vec<FailureSite>,
}

impl<'a> UnitTestContext<'a> {
    /// Open a unit test and write its BEGIN marker.
    pub fn new(channels: &'a mut Channels, name: &str, kind: TestKind, file: &str, epsilon: f64) -> Self {
        let begin = match kind {
            TestKind::Class => format!("- BEGIN unit test of class {}, file: {}", name, file),
            TestKind::Function => format!("- BEGIN unit test of function '{}', file: {}", name, file),
        };
        channels.detail.line(&begin);
        channels.diag.line(&begin);
        channels.diag.blank();

        Self {
            channels,
            name: name.to_string(),
            kind,
            epsilon,
            tests_run: 0,
            failures: 0,
            major: 0,
            minor: 0,
            stop_on_failure: false,
            should_abort: false,
            last_failed: false,
            failure_sites: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tests_run(&self) -> usize {
        self.tests_run
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// `(major, minor)` index of the last assertion.
    pub fn position(&self) -> (usize, usize) {
        (self.major, self.minor)
    }

    pub fn is_aborted(&self) -> bool {
        self.should_abort
    }

    /// Whether the most recent assertion failed.
    pub fn last_failed(&self) -> bool {
        self.last_failed
    }

    pub fn stop_on_failure(&self) -> bool {
        self.stop_on_failure
    }

    pub fn failure_sites(&self) -> &[FailureSite] {
        &self.failure_sites
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of lines written to the detail log so far.
    pub fn log_position(&self) -> usize {
        self.channels.detail.lines()
    }

    // ========================================================================
    // Annotations and policy
    // ========================================================================

    /// Open a new major group of assertions under a free-text heading.
    pub fn message(&mut self, text: &str) {
        if self.should_abort {
            return;
        }
        self.major += 1;
        self.minor = 0;
        if self.channels.verbose {
            let line = format!("* Test msg ({}): {}", self.major, text);
            self.channels.detail.blank();
            self.channels.detail.line(&line);
            self.channels.diag.line(&line);
        }
    }

    /// Write a note on the diagnostic stream only.
    pub fn diag(&mut self, text: &str) {
        self.channels.diag.line(text);
    }

    pub fn set_stop_on_failure(&mut self, enabled: bool) {
        if self.should_abort {
            return;
        }
        self.stop_on_failure = enabled;
        let state = if enabled { "ON" } else { "OFF" };
        self.channels
            .detail
            .line(&format!(" - Switching to mode \"StopTestOnFail\" : {}", state));
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Count an evaluated assertion, attributing a failure to the caller's line.
    #[track_caller]
    pub fn record(&mut self, result: AssertionResult) -> TestFlow {
        self.record_at(result, FailureSite::caller())
    }

    /// Count an evaluated assertion, attributing a failure to `site`.
    pub fn record_at(&mut self, result: AssertionResult, site: FailureSite) -> TestFlow {
        self.record_with(result, site, Vec::new())
    }

    fn record_with(&mut self, result: AssertionResult, site: FailureSite, extra: Vec<String>) -> TestFlow {
        if self.should_abort {
            return Err(Abort { _private: () });
        }

        self.tests_run += 1;
        self.minor += 1;
        self.last_failed = !result.passed;
        if !result.passed {
            self.failures += 1;
        }

        if self.channels.verbose {
            self.log_assertion(&result, &site, &extra);
        }

        if result.passed {
            return Ok(());
        }

        self.failure_sites.push(site);
        if self.stop_on_failure {
            self.should_abort = true;
            self.log_premature_ending();
            return Err(Abort { _private: () });
        }
        Ok(())
    }

    fn log_assertion(&mut self, result: &AssertionResult, site: &FailureSite, extra: &[String]) {
        let status = if result.passed {
            "PASS".to_string()
        } else {
            format!("FAIL ({})", self.failures)
        };
        let line = format!(
            " * Test {} ({}.{}), line: {}: {}, expression: {}",
            self.tests_run, self.major, self.minor, site.line, status, result.expression
        );
        self.channels.detail.line(&line);

        if !result.passed {
            if let Some(ops) = &result.operands {
                self.channels
                    .detail
                    .line(&format!("  -first value : \"{}\" = \"{}\"", ops.left_text, ops.left_value));
                self.channels
                    .detail
                    .line(&format!("  -second value: \"{}\" = \"{}\"", ops.right_text, ops.right_value));
            }
        }
        if let Some(detail) = &result.detail {
            self.channels.detail.line(&format!("   - {}", detail));
        }
        for extra_line in extra {
            self.channels.detail.line(extra_line);
        }
    }

    fn log_premature_ending(&mut self) {
        let detail = &mut self.channels.detail;
        detail.blank();
        detail.line("- PREMATURE ENDING of test due to failure!");
        detail.line(&format!(" - in unit test : {}", self.name));
        detail.line(&format!(
            " - Actual status : {} tests done and {} failure(s)",
            self.tests_run, self.failures
        ));
        detail.blank();
    }

    // ========================================================================
    // Assertions
    // ========================================================================

    #[track_caller]
    pub fn equal<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B) -> TestFlow
    where
        A: PartialEq<B> + Debug + ?Sized,
        B: Debug + ?Sized,
    {
        self.record(evaluator::equal(left_text, a, right_text, b))
    }

    #[track_caller]
    pub fn different<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B) -> TestFlow
    where
        A: PartialEq<B> + Debug + ?Sized,
        B: Debug + ?Sized,
    {
        self.record(evaluator::different(left_text, a, right_text, b))
    }

    #[track_caller]
    pub fn less<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B) -> TestFlow
    where
        A: PartialOrd<B> + Debug + ?Sized,
        B: Debug + ?Sized,
    {
        self.record(evaluator::less(left_text, a, right_text, b))
    }

    #[track_caller]
    pub fn equal_ns<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B) -> TestFlow
    where
        A: PartialEq<B> + ?Sized,
        B: ?Sized,
    {
        self.record(evaluator::equal_ns(left_text, a, right_text, b))
    }

    #[track_caller]
    pub fn different_ns<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B) -> TestFlow
    where
        A: PartialEq<B> + ?Sized,
        B: ?Sized,
    {
        self.record(evaluator::different_ns(left_text, a, right_text, b))
    }

    #[track_caller]
    pub fn less_ns<A, B>(&mut self, left_text: &str, a: &A, right_text: &str, b: &B) -> TestFlow
    where
        A: PartialOrd<B> + ?Sized,
        B: ?Sized,
    {
        self.record(evaluator::less_ns(left_text, a, right_text, b))
    }

    /// Equality within the configured epsilon.
    #[track_caller]
    pub fn approx_equal(&mut self, left_text: &str, a: f64, right_text: &str, b: f64) -> TestFlow {
        let epsilon = self.epsilon;
        self.record(evaluator::approx_equal(left_text, a, right_text, b, epsilon))
    }

    #[track_caller]
    pub fn is_true(&mut self, text: &str, value: bool) -> TestFlow {
        self.record(evaluator::is_true(text, value))
    }

    #[track_caller]
    pub fn is_false(&mut self, text: &str, value: bool) -> TestFlow {
        self.record(evaluator::is_false(text, value))
    }

    /// Truth check that also logs `note` when it fails.
    #[track_caller]
    pub fn is_true_with<N>(&mut self, text: &str, value: bool, note_text: &str, note: &N) -> TestFlow
    where
        N: Debug + ?Sized,
    {
        let mut result = evaluator::is_true(text, value);
        if !value {
            result = result.with_detail(format!("{} : {:?}", note_text, note));
        }
        self.record(result)
    }

    /// Passes iff `op` returns an error. A panic inside `op` is counted as a
    /// failure and then re-raised.
    #[track_caller]
    pub fn throws<T, E, F>(&mut self, text: &str, op: F) -> TestFlow
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let site = FailureSite::caller();
        if self.should_abort {
            return Err(Abort { _private: () });
        }
        let evaluated = evaluator::throws(text, op);
        self.settle(evaluated, site)
    }

    /// Passes iff `op` returns `Ok`. A panic inside `op` is counted as a
    /// failure and then re-raised.
    #[track_caller]
    pub fn no_throw<T, E, F>(&mut self, text: &str, op: F) -> TestFlow
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let site = FailureSite::caller();
        if self.should_abort {
            return Err(Abort { _private: () });
        }
        let evaluated = evaluator::no_throw(text, op);
        self.settle(evaluated, site)
    }

    /// [`throws`](Self::throws), logging an extra argument alongside the outcome.
    #[track_caller]
    pub fn throws_with<T, E, F, N>(&mut self, text: &str, op: F, note_text: &str, note: &N) -> TestFlow
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
        N: Debug + ?Sized,
    {
        let site = FailureSite::caller();
        if self.should_abort {
            return Err(Abort { _private: () });
        }
        let evaluated = with_note(evaluator::throws(text, op), note_text, note);
        self.settle(evaluated, site)
    }

    /// [`no_throw`](Self::no_throw), logging an extra argument alongside the outcome.
    #[track_caller]
    pub fn no_throw_with<T, E, F, N>(&mut self, text: &str, op: F, note_text: &str, note: &N) -> TestFlow
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
        N: Debug + ?Sized,
    {
        let site = FailureSite::caller();
        if self.should_abort {
            return Err(Abort { _private: () });
        }
        let evaluated = with_note(evaluator::no_throw(text, op), note_text, note);
        self.settle(evaluated, site)
    }

    fn settle(&mut self, evaluated: Evaluated, site: FailureSite) -> TestFlow {
        let Evaluated { result, fault } = evaluated;
        match fault {
            Some(payload) => {
                self.channels.detail.line("KUT: unhandled fault !!!");
                self.channels.diag.line("KUT: unhandled fault !!!");
                let _ = self.record_at(result, site);
                self.channels.flush();
                panic::resume_unwind(payload)
            }
            None => self.record_at(result, site),
        }
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    /// Run `body` for `iterations` iterations and fold every check it makes
    /// into a single assertion. A failure is attributed to the caller's line.
    #[track_caller]
    pub fn repeat<F>(&mut self, iterations: usize, mut body: F) -> TestFlow
    where
        F: FnMut(usize, &mut LoopAggregator),
    {
        let site = FailureSite::caller();
        if self.should_abort {
            return Err(Abort { _private: () });
        }

        let mut aggregator = LoopAggregator::begin(iterations);
        for i in 0..iterations {
            aggregator.start_iteration(i);
            body(i, &mut aggregator);
        }
        let result = aggregator.end();
        let summary = if self.channels.verbose {
            aggregator.summary_lines(self.tests_run + 1)
        } else {
            Vec::new()
        };
        self.record_with(result, site, summary)
    }

    /// Run a helper test function inside this unit test, under a new major group.
    pub fn exec<F>(&mut self, name: &str, f: F) -> TestFlow
    where
        F: FnOnce(&mut Self) -> TestFlow,
    {
        if self.should_abort {
            return Err(Abort { _private: () });
        }
        if self.channels.verbose {
            self.channels.detail.blank();
            self.channels
                .detail
                .line(&format!(" - Starting function : {}", name));
        }
        self.major += 1;
        self.minor = 0;
        f(self)
    }

    // ========================================================================
    // Finalization
    // ========================================================================

    /// Close the unit test: write its END marker and failure sites.
    pub fn finalize(mut self) -> UnitOutcome {
        let detail = &mut self.channels.detail;
        detail.line(&format!(
            "- END unit test of {} {}, {} tests done and {} failure(s)",
            self.kind, self.name, self.tests_run, self.failures
        ));
        for site in &self.failure_sites {
            detail.line(&format!(" - failed at line {} of file {}", site.line, site.file));
        }
        detail.blank();

        UnitOutcome {
            tests_run: self.tests_run,
            failures: self.failures,
            failure_sites: self.failure_sites,
            aborted: self.should_abort,
        }
    }
}

fn with_note<N>(mut evaluated: Evaluated, note_text: &str, note: &N) -> Evaluated
where
    N: Debug + ?Sized,
{
    let arg = format!("arg: {} = {:?}", note_text, note);
    let detail = match evaluated.result.detail.take() {
        Some(existing) => format!("{}, {}", existing, arg),
        None => arg,
    };
    evaluated.result.detail = Some(detail);
    evaluated
}
