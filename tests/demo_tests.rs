use kut::demo::sample::{RatioError, RunningStats, Stack, StackError, gcd, parse_ratio};
use kut::demo::suite::run_demo_suite;
use kut::KutError;

mod common;
use crate::common::utils::started_runner;

// ============================================================================
// Bundled suite
// ============================================================================

#[test]
fn demo_suite_passes() {
    let (mut runner, captured) = started_runner(true);
    run_demo_suite(&mut runner, false).unwrap();
    let report = runner.finish().unwrap();

    assert_eq!(report.totals.unit_tests_run, 4);
    assert_eq!(report.totals.total_assertions, 30);
    assert_eq!(report.exit_status(), 0);

    let summary = captured.summary.contents();
    assert!(summary.contains("1: Unit test of class Stack: 16 tests: success"));
    assert!(summary.contains("2: Unit test of class RunningStats: 5 tests: success"));
    assert!(summary.contains("3: Unit test of function gcd: 4 tests: success"));
    assert!(summary.contains("4: Unit test of function parse_ratio: 5 tests: success"));
    assert!(captured.detail.contents().contains(" - Starting function : properties"));
}

#[test]
fn broken_demo_reports_failures() {
    let (mut runner, captured) = started_runner(true);
    run_demo_suite(&mut runner, true).unwrap();
    let report = runner.finish().unwrap();

    assert_eq!(report.totals.unit_tests_run, 5);
    assert_eq!(report.totals.unit_test_failures, 1);
    assert_eq!(report.totals.total_failures, 3);
    assert_eq!(report.exit_status(), 3);
    assert_eq!(report.totals.failed_tests[0].name, "broken_expectations");

    let detail = captured.detail.contents();
    assert!(detail.contains("failed: 11/50 (22%)"));
    assert!(detail.contains("   - 0.1 + 0.2 : 0.30000000000000004"));
}

#[test]
fn demo_suite_rejects_unstarted_runner() {
    let mut runner = kut::SuiteRunner::new(kut::RunnerConfig::default());
    assert!(matches!(
        run_demo_suite(&mut runner, false),
        Err(KutError::InvalidState { .. })
    ));
}

// ============================================================================
// Sample types
// ============================================================================

#[test]
fn stack_bounds() {
    let mut stack = Stack::with_capacity(1);
    assert_eq!(stack.pop(), Err(StackError::Empty));
    stack.push(5).unwrap();
    assert_eq!(stack.push(6), Err(StackError::Full(1)));
    assert_eq!(stack.peek(), Some(5));
    assert_eq!(stack.pop(), Ok(5));
    assert!(stack.is_empty());
}

#[test]
fn running_stats_single_sample() {
    let mut stats = RunningStats::default();
    stats.push(3.0);
    assert_eq!(stats.count(), 1);
    assert_eq!(stats.mean(), 3.0);
    assert_eq!(stats.variance(), 0.0);
}

#[test]
fn gcd_and_ratio() {
    assert_eq!(gcd(0, 0), 0);
    assert_eq!(gcd(21, 14), 7);
    assert_eq!(parse_ratio(" 6 / 3 "), Ok(2.0));
    assert_eq!(parse_ratio("6"), Err(RatioError::MissingSlash("6".to_string())));
    assert_eq!(parse_ratio("a/3"), Err(RatioError::InvalidNumber("a".to_string())));
    assert_eq!(parse_ratio("1/0"), Err(RatioError::ZeroDenominator));
}
