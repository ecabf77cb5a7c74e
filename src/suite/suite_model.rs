use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::context::UnitOutcome;

/// What a unit test is attached to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Class,
    Function,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::Class => write!(f, "class"),
            TestKind::Function => write!(f, "function"),
        }
    }
}

/// A unit test that ended with at least one failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedTestRecord {
    pub name: String,
    pub kind: TestKind,

    /// Detail-log line where the failing test's report ends
    pub log_line: usize,
}

/// Suite-wide counters, updated once per unit test in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiteTotals {
    pub unit_tests_run: usize,

    /// Unit tests with one failure or more
    pub unit_test_failures: usize,

    pub total_assertions: usize,
    pub total_failures: usize,
    pub failed_tests: Vec<FailedTestRecord>,
}

impl SuiteTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished unit test into the totals.
    pub fn absorb(&mut self, name: &str, kind: TestKind, outcome: &UnitOutcome, log_line: usize) {
        self.unit_tests_run += 1;
        self.total_assertions += outcome.tests_run;
        if outcome.failures > 0 {
            self.unit_test_failures += 1;
            self.total_failures += outcome.failures;
            self.failed_tests.push(FailedTestRecord {
                name: name.to_string(),
                kind,
                log_line,
            });
        }
    }

    pub fn all_passed(&self) -> bool {
        self.total_failures == 0
    }
}
