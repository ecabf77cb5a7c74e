use serde::{Deserialize, Serialize};

use crate::suite::suite_model::SuiteTotals;

// ============================================================================
// Suite report: final totals handed back to the runner's caller
// ============================================================================

/// Outcome of a finished suite run.
///
/// Produced by `SuiteRunner::finish()`. The runner `main` ends the process with
/// [`exit_status`](Self::exit_status).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiteReport {
    /// Path of the detail log the failed-test line numbers refer to
    pub log_file: String,

    pub totals: SuiteTotals,
}

impl SuiteReport {
    pub fn new(log_file: &str, totals: SuiteTotals) -> Self {
        Self {
            log_file: log_file.to_string(),
            totals,
        }
    }

    /// Total failure count, saturated to the range of an exit code.
    pub fn exit_status(&self) -> i32 {
        i32::try_from(self.totals.total_failures).unwrap_or(i32::MAX)
    }

    pub fn all_passed(&self) -> bool {
        self.totals.all_passed()
    }
}
