//! Minimal unit testing: assertions attached to types and free functions,
//! run in order by a [`SuiteRunner`], reported on a console summary and an
//! exhaustive detail log. The suite's exit status is its total failure count.
//!
//! ```no_run
//! use kut::{RunnerConfig, SuiteRunner, TestFlow, UnitTestContext};
//!
//! fn test_addition(t: &mut UnitTestContext<'_>) -> TestFlow {
//!     t.message("small numbers");
//!     t.equal("1 + 1", &(1 + 1), "2", &2)?;
//!     t.repeat(100, |i, lp| lp.less("i", &i, "100", &100usize))
//! }
//!
//! fn main() {
//!     let mut runner = SuiteRunner::new(RunnerConfig::default());
//!     if runner.start().is_err() {
//!         std::process::exit(1);
//!     }
//!     if runner.run_function_test("addition", test_addition).is_err() {
//!         std::process::exit(1);
//!     }
//!     match runner.finish() {
//!         Ok(report) => std::process::exit(report.exit_status()),
//!         Err(_) => std::process::exit(1),
//!     }
//! }
//! ```

pub mod assertion;
pub mod cli;
pub mod context;
pub mod demo;
pub mod looping;
pub mod output;
pub mod report;
pub mod suite;
pub mod trace;

pub use assertion::assertion_model::{AssertionKind, AssertionResult, Operands};
pub use context::context::{Abort, FailureSite, TestFlow, UnitOutcome, UnitTestContext};
pub use looping::aggregator::LoopAggregator;
pub use output::channels::Channels;
pub use report::report_model::SuiteReport;
pub use suite::error::KutError;
pub use suite::runner::{RunnerConfig, RunnerState, SuiteRunner, TestedClass};
pub use suite::suite_model::{FailedTestRecord, SuiteTotals, TestKind};
