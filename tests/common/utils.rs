#![allow(dead_code)]

use kut::output::channels::{Captured, Channels};
use kut::{RunnerConfig, SuiteRunner, TestKind, UnitTestContext};

/// A runner already started on in-memory channels.
pub fn started_runner(verbose: bool) -> (SuiteRunner, Captured) {
    let (channels, captured) = Channels::in_memory(verbose);
    let config = RunnerConfig {
        verbose,
        ..RunnerConfig::default()
    };
    let mut runner = SuiteRunner::new(config);
    runner.start_with(channels).unwrap();
    (runner, captured)
}

/// Open a function-kind context on `channels` with the default epsilon.
pub fn context<'a>(channels: &'a mut Channels, name: &str) -> UnitTestContext<'a> {
    UnitTestContext::new(channels, name, TestKind::Function, file!(), 1e-9)
}

/// Detail-log lines containing `needle`.
pub fn lines_containing(text: &str, needle: &str) -> Vec<String> {
    text.lines()
        .filter(|l| l.contains(needle))
        .map(str::to_string)
        .collect()
}

/// A path under the system temp dir, unique per test name and process.
pub fn temp_path(name: &str) -> String {
    let dir = std::env::temp_dir().join(format!("kut-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name).display().to_string()
}
