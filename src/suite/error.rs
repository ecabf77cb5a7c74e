use std::io;

use thiserror::Error;

use crate::suite::runner::RunnerState;

#[derive(Debug, Error)]
pub enum KutError {
    /// The detail log or the diagnostic stream could not be opened at start
    #[error("Unable to open {channel} {path}: {source}")]
    ChannelOpen {
        channel: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    /// Writing to one of the output channels failed
    #[error("Failed to write test log: {0}")]
    LogWrite(#[source] io::Error),

    /// A runner operation was called in the wrong lifecycle state
    #[error("Cannot {operation} while the suite runner is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: RunnerState,
    },

    /// A stop-on-failure policy ended the suite early
    #[error("Premature ending in unit test '{test}': {tests_run} tests done and {failures} failure(s)")]
    Aborted {
        test: String,
        tests_run: usize,
        failures: usize,
    },

    /// The configuration file exists but could not be parsed
    #[error("Invalid config file '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
