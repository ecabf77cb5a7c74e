use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::suite::suite_model::TestKind;

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TestKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests_run: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, event: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            event: event.to_string(),
            test: None,
            kind: None,
            tests_run: None,
            failures: None,
            detail: None,
        }
    }

    pub fn with_test(mut self, name: &str, kind: TestKind) -> Self {
        self.test = Some(name.to_string());
        self.kind = Some(kind);
        self
    }

    pub fn with_counts(mut self, tests_run: usize, failures: usize) -> Self {
        self.tests_run = Some(tests_run);
        self.failures = Some(failures);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
