use crate::suite::suite_model::SuiteTotals;

// ============================================================================
// Final report: detail log and console summary
// ============================================================================

/// Aggregate report appended to the detail log.
///
/// Produces output like:
/// ```text
/// *****************************************************
/// Test end :
///  - Nb of U.T. = 2
///  - Nb U.T. Failures = 1
///  - Total Nb of tests = 5
///  - Total Nb failures = 1
///  - List of failed tests:
/// 0: test failed for class: Stack, see at line 14
/// ```
pub fn format_detail_report(totals: &SuiteTotals) -> String {
    let mut lines = vec![
        "*****************************************************".to_string(),
        "Test end :".to_string(),
    ];
    lines.extend(count_lines(totals, "Nb U.T. Failures"));

    if !totals.failed_tests.is_empty() {
        lines.push(" - List of failed tests:".to_string());
    }
    for (i, record) in totals.failed_tests.iter().enumerate() {
        lines.push(format!(
            "{}: test failed for {}: {}, see at line {}",
            i, record.kind, record.name, record.log_line
        ));
    }

    lines.join("\n")
}

/// Totals block printed on the summary stream once the suite ends.
pub fn format_summary_report(totals: &SuiteTotals, log_file: &str) -> String {
    let mut lines = vec![String::new(), " Test end :".to_string()];
    lines.extend(count_lines(totals, "Nb Failures"));

    for record in &totals.failed_tests {
        lines.push(format!(
            "   failed: {} {}, see log line {}",
            record.kind, record.name, record.log_line
        ));
    }
    lines.push(format!(" See file {}", log_file));

    lines.join("\n")
}

fn count_lines(totals: &SuiteTotals, failures_label: &str) -> Vec<String> {
    vec![
        format!(" - Nb of U.T. = {}", totals.unit_tests_run),
        format!(" - {} = {}", failures_label, totals.unit_test_failures),
        format!(" - Total Nb of tests = {}", totals.total_assertions),
        format!(" - Total Nb failures = {}", totals.total_failures),
    ]
}
