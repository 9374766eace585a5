//! Validation result structures.
//!
//! Results are pure outputs of a run: they carry no references back into the
//! engine and must not be mutated after return.

use std::collections::BTreeMap;

use serde::Serialize;
use tce_core::{DataType, Severity};

use crate::table::Value;

/// Name of the appended error-label column (pipe-joined `test:column` tokens).
pub const ERROR_COLUMN_NAME: &str = "__tce_errors__";

/// Name of the appended per-row error count column.
pub const ERROR_COUNT_COLUMN_NAME: &str = "__tce_error_count__";

/// Name of the appended status column.
pub const STATUS_COLUMN_NAME: &str = "__tce_status__";

/// Status column values.
pub const STATUS_PASS: &str = "PASS";
pub const STATUS_FAIL: &str = "FAIL";

/// Result of validating a single cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellValidationResult {
    pub row_index: usize,
    pub column_name: String,
    pub original_value: Value,
    pub test_type: String,
    pub error_message: String,
    pub severity: Severity,
}

/// Result of running one test on one column.
///
/// Evidence is capped and deterministic: at most 100 failed (row, value)
/// pairs and 10 detail strings, taken as the first encountered.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnTestResult {
    pub column_name: String,
    pub test_type: String,
    pub severity: Severity,
    pub passed: bool,
    pub total_values: usize,
    pub failed_count: usize,
    pub failed_indices: Vec<usize>,
    pub failed_values: Vec<Value>,
    pub error_details: Vec<String>,
    /// Informational note (e.g. auto-pass reasons, cardinality heuristics)
    pub note: Option<String>,
}

/// Per-column status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnStatus {
    Pass,
    Warning,
    Fail,
}

/// Aggregate result for one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnValidationResult {
    pub column_name: String,
    pub data_type: DataType,
    pub is_valid: bool,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub warning_count: usize,
    pub test_results: Vec<ColumnTestResult>,
    pub overall_status: ColumnStatus,
}

impl ColumnValidationResult {
    /// Builds the aggregate from individual test results.
    pub fn from_tests(
        column_name: String,
        data_type: DataType,
        test_results: Vec<ColumnTestResult>,
    ) -> Self {
        let total_tests = test_results.len();
        let passed_tests = test_results.iter().filter(|r| r.passed).count();
        let failed_tests = total_tests - passed_tests;
        let warning_count = test_results
            .iter()
            .filter(|r| !r.passed && r.severity == Severity::Warning)
            .count();
        let error_count = test_results
            .iter()
            .filter(|r| !r.passed && r.severity == Severity::Error)
            .count();

        let overall_status = if error_count > 0 {
            ColumnStatus::Fail
        } else if warning_count > 0 {
            ColumnStatus::Warning
        } else {
            ColumnStatus::Pass
        };

        Self {
            column_name,
            data_type,
            is_valid: error_count == 0,
            total_tests,
            passed_tests,
            failed_tests,
            warning_count,
            test_results,
            overall_status,
        }
    }
}

/// Result of a dataset-level test.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetTestResult {
    pub test_type: String,
    pub severity: Severity,
    pub passed: bool,
    pub message: String,
    pub details: serde_json::Value,
    pub affected_rows: Vec<usize>,
}

/// Result of a foreign key membership check.
#[derive(Debug, Clone, Serialize)]
pub struct ForeignKeyCheckResult {
    pub name: String,
    pub dataset_column: String,
    pub fk_column: String,
    pub passed: bool,
    pub total_values: usize,
    pub missing_count: usize,
    pub missing_values: Vec<Value>,
    pub missing_row_indices: Vec<usize>,
}

/// Summary statistics for a validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub total_tests_run: usize,
    pub total_tests_passed: usize,
    pub total_tests_failed: usize,
    pub total_warnings: usize,
    pub total_errors: usize,
    pub rows_with_errors: usize,
    pub clean_rows: usize,
    pub error_rate_percent: f64,
    pub has_blocking_errors: bool,
}

/// Complete validation result for one run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub summary: ValidationSummary,
    pub column_results: BTreeMap<String, ColumnValidationResult>,
    pub dataset_test_results: Vec<DatasetTestResult>,
    pub fk_check_results: Vec<ForeignKeyCheckResult>,
    pub cell_errors: Vec<CellValidationResult>,
    pub blocking_errors: Vec<String>,
}

impl ValidationResult {
    /// Row indices that carry at least one error-severity cell failure.
    pub fn failed_rows(&self) -> std::collections::BTreeSet<usize> {
        self.cell_errors
            .iter()
            .filter(|c| c.severity == Severity::Error)
            .map(|c| c.row_index)
            .collect()
    }
}

/// Calculates the run summary from component results.
pub fn calculate_summary(
    column_results: &BTreeMap<String, ColumnValidationResult>,
    dataset_test_results: &[DatasetTestResult],
    fk_check_results: &[ForeignKeyCheckResult],
    cell_errors: &[CellValidationResult],
    row_count: usize,
    column_count: usize,
    has_blocking_errors: bool,
) -> ValidationSummary {
    let mut total_tests = 0;
    let mut passed_tests = 0;
    let mut failed_tests = 0;
    let mut warnings = 0;
    let mut errors = 0;

    for col_result in column_results.values() {
        total_tests += col_result.total_tests;
        passed_tests += col_result.passed_tests;
        failed_tests += col_result.failed_tests;
        warnings += col_result.warning_count;
    }

    for dt_result in dataset_test_results {
        total_tests += 1;
        if dt_result.passed {
            passed_tests += 1;
        } else {
            failed_tests += 1;
            match dt_result.severity {
                Severity::Warning => warnings += 1,
                Severity::Error => errors += 1,
            }
        }
    }

    for fk_result in fk_check_results {
        total_tests += 1;
        if fk_result.passed {
            passed_tests += 1;
        } else {
            failed_tests += 1;
            errors += 1;
        }
    }

    let mut error_rows = std::collections::BTreeSet::new();
    for cell_error in cell_errors {
        match cell_error.severity {
            Severity::Error => {
                error_rows.insert(cell_error.row_index);
                errors += 1;
            }
            Severity::Warning => warnings += 1,
        }
    }

    let rows_with_errors = error_rows.len();
    let clean_rows = row_count.saturating_sub(rows_with_errors);
    let error_rate = if row_count > 0 {
        rows_with_errors as f64 / row_count as f64 * 100.0
    } else {
        0.0
    };

    ValidationSummary {
        total_rows: row_count,
        total_columns: column_count,
        total_tests_run: total_tests,
        total_tests_passed: passed_tests,
        total_tests_failed: failed_tests,
        total_warnings: warnings,
        total_errors: errors,
        rows_with_errors,
        clean_rows,
        error_rate_percent: (error_rate * 100.0).round() / 100.0,
        has_blocking_errors,
    }
}

/// Formats a validation summary for display.
pub fn format_validation_summary(summary: &ValidationSummary) -> String {
    let mut lines = vec![
        "Validation Summary".to_string(),
        "=".repeat(40),
        format!("Total Rows: {}", summary.total_rows),
        format!("Total Columns: {}", summary.total_columns),
        format!("Tests Run: {}", summary.total_tests_run),
        format!("Tests Passed: {}", summary.total_tests_passed),
        format!("Tests Failed: {}", summary.total_tests_failed),
        format!("Warnings: {}", summary.total_warnings),
        format!("Errors: {}", summary.total_errors),
        format!("Rows with Errors: {}", summary.rows_with_errors),
        format!("Clean Rows: {}", summary.clean_rows),
        format!("Error Rate: {:.2}%", summary.error_rate_percent),
    ];

    if summary.has_blocking_errors {
        lines.push("Status: BLOCKED (has strict failures)".to_string());
    } else {
        lines.push("Status: OK".to_string());
    }

    lines.join("\n")
}
