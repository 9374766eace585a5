//! Validation orchestrator.
//!
//! Sequences a run: normalization (a hard barrier), column tests fanned out
//! one thread per column, dataset tests, foreign key checks, then summary
//! aggregation. Per-cell and per-test failures are collected, never thrown;
//! a run always returns a [`ValidationResult`].

use std::collections::BTreeMap;

use tce_core::{
    ColumnConfig, ColumnTestKind, Contract, DatasetTestKind, FailureAction, Severity, TestConfig,
};
use tracing::{debug, info};

use crate::foreign_key::validate_foreign_key;
use crate::normalize::apply_normalizations;
use crate::results::{
    CellValidationResult, ColumnTestResult, ColumnValidationResult, DatasetTestResult,
    ERROR_COLUMN_NAME, ERROR_COUNT_COLUMN_NAME, ForeignKeyCheckResult, STATUS_COLUMN_NAME,
    STATUS_FAIL, STATUS_PASS, ValidationResult, calculate_summary,
};
use crate::table::{Table, Value};
use crate::{column_tests, dataset_tests};

/// Runs a complete validation pass over a table.
///
/// The input table is never mutated; tests observe a normalized working
/// copy. `fk_table` supplies the reference data for any foreign key checks
/// declared by the contract.
pub fn run_validation(
    table: &Table,
    contract: &Contract,
    fk_table: Option<&Table>,
) -> ValidationResult {
    info!(
        rows = table.n_rows(),
        columns = table.n_columns(),
        contract_id = %contract.contract_id,
        "starting validation run"
    );

    let mut blocking_errors: Vec<String> = Vec::new();

    // Normalization is a hard barrier: every test reads the normalized copy.
    let normalized = apply_normalizations(table, contract);

    // Column tests are pure per-column functions; fan out one thread per
    // column (bounded by the contract's <=100 column limit) and join before
    // aggregation.
    let mut column_results: BTreeMap<String, ColumnValidationResult> = BTreeMap::new();
    let mut cell_errors: Vec<CellValidationResult> = Vec::new();

    let mut present_columns: Vec<&ColumnConfig> = Vec::new();
    for col in &contract.columns {
        if normalized.has_column(&col.name) {
            present_columns.push(col);
        } else {
            blocking_errors.push(format!("Column '{}' not found in dataset", col.name));
        }
    }

    let per_column: Vec<(ColumnValidationResult, Vec<CellValidationResult>)> =
        std::thread::scope(|scope| {
            let handles: Vec<_> = present_columns
                .iter()
                .map(|col_config| {
                    let normalized = &normalized;
                    scope.spawn(move || {
                        let values = normalized
                            .values(&col_config.name)
                            .unwrap_or(&[]);
                        validate_column(values, col_config)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("column test worker panicked"))
                .collect()
        });

    for (col_config, (col_result, col_cells)) in present_columns.iter().zip(per_column) {
        // strict_fail escalation uses the effective action: the test-level
        // override when present, else the column default.
        for test_result in &col_result.test_results {
            if !test_result.passed && test_result.severity == Severity::Error {
                let action = effective_action(col_config, &test_result.test_type);
                if action == FailureAction::StrictFail {
                    blocking_errors.push(format!(
                        "Column '{}' test '{}' has strict_fail policy",
                        col_config.name, test_result.test_type
                    ));
                }
            }
        }
        column_results.insert(col_config.name.clone(), col_result);
        cell_errors.extend(col_cells);
    }

    // Dataset tests read the same normalized table.
    let mut dataset_test_results: Vec<DatasetTestResult> = Vec::new();
    for dt_test in &contract.dataset_tests {
        let result = match DatasetTestKind::decode(&dt_test.test_type, &dt_test.params) {
            Ok(kind) => dataset_tests::run_dataset_test(&kind, &normalized, dt_test.severity),
            Err(err) => DatasetTestResult {
                test_type: dt_test.test_type.clone(),
                severity: dt_test.severity,
                passed: false,
                message: err.to_string(),
                details: serde_json::json!({}),
                affected_rows: vec![],
            },
        };

        if !result.passed
            && dt_test.severity == Severity::Error
            && dt_test
                .on_fail
                .as_ref()
                .is_some_and(|f| f.action == FailureAction::StrictFail)
        {
            blocking_errors.push(format!(
                "Dataset test '{}' has strict_fail policy",
                dt_test.test_type
            ));
        }

        dataset_test_results.push(result);
    }

    // Foreign key checks need the reference table resident.
    let mut fk_check_results: Vec<ForeignKeyCheckResult> = Vec::new();
    for fk_check in &contract.foreign_key_checks {
        let Some(reference) = fk_table else {
            fk_check_results.push(ForeignKeyCheckResult {
                name: fk_check.name.clone(),
                dataset_column: fk_check.dataset_column.clone(),
                fk_column: fk_check.fk_column.clone(),
                passed: false,
                total_values: 0,
                missing_count: 0,
                missing_values: vec![],
                missing_row_indices: vec![],
            });
            blocking_errors.push(format!(
                "FK check '{}' failed: no FK file provided",
                fk_check.name
            ));
            continue;
        };

        if !normalized.has_column(&fk_check.dataset_column) {
            blocking_errors.push(format!(
                "FK check '{}': column '{}' not found in dataset",
                fk_check.name, fk_check.dataset_column
            ));
            continue;
        }

        let Some(reference_values) = reference.values(&fk_check.fk_column) else {
            blocking_errors.push(format!(
                "FK check '{}': column '{}' not found in FK file",
                fk_check.name, fk_check.fk_column
            ));
            continue;
        };

        // The dataset column's own normalization applies to both sides.
        let normalization = contract
            .column(&fk_check.dataset_column)
            .and_then(|c| c.normalization.as_ref());

        let result = validate_foreign_key(
            normalized.values(&fk_check.dataset_column).unwrap_or(&[]),
            reference_values,
            &fk_check.name,
            &fk_check.dataset_column,
            &fk_check.fk_column,
            fk_check.null_policy.allow_nulls,
            normalization,
        );

        if !result.passed && fk_check.on_fail.action == FailureAction::StrictFail {
            blocking_errors.push(format!(
                "FK check '{}' has strict_fail policy",
                fk_check.name
            ));
        }

        fk_check_results.push(result);
    }

    let summary = calculate_summary(
        &column_results,
        &dataset_test_results,
        &fk_check_results,
        &cell_errors,
        table.n_rows(),
        table.n_columns(),
        !blocking_errors.is_empty(),
    );

    let is_valid = blocking_errors.is_empty() && summary.total_errors == 0;
    debug!(
        is_valid,
        errors = summary.total_errors,
        warnings = summary.total_warnings,
        "validation run finished"
    );

    ValidationResult {
        is_valid,
        summary,
        column_results,
        dataset_test_results,
        fk_check_results,
        cell_errors,
        blocking_errors,
    }
}

/// The failure action in effect for a given test on a column: a test-level
/// `on_fail` override wins over the column default.
pub fn effective_action(col_config: &ColumnConfig, test_type: &str) -> FailureAction {
    col_config
        .tests
        .iter()
        .find(|t| t.test_type == test_type)
        .and_then(|t| t.on_fail.as_ref())
        .map(|f| f.action)
        .unwrap_or(col_config.failure_handling.action)
}

/// Runs every configured test for one column, producing the aggregate and
/// the per-cell failure records.
fn validate_column(
    values: &[Value],
    col_config: &ColumnConfig,
) -> (ColumnValidationResult, Vec<CellValidationResult>) {
    let mut test_results: Vec<ColumnTestResult> = Vec::new();
    let mut cell_errors: Vec<CellValidationResult> = Vec::new();

    for test in &col_config.tests {
        let result = run_configured_test(values, col_config, test);

        if !result.passed {
            for (i, &row_index) in result.failed_indices.iter().enumerate() {
                let original_value = result
                    .failed_values
                    .get(i)
                    .cloned()
                    .unwrap_or(Value::Null);
                let error_message = result.error_details.get(i).cloned().unwrap_or_default();
                cell_errors.push(CellValidationResult {
                    row_index,
                    column_name: col_config.name.clone(),
                    original_value,
                    test_type: result.test_type.clone(),
                    error_message,
                    severity: result.severity,
                });
            }
        }

        test_results.push(result);
    }

    let aggregate = ColumnValidationResult::from_tests(
        col_config.name.clone(),
        col_config.data_type,
        test_results,
    );
    (aggregate, cell_errors)
}

fn run_configured_test(
    values: &[Value],
    col_config: &ColumnConfig,
    test: &TestConfig,
) -> ColumnTestResult {
    match ColumnTestKind::decode(&test.test_type, &test.params) {
        Ok(kind) => column_tests::run_column_test(
            &kind,
            values,
            &col_config.name,
            col_config.data_type,
            test.severity,
        ),
        // Contract validation rejects these up front; reported here too so
        // an unvalidated contract still cannot no-op silently.
        Err(err) => ColumnTestResult {
            column_name: col_config.name.clone(),
            test_type: test.test_type.clone(),
            severity: test.severity,
            passed: false,
            total_values: values.len(),
            failed_count: 0,
            failed_indices: vec![],
            failed_values: vec![],
            error_details: vec![],
            note: Some(err.to_string()),
        },
    }
}

/// Appends the error-label columns to a copy of the table: pipe-joined
/// `test_type:column` tokens, a per-row error count, and a PASS/FAIL status.
pub fn annotate_errors(table: &Table, validation_result: &ValidationResult) -> Table {
    let n_rows = table.n_rows();
    let mut labels: Vec<Vec<String>> = vec![Vec::new(); n_rows];

    for cell_error in &validation_result.cell_errors {
        if let Some(row_labels) = labels.get_mut(cell_error.row_index) {
            row_labels.push(format!(
                "{}:{}",
                cell_error.test_type, cell_error.column_name
            ));
        }
    }

    let error_column: Vec<Value> = labels
        .iter()
        .map(|row_labels| Value::Str(row_labels.join("|")))
        .collect();
    let count_column: Vec<Value> = labels
        .iter()
        .map(|row_labels| Value::Int(row_labels.len() as i64))
        .collect();
    let status_column: Vec<Value> = labels
        .iter()
        .map(|row_labels| {
            Value::Str(if row_labels.is_empty() {
                STATUS_PASS.to_string()
            } else {
                STATUS_FAIL.to_string()
            })
        })
        .collect();

    let mut annotated = table.clone();
    let _ = annotated.set_column(ERROR_COLUMN_NAME, error_column);
    let _ = annotated.set_column(ERROR_COUNT_COLUMN_NAME, count_column);
    let _ = annotated.set_column(STATUS_COLUMN_NAME, status_column);
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tce_core::{ColumnBuilder, ContractBuilder, FailureHandling};

    fn sample_table() -> Table {
        Table::from_columns([
            (
                "order_id",
                vec![Value::from("1"), Value::from("2"), Value::from("2")],
            ),
            (
                "amount",
                vec![Value::from("50"), Value::from("150"), Value::Null],
            ),
        ])
        .unwrap()
    }

    fn sample_contract() -> Contract {
        ContractBuilder::new()
            .column(
                ColumnBuilder::new("order_id")
                    .test("not_null", Severity::Error, json!({}))
                    .test("uniqueness", Severity::Error, json!({}))
                    .failure_handling(FailureHandling {
                        action: FailureAction::LabelFailure,
                        label_column_name: Some("errs".to_string()),
                        quarantine_export_name: None,
                    })
                    .build(),
            )
            .column(
                ColumnBuilder::new("amount")
                    .test("range", Severity::Error, json!({"min": 0, "max": 100}))
                    .failure_handling(FailureHandling {
                        action: FailureAction::SetNull,
                        ..Default::default()
                    })
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_full_run_collects_all_failures() {
        let result = run_validation(&sample_table(), &sample_contract(), None);

        assert!(!result.is_valid);
        assert!(result.blocking_errors.is_empty());

        let order_result = &result.column_results["order_id"];
        assert!(!order_result.is_valid);

        // uniqueness failed on rows 1 and 2, range on row 1
        let rows: Vec<usize> = result.cell_errors.iter().map(|c| c.row_index).collect();
        assert!(rows.contains(&1));
        assert!(rows.contains(&2));
        assert_eq!(result.summary.total_rows, 3);
        assert_eq!(result.summary.rows_with_errors, 2);
    }

    #[test]
    fn test_missing_column_is_blocking() {
        let contract = ContractBuilder::new()
            .column(ColumnBuilder::new("ghost").build())
            .build();
        let result = run_validation(&sample_table(), &contract, None);
        assert!(!result.is_valid);
        assert_eq!(
            result.blocking_errors,
            vec!["Column 'ghost' not found in dataset".to_string()]
        );
    }

    #[test]
    fn test_strict_fail_escalates_to_blocking() {
        let contract = ContractBuilder::new()
            .column(
                ColumnBuilder::new("amount")
                    .test("range", Severity::Error, json!({"max": 100}))
                    .build(), // default failure handling is strict_fail
            )
            .build();
        let result = run_validation(&sample_table(), &contract, None);
        assert!(!result.is_valid);
        assert!(
            result
                .blocking_errors
                .iter()
                .any(|e| e.contains("strict_fail"))
        );
        assert!(result.summary.has_blocking_errors);
    }

    #[test]
    fn test_on_fail_override_beats_column_default() {
        let col = ColumnBuilder::new("amount")
            .test_with_on_fail(
                "range",
                Severity::Error,
                json!({"max": 100}),
                FailureHandling {
                    action: FailureAction::SetNull,
                    ..Default::default()
                },
            )
            .build();
        assert_eq!(effective_action(&col, "range"), FailureAction::SetNull);

        let contract = ContractBuilder::new().column(col).build();
        let result = run_validation(&sample_table(), &contract, None);
        // Failing test, but no strict_fail escalation
        assert!(result.blocking_errors.is_empty());
    }

    #[test]
    fn test_warning_severity_does_not_invalidate() {
        let contract = ContractBuilder::new()
            .column(
                ColumnBuilder::new("amount")
                    .test_with_on_fail(
                        "range",
                        Severity::Warning,
                        json!({"max": 100}),
                        FailureHandling {
                            action: FailureAction::SetNull,
                            ..Default::default()
                        },
                    )
                    .build(),
            )
            .build();
        let result = run_validation(&sample_table(), &contract, None);
        assert!(result.is_valid, "warnings must not fail the run");
        assert!(result.summary.total_warnings > 0);
    }

    #[test]
    fn test_dataset_tests_read_normalized_table() {
        // " 2 " normalizes to "2", creating a duplicate key
        let table = Table::from_columns([(
            "id",
            vec![Value::from("2"), Value::from(" 2 ")],
        )])
        .unwrap();
        let contract = ContractBuilder::new()
            .column(ColumnBuilder::new("id").build())
            .dataset_test_with_severity(
                "primary_key_uniqueness",
                Severity::Warning,
                json!({"key_columns": ["id"]}),
            )
            .build();
        let result = run_validation(&table, &contract, None);
        assert!(!result.dataset_test_results[0].passed);
    }

    #[test]
    fn test_fk_check_without_reference_table_blocks() {
        let mut contract = sample_contract();
        contract
            .foreign_key_checks
            .push(tce_core::ForeignKeyCheck {
                name: "fk".to_string(),
                dataset_column: "order_id".to_string(),
                fk_file: "ref.csv".to_string(),
                fk_column: "id".to_string(),
                fk_sheet: None,
                normalization_inherit_from_dataset_column: true,
                null_policy: Default::default(),
                on_fail: Default::default(),
            });
        let result = run_validation(&sample_table(), &contract, None);
        assert!(
            result
                .blocking_errors
                .iter()
                .any(|e| e.contains("no FK file provided"))
        );
        assert_eq!(result.fk_check_results.len(), 1);
        assert!(!result.fk_check_results[0].passed);
    }

    #[test]
    fn test_fk_check_runs_against_reference() {
        let mut contract = ContractBuilder::new()
            .column(ColumnBuilder::new("order_id").build())
            .build();
        contract
            .foreign_key_checks
            .push(tce_core::ForeignKeyCheck {
                name: "fk".to_string(),
                dataset_column: "order_id".to_string(),
                fk_file: "ref.csv".to_string(),
                fk_column: "id".to_string(),
                fk_sheet: None,
                normalization_inherit_from_dataset_column: true,
                null_policy: tce_core::NullPolicy { allow_nulls: true },
                on_fail: Default::default(),
            });

        let reference =
            Table::from_columns([("id", vec![Value::from("1"), Value::from("2")])]).unwrap();
        let result = run_validation(&sample_table(), &contract, Some(&reference));
        assert!(result.fk_check_results[0].passed);
    }

    #[test]
    fn test_annotate_errors_labels() {
        let result = run_validation(&sample_table(), &sample_contract(), None);
        let annotated = annotate_errors(&sample_table(), &result);

        assert!(annotated.has_column(ERROR_COLUMN_NAME));
        let status = annotated.values(STATUS_COLUMN_NAME).unwrap();
        assert_eq!(status[0], Value::from(STATUS_PASS));
        assert_eq!(status[1], Value::from(STATUS_FAIL));

        let labels = annotated.values(ERROR_COLUMN_NAME).unwrap();
        let row1 = labels[1].string_form();
        assert!(row1.contains("uniqueness:order_id"));
        assert!(row1.contains("range:amount"));
        assert!(row1.contains('|'));

        let counts = annotated.values(ERROR_COUNT_COLUMN_NAME).unwrap();
        assert_eq!(counts[1], Value::Int(2));
    }

    #[test]
    fn test_failed_rows_matches_summary() {
        let result = run_validation(&sample_table(), &sample_contract(), None);
        let failed = result.failed_rows();
        assert_eq!(failed.len(), result.summary.rows_with_errors);
        assert!(failed.contains(&1));
    }

    #[test]
    fn test_unknown_test_type_reported_not_silent() {
        let contract = ContractBuilder::new()
            .column(
                ColumnBuilder::new("amount")
                    .test("frobnicate", Severity::Error, json!({}))
                    .build(),
            )
            .build();
        let result = run_validation(&sample_table(), &contract, None);
        let tests = &result.column_results["amount"].test_results;
        assert!(!tests[0].passed);
        assert!(tests[0].note.as_deref().unwrap().contains("frobnicate"));
    }
}
