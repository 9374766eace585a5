//! Remediation orchestrator.
//!
//! Applies every remediation declared by the contract, in declaration
//! order per column (later transforms see earlier output), computes the
//! before/after diff, and resolves post-validation failure handling.

use std::collections::BTreeMap;

use tce_core::{Contract, DeduplicateParams, FailureAction, FailureHandling, RemediationKind};
use tce_validator::engine::effective_action;
use tce_validator::{Table, ValidationResult, Value};
use tracing::{debug, info};

use crate::diff::{RemediationDiff, TreatmentMap, compute_diff, sample_cap_for};
use crate::error::{RemediationError, Result};
use crate::transformers;

/// Runs all remediation actions defined in the contract.
///
/// Returns the remediated table and a [`RemediationDiff`] describing every
/// cell change. The input table is never mutated. The cell diff is computed
/// before deduplication so both sides share a row index space; a
/// deduplication declared anywhere runs once, table-level, at the end.
pub fn run_remediation(table: &Table, contract: &Contract) -> Result<(Table, RemediationDiff)> {
    info!(
        rows = table.n_rows(),
        contract_id = %contract.contract_id,
        "starting remediation run"
    );

    let mut working = table.clone();
    let mut treatments: TreatmentMap = BTreeMap::new();
    let mut dedup: Option<DeduplicateParams> = None;

    for col_config in &contract.columns {
        let col_name = &col_config.name;
        if !working.has_column(col_name) {
            continue;
        }

        for rem in &col_config.remediation {
            let kind = RemediationKind::decode(&rem.remediation_type, &rem.params)?;

            treatments
                .entry(col_name.clone())
                .or_default()
                .push(treatment_name(&kind).to_string());

            match &kind {
                RemediationKind::TrimWhitespace => {
                    replace_column(&mut working, col_name, transformers::trim_whitespace)?;
                }
                RemediationKind::StandardizeNulls(params) => {
                    replace_column(&mut working, col_name, |values| {
                        transformers::standardize_nulls(values, params)
                    })?;
                }
                RemediationKind::NormalizeCase(params) => {
                    replace_column(&mut working, col_name, |values| {
                        transformers::normalize_case(values, params)
                    })?;
                }
                RemediationKind::RemoveNonPrintable => {
                    replace_column(&mut working, col_name, transformers::remove_non_printable)?;
                }
                RemediationKind::NumericCleanup(params) => {
                    replace_column(&mut working, col_name, |values| {
                        transformers::numeric_cleanup(values, params)
                    })?;
                }
                RemediationKind::BooleanNormalization(params) => {
                    replace_column(&mut working, col_name, |values| {
                        transformers::boolean_normalization(values, params)
                    })?;
                }
                RemediationKind::DateCoerce(params) => {
                    replace_column(&mut working, col_name, |values| {
                        transformers::date_coerce(values, params)
                    })?;
                }
                RemediationKind::CategoricalStandardize(params) => {
                    replace_column(&mut working, col_name, |values| {
                        transformers::categorical_standardize(values, params)
                    })?;
                }
                RemediationKind::SplitColumn(params) => {
                    working = transformers::split_column(&working, col_name, params);
                }
                RemediationKind::CustomCalculation(params) => {
                    working = transformers::custom_calculation(&working, col_name, params);
                }
                RemediationKind::DeduplicateRows(params) => {
                    // Deferred: runs once, table-level, after all transforms
                    if dedup.is_none() {
                        dedup = Some(params.clone());
                    }
                }
            }
        }
    }

    let cap = sample_cap_for(table.n_rows());
    let diff = compute_diff(table, &working, cap, &treatments);

    if let Some(params) = dedup {
        working = transformers::deduplicate_rows(&working, &params);
    }

    debug!(
        cells_changed = diff.cells_changed,
        rows_changed = diff.rows_changed,
        "remediation run finished"
    );

    Ok((working, diff))
}

fn replace_column(
    table: &mut Table,
    name: &str,
    transform: impl Fn(&[Value]) -> Vec<Value>,
) -> Result<()> {
    let transformed = transform(table.values(name).unwrap_or(&[]));
    table.set_column(name, transformed)?;
    Ok(())
}

/// Output of failure-handling resolution.
#[derive(Debug, Clone)]
pub struct FailureHandlingOutcome {
    /// The table with `set_null` applied and removed rows filtered out
    pub clean: Table,
    /// All quarantined rows, taken from the input table
    pub quarantine: Table,
    /// Quarantined rows routed to named buckets
    pub named_quarantines: BTreeMap<String, Table>,
}

/// Applies contract failure-handling policies to the validated table.
///
/// `set_null` clears only the offending cell; `drop_row` and
/// `quarantine_row` both remove the row from the clean output. When a
/// single row collects errors from columns with *different* removal actions
/// (one says drop, another says quarantine), the removal sets are unioned
/// with no precedence: the row is removed, and it also appears in the
/// quarantine output. That ambiguity is inherited from the rule format and
/// deliberately left visible rather than resolved here.
///
/// Any error whose effective action is `strict_fail` aborts with
/// [`RemediationError::StrictFailure`]; no output is produced.
pub fn apply_failure_handling(
    table: &Table,
    contract: &Contract,
    validation: &ValidationResult,
) -> Result<FailureHandlingOutcome> {
    let mut strict_failures = 0usize;
    let mut drop_rows: std::collections::BTreeSet<usize> = std::collections::BTreeSet::new();
    let mut quarantine_rows: std::collections::BTreeSet<usize> = std::collections::BTreeSet::new();
    let mut named: BTreeMap<String, std::collections::BTreeSet<usize>> = BTreeMap::new();
    let mut set_null_cells: Vec<(String, usize)> = Vec::new();

    for cell_error in &validation.cell_errors {
        let Some(col_config) = contract.column(&cell_error.column_name) else {
            continue;
        };

        let action = effective_action(col_config, &cell_error.test_type);
        match action {
            FailureAction::StrictFail => strict_failures += 1,
            FailureAction::SetNull => {
                set_null_cells.push((cell_error.column_name.clone(), cell_error.row_index));
            }
            FailureAction::DropRow => {
                drop_rows.insert(cell_error.row_index);
            }
            FailureAction::QuarantineRow => {
                quarantine_rows.insert(cell_error.row_index);
                if let Some(bucket) = quarantine_bucket(col_config, &cell_error.test_type) {
                    named
                        .entry(bucket)
                        .or_default()
                        .insert(cell_error.row_index);
                }
            }
            FailureAction::LabelFailure => {
                // Labeling is an annotation concern, handled by the error
                // label columns on export.
            }
        }
    }

    if strict_failures > 0 {
        return Err(RemediationError::StrictFailure {
            count: strict_failures,
        });
    }

    let mut clean = table.clone();
    for (column, row) in set_null_cells {
        clean.set_value(&column, row, Value::Null);
    }

    let quarantine = table.filter_rows(|row| quarantine_rows.contains(&row));
    let named_quarantines = named
        .into_iter()
        .map(|(bucket, rows)| (bucket, table.filter_rows(|row| rows.contains(&row))))
        .collect();

    // Union of both removal sets, no precedence between drop and quarantine
    let clean = clean.filter_rows(|row| !drop_rows.contains(&row) && !quarantine_rows.contains(&row));

    Ok(FailureHandlingOutcome {
        clean,
        quarantine,
        named_quarantines,
    })
}

/// The quarantine bucket for a failing test on a column: the test-level
/// override's export name when present, else the column default's.
fn quarantine_bucket(
    col_config: &tce_core::ColumnConfig,
    test_type: &str,
) -> Option<String> {
    let override_handling: Option<&FailureHandling> = col_config
        .tests
        .iter()
        .find(|t| t.test_type == test_type)
        .and_then(|t| t.on_fail.as_ref());

    override_handling
        .and_then(|f| f.quarantine_export_name.clone())
        .or_else(|| col_config.failure_handling.quarantine_export_name.clone())
}

fn treatment_name(kind: &RemediationKind) -> &'static str {
    match kind {
        RemediationKind::TrimWhitespace => "Trim Whitespace",
        RemediationKind::StandardizeNulls(_) => "Standardize Null Values",
        RemediationKind::NormalizeCase(_) => "Normalize Case",
        RemediationKind::RemoveNonPrintable => "Remove Non-Printable Characters",
        RemediationKind::DeduplicateRows(_) => "Remove Duplicate Rows",
        RemediationKind::NumericCleanup(_) => "Clean Numeric Formatting",
        RemediationKind::BooleanNormalization(_) => "Standardize Boolean",
        RemediationKind::DateCoerce(_) => "Standardize Date Format",
        RemediationKind::CategoricalStandardize(_) => "Standardize Category Values",
        RemediationKind::SplitColumn(_) => "Split Column",
        RemediationKind::CustomCalculation(_) => "Calculated Column",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tce_core::{ColumnBuilder, ContractBuilder, Severity};
    use tce_validator::run_validation;

    fn messy_table() -> Table {
        Table::from_columns([
            (
                "amount",
                vec![
                    Value::from(" $1,200 "),
                    Value::from("(45)"),
                    Value::from("N/A"),
                ],
            ),
            (
                "status",
                vec![Value::from("YES"), Value::from("no"), Value::from("maybe")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_pipeline_applies_in_declaration_order() {
        // trim must run before numeric_cleanup sees the values
        let contract = ContractBuilder::new()
            .column(
                ColumnBuilder::new("amount")
                    .remediation("trim_whitespace", json!({}))
                    .remediation("standardize_nulls", json!({}))
                    .remediation("numeric_cleanup", json!({}))
                    .build(),
            )
            .column(
                ColumnBuilder::new("status")
                    .remediation("boolean_normalization", json!({}))
                    .build(),
            )
            .build();

        let (cleaned, diff) = run_remediation(&messy_table(), &contract).unwrap();

        assert_eq!(cleaned.value("amount", 0), Some(&Value::Int(1200)));
        assert_eq!(cleaned.value("amount", 1), Some(&Value::Int(-45)));
        assert_eq!(cleaned.value("amount", 2), Some(&Value::Null));
        assert_eq!(cleaned.value("status", 0), Some(&Value::Bool(true)));
        assert_eq!(cleaned.value("status", 2), Some(&Value::from("maybe")));

        assert_eq!(diff.columns_affected, vec!["amount", "status"]);
        let amount_diff = &diff.column_diffs["amount"];
        assert_eq!(amount_diff.changed_count, 3);
        assert_eq!(
            amount_diff.treatments,
            vec![
                "Trim Whitespace",
                "Standardize Null Values",
                "Clean Numeric Formatting"
            ]
        );
    }

    #[test]
    fn test_no_remediation_produces_empty_diff() {
        let contract = ContractBuilder::new()
            .column(ColumnBuilder::new("amount").build())
            .build();
        let (cleaned, diff) = run_remediation(&messy_table(), &contract).unwrap();
        assert_eq!(cleaned.value("amount", 0), Some(&Value::from(" $1,200 ")));
        assert_eq!(diff.cells_changed, 0);
        assert_eq!(diff.rows_changed, 0);
    }

    #[test]
    fn test_unknown_remediation_type_errors() {
        let contract = ContractBuilder::new()
            .column(
                ColumnBuilder::new("amount")
                    .remediation("frobnicate", json!({}))
                    .build(),
            )
            .build();
        let err = run_remediation(&messy_table(), &contract).unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_deduplicate_runs_after_column_transforms() {
        // The two rows only become duplicates after trimming
        let table = Table::from_columns([(
            "id",
            vec![Value::from("a"), Value::from(" a ")],
        )])
        .unwrap();
        let contract = ContractBuilder::new()
            .column(
                ColumnBuilder::new("id")
                    .remediation("trim_whitespace", json!({}))
                    .remediation("deduplicate_rows", json!({}))
                    .build(),
            )
            .build();

        let (cleaned, diff) = run_remediation(&table, &contract).unwrap();
        assert_eq!(cleaned.n_rows(), 1);
        // Diff is computed pre-dedup, over the shared row index space
        assert_eq!(diff.total_rows, 2);
        assert_eq!(diff.cells_changed, 1);
    }

    #[test]
    fn test_split_column_via_pipeline() {
        let table =
            Table::from_columns([("name", vec![Value::from("Ada Lovelace")])]).unwrap();
        let contract = ContractBuilder::new()
            .column(
                ColumnBuilder::new("name")
                    .remediation(
                        "split_column",
                        json!({"delimiter": " ", "new_column_names": ["first", "last"]}),
                    )
                    .build(),
            )
            .build();
        let (cleaned, _) = run_remediation(&table, &contract).unwrap();
        assert_eq!(cleaned.value("first", 0), Some(&Value::from("Ada")));
        assert_eq!(cleaned.value("last", 0), Some(&Value::from("Lovelace")));
    }

    fn failure_table() -> Table {
        Table::from_columns([
            (
                "a",
                vec![
                    Value::from("ok"),
                    Value::Null,
                    Value::from("ok"),
                    Value::Null,
                ],
            ),
            (
                "b",
                vec![
                    Value::from("1"),
                    Value::from("1"),
                    Value::from("999"),
                    Value::from("999"),
                ],
            ),
        ])
        .unwrap()
    }

    fn failure_contract(a_action: FailureAction, b_action: FailureAction) -> Contract {
        ContractBuilder::new()
            .column(
                ColumnBuilder::new("a")
                    .test("not_null", Severity::Error, json!({}))
                    .failure_handling(FailureHandling {
                        action: a_action,
                        label_column_name: Some("a_errs".to_string()),
                        quarantine_export_name: Some("bad_a".to_string()),
                    })
                    .build(),
            )
            .column(
                ColumnBuilder::new("b")
                    .test("range", Severity::Error, json!({"max": 100}))
                    .failure_handling(FailureHandling {
                        action: b_action,
                        label_column_name: Some("b_errs".to_string()),
                        quarantine_export_name: Some("bad_b".to_string()),
                    })
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_set_null_clears_only_offending_cell() {
        let contract = failure_contract(FailureAction::SetNull, FailureAction::SetNull);
        let table = failure_table();
        let validation = run_validation(&table, &contract, None);
        let outcome = apply_failure_handling(&table, &contract, &validation).unwrap();

        assert_eq!(outcome.clean.n_rows(), 4);
        // b=999 rows nulled in b, a untouched
        assert_eq!(outcome.clean.value("b", 2), Some(&Value::Null));
        assert_eq!(outcome.clean.value("a", 2), Some(&Value::from("ok")));
        assert!(outcome.quarantine.is_empty());
    }

    #[test]
    fn test_drop_and_quarantine_union() {
        // Row 3 fails both columns: a says drop, b says quarantine.
        let contract = failure_contract(FailureAction::DropRow, FailureAction::QuarantineRow);
        let table = failure_table();
        let validation = run_validation(&table, &contract, None);
        let outcome = apply_failure_handling(&table, &contract, &validation).unwrap();

        // Rows 1 and 3 dropped (a null), rows 2 and 3 quarantined (b range)
        assert_eq!(outcome.clean.n_rows(), 1);
        assert_eq!(outcome.clean.value("b", 0), Some(&Value::from("1")));

        assert_eq!(outcome.quarantine.n_rows(), 2);
        let named = &outcome.named_quarantines["bad_b"];
        assert_eq!(named.n_rows(), 2);
    }

    #[test]
    fn test_strict_fail_aborts_output() {
        let contract = failure_contract(FailureAction::StrictFail, FailureAction::SetNull);
        let table = failure_table();
        let validation = run_validation(&table, &contract, None);
        let err = apply_failure_handling(&table, &contract, &validation).unwrap_err();
        assert!(matches!(err, RemediationError::StrictFailure { count: 2 }));
    }

    #[test]
    fn test_label_failure_leaves_table_untouched() {
        let contract = failure_contract(FailureAction::LabelFailure, FailureAction::LabelFailure);
        let table = failure_table();
        let validation = run_validation(&table, &contract, None);
        let outcome = apply_failure_handling(&table, &contract, &validation).unwrap();
        assert_eq!(outcome.clean.n_rows(), 4);
        assert_eq!(outcome.clean.value("b", 2), Some(&Value::from("999")));
    }
}
