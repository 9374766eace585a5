//! Before/after diff computation for remediation runs.
//!
//! Compares pre- and post-remediation tables over the same row index space
//! and reports changes at cell, column and row granularity. Sample capture
//! is caller-configurable so small datasets keep every change while large
//! ones stay bounded.

use std::collections::BTreeMap;

use serde::Serialize;

use tce_validator::{Table, Value};

/// Full capture threshold: below this row count every change is sampled.
pub const FULL_CAPTURE_ROW_LIMIT: usize = 1000;

/// Sample cap per column for tables at or above the full-capture threshold.
pub const DEFAULT_SAMPLE_CAP: usize = 1000;

/// Per-column treatment names, recorded while transforms run.
pub type TreatmentMap = BTreeMap<String, Vec<String>>;

/// A change to a single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellChange {
    pub row_index: usize,
    pub column_name: String,
    pub original_value: Value,
    pub new_value: Value,
}

/// Diff summary for a single column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDiff {
    pub column_name: String,
    pub total_values: usize,
    pub changed_count: usize,
    pub change_rate_percent: f64,
    pub sample_changes: Vec<CellChange>,
    /// Human-readable names of the treatments applied to this column
    pub treatments: Vec<String>,
}

/// Complete diff for a remediation run.
#[derive(Debug, Clone, Serialize)]
pub struct RemediationDiff {
    pub total_rows: usize,
    pub total_columns: usize,
    pub rows_changed: usize,
    pub cells_changed: usize,
    pub columns_affected: Vec<String>,
    pub column_diffs: BTreeMap<String, ColumnDiff>,
    pub row_change_summary: BTreeMap<usize, usize>,
}

/// The sample cap historically tied to dataset size: full capture under
/// [`FULL_CAPTURE_ROW_LIMIT`] rows, [`DEFAULT_SAMPLE_CAP`] per column above.
pub fn sample_cap_for(total_rows: usize) -> usize {
    if total_rows < FULL_CAPTURE_ROW_LIMIT {
        total_rows
    } else {
        DEFAULT_SAMPLE_CAP
    }
}

/// Computes the diff between an original and a remediated table.
///
/// The two tables must share a row index space. Inequality is null-aware:
/// a null↔non-null transition counts as a change, null↔null does not.
/// Columns added by remediation (splits, calculations) are not part of the
/// cell diff; it covers the original column set.
pub fn compute_diff(
    original: &Table,
    remediated: &Table,
    max_samples_per_column: usize,
    treatments: &TreatmentMap,
) -> RemediationDiff {
    let mut column_diffs: BTreeMap<String, ColumnDiff> = BTreeMap::new();
    let mut row_changes: BTreeMap<usize, usize> = BTreeMap::new();
    let mut cells_changed = 0usize;
    let mut columns_affected: Vec<String> = Vec::new();

    for column in original.iter_columns() {
        let Some(new_values) = remediated.values(&column.name) else {
            continue;
        };

        let mut changed_count = 0usize;
        let mut sample_changes: Vec<CellChange> = Vec::new();

        for (row, original_value) in column.values.iter().enumerate() {
            let Some(new_value) = new_values.get(row) else {
                continue;
            };
            if original_value != new_value {
                changed_count += 1;
                *row_changes.entry(row).or_insert(0) += 1;
                if sample_changes.len() < max_samples_per_column {
                    sample_changes.push(CellChange {
                        row_index: row,
                        column_name: column.name.clone(),
                        original_value: original_value.clone(),
                        new_value: new_value.clone(),
                    });
                }
            }
        }

        if changed_count > 0 {
            columns_affected.push(column.name.clone());
            cells_changed += changed_count;

            let total_values = column.values.len();
            let change_rate = if total_values > 0 {
                changed_count as f64 / total_values as f64 * 100.0
            } else {
                0.0
            };

            column_diffs.insert(
                column.name.clone(),
                ColumnDiff {
                    column_name: column.name.clone(),
                    total_values,
                    changed_count,
                    change_rate_percent: (change_rate * 100.0).round() / 100.0,
                    sample_changes,
                    treatments: treatments.get(&column.name).cloned().unwrap_or_default(),
                },
            );
        }
    }

    RemediationDiff {
        total_rows: original.n_rows(),
        total_columns: original.n_columns(),
        rows_changed: row_changes.len(),
        cells_changed,
        columns_affected,
        column_diffs,
        row_change_summary: row_changes,
    }
}

/// Formats a diff summary for display.
pub fn format_diff_summary(diff: &RemediationDiff) -> String {
    let mut lines = vec![
        "Remediation Summary".to_string(),
        "=".repeat(40),
        format!("Total Rows: {}", diff.total_rows),
        format!("Rows Changed: {}", diff.rows_changed),
        format!("Cells Changed: {}", diff.cells_changed),
        format!("Columns Affected: {}", diff.columns_affected.len()),
    ];

    if !diff.columns_affected.is_empty() {
        lines.push(String::new());
        lines.push("Changes by Column:".to_string());
        for column in &diff.columns_affected {
            if let Some(col_diff) = diff.column_diffs.get(column) {
                lines.push(format!(
                    "  - {}: {} changes ({:.1}%)",
                    column, col_diff.changed_count, col_diff.change_rate_percent
                ));
            }
        }
    }

    lines.join("\n")
}
