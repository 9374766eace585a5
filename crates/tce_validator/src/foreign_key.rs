//! Foreign key membership validation.
//!
//! Checks that every value of a dataset column exists in a reference column
//! loaded from a separate table. The dataset column's own normalization is
//! applied to both sides before membership is tested, so "TX " in the
//! dataset matches "tx" in the reference list when the column folds case.

use std::collections::HashSet;

use tce_core::{CaseMode, Normalization};

use crate::results::ForeignKeyCheckResult;
use crate::table::Value;

/// Cap on distinct missing values retained in the result.
pub const MAX_MISSING_VALUES: usize = 100;

/// Cap on missing row indices retained in the result.
pub const MAX_MISSING_ROWS: usize = 1000;

/// Normalizes one value for FK comparison: trim, null-token substitution,
/// case folding. Non-printable stripping is not part of FK comparison.
pub fn normalize_fk_value(value: &Value, norm: &Normalization) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    let mut text = value.string_form();
    if norm.trim_whitespace {
        text = text.trim().to_string();
    }

    if norm.null_tokens.iter().any(|t| *t == text) {
        return Value::Null;
    }

    let folded = match norm.case {
        CaseMode::None => text,
        CaseMode::Lower => text.to_lowercase(),
        CaseMode::Upper => text.to_uppercase(),
        CaseMode::Title => crate::normalize::to_title_case(&text),
    };
    Value::Str(folded)
}

/// Validates that dataset values exist in the foreign key reference set.
///
/// Null handling follows `allow_nulls`: when disallowed, null dataset
/// values are reported as missing; when allowed, they are skipped. Output
/// is capped at [`MAX_MISSING_VALUES`] distinct values (first-seen order)
/// and [`MAX_MISSING_ROWS`] row indices; counts stay exact.
pub fn validate_foreign_key(
    dataset_values: &[Value],
    reference_values: &[Value],
    name: &str,
    dataset_column: &str,
    fk_column: &str,
    allow_nulls: bool,
    normalization: Option<&Normalization>,
) -> ForeignKeyCheckResult {
    let normalize = |value: &Value| -> Value {
        match normalization {
            Some(norm) => normalize_fk_value(value, norm),
            None => value.clone(),
        }
    };

    let reference_set: HashSet<String> = reference_values
        .iter()
        .map(&normalize)
        .filter(|v| !v.is_null())
        .map(|v| v.key_repr())
        .collect();

    let mut missing: Vec<(usize, Value)> = Vec::new();
    for (row, value) in dataset_values.iter().enumerate() {
        let normalized = normalize(value);

        if normalized.is_null() {
            if !allow_nulls {
                missing.push((row, Value::Null));
            }
            continue;
        }

        if !reference_set.contains(&normalized.key_repr()) {
            missing.push((row, normalized));
        }
    }

    let missing_count = missing.len();
    let missing_row_indices: Vec<usize> = missing
        .iter()
        .map(|(row, _)| *row)
        .take(MAX_MISSING_ROWS)
        .collect();

    let mut missing_values: Vec<Value> = Vec::new();
    let mut seen_missing: HashSet<String> = HashSet::new();
    for (_, value) in &missing {
        if missing_values.len() >= MAX_MISSING_VALUES {
            break;
        }
        if seen_missing.insert(value.key_repr()) {
            missing_values.push(value.clone());
        }
    }

    ForeignKeyCheckResult {
        name: name.to_string(),
        dataset_column: dataset_column.to_string(),
        fk_column: fk_column.to_string(),
        passed: missing_count == 0,
        total_values: dataset_values.len(),
        missing_count,
        missing_values,
        missing_row_indices,
    }
}
