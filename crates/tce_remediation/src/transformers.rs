//! Remediation transformer implementations.
//!
//! Column transforms rewrite one column's values; table transforms
//! (`split_column`, `custom_calculation`) add columns; `deduplicate_rows`
//! removes rows and runs once, table-level, after everything else. All
//! transforms are deterministic and leave nulls null unless a parameter
//! says otherwise.

use tce_core::{
    BooleanNormParams, CalcOp, CaseMode, CategoricalParams, CustomCalcParams, DateCoerceParams,
    DeduplicateParams, KeepPolicy, NormalizeCaseParams, NumericCleanupParams, ParseErrorPolicy,
    SplitColumnParams, StandardizeNullsParams,
};
use tce_presets::{DEFAULT_COERCE_INPUT_FORMATS, coerce_date_to_format};
use tce_validator::normalize::{strip_non_printable, to_title_case};
use tce_validator::{Table, Value};

/// Trims leading/trailing whitespace on string values.
pub fn trim_whitespace(values: &[Value]) -> Vec<Value> {
    values
        .iter()
        .map(|v| match v {
            Value::Str(s) => Value::Str(s.trim().to_string()),
            other => other.clone(),
        })
        .collect()
}

/// Replaces configured null tokens with actual nulls. Tokens match on the
/// trimmed string form.
pub fn standardize_nulls(values: &[Value], params: &StandardizeNullsParams) -> Vec<Value> {
    values
        .iter()
        .map(|v| {
            if v.is_null() {
                return Value::Null;
            }
            let trimmed = v.string_form().trim().to_string();
            if params.null_tokens.iter().any(|t| *t == trimmed) {
                Value::Null
            } else {
                v.clone()
            }
        })
        .collect()
}

/// Case-folds string values.
pub fn normalize_case(values: &[Value], params: &NormalizeCaseParams) -> Vec<Value> {
    values
        .iter()
        .map(|v| match v {
            Value::Str(s) => Value::Str(match params.case {
                CaseMode::None => s.clone(),
                CaseMode::Lower => s.to_lowercase(),
                CaseMode::Upper => s.to_uppercase(),
                CaseMode::Title => to_title_case(s),
            }),
            other => other.clone(),
        })
        .collect()
}

/// Strips non-printable characters, keeping tab/newline/carriage-return.
pub fn remove_non_printable(values: &[Value]) -> Vec<Value> {
    values
        .iter()
        .map(|v| match v {
            Value::Str(s) => Value::Str(strip_non_printable(s)),
            other => other.clone(),
        })
        .collect()
}

/// Cleans numeric formatting: `(123)` as negative, currency symbols and
/// thousands separators removed, then parsed to integer or float.
/// Unparsable values follow `on_parse_error`.
pub fn numeric_cleanup(values: &[Value], params: &NumericCleanupParams) -> Vec<Value> {
    values
        .iter()
        .map(|v| {
            if v.is_null() {
                return Value::Null;
            }

            let mut text = v.string_form().trim().to_string();

            if params.parentheses_as_negative && text.starts_with('(') && text.ends_with(')') {
                text = format!("-{}", &text[1..text.len() - 1]);
            }

            if params.remove_currency_symbols {
                text.retain(|c| !matches!(c, '$' | '£' | '€' | '¥'));
            }

            if params.remove_commas {
                text.retain(|c| c != ',');
            }

            let parsed = if text.contains('.') {
                text.parse::<f64>().ok().map(Value::Float)
            } else {
                text.parse::<i64>().ok().map(Value::Int)
            };

            match parsed {
                Some(number) => number,
                None => match params.on_parse_error {
                    ParseErrorPolicy::SetNull => Value::Null,
                    ParseErrorPolicy::Keep => v.clone(),
                },
            }
        })
        .collect()
}

/// Maps recognized true/false tokens to booleans; unrecognized values pass
/// through unchanged.
pub fn boolean_normalization(values: &[Value], params: &BooleanNormParams) -> Vec<Value> {
    let true_tokens: Vec<String> = params.true_tokens.iter().map(|t| t.to_lowercase()).collect();
    let false_tokens: Vec<String> = params
        .false_tokens
        .iter()
        .map(|t| t.to_lowercase())
        .collect();

    values
        .iter()
        .map(|v| {
            if v.is_null() {
                return Value::Null;
            }
            if matches!(v, Value::Bool(_)) {
                return v.clone();
            }
            let token = v.string_form().trim().to_lowercase();
            if true_tokens.contains(&token) {
                Value::Bool(true)
            } else if false_tokens.contains(&token) {
                Value::Bool(false)
            } else {
                v.clone()
            }
        })
        .collect()
}

/// Coerces date values to the target format, parsing with the accepted
/// input formats exactly as the robust date rule does.
pub fn date_coerce(values: &[Value], params: &DateCoerceParams) -> Vec<Value> {
    let accepted: Vec<String> = params
        .accepted_input_formats
        .clone()
        .unwrap_or_else(|| {
            DEFAULT_COERCE_INPUT_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

    values
        .iter()
        .map(|v| {
            if v.is_null() {
                return Value::Null;
            }
            let text = v.string_form();
            match coerce_date_to_format(
                &text,
                &params.target_format,
                &accepted,
                params.excel_serial_enabled,
                &params.excel_date_system,
            ) {
                Some(coerced) => Value::Str(coerced),
                None => match params.on_parse_error {
                    ParseErrorPolicy::SetNull => Value::Null,
                    ParseErrorPolicy::Keep => v.clone(),
                },
            }
        })
        .collect()
}

/// Rewrites categorical values through a mapping; unmapped values pass
/// through unchanged.
pub fn categorical_standardize(values: &[Value], params: &CategoricalParams) -> Vec<Value> {
    let mapping: std::collections::BTreeMap<String, &String> = params
        .mapping
        .iter()
        .map(|(k, v)| {
            let key = if params.case_insensitive {
                k.trim().to_lowercase()
            } else {
                k.trim().to_string()
            };
            (key, v)
        })
        .collect();

    values
        .iter()
        .map(|v| {
            if v.is_null() {
                return Value::Null;
            }
            let trimmed = v.string_form().trim().to_string();
            let lookup = if params.case_insensitive {
                trimmed.to_lowercase()
            } else {
                trimmed
            };
            match mapping.get(&lookup) {
                Some(mapped) => Value::Str((*mapped).clone()),
                None => v.clone(),
            }
        })
        .collect()
}

/// Splits a column into new columns on a delimiter. Unnamed parts become
/// `{column}_part_{i}` (1-based); existing columns of the same name are
/// replaced. The source column is kept.
pub fn split_column(table: &Table, column_name: &str, params: &SplitColumnParams) -> Table {
    let Some(values) = table.values(column_name) else {
        return table.clone();
    };

    let split_one = |value: &Value| -> Option<Vec<String>> {
        if value.is_null() {
            return None;
        }
        let text = value.string_form();
        let parts: Vec<String> = match params.max_splits {
            Some(max) if max > 0 => text
                .splitn(max + 1, params.delimiter.as_str())
                .map(str::to_string)
                .collect(),
            _ => text
                .split(params.delimiter.as_str())
                .map(str::to_string)
                .collect(),
        };
        Some(parts)
    };

    let split_rows: Vec<Option<Vec<String>>> = values.iter().map(split_one).collect();
    let part_count = split_rows
        .iter()
        .flatten()
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    let mut result = table.clone();
    for part in 0..part_count {
        let name = params
            .new_column_names
            .get(part)
            .cloned()
            .unwrap_or_else(|| format!("{column_name}_part_{}", part + 1));
        let column: Vec<Value> = split_rows
            .iter()
            .map(|parts| match parts {
                Some(parts) => parts
                    .get(part)
                    .map(|p| Value::Str(p.clone()))
                    .unwrap_or(Value::Null),
                None => Value::Null,
            })
            .collect();
        let _ = result.set_column(name, column);
    }
    result
}

/// Creates a calculated column from whitelisted operations over named
/// operand columns. No expression evaluation happens here; the operator set
/// is fixed for safety.
pub fn custom_calculation(table: &Table, column_name: &str, params: &CustomCalcParams) -> Table {
    if params.operand_columns.is_empty()
        || params
            .operand_columns
            .iter()
            .any(|c| !table.has_column(c))
    {
        return table.clone();
    }

    let n_rows = table.n_rows();
    let result_values: Vec<Value> = match params.operation {
        CalcOp::Concat => (0..n_rows)
            .map(|row| {
                let parts: Vec<String> = params
                    .operand_columns
                    .iter()
                    .filter_map(|c| table.value(c, row))
                    .map(Value::string_form)
                    .collect();
                Value::Str(parts.join(&params.separator))
            })
            .collect(),
        CalcOp::Add | CalcOp::Subtract | CalcOp::Multiply | CalcOp::Divide => (0..n_rows)
            .map(|row| {
                let mut operands = params.operand_columns.iter().map(|c| {
                    table
                        .value(c, row)
                        .and_then(|v| numeric_operand(v))
                });
                let Some(Some(first)) = operands.next() else {
                    return Value::Null;
                };
                let mut acc = first;
                for operand in operands {
                    let Some(operand) = operand else {
                        return Value::Null;
                    };
                    acc = match params.operation {
                        CalcOp::Add => acc + operand,
                        CalcOp::Subtract => acc - operand,
                        CalcOp::Multiply => acc * operand,
                        CalcOp::Divide => {
                            if operand == 0.0 {
                                return Value::Null;
                            }
                            acc / operand
                        }
                        CalcOp::Concat => unreachable!(),
                    };
                }
                Value::Float(acc)
            })
            .collect(),
    };

    let mut result = table.clone();
    let _ = result.set_column(column_name, result_values);
    result
}

fn numeric_operand(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.string_form().trim().parse::<f64>().ok())
}

/// Removes duplicate rows, keeping the first or last occurrence per key.
/// Row order is otherwise preserved.
pub fn deduplicate_rows(table: &Table, params: &DeduplicateParams) -> Table {
    let subset: Vec<String> = params
        .subset
        .clone()
        .unwrap_or_else(|| table.column_names().iter().map(|s| s.to_string()).collect());

    let keys: Vec<String> = (0..table.n_rows())
        .map(|row| table.row_key(row, &subset))
        .collect();

    match params.keep {
        KeepPolicy::First => {
            let mut seen = std::collections::HashSet::new();
            table.filter_rows(|row| seen.insert(keys[row].clone()))
        }
        KeepPolicy::Last => {
            let mut last_index: std::collections::HashMap<&str, usize> =
                std::collections::HashMap::new();
            for (row, key) in keys.iter().enumerate() {
                last_index.insert(key.as_str(), row);
            }
            table.filter_rows(|row| last_index.get(keys[row].as_str()) == Some(&row))
        }
    }
}
