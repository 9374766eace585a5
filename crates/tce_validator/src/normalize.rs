//! Normalization preprocessor.
//!
//! Applies per-column cleanup to a private working copy before any test
//! runs. The step order is load-bearing: null-token matching must see
//! already-trimmed text, and case folding must not re-introduce a
//! null-token match.

use tce_core::{CaseMode, Contract, Normalization};

use crate::table::{Table, Value};

/// Applies every column's normalization block to a copy of the table.
/// The source table is never mutated. Columns without a normalization
/// block, and contract columns absent from the table, pass through.
pub fn apply_normalizations(table: &Table, contract: &Contract) -> Table {
    let mut result = table.clone();

    for col_config in &contract.columns {
        let Some(norm) = &col_config.normalization else {
            continue;
        };
        let Some(values) = table.values(&col_config.name) else {
            continue;
        };

        let normalized = values.iter().map(|v| normalize_value(v, norm)).collect();
        // Row count is unchanged, so this cannot fail.
        let _ = result.set_column(col_config.name.clone(), normalized);
    }

    result
}

/// Normalizes a single value: (1) trim, (2) strip non-printable characters
/// preserving tab/newline/carriage-return, (3) null-token substitution on
/// the trimmed string form, (4) case folding of non-null strings.
pub fn normalize_value(value: &Value, norm: &Normalization) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    let mut current = value.clone();

    if let Value::Str(s) = &current {
        let mut text = if norm.trim_whitespace {
            s.trim().to_string()
        } else {
            s.clone()
        };

        if norm.remove_non_printable {
            text = strip_non_printable(&text);
        }

        current = Value::Str(text);
    }

    if !norm.null_tokens.is_empty() {
        let trimmed_form = current.string_form().trim().to_string();
        if norm.null_tokens.iter().any(|t| *t == trimmed_form) {
            return Value::Null;
        }
    }

    if let Value::Str(s) = &current {
        let folded = match norm.case {
            CaseMode::None => return current,
            CaseMode::Lower => s.to_lowercase(),
            CaseMode::Upper => s.to_uppercase(),
            CaseMode::Title => to_title_case(s),
        };
        return Value::Str(folded);
    }

    current
}

/// Removes control characters, explicitly keeping tab, newline and
/// carriage return.
pub fn strip_non_printable(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Title-cases a string: the first alphabetic character of each word is
/// uppercased, the rest lowercased.
pub fn to_title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tce_core::{ColumnBuilder, ContractBuilder};

    fn norm() -> Normalization {
        Normalization::default()
    }

    #[test]
    fn test_trim_then_null_token() {
        // "  NA  " must trim before null-token matching
        let result = normalize_value(&Value::from("  NA  "), &norm());
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn test_case_folding_after_null_check() {
        let mut n = norm();
        n.case = CaseMode::Upper;
        // "na" is not a null token (tokens are case-sensitive), so it
        // reaches the case fold and must not become a null afterwards
        let result = normalize_value(&Value::from("na"), &n);
        assert_eq!(result, Value::Str("NA".to_string()));
    }

    #[test]
    fn test_strip_non_printable_keeps_whitespace_controls() {
        let cleaned = strip_non_printable("a\u{0}b\tc\nd\re");
        assert_eq!(cleaned, "ab\tc\nd\re");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(to_title_case("north dakota"), "North Dakota");
        assert_eq!(to_title_case("O'BRIEN"), "O'Brien");
    }

    #[test]
    fn test_lower_case_fold() {
        let mut n = norm();
        n.case = CaseMode::Lower;
        assert_eq!(
            normalize_value(&Value::from("  MiXeD  "), &n),
            Value::Str("mixed".to_string())
        );
    }

    #[test]
    fn test_non_string_values_pass_through() {
        assert_eq!(normalize_value(&Value::Int(5), &norm()), Value::Int(5));
        assert_eq!(normalize_value(&Value::Null, &norm()), Value::Null);
    }

    #[test]
    fn test_empty_string_becomes_null() {
        assert_eq!(normalize_value(&Value::from("   "), &norm()), Value::Null);
    }

    #[test]
    fn test_table_level_application_preserves_source() {
        let table = Table::from_columns([(
            "name",
            vec![Value::from("  alpha "), Value::from("NA"), Value::from("b")],
        )])
        .unwrap();
        let contract = ContractBuilder::new()
            .column(ColumnBuilder::new("name").build())
            .build();

        let normalized = apply_normalizations(&table, &contract);

        assert_eq!(normalized.value("name", 0), Some(&Value::from("alpha")));
        assert_eq!(normalized.value("name", 1), Some(&Value::Null));
        // Source untouched
        assert_eq!(table.value("name", 0), Some(&Value::from("  alpha ")));
    }

    #[test]
    fn test_disabled_normalization_block() {
        let table = Table::from_columns([("name", vec![Value::from("  NA  ")])]).unwrap();
        let contract = ContractBuilder::new()
            .column(ColumnBuilder::new("name").normalization(None).build())
            .build();

        let normalized = apply_normalizations(&table, &contract);
        assert_eq!(normalized.value("name", 0), Some(&Value::from("  NA  ")));
    }
}
