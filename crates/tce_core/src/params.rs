//! Typed test and remediation parameters.
//!
//! Contract documents carry `params` as a free-form map. This module decodes
//! each `type` + `params` pair into a closed, strongly typed variant at the
//! parsing boundary, so unknown types and malformed parameters are rejected
//! at load time rather than during evaluation.

use serde::{Deserialize, Serialize};
use serde_json::Value as Params;

use crate::contract::CaseMode;
use crate::error::ParamsError;

/// Closed set of column-level test type names.
pub const COLUMN_TEST_TYPES: &[&str] = &[
    "not_null",
    "type_conformance",
    "range",
    "length",
    "enum",
    "uniqueness",
    "monotonic",
    "cardinality_warning",
    "pattern",
    "date_rule",
    "date_window",
];

/// Closed set of dataset-level test type names.
pub const DATASET_TEST_TYPES: &[&str] = &[
    "duplicate_rows",
    "primary_key_completeness",
    "primary_key_uniqueness",
    "composite_key_uniqueness",
    "cross_field_rule",
    "outliers_iqr",
    "outliers_zscore",
];

/// Closed set of remediation type names.
pub const REMEDIATION_TYPES: &[&str] = &[
    "trim_whitespace",
    "standardize_nulls",
    "normalize_case",
    "remove_non_printable",
    "deduplicate_rows",
    "numeric_cleanup",
    "boolean_normalization",
    "date_coerce",
    "categorical_standardize",
    "split_column",
    "custom_calculation",
];

fn decode<T: for<'de> Deserialize<'de>>(type_name: &str, params: &Params) -> Result<T, ParamsError> {
    let value = match params {
        Params::Null => Params::Object(serde_json::Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(value).map_err(|source| ParamsError::InvalidParams {
        type_name: type_name.to_string(),
        source,
    })
}

/// A column-level test with typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnTestKind {
    NotNull,
    TypeConformance,
    Range(RangeParams),
    Length(LengthParams),
    Enum(EnumParams),
    Uniqueness(UniquenessParams),
    Monotonic(MonotonicParams),
    CardinalityWarning(CardinalityParams),
    Pattern(PatternParams),
    DateRule(DateRuleParams),
    DateWindow(DateWindowParams),
}

impl ColumnTestKind {
    /// Decodes a test type name and raw params into a typed variant.
    ///
    /// Unknown type names produce [`ParamsError::UnknownType`]; parameter
    /// maps that do not match the expected shape produce
    /// [`ParamsError::InvalidParams`].
    pub fn decode(test_type: &str, params: &Params) -> Result<Self, ParamsError> {
        match test_type {
            "not_null" => Ok(Self::NotNull),
            "type_conformance" => Ok(Self::TypeConformance),
            "range" => Ok(Self::Range(decode(test_type, params)?)),
            "length" => Ok(Self::Length(decode(test_type, params)?)),
            "enum" => Ok(Self::Enum(decode(test_type, params)?)),
            "uniqueness" => Ok(Self::Uniqueness(decode(test_type, params)?)),
            "monotonic" => Ok(Self::Monotonic(decode(test_type, params)?)),
            "cardinality_warning" => Ok(Self::CardinalityWarning(decode(test_type, params)?)),
            "pattern" => Ok(Self::Pattern(decode(test_type, params)?)),
            "date_rule" => Ok(Self::DateRule(decode(test_type, params)?)),
            "date_window" => Ok(Self::DateWindow(decode(test_type, params)?)),
            other => Err(ParamsError::UnknownType {
                scope: "column test",
                type_name: other.to_string(),
            }),
        }
    }

    /// The type name as it appears in contract documents.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NotNull => "not_null",
            Self::TypeConformance => "type_conformance",
            Self::Range(_) => "range",
            Self::Length(_) => "length",
            Self::Enum(_) => "enum",
            Self::Uniqueness(_) => "uniqueness",
            Self::Monotonic(_) => "monotonic",
            Self::CardinalityWarning(_) => "cardinality_warning",
            Self::Pattern(_) => "pattern",
            Self::DateRule(_) => "date_rule",
            Self::DateWindow(_) => "date_window",
        }
    }
}

/// Parameters for the `range` test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeParams {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Parameters for the `length` test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthParams {
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub max: Option<usize>,
}

/// Parameters for the `enum` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumParams {
    #[serde(default)]
    pub allowed_values: Vec<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
}

impl Default for EnumParams {
    fn default() -> Self {
        Self {
            allowed_values: Vec::new(),
            preset: None,
            case_insensitive: true,
        }
    }
}

/// Parameters for the `uniqueness` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniquenessParams {
    #[serde(default = "default_true")]
    pub allow_nulls: bool,
}

impl Default for UniquenessParams {
    fn default() -> Self {
        Self { allow_nulls: true }
    }
}

/// Direction for the `monotonic` test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Parameters for the `monotonic` test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonotonicParams {
    #[serde(default)]
    pub direction: Direction,
}

/// Parameters for the `cardinality_warning` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardinalityParams {
    #[serde(default = "default_min_cardinality")]
    pub min: usize,
    #[serde(default)]
    pub max: Option<usize>,
}

impl Default for CardinalityParams {
    fn default() -> Self {
        Self { min: 1, max: None }
    }
}

fn default_min_cardinality() -> usize {
    1
}

/// Pattern resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternTier {
    #[default]
    Preset,
    Builder,
    Advanced,
}

/// Length constraints for builder-tier patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderLength {
    #[serde(default)]
    pub exact: Option<usize>,
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub max: Option<usize>,
}

/// Builder-tier pattern composition parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderPattern {
    /// Character classes: "digits", "letters", "alphanumeric", "uppercase", "lowercase"
    #[serde(default)]
    pub allowed_characters: Vec<String>,
    #[serde(default)]
    pub length: BuilderLength,
    #[serde(default)]
    pub starts_with: Option<String>,
    #[serde(default)]
    pub ends_with: Option<String>,
}

/// Parameters for the `pattern` test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternParams {
    #[serde(default)]
    pub tier: PatternTier,
    /// Preset tier: name of a pattern from the preset library
    #[serde(default)]
    pub preset_name: Option<String>,
    /// Builder tier: composition parameters
    #[serde(default)]
    pub builder: BuilderPattern,
    /// Advanced tier: user-supplied regex
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Mode for the `date_rule` test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRuleMode {
    #[default]
    Simple,
    Robust,
}

/// Parameters for the `date_rule` test and the `date_coerce` remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRuleParams {
    #[serde(default = "default_target_format")]
    pub target_format: String,
    #[serde(default)]
    pub mode: DateRuleMode,
    #[serde(default)]
    pub accepted_input_formats: Option<Vec<String>>,
    #[serde(default)]
    pub excel_serial_enabled: bool,
    /// Excel serial epoch system: "1900" (Windows) or "1904" (Mac)
    #[serde(default = "default_excel_system")]
    pub excel_date_system: String,
}

impl Default for DateRuleParams {
    fn default() -> Self {
        Self {
            target_format: default_target_format(),
            mode: DateRuleMode::Simple,
            accepted_input_formats: None,
            excel_serial_enabled: false,
            excel_date_system: default_excel_system(),
        }
    }
}

impl DateRuleParams {
    /// The input formats to try, honoring the simple/robust mode contract.
    pub fn input_formats(&self) -> Vec<String> {
        match self.mode {
            DateRuleMode::Simple => vec![self.target_format.clone()],
            DateRuleMode::Robust => self
                .accepted_input_formats
                .clone()
                .unwrap_or_else(|| vec![self.target_format.clone()]),
        }
    }
}

fn default_target_format() -> String {
    "YYYY-MM-DD".to_string()
}

fn default_excel_system() -> String {
    "1900".to_string()
}

/// Parameters for the `date_window` test. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateWindowParams {
    #[serde(default)]
    pub not_before: Option<String>,
    #[serde(default)]
    pub not_after: Option<String>,
}

/// A dataset-level test with typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetTestKind {
    DuplicateRows(DuplicateRowsParams),
    PrimaryKeyCompleteness(KeyColumnsParams),
    PrimaryKeyUniqueness(KeyColumnsParams),
    CompositeKeyUniqueness(KeyColumnsParams),
    CrossFieldRule(CrossFieldParams),
    OutliersIqr(OutlierIqrParams),
    OutliersZscore(OutlierZscoreParams),
}

impl DatasetTestKind {
    /// Decodes a dataset test type name and raw params into a typed variant.
    pub fn decode(test_type: &str, params: &Params) -> Result<Self, ParamsError> {
        match test_type {
            "duplicate_rows" => Ok(Self::DuplicateRows(decode(test_type, params)?)),
            "primary_key_completeness" => {
                Ok(Self::PrimaryKeyCompleteness(decode(test_type, params)?))
            }
            "primary_key_uniqueness" => Ok(Self::PrimaryKeyUniqueness(decode(test_type, params)?)),
            "composite_key_uniqueness" => {
                Ok(Self::CompositeKeyUniqueness(decode(test_type, params)?))
            }
            "cross_field_rule" => Ok(Self::CrossFieldRule(decode(test_type, params)?)),
            "outliers_iqr" => Ok(Self::OutliersIqr(decode(test_type, params)?)),
            "outliers_zscore" => Ok(Self::OutliersZscore(decode(test_type, params)?)),
            other => Err(ParamsError::UnknownType {
                scope: "dataset test",
                type_name: other.to_string(),
            }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DuplicateRows(_) => "duplicate_rows",
            Self::PrimaryKeyCompleteness(_) => "primary_key_completeness",
            Self::PrimaryKeyUniqueness(_) => "primary_key_uniqueness",
            Self::CompositeKeyUniqueness(_) => "composite_key_uniqueness",
            Self::CrossFieldRule(_) => "cross_field_rule",
            Self::OutliersIqr(_) => "outliers_iqr",
            Self::OutliersZscore(_) => "outliers_zscore",
        }
    }
}

/// Parameters for the `duplicate_rows` test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRowsParams {
    /// Columns to consider; all columns when absent
    #[serde(default)]
    pub subset: Option<Vec<String>>,
    #[serde(default)]
    pub keep: Option<String>,
}

/// Parameters for key-based dataset tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyColumnsParams {
    #[serde(default)]
    pub key_columns: Vec<String>,
}

/// `if` gate for cross-field rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossFieldCondition {
    #[serde(default)]
    pub all_not_null: Vec<String>,
}

/// `assert` clause for cross-field rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossFieldAssertion {
    #[serde(default)]
    pub expression: String,
}

/// Parameters for the `cross_field_rule` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossFieldParams {
    #[serde(default = "default_rule_name")]
    pub rule_name: String,
    #[serde(default, rename = "if")]
    pub condition: CrossFieldCondition,
    #[serde(default, rename = "assert")]
    pub assertion: CrossFieldAssertion,
}

impl Default for CrossFieldParams {
    fn default() -> Self {
        Self {
            rule_name: default_rule_name(),
            condition: CrossFieldCondition::default(),
            assertion: CrossFieldAssertion::default(),
        }
    }
}

fn default_rule_name() -> String {
    "unnamed_rule".to_string()
}

/// Parameters for the `outliers_iqr` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierIqrParams {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default = "default_iqr_multiplier")]
    pub multiplier: f64,
}

impl Default for OutlierIqrParams {
    fn default() -> Self {
        Self {
            column: None,
            multiplier: default_iqr_multiplier(),
        }
    }
}

fn default_iqr_multiplier() -> f64 {
    1.5
}

/// Parameters for the `outliers_zscore` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierZscoreParams {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default = "default_zscore_threshold")]
    pub threshold: f64,
}

impl Default for OutlierZscoreParams {
    fn default() -> Self {
        Self {
            column: None,
            threshold: default_zscore_threshold(),
        }
    }
}

fn default_zscore_threshold() -> f64 {
    3.0
}

/// Policy when a remediation transform cannot parse a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorPolicy {
    SetNull,
    #[default]
    Keep,
}

/// Which rows to keep during deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepPolicy {
    #[default]
    First,
    Last,
}

/// A remediation action with typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum RemediationKind {
    TrimWhitespace,
    StandardizeNulls(StandardizeNullsParams),
    NormalizeCase(NormalizeCaseParams),
    RemoveNonPrintable,
    DeduplicateRows(DeduplicateParams),
    NumericCleanup(NumericCleanupParams),
    BooleanNormalization(BooleanNormParams),
    DateCoerce(DateCoerceParams),
    CategoricalStandardize(CategoricalParams),
    SplitColumn(SplitColumnParams),
    CustomCalculation(CustomCalcParams),
}

impl RemediationKind {
    /// Decodes a remediation type name and raw params into a typed variant.
    pub fn decode(remediation_type: &str, params: &Params) -> Result<Self, ParamsError> {
        match remediation_type {
            "trim_whitespace" => Ok(Self::TrimWhitespace),
            "standardize_nulls" => Ok(Self::StandardizeNulls(decode(remediation_type, params)?)),
            "normalize_case" => Ok(Self::NormalizeCase(decode(remediation_type, params)?)),
            "remove_non_printable" => Ok(Self::RemoveNonPrintable),
            "deduplicate_rows" => Ok(Self::DeduplicateRows(decode(remediation_type, params)?)),
            "numeric_cleanup" => Ok(Self::NumericCleanup(decode(remediation_type, params)?)),
            "boolean_normalization" => {
                Ok(Self::BooleanNormalization(decode(remediation_type, params)?))
            }
            "date_coerce" => Ok(Self::DateCoerce(decode(remediation_type, params)?)),
            "categorical_standardize" => {
                Ok(Self::CategoricalStandardize(decode(remediation_type, params)?))
            }
            "split_column" => Ok(Self::SplitColumn(decode(remediation_type, params)?)),
            "custom_calculation" => Ok(Self::CustomCalculation(decode(remediation_type, params)?)),
            other => Err(ParamsError::UnknownType {
                scope: "remediation",
                type_name: other.to_string(),
            }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TrimWhitespace => "trim_whitespace",
            Self::StandardizeNulls(_) => "standardize_nulls",
            Self::NormalizeCase(_) => "normalize_case",
            Self::RemoveNonPrintable => "remove_non_printable",
            Self::DeduplicateRows(_) => "deduplicate_rows",
            Self::NumericCleanup(_) => "numeric_cleanup",
            Self::BooleanNormalization(_) => "boolean_normalization",
            Self::DateCoerce(_) => "date_coerce",
            Self::CategoricalStandardize(_) => "categorical_standardize",
            Self::SplitColumn(_) => "split_column",
            Self::CustomCalculation(_) => "custom_calculation",
        }
    }
}

/// Default null token set for the `standardize_nulls` remediation.
pub const STANDARDIZE_NULL_TOKENS: &[&str] = &["", "NA", "N/A", "null", "None", "NULL", "none"];

/// Parameters for the `standardize_nulls` remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizeNullsParams {
    #[serde(default = "default_standardize_tokens")]
    pub null_tokens: Vec<String>,
}

impl Default for StandardizeNullsParams {
    fn default() -> Self {
        Self {
            null_tokens: default_standardize_tokens(),
        }
    }
}

fn default_standardize_tokens() -> Vec<String> {
    STANDARDIZE_NULL_TOKENS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Parameters for the `normalize_case` remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeCaseParams {
    #[serde(default = "default_case_lower")]
    pub case: CaseMode,
}

impl Default for NormalizeCaseParams {
    fn default() -> Self {
        Self {
            case: CaseMode::Lower,
        }
    }
}

fn default_case_lower() -> CaseMode {
    CaseMode::Lower
}

/// Parameters for the `deduplicate_rows` remediation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeduplicateParams {
    #[serde(default)]
    pub subset: Option<Vec<String>>,
    #[serde(default)]
    pub keep: KeepPolicy,
}

/// Parameters for the `numeric_cleanup` remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericCleanupParams {
    #[serde(default = "default_true")]
    pub remove_commas: bool,
    #[serde(default = "default_true")]
    pub remove_currency_symbols: bool,
    #[serde(default = "default_true")]
    pub parentheses_as_negative: bool,
    #[serde(default)]
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for NumericCleanupParams {
    fn default() -> Self {
        Self {
            remove_commas: true,
            remove_currency_symbols: true,
            parentheses_as_negative: true,
            on_parse_error: ParseErrorPolicy::Keep,
        }
    }
}

/// Parameters for the `boolean_normalization` remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanNormParams {
    #[serde(default = "default_true_tokens")]
    pub true_tokens: Vec<String>,
    #[serde(default = "default_false_tokens")]
    pub false_tokens: Vec<String>,
}

impl Default for BooleanNormParams {
    fn default() -> Self {
        Self {
            true_tokens: default_true_tokens(),
            false_tokens: default_false_tokens(),
        }
    }
}

fn default_true_tokens() -> Vec<String> {
    ["true", "yes", "1", "t", "y", "on"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_false_tokens() -> Vec<String> {
    ["false", "no", "0", "f", "n", "off"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Parameters for the `date_coerce` remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateCoerceParams {
    #[serde(default = "default_target_format")]
    pub target_format: String,
    #[serde(default)]
    pub accepted_input_formats: Option<Vec<String>>,
    #[serde(default)]
    pub excel_serial_enabled: bool,
    #[serde(default = "default_excel_system")]
    pub excel_date_system: String,
    #[serde(default)]
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for DateCoerceParams {
    fn default() -> Self {
        Self {
            target_format: default_target_format(),
            accepted_input_formats: None,
            excel_serial_enabled: false,
            excel_date_system: default_excel_system(),
            on_parse_error: ParseErrorPolicy::Keep,
        }
    }
}

/// Parameters for the `categorical_standardize` remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalParams {
    #[serde(default)]
    pub mapping: std::collections::BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
}

impl Default for CategoricalParams {
    fn default() -> Self {
        Self {
            mapping: std::collections::BTreeMap::new(),
            case_insensitive: true,
        }
    }
}

/// Parameters for the `split_column` remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitColumnParams {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub new_column_names: Vec<String>,
    #[serde(default)]
    pub max_splits: Option<usize>,
}

impl Default for SplitColumnParams {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            new_column_names: Vec::new(),
            max_splits: None,
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Whitelisted operations for `custom_calculation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalcOp {
    #[default]
    Concat,
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Parameters for the `custom_calculation` remediation.
///
/// Deliberately restricted to a fixed operator whitelist over named operand
/// columns; there is no expression evaluation here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCalcParams {
    #[serde(default)]
    pub operation: CalcOp,
    #[serde(default)]
    pub operand_columns: Vec<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for CustomCalcParams {
    fn default() -> Self {
        Self {
            operation: CalcOp::Concat,
            operand_columns: Vec::new(),
            separator: default_separator(),
        }
    }
}

fn default_separator() -> String {
    " ".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_range() {
        let kind = ColumnTestKind::decode("range", &json!({"min": 0, "max": 100})).unwrap();
        assert_eq!(
            kind,
            ColumnTestKind::Range(RangeParams {
                min: Some(0.0),
                max: Some(100.0),
            })
        );
    }

    #[test]
    fn test_decode_missing_params_uses_defaults() {
        let kind = ColumnTestKind::decode("uniqueness", &serde_json::Value::Null).unwrap();
        assert_eq!(
            kind,
            ColumnTestKind::Uniqueness(UniquenessParams { allow_nulls: true })
        );
    }

    #[test]
    fn test_decode_unknown_type() {
        let err = ColumnTestKind::decode("frobnicate", &json!({})).unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_decode_invalid_params() {
        let err = ColumnTestKind::decode("range", &json!({"min": "not-a-number"})).unwrap_err();
        assert!(err.to_string().contains("range"));
    }

    #[test]
    fn test_date_rule_simple_input_formats() {
        let params = DateRuleParams {
            target_format: "YYYY-MM-DD".to_string(),
            mode: DateRuleMode::Simple,
            accepted_input_formats: Some(vec!["MM/DD/YYYY".to_string()]),
            ..DateRuleParams::default()
        };
        // Simple mode ignores accepted_input_formats
        assert_eq!(params.input_formats(), vec!["YYYY-MM-DD"]);
    }

    #[test]
    fn test_decode_cross_field_rule() {
        let params = json!({
            "rule_name": "start_before_end",
            "if": {"all_not_null": ["start_date", "end_date"]},
            "assert": {"expression": "start_date <= end_date"},
        });
        let kind = DatasetTestKind::decode("cross_field_rule", &params).unwrap();
        match kind {
            DatasetTestKind::CrossFieldRule(p) => {
                assert_eq!(p.rule_name, "start_before_end");
                assert_eq!(p.condition.all_not_null.len(), 2);
                assert_eq!(p.assertion.expression, "start_date <= end_date");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_decode_remediation_defaults() {
        let kind = RemediationKind::decode("numeric_cleanup", &json!({})).unwrap();
        match kind {
            RemediationKind::NumericCleanup(p) => {
                assert!(p.remove_commas);
                assert!(p.parentheses_as_negative);
                assert_eq!(p.on_parse_error, ParseErrorPolicy::Keep);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_type_name_round_trip() {
        for name in COLUMN_TEST_TYPES {
            let kind = ColumnTestKind::decode(name, &serde_json::Value::Null).unwrap();
            assert_eq!(kind.type_name(), *name);
        }
        for name in DATASET_TEST_TYPES {
            let kind = DatasetTestKind::decode(name, &serde_json::Value::Null).unwrap();
            assert_eq!(kind.type_name(), *name);
        }
        for name in REMEDIATION_TYPES {
            let kind = RemediationKind::decode(name, &serde_json::Value::Null).unwrap();
            assert_eq!(kind.type_name(), *name);
        }
    }
}
