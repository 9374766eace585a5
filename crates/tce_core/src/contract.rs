//! Contract document types.
//!
//! This module contains the typed representation of a TCE contract: the
//! versioned document that declares, per column and per dataset, what
//! "correct" tabular data looks like and how failures are remediated.
//!
//! Field names, defaults and enumerations are the compatibility surface for
//! contract files exchanged as YAML; they must round-trip unchanged.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value as Params;
use uuid::Uuid;

/// Default null tokens applied by column normalization.
pub const DEFAULT_NULL_TOKENS: &[&str] = &["", "NA", "N/A", "null", "None"];

/// A complete TCE contract.
///
/// A `Contract` is the sole input to a validation or remediation run. It is
/// constructed once (from defaults, the builder, or a parsed document) and is
/// immutable for the duration of a run.
///
/// # Example
///
/// ```rust
/// use tce_core::Contract;
///
/// let contract = Contract::default();
/// assert_eq!(contract.contract_version, "1.0");
/// assert!(contract.columns.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    /// Contract format version (e.g. "1.0")
    #[serde(default = "default_contract_version")]
    pub contract_version: String,

    /// Unique identifier for this contract (a UUID by default)
    #[serde(default = "default_contract_id")]
    pub contract_id: String,

    /// Creation timestamp in ISO 8601 UTC (e.g. "2025-01-07T14:32:10Z")
    #[serde(default = "default_created_at")]
    pub created_at_utc: String,

    /// Application metadata
    #[serde(default)]
    pub app: AppInfo,

    /// Resource limits recorded in the contract
    #[serde(default = "default_limits")]
    pub limits: Option<Limits>,

    /// Dataset import configuration
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Ordered column configurations; names must be unique
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,

    /// Dataset-level tests
    #[serde(default)]
    pub dataset_tests: Vec<DatasetTest>,

    /// Foreign key membership checks
    #[serde(default)]
    pub foreign_key_checks: Vec<ForeignKeyCheck>,

    /// Export configuration
    #[serde(default)]
    pub exports: ExportConfig,
}

impl Default for Contract {
    fn default() -> Self {
        Self {
            contract_version: default_contract_version(),
            contract_id: default_contract_id(),
            created_at_utc: default_created_at(),
            app: AppInfo::default(),
            limits: default_limits(),
            dataset: DatasetConfig::default(),
            columns: Vec::new(),
            dataset_tests: Vec::new(),
            foreign_key_checks: Vec::new(),
            exports: ExportConfig::default(),
        }
    }
}

impl Contract {
    /// Looks up a column configuration by name.
    pub fn column(&self, name: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.name == name)
    }
}

fn default_contract_version() -> String {
    "1.0".to_string()
}

fn default_contract_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_created_at() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn default_limits() -> Option<Limits> {
    Some(Limits::default())
}

/// Application metadata embedded in the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

fn default_app_name() -> String {
    "Tabular Contracts Engine".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Resource limits recorded in the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    #[serde(default = "default_max_columns")]
    pub max_columns: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_upload_mb: default_max_upload_mb(),
            max_rows: default_max_rows(),
            max_columns: default_max_columns(),
        }
    }
}

fn default_max_upload_mb() -> u64 {
    75
}

fn default_max_rows() -> usize {
    250_000
}

fn default_max_columns() -> usize {
    100
}

/// Row limit behavior when an import exceeds `Limits::max_rows`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowLimitBehavior {
    #[serde(default = "default_true")]
    pub reject_if_over_limit: bool,
}

impl Default for RowLimitBehavior {
    fn default() -> Self {
        Self {
            reject_if_over_limit: true,
        }
    }
}

/// Quick column-name transformation toggles applied at import time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuickActions {
    #[serde(default)]
    pub to_lowercase: bool,
    #[serde(default)]
    pub to_uppercase: bool,
    #[serde(default)]
    pub to_titlecase: bool,
    #[serde(default)]
    pub trim_whitespace: bool,
    #[serde(default)]
    pub remove_punctuation: bool,
    #[serde(default)]
    pub replace_spaces_with_underscores: bool,
}

/// Import settings saved with the contract so a dataset can be re-processed
/// consistently across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSettings {
    #[serde(default)]
    pub skip_rows: usize,
    #[serde(default)]
    pub skip_footer_rows: usize,
    #[serde(default)]
    pub column_renames: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub columns_to_ignore: Vec<String>,
    #[serde(default)]
    pub quick_actions: QuickActions,
}

/// Dataset configuration in the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub row_limit_behavior: RowLimitBehavior,
    #[serde(default)]
    pub contract_basis_filename: Option<String>,
    #[serde(default)]
    pub sheet_name: Option<String>,
    #[serde(default = "default_header_row")]
    pub header_row: usize,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub import_settings: ImportSettings,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            row_limit_behavior: RowLimitBehavior::default(),
            contract_basis_filename: None,
            sheet_name: None,
            header_row: default_header_row(),
            delimiter: None,
            encoding: None,
            import_settings: ImportSettings::default(),
        }
    }
}

fn default_header_row() -> usize {
    1
}

/// Declared type of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Boolean,
    Integer,
    Float,
    Date,
    Timestamp,
}

impl DataType {
    /// Name as it appears in contract documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
        }
    }
}

/// Case folding applied during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    #[default]
    None,
    Lower,
    Upper,
    Title,
}

/// Column normalization settings, applied before any test runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalization {
    #[serde(default = "default_true")]
    pub trim_whitespace: bool,
    #[serde(default = "default_null_tokens")]
    pub null_tokens: Vec<String>,
    #[serde(default)]
    pub case: CaseMode,
    #[serde(default = "default_true")]
    pub remove_non_printable: bool,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
            null_tokens: default_null_tokens(),
            case: CaseMode::None,
            remove_non_printable: true,
        }
    }
}

fn default_null_tokens() -> Vec<String> {
    DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

/// Policy applied to a failing cell or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureAction {
    #[default]
    StrictFail,
    SetNull,
    LabelFailure,
    QuarantineRow,
    DropRow,
}

impl FailureAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureAction::StrictFail => "strict_fail",
            FailureAction::SetNull => "set_null",
            FailureAction::LabelFailure => "label_failure",
            FailureAction::QuarantineRow => "quarantine_row",
            FailureAction::DropRow => "drop_row",
        }
    }
}

/// Failure handling configuration.
///
/// `label_column_name` is required when the action is `label_failure`;
/// `quarantine_export_name` is required when the action is `quarantine_row`.
/// Both conditions are enforced by the contract validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureHandling {
    #[serde(default)]
    pub action: FailureAction,
    #[serde(default)]
    pub label_column_name: Option<String>,
    #[serde(default)]
    pub quarantine_export_name: Option<String>,
}

/// Test severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Configuration for a single column-level test.
///
/// `params` is carried as a free-form map in the document model and decoded
/// into a typed [`crate::ColumnTestKind`] at the parsing boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    #[serde(rename = "type")]
    pub test_type: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_params")]
    pub params: Params,
    #[serde(default)]
    pub on_fail: Option<FailureHandling>,
}

/// Configuration for a single remediation action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationConfig {
    #[serde(rename = "type")]
    pub remediation_type: String,
    #[serde(default = "default_params")]
    pub params: Params,
}

fn default_params() -> Params {
    Params::Object(serde_json::Map::new())
}

/// Configuration for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column name as it appears in the dataset
    pub name: String,

    /// Declared data type
    #[serde(default = "default_data_type")]
    pub data_type: DataType,

    /// Whether the column must be present and populated
    #[serde(default)]
    pub required: bool,

    /// Optional rename applied on export
    #[serde(default)]
    pub rename_to: Option<String>,

    /// Normalization applied before testing
    #[serde(default)]
    pub normalization: Option<Normalization>,

    /// Ordered column-level tests
    #[serde(default)]
    pub tests: Vec<TestConfig>,

    /// Ordered remediation actions
    #[serde(default)]
    pub remediation: Vec<RemediationConfig>,

    /// Default failure handling for this column's tests
    #[serde(default)]
    pub failure_handling: FailureHandling,
}

impl ColumnConfig {
    /// Creates a column configuration with defaults for the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::String,
            required: false,
            rename_to: None,
            normalization: Some(Normalization::default()),
            tests: Vec::new(),
            remediation: Vec::new(),
            failure_handling: FailureHandling::default(),
        }
    }
}

fn default_data_type() -> DataType {
    DataType::String
}

/// Configuration for a dataset-level test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetTest {
    #[serde(rename = "type")]
    pub test_type: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_params")]
    pub params: Params,
    #[serde(default)]
    pub on_fail: Option<FailureHandling>,
}

/// Null handling policy for foreign key checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NullPolicy {
    #[serde(default)]
    pub allow_nulls: bool,
}

/// Configuration for a foreign key membership check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyCheck {
    pub name: String,
    #[serde(default)]
    pub dataset_column: String,
    #[serde(default)]
    pub fk_file: String,
    #[serde(default)]
    pub fk_column: String,
    #[serde(default)]
    pub fk_sheet: Option<String>,
    /// Must be `true` in this contract version; enforced by the validator.
    #[serde(default = "default_true")]
    pub normalization_inherit_from_dataset_column: bool,
    #[serde(default)]
    pub null_policy: NullPolicy,
    #[serde(default)]
    pub on_fail: FailureHandling,
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_true")]
    pub report_html: bool,
    #[serde(default)]
    pub cleaned_dataset: bool,
    #[serde(default = "default_true")]
    pub contract_yaml: bool,
    #[serde(default)]
    pub remediation_summary: bool,
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            report_html: true,
            cleaned_dataset: false,
            contract_yaml: true,
            remediation_summary: false,
            output_format: default_output_format(),
        }
    }
}

fn default_output_format() -> String {
    "csv".to_string()
}
