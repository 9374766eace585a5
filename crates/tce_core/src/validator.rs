//! Contract self-validation.
//!
//! Validates a contract's internal structural consistency before any data is
//! touched. Malformed contracts are a normal, reportable outcome: validation
//! never panics or returns `Err` for bad documents, it returns a
//! [`ContractValidationResult`] describing every problem found.
//!
//! A contract that fails this check must never be executed.

use serde_json::Value as Params;

use crate::contract::{Contract, FailureAction, FailureHandling};
use crate::params::{
    COLUMN_TEST_TYPES, ColumnTestKind, DATASET_TEST_TYPES, DatasetTestKind, REMEDIATION_TYPES,
    RemediationKind,
};

/// A single contract validation issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractIssue {
    /// Dotted path to the offending field (e.g. `columns[2].name`)
    pub field: String,
    /// What is wrong
    pub message: String,
    /// How to fix it
    pub guidance: String,
}

impl ContractIssue {
    fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        guidance: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            guidance: guidance.into(),
        }
    }
}

/// Result of contract self-validation.
#[derive(Debug, Clone)]
pub struct ContractValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ContractIssue>,
}

impl ContractValidationResult {
    /// Formats the result for display.
    pub fn render(&self) -> String {
        if self.is_valid {
            return "Contract is valid.".to_string();
        }
        let mut lines = vec!["Contract validation failed:".to_string()];
        for error in &self.errors {
            lines.push(format!("\n- {}: {}", error.field, error.message));
            lines.push(format!("  Guidance: {}", error.guidance));
        }
        lines.join("\n")
    }
}

/// Validates a contract's structural consistency.
///
/// Checks run in a fixed order: top-level required fields, columns (names,
/// failure handling, tests, remediation), dataset tests (including column
/// references), then foreign key checks. Enum-valued fields such as
/// `data_type` and `severity` are closed Rust enums and cannot hold invalid
/// values here; membership for the string-typed `type` fields is checked
/// against the closed sets, and params are decoded so malformed shapes are
/// rejected at load time.
pub fn validate_contract(contract: &Contract) -> ContractValidationResult {
    let mut errors = Vec::new();

    check_top_level(contract, &mut errors);
    check_columns(contract, &mut errors);
    check_dataset_tests(contract, &mut errors);
    check_foreign_keys(contract, &mut errors);

    ContractValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn check_top_level(contract: &Contract, errors: &mut Vec<ContractIssue>) {
    if contract.contract_version.is_empty() {
        errors.push(ContractIssue::new(
            "contract_version",
            "Contract version is required.",
            "Add 'contract_version: \"1.0\"' to the contract.",
        ));
    }

    if contract.contract_id.is_empty() {
        errors.push(ContractIssue::new(
            "contract_id",
            "Contract ID is required.",
            "Add a unique 'contract_id' field (can be a UUID).",
        ));
    }

    if contract.created_at_utc.is_empty() {
        errors.push(ContractIssue::new(
            "created_at_utc",
            "Creation timestamp is required.",
            "Add 'created_at_utc' in ISO 8601 format.",
        ));
    }

    if contract.app.name.is_empty() {
        errors.push(ContractIssue::new(
            "app",
            "Application metadata is required.",
            "Add 'app' section with 'name' and 'version'.",
        ));
    }

    if contract.columns.is_empty() {
        errors.push(ContractIssue::new(
            "columns",
            "At least one column must be defined.",
            "Add 'columns' list with column configurations.",
        ));
    }
}

fn check_columns(contract: &Contract, errors: &mut Vec<ContractIssue>) {
    let mut seen_names = std::collections::HashSet::new();

    for (i, col) in contract.columns.iter().enumerate() {
        let prefix = format!("columns[{i}]");

        if col.name.is_empty() {
            errors.push(ContractIssue::new(
                format!("{prefix}.name"),
                format!("Column {i} is missing a name."),
                "Each column must have a 'name' field.",
            ));
        } else if !seen_names.insert(col.name.clone()) {
            errors.push(ContractIssue::new(
                format!("{prefix}.name"),
                format!("Duplicate column name: '{}'.", col.name),
                "Each column name must be unique.",
            ));
        }

        check_failure_handling(
            &col.failure_handling,
            &format!("{prefix}.failure_handling"),
            errors,
        );

        for (j, test) in col.tests.iter().enumerate() {
            let test_prefix = format!("{prefix}.tests[{j}]");
            check_column_test(&test.test_type, &test.params, &test_prefix, errors);
            if let Some(on_fail) = &test.on_fail {
                check_failure_handling(on_fail, &format!("{test_prefix}.on_fail"), errors);
            }
        }

        for (j, rem) in col.remediation.iter().enumerate() {
            let rem_prefix = format!("{prefix}.remediation[{j}]");
            if !REMEDIATION_TYPES.contains(&rem.remediation_type.as_str()) {
                errors.push(ContractIssue::new(
                    format!("{rem_prefix}.type"),
                    format!("Invalid remediation type: '{}'.", rem.remediation_type),
                    format!("Valid types: {}", REMEDIATION_TYPES.join(", ")),
                ));
            } else if let Err(err) = RemediationKind::decode(&rem.remediation_type, &rem.params) {
                errors.push(ContractIssue::new(
                    format!("{rem_prefix}.params"),
                    err.to_string(),
                    "Fix the remediation params to match the expected shape.",
                ));
            }
        }
    }
}

fn check_column_test(
    test_type: &str,
    params: &Params,
    field_prefix: &str,
    errors: &mut Vec<ContractIssue>,
) {
    if test_type.is_empty() {
        errors.push(ContractIssue::new(
            format!("{field_prefix}.type"),
            "Test type is required.",
            "Add 'type' field to the test.",
        ));
        return;
    }

    if !COLUMN_TEST_TYPES.contains(&test_type) {
        errors.push(ContractIssue::new(
            format!("{field_prefix}.type"),
            format!("Invalid test type: '{test_type}'."),
            format!("Valid types: {}", COLUMN_TEST_TYPES.join(", ")),
        ));
        return;
    }

    if let Err(err) = ColumnTestKind::decode(test_type, params) {
        errors.push(ContractIssue::new(
            format!("{field_prefix}.params"),
            err.to_string(),
            "Fix the test params to match the expected shape.",
        ));
        return;
    }

    if test_type == "date_rule" {
        check_date_rule_params(params, field_prefix, errors);
    }
}

/// `date_rule` has conditional requirements that typed decode cannot express:
/// `target_format` is always required, and robust mode additionally requires
/// a non-empty `accepted_input_formats` list.
fn check_date_rule_params(params: &Params, field_prefix: &str, errors: &mut Vec<ContractIssue>) {
    let target = params
        .get("target_format")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());

    if target.is_none() {
        errors.push(ContractIssue::new(
            format!("{field_prefix}.params.target_format"),
            "Date rule requires exactly one target_format.",
            "Add 'target_format' to params (e.g., 'YYYY-MM-DD').",
        ));
    }

    let mode = params
        .get("mode")
        .and_then(|v| v.as_str())
        .unwrap_or("simple");

    if mode == "robust" {
        match params.get("accepted_input_formats").and_then(|v| v.as_array()) {
            None => {
                errors.push(ContractIssue::new(
                    format!("{field_prefix}.params.accepted_input_formats"),
                    "Robust mode requires accepted_input_formats list.",
                    "Add 'accepted_input_formats' as a non-empty list.",
                ));
            }
            Some(formats) if formats.is_empty() => {
                errors.push(ContractIssue::new(
                    format!("{field_prefix}.params.accepted_input_formats"),
                    "accepted_input_formats cannot be empty in robust mode.",
                    "Add at least one format to accepted_input_formats.",
                ));
            }
            Some(_) => {}
        }
    }
}

fn check_failure_handling(fh: &FailureHandling, field_prefix: &str, errors: &mut Vec<ContractIssue>) {
    if fh.action == FailureAction::LabelFailure
        && fh.label_column_name.as_deref().is_none_or(str::is_empty)
    {
        errors.push(ContractIssue::new(
            format!("{field_prefix}.label_column_name"),
            "label_column_name is required when action is 'label_failure'.",
            "Add 'label_column_name' to specify the error label column.",
        ));
    }

    if fh.action == FailureAction::QuarantineRow
        && fh
            .quarantine_export_name
            .as_deref()
            .is_none_or(str::is_empty)
    {
        errors.push(ContractIssue::new(
            format!("{field_prefix}.quarantine_export_name"),
            "quarantine_export_name is required when action is 'quarantine_row'.",
            "Add 'quarantine_export_name' to specify the quarantine output name.",
        ));
    }
}

fn check_dataset_tests(contract: &Contract, errors: &mut Vec<ContractIssue>) {
    let column_names: std::collections::HashSet<&str> =
        contract.columns.iter().map(|c| c.name.as_str()).collect();

    for (i, test) in contract.dataset_tests.iter().enumerate() {
        let prefix = format!("dataset_tests[{i}]");

        if test.test_type.is_empty() {
            errors.push(ContractIssue::new(
                format!("{prefix}.type"),
                "Test type is required.",
                "Add 'type' field to the test.",
            ));
            continue;
        }

        if !DATASET_TEST_TYPES.contains(&test.test_type.as_str()) {
            errors.push(ContractIssue::new(
                format!("{prefix}.type"),
                format!("Invalid test type: '{}'.", test.test_type),
                format!("Valid types: {}", DATASET_TEST_TYPES.join(", ")),
            ));
            continue;
        }

        if let Err(err) = DatasetTestKind::decode(&test.test_type, &test.params) {
            errors.push(ContractIssue::new(
                format!("{prefix}.params"),
                err.to_string(),
                "Fix the test params to match the expected shape.",
            ));
            continue;
        }

        if let Some(on_fail) = &test.on_fail {
            check_failure_handling(on_fail, &format!("{prefix}.on_fail"), errors);
        }

        // Column references must resolve to declared columns.
        if let Some(key_columns) = test.params.get("key_columns").and_then(|v| v.as_array()) {
            for key in key_columns {
                if let Some(name) = key.as_str()
                    && !column_names.contains(name)
                {
                    errors.push(ContractIssue::new(
                        format!("{prefix}.params.key_columns"),
                        format!("Referenced column '{name}' not found in columns."),
                        "Ensure all referenced columns are defined in 'columns'.",
                    ));
                }
            }
        }

        if test.test_type == "cross_field_rule"
            && let Some(all_not_null) = test
                .params
                .get("if")
                .and_then(|v| v.get("all_not_null"))
                .and_then(|v| v.as_array())
        {
            for col in all_not_null {
                if let Some(name) = col.as_str()
                    && !column_names.contains(name)
                {
                    errors.push(ContractIssue::new(
                        format!("{prefix}.params.if.all_not_null"),
                        format!("Referenced column '{name}' not found."),
                        "Ensure all referenced columns are defined.",
                    ));
                }
            }
        }
    }
}

fn check_foreign_keys(contract: &Contract, errors: &mut Vec<ContractIssue>) {
    let column_names: std::collections::HashSet<&str> =
        contract.columns.iter().map(|c| c.name.as_str()).collect();

    for (i, fk) in contract.foreign_key_checks.iter().enumerate() {
        let prefix = format!("foreign_key_checks[{i}]");

        if fk.name.is_empty() {
            errors.push(ContractIssue::new(
                format!("{prefix}.name"),
                "Foreign key check name is required.",
                "Add a descriptive 'name' for the FK check.",
            ));
        }

        if !fk.dataset_column.is_empty() && !column_names.contains(fk.dataset_column.as_str()) {
            errors.push(ContractIssue::new(
                format!("{prefix}.dataset_column"),
                format!("Dataset column '{}' not found.", fk.dataset_column),
                "Ensure the referenced column is defined in 'columns'.",
            ));
        }

        if fk.fk_file.is_empty() {
            errors.push(ContractIssue::new(
                format!("{prefix}.fk_file"),
                "FK file reference is required.",
                "Add 'fk_file' with the FK list filename.",
            ));
        }

        if fk.fk_column.is_empty() {
            errors.push(ContractIssue::new(
                format!("{prefix}.fk_column"),
                "FK column is required.",
                "Add 'fk_column' with the FK column name.",
            ));
        }

        if !fk.normalization_inherit_from_dataset_column {
            errors.push(ContractIssue::new(
                format!("{prefix}.normalization_inherit_from_dataset_column"),
                "Must be true in this contract version.",
                "Set 'normalization_inherit_from_dataset_column: true'.",
            ));
        }

        check_failure_handling(&fk.on_fail, &format!("{prefix}.on_fail"), errors);
    }
}
