//! Builder pattern for constructing contracts.
//!
//! Ergonomic builders for assembling contracts and column configurations
//! programmatically, mirroring what the document parser produces.

use serde_json::Value as Params;

use crate::contract::{
    ColumnConfig, Contract, DataType, DatasetConfig, DatasetTest, ExportConfig, FailureHandling,
    ForeignKeyCheck, Limits, Normalization, RemediationConfig, Severity, TestConfig,
};

/// Builder for creating a [`Contract`].
///
/// # Example
///
/// ```rust
/// use tce_core::{ColumnBuilder, ContractBuilder, DataType};
///
/// let contract = ContractBuilder::new()
///     .column(
///         ColumnBuilder::new("order_id")
///             .data_type(DataType::Integer)
///             .required(true)
///             .build(),
///     )
///     .build();
///
/// assert_eq!(contract.columns.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ContractBuilder {
    contract: Contract,
}

impl ContractBuilder {
    /// Creates a builder seeded with contract defaults.
    pub fn new() -> Self {
        Self {
            contract: Contract::default(),
        }
    }

    /// Sets the contract id.
    pub fn contract_id(mut self, id: impl Into<String>) -> Self {
        self.contract.contract_id = id.into();
        self
    }

    /// Sets the resource limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.contract.limits = Some(limits);
        self
    }

    /// Sets the dataset configuration.
    pub fn dataset(mut self, dataset: DatasetConfig) -> Self {
        self.contract.dataset = dataset;
        self
    }

    /// Adds a column configuration.
    pub fn column(mut self, column: ColumnConfig) -> Self {
        self.contract.columns.push(column);
        self
    }

    /// Adds multiple column configurations.
    pub fn columns(mut self, columns: Vec<ColumnConfig>) -> Self {
        self.contract.columns.extend(columns);
        self
    }

    /// Adds a dataset-level test with error severity.
    pub fn dataset_test(self, test_type: impl Into<String>, params: Params) -> Self {
        self.dataset_test_with_severity(test_type, Severity::Error, params)
    }

    /// Adds a dataset-level test with an explicit severity.
    pub fn dataset_test_with_severity(
        mut self,
        test_type: impl Into<String>,
        severity: Severity,
        params: Params,
    ) -> Self {
        self.contract.dataset_tests.push(DatasetTest {
            test_type: test_type.into(),
            severity,
            params,
            on_fail: None,
        });
        self
    }

    /// Adds a foreign key check.
    pub fn foreign_key_check(mut self, check: ForeignKeyCheck) -> Self {
        self.contract.foreign_key_checks.push(check);
        self
    }

    /// Sets the export configuration.
    pub fn exports(mut self, exports: ExportConfig) -> Self {
        self.contract.exports = exports;
        self
    }

    /// Builds the contract.
    pub fn build(self) -> Contract {
        self.contract
    }
}

/// Builder for creating a [`ColumnConfig`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tce_core::{ColumnBuilder, DataType, Severity};
///
/// let column = ColumnBuilder::new("amount")
///     .data_type(DataType::Float)
///     .test("range", Severity::Error, json!({"min": 0, "max": 100}))
///     .build();
///
/// assert_eq!(column.tests.len(), 1);
/// ```
#[derive(Debug)]
pub struct ColumnBuilder {
    column: ColumnConfig,
}

impl ColumnBuilder {
    /// Creates a column builder with defaults for the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            column: ColumnConfig::new(name),
        }
    }

    /// Sets the declared data type.
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.column.data_type = data_type;
        self
    }

    /// Marks the column required.
    pub fn required(mut self, required: bool) -> Self {
        self.column.required = required;
        self
    }

    /// Sets the export rename target.
    pub fn rename_to(mut self, name: impl Into<String>) -> Self {
        self.column.rename_to = Some(name.into());
        self
    }

    /// Sets the normalization block (`None` disables normalization).
    pub fn normalization(mut self, normalization: Option<Normalization>) -> Self {
        self.column.normalization = normalization;
        self
    }

    /// Adds a test.
    pub fn test(mut self, test_type: impl Into<String>, severity: Severity, params: Params) -> Self {
        self.column.tests.push(TestConfig {
            test_type: test_type.into(),
            severity,
            params,
            on_fail: None,
        });
        self
    }

    /// Adds a test with a failure-handling override.
    pub fn test_with_on_fail(
        mut self,
        test_type: impl Into<String>,
        severity: Severity,
        params: Params,
        on_fail: FailureHandling,
    ) -> Self {
        self.column.tests.push(TestConfig {
            test_type: test_type.into(),
            severity,
            params,
            on_fail: Some(on_fail),
        });
        self
    }

    /// Adds a remediation action.
    pub fn remediation(mut self, remediation_type: impl Into<String>, params: Params) -> Self {
        self.column.remediation.push(RemediationConfig {
            remediation_type: remediation_type.into(),
            params,
        });
        self
    }

    /// Sets the column's default failure handling.
    pub fn failure_handling(mut self, failure_handling: FailureHandling) -> Self {
        self.column.failure_handling = failure_handling;
        self
    }

    /// Builds the column configuration.
    pub fn build(self) -> ColumnConfig {
        self.column
    }
}
