//! Error types for validation operations.

use thiserror::Error;

/// Errors raised while assembling tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// Column row count differs from the rest of the table
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A column with this name already exists
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),
}

/// Errors raised during validation runs.
///
/// Per-cell and per-test failures are collected into results, never raised;
/// these variants cover the structural conditions that surface as blocking
/// errors or per-rule reports.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A contract references a column absent from the dataset
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// A cross-field rule expression could not be parsed
    #[error("Could not parse expression '{expression}': {reason}")]
    ExpressionParse { expression: String, reason: String },

    /// The foreign key reference table or column is unavailable
    #[error("Reference data error: {0}")]
    ReferenceData(String),

    /// Generic validation error
    #[error("Validation error: {0}")]
    General(String),
}
