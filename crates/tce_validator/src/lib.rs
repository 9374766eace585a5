//! # TCE Validator
//!
//! Contract-driven validation engine for tabular data. Given an in-memory
//! [`Table`] and a [`tce_core::Contract`], a run:
//!
//! 1. applies per-column normalization to a working copy (the source table
//!    is never mutated),
//! 2. evaluates the column-level tests (one worker per column),
//! 3. evaluates dataset-level tests and foreign key checks,
//! 4. aggregates everything into a [`ValidationResult`].
//!
//! Failures are collected, never thrown: one bad row never aborts the rest
//! of the run. Only `strict_fail` policies escalate into blocking errors.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tce_core::{ColumnBuilder, ContractBuilder, Severity};
//! use tce_validator::{Table, Value, run_validation};
//!
//! let table = Table::from_columns([
//!     ("amount", vec![Value::from("50"), Value::from("150")]),
//! ]).unwrap();
//!
//! let contract = ContractBuilder::new()
//!     .column(
//!         ColumnBuilder::new("amount")
//!             .test("range", Severity::Warning, json!({"min": 0, "max": 100}))
//!             .build(),
//!     )
//!     .build();
//!
//! let result = run_validation(&table, &contract, None);
//! assert!(result.is_valid); // warnings do not invalidate
//! assert_eq!(result.summary.total_tests_failed, 1);
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod foreign_key;
pub mod normalize;
pub mod results;
pub mod table;

pub use column_tests::run_column_test;
pub use engine::{annotate_errors, effective_action, run_validation};
pub use error::{TableError, ValidationError};
pub use expression::{CompareOp, Comparison, Literal, Operand, evaluate_comparison, parse_comparison};
pub use foreign_key::{normalize_fk_value, validate_foreign_key};
pub use normalize::{apply_normalizations, normalize_value};
pub use results::*;
pub use table::{Column, Table, Value};
