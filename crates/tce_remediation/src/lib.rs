//! # TCE Remediation
//!
//! Remediation engine for the Tabular Contracts Engine: deterministic
//! transforms that rewrite values into a cleaned copy (never the original),
//! a structured before/after diff of every change, and post-validation
//! failure-handling resolution (set_null / drop_row / quarantine_row /
//! strict_fail).
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tce_core::{ColumnBuilder, ContractBuilder};
//! use tce_remediation::run_remediation;
//! use tce_validator::{Table, Value};
//!
//! let table = Table::from_columns([
//!     ("amount", vec![Value::from(" $1,200 ")]),
//! ]).unwrap();
//!
//! let contract = ContractBuilder::new()
//!     .column(
//!         ColumnBuilder::new("amount")
//!             .remediation("trim_whitespace", json!({}))
//!             .remediation("numeric_cleanup", json!({}))
//!             .build(),
//!     )
//!     .build();
//!
//! let (cleaned, diff) = run_remediation(&table, &contract).unwrap();
//! assert_eq!(cleaned.value("amount", 0), Some(&Value::Int(1200)));
//! assert_eq!(diff.cells_changed, 1);
//! ```

pub mod diff;
pub mod engine;
pub mod error;
pub mod transformers;

pub use diff::{
    CellChange, ColumnDiff, RemediationDiff, TreatmentMap, compute_diff, format_diff_summary,
    sample_cap_for,
};
pub use engine::{FailureHandlingOutcome, apply_failure_handling, run_remediation};
pub use error::{RemediationError, Result};
