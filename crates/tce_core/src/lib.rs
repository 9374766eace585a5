//! # TCE Core
//!
//! Core contract model for the Tabular Contracts Engine.
//!
//! A contract is a single versioned document declaring what "correct"
//! tabular data looks like: per-column types and tests, dataset-wide
//! invariants, foreign-key relationships, and remediation rules. This crate
//! provides:
//!
//! - **Contract**: the typed document model, serde-compatible with the YAML
//!   contract surface
//! - **Typed params**: closed enums decoding each test/remediation `type` +
//!   `params` pair at the parsing boundary
//! - **Builders**: fluent construction of contracts and columns
//! - **Self-validation**: structural consistency checks producing
//!   field-path/message/guidance issues
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tce_core::{ColumnBuilder, ContractBuilder, DataType, Severity, validate_contract};
//!
//! let contract = ContractBuilder::new()
//!     .column(
//!         ColumnBuilder::new("order_id")
//!             .data_type(DataType::Integer)
//!             .test("not_null", Severity::Error, json!({}))
//!             .build(),
//!     )
//!     .build();
//!
//! let result = validate_contract(&contract);
//! assert!(result.is_valid);
//! ```

pub mod builder;
pub mod contract;
pub mod error;
pub mod params;
pub mod validator;

pub use builder::*;
pub use contract::*;
pub use error::*;
pub use params::*;
pub use validator::*;
