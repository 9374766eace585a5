//! # TCE Presets
//!
//! Pure lookup and parsing utilities shared by the validation and
//! remediation engines:
//!
//! - **Date formats**: human token → strftime translation, robust
//!   multi-format parsing, Excel serial dates, target-format rendering
//! - **Patterns**: the preset regex library and the builder-tier composer
//! - **Enums**: allowed-value sets for common categorical data and the
//!   boolean recognition tokens
//!
//! This crate has no dependency on the contract model; it is the leaf of the
//! engine's dependency graph.

pub mod date_formats;
pub mod enums;
pub mod patterns;

pub use date_formats::*;
pub use enums::*;
pub use patterns::*;
