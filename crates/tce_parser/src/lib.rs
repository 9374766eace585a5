//! # TCE Parser
//!
//! Parses contract documents (YAML primary, TOML secondary) into the
//! strongly typed [`Contract`] model, and serializes contracts back to YAML
//! for export. Field names, defaults and enumerations are the compatibility
//! surface for existing contract files and round-trip unchanged.
//!
//! # Example
//!
//! ```rust
//! use tce_parser::parse_yaml;
//!
//! let yaml = r#"
//! contract_version: "1.0"
//! contract_id: demo
//! columns:
//!   - name: order_id
//!     data_type: integer
//!     tests:
//!       - type: not_null
//! "#;
//!
//! let contract = parse_yaml(yaml).expect("failed to parse contract");
//! assert_eq!(contract.columns.len(), 1);
//! assert_eq!(contract.columns[0].tests[0].test_type, "not_null");
//! ```

use std::path::Path;

use tce_core::Contract;
use thiserror::Error;

/// Errors that can occur during contract parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported contract file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parses a contract from a YAML string.
pub fn parse_yaml(content: &str) -> Result<Contract> {
    let contract: Contract = serde_yaml_ng::from_str(content)?;
    Ok(contract)
}

/// Parses a contract from a TOML string.
pub fn parse_toml(content: &str) -> Result<Contract> {
    let contract: Contract =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(contract)
}

/// Serializes a contract to a YAML string.
pub fn to_yaml(contract: &Contract) -> Result<String> {
    Ok(serde_yaml_ng::to_string(contract)?)
}

/// Detects the contract format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → [`ContractFormat::Yaml`]
/// * `.toml` → [`ContractFormat::Toml`]
pub fn detect_format(path: &Path) -> Result<ContractFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ContractFormat::Yaml),
        "toml" => Ok(ContractFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parses a contract from a file, detecting the format from the extension.
pub fn parse_file(path: &Path) -> Result<Contract> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        ContractFormat::Yaml => parse_yaml(&content),
        ContractFormat::Toml => parse_toml(&content),
    }
}
