//! Error types for remediation operations.

use thiserror::Error;

/// Result type for remediation operations.
pub type Result<T> = std::result::Result<T, RemediationError>;

/// Errors raised during remediation runs.
#[derive(Debug, Error)]
pub enum RemediationError {
    /// A remediation config could not be decoded into a typed transform
    #[error(transparent)]
    Params(#[from] tce_core::ParamsError),

    /// Table assembly failed (row count or column name conflicts)
    #[error(transparent)]
    Table(#[from] tce_validator::TableError),

    /// One or more strict_fail failures block output production
    #[error(
        "{count} validation failure(s) carry the strict_fail policy; \
         no cleaned output is produced"
    )]
    StrictFailure { count: usize },
}
