//! Error types for the contract model.

use thiserror::Error;

/// Errors raised while decoding `type` + `params` pairs into typed variants.
///
/// Contract self-validation reports these as issues; engines surface them
/// when handed a contract that skipped validation.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The type name is not in the closed set for its scope
    #[error("Unknown {scope} type: '{type_name}'")]
    UnknownType {
        scope: &'static str,
        type_name: String,
    },

    /// The params map does not match the expected shape
    #[error("Invalid params for '{type_name}': {source}")]
    InvalidParams {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },
}
