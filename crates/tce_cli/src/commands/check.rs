use anyhow::{Context, Result};
use std::path::Path;
use tce_core::validate_contract;
use tce_parser::parse_file;
use tracing::info;

use crate::output;

pub fn execute(contract_path: &str, format: &str) -> Result<()> {
    info!("Checking contract: {}", contract_path);

    let contract = parse_file(Path::new(contract_path))
        .with_context(|| format!("Failed to parse contract file: {contract_path}"))?;

    output::print_info(&format!(
        "Contract loaded: {} ({} columns, {} dataset tests, {} FK checks)",
        contract.contract_id,
        contract.columns.len(),
        contract.dataset_tests.len(),
        contract.foreign_key_checks.len(),
    ));

    let result = validate_contract(&contract);
    output::print_contract_check(&result, format);

    if !result.is_valid {
        std::process::exit(1);
    }

    Ok(())
}
