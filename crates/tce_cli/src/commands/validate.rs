use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tce_core::validate_contract;
use tce_parser::parse_file;
use tce_validator::run_validation;
use tracing::info;

use crate::{output, table_io};

pub fn execute(
    contract_path: &str,
    data_path: &str,
    fk_data_path: Option<&str>,
    delimiter: Option<char>,
    format: &str,
) -> Result<()> {
    info!("Validating {} against {}", data_path, contract_path);

    let contract = parse_file(Path::new(contract_path))
        .with_context(|| format!("Failed to parse contract file: {contract_path}"))?;

    // A contract that fails self-validation must never be executed.
    let contract_check = validate_contract(&contract);
    if !contract_check.is_valid {
        output::print_contract_check(&contract_check, format);
        return Err(anyhow!(
            "Contract is not valid ({} error(s)); fix it before validating data",
            contract_check.errors.len()
        ));
    }

    let table = table_io::load_table(Path::new(data_path), delimiter)
        .with_context(|| format!("Failed to load dataset: {data_path}"))?;
    output::print_info(&format!(
        "Dataset loaded: {} rows x {} columns",
        table.n_rows(),
        table.n_columns()
    ));

    if let Some(limits) = &contract.limits {
        if table.n_rows() > limits.max_rows && contract.dataset.row_limit_behavior.reject_if_over_limit {
            return Err(anyhow!(
                "Dataset has {} rows, over the contract limit of {}",
                table.n_rows(),
                limits.max_rows
            ));
        }
        if table.n_columns() > limits.max_columns {
            return Err(anyhow!(
                "Dataset has {} columns, over the contract limit of {}",
                table.n_columns(),
                limits.max_columns
            ));
        }
    }

    let fk_table = match fk_data_path {
        Some(path) => Some(
            table_io::load_table(Path::new(path), delimiter)
                .with_context(|| format!("Failed to load FK reference dataset: {path}"))?,
        ),
        None => None,
    };

    let result = run_validation(&table, &contract, fk_table.as_ref());
    output::print_validation_report(&result, format);

    if !result.is_valid {
        std::process::exit(1);
    }

    Ok(())
}
