use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tce_core::validate_contract;
use tce_parser::parse_file;
use tce_remediation::{apply_failure_handling, run_remediation};
use tce_validator::run_validation;
use tracing::info;

use crate::{output, table_io};

pub fn execute(
    contract_path: &str,
    data_path: &str,
    output_path: Option<&str>,
    handle_failures: bool,
    delimiter: Option<char>,
    format: &str,
) -> Result<()> {
    info!("Remediating {} with {}", data_path, contract_path);

    let contract = parse_file(Path::new(contract_path))
        .with_context(|| format!("Failed to parse contract file: {contract_path}"))?;

    let contract_check = validate_contract(&contract);
    if !contract_check.is_valid {
        output::print_contract_check(&contract_check, format);
        return Err(anyhow!(
            "Contract is not valid ({} error(s)); fix it before remediating data",
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

    let (cleaned, diff) = run_remediation(&table, &contract)
        .context("Remediation run failed")?;
    output::print_remediation_report(&diff, format);

    let final_table = if handle_failures {
        // Failure handling resolves against the cleaned table's validation
        // results, so remediated values are what the policies see.
        let validation = run_validation(&cleaned, &contract, None);
        let outcome = apply_failure_handling(&cleaned, &contract, &validation)
            .context("Failure handling blocked the run")?;

        output::print_info(&format!(
            "Failure handling: {} clean rows, {} quarantined",
            outcome.clean.n_rows(),
            outcome.quarantine.n_rows()
        ));

        if let Some(out) = output_path {
            if !outcome.quarantine.is_empty() {
                let quarantine_path = sibling_path(out, "quarantine");
                table_io::write_csv(&outcome.quarantine, &quarantine_path)?;
                output::print_info(&format!(
                    "Quarantined rows written to {}",
                    quarantine_path.display()
                ));
            }
            for (bucket, rows) in &outcome.named_quarantines {
                let bucket_path = sibling_path(out, bucket);
                table_io::write_csv(rows, &bucket_path)?;
                output::print_info(&format!(
                    "Quarantine bucket '{}' written to {}",
                    bucket,
                    bucket_path.display()
                ));
            }
        }

        outcome.clean
    } else {
        cleaned
    };

    if let Some(out) = output_path {
        table_io::write_csv(&final_table, Path::new(out))?;
        output::print_success(&format!("Cleaned dataset written to {out}"));
    }

    Ok(())
}

/// Builds `<stem>.<label>.csv` next to the main output path.
fn sibling_path(output_path: &str, label: &str) -> PathBuf {
    let path = Path::new(output_path);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    path.with_file_name(format!("{stem}.{label}.csv"))
}
