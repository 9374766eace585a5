use colored::*;
use serde_json::json;
use tce_core::ContractValidationResult;
use tce_remediation::{RemediationDiff, format_diff_summary};
use tce_validator::{ValidationResult, format_validation_summary};

pub fn print_contract_check(result: &ContractValidationResult, format: &str) {
    if format == "json" {
        let output = json!({
            "is_valid": result.is_valid,
            "errors": result.errors.iter().map(|e| json!({
                "field": e.field,
                "message": e.message,
                "guidance": e.guidance,
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return;
    }

    if result.is_valid {
        print_success("Contract is valid");
    } else {
        println!(
            "{} {}",
            "✗".red().bold(),
            "Contract validation FAILED".red().bold()
        );
        for (i, error) in result.errors.iter().enumerate() {
            println!("  {}. {}: {}", i + 1, error.field.bold(), error.message.red());
            println!("     {}", error.guidance.dimmed());
        }
    }
}

pub fn print_validation_report(result: &ValidationResult, format: &str) {
    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(result).unwrap_or_default()
        );
        return;
    }

    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if result.is_valid {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !result.blocking_errors.is_empty() {
        println!("\n{}", "Blocking errors:".red().bold());
        for (i, error) in result.blocking_errors.iter().enumerate() {
            println!("  {}. {}", i + 1, error.red());
        }
    }

    for (column, col_result) in &result.column_results {
        if col_result.is_valid && col_result.warning_count == 0 {
            continue;
        }
        println!("\n{} {}", "Column:".bold(), column);
        for test in &col_result.test_results {
            if test.passed {
                continue;
            }
            let line = format!(
                "  - {} failed ({} of {} values)",
                test.test_type, test.failed_count, test.total_values
            );
            match test.severity {
                tce_core::Severity::Error => println!("{}", line.red()),
                tce_core::Severity::Warning => println!("{}", line.yellow()),
            }
            for detail in test.error_details.iter().take(3) {
                println!("      {}", detail.dimmed());
            }
            if let Some(note) = &test.note {
                println!("      {}", note.dimmed());
            }
        }
    }

    for dt_result in &result.dataset_test_results {
        if dt_result.passed {
            continue;
        }
        match dt_result.severity {
            tce_core::Severity::Error => {
                println!("\n{} {}", "Dataset test:".bold(), dt_result.message.red());
            }
            tce_core::Severity::Warning => {
                println!("\n{} {}", "Dataset test:".bold(), dt_result.message.yellow());
            }
        }
    }

    for fk_result in &result.fk_check_results {
        if fk_result.passed {
            continue;
        }
        println!(
            "\n{} {} ({} missing values)",
            "FK check failed:".bold(),
            fk_result.name.red(),
            fk_result.missing_count
        );
    }

    println!("\n{}", format_validation_summary(&result.summary));
    println!("{}", "═".repeat(60));
}

pub fn print_remediation_report(diff: &RemediationDiff, format: &str) {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(diff).unwrap_or_default());
        return;
    }

    println!("\n{}", "═".repeat(60));
    println!("{}", "  REMEDIATION REPORT".bold());
    println!("{}", "═".repeat(60));
    println!("\n{}", format_diff_summary(diff));
    println!("{}", "═".repeat(60));
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
