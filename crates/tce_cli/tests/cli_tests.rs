use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

/// Helper to create a Command for the tce binary
#[allow(deprecated)]
fn tce() -> Command {
    Command::cargo_bin("tce").expect("Failed to find tce binary")
}

// ============================================================================
// check command tests
// ============================================================================

#[test]
fn test_check_valid_contract() {
    tce()
        .arg("check")
        .arg(fixture_path("orders_contract.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("orders-demo"))
        .stdout(predicate::str::contains("Contract is valid"));
}

#[test]
fn test_check_invalid_contract_exits_nonzero() {
    tce()
        .arg("check")
        .arg(fixture_path("invalid_contract.yml"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Duplicate column name"))
        .stdout(predicate::str::contains("label_column_name"));
}

#[test]
fn test_check_invalid_contract_json_output() {
    let output = tce()
        .arg("check")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("invalid_contract.yml"))
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let output_str = String::from_utf8_lossy(&output);
    let json_start = output_str.find('{').expect("Should contain JSON object");
    let parsed: serde_json::Value =
        serde_json::from_str(&output_str[json_start..]).expect("Output should be valid JSON");
    assert_eq!(parsed["is_valid"], serde_json::Value::Bool(false));
    assert!(parsed["errors"].as_array().unwrap().len() >= 2);
}

#[test]
fn test_check_missing_file() {
    tce()
        .arg("check")
        .arg("nonexistent.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse contract file"));
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_clean_dataset_passes() {
    tce()
        .arg("validate")
        .arg(fixture_path("orders_contract.yml"))
        .arg(fixture_path("orders.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"));
}

#[test]
fn test_validate_bad_dataset_fails() {
    tce()
        .arg("validate")
        .arg(fixture_path("orders_contract.yml"))
        .arg(fixture_path("bad_orders.csv"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains("uniqueness"));
}

#[test]
fn test_validate_refuses_invalid_contract() {
    tce()
        .arg("validate")
        .arg(fixture_path("invalid_contract.yml"))
        .arg(fixture_path("orders.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contract is not valid"));
}

#[test]
fn test_validate_json_output() {
    let output = tce()
        .arg("validate")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("orders_contract.yml"))
        .arg(fixture_path("orders.csv"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let output_str = String::from_utf8_lossy(&output);
    let json_start = output_str.find('{').expect("Should contain JSON object");
    let parsed: serde_json::Value =
        serde_json::from_str(&output_str[json_start..]).expect("Output should be valid JSON");
    assert_eq!(parsed["is_valid"], serde_json::Value::Bool(true));
    assert!(parsed["summary"]["total_rows"].as_u64().unwrap() == 3);
}

// ============================================================================
// remediate command tests
// ============================================================================

#[test]
fn test_remediate_writes_cleaned_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("cleaned.csv");

    tce()
        .arg("remediate")
        .arg(fixture_path("orders_contract.yml"))
        .arg(fixture_path("orders.csv"))
        .arg("--output")
        .arg(output_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cells Changed"))
        .stdout(predicate::str::contains("Cleaned dataset written"));

    let cleaned = std::fs::read_to_string(&output_path).unwrap();
    // " $1200 " cleaned into a plain number
    assert!(cleaned.contains("1200"));
    assert!(!cleaned.contains('$'));
}

#[test]
fn test_remediate_json_diff() {
    let output = tce()
        .arg("remediate")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("orders_contract.yml"))
        .arg(fixture_path("orders.csv"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let output_str = String::from_utf8_lossy(&output);
    let json_start = output_str.find('{').expect("Should contain JSON object");
    let parsed: serde_json::Value =
        serde_json::from_str(&output_str[json_start..]).expect("Output should be valid JSON");
    assert!(parsed["cells_changed"].as_u64().unwrap() >= 1);
    assert!(
        parsed["columns_affected"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "amount")
    );
}

// ============================================================================
// General CLI tests
// ============================================================================

#[test]
fn test_cli_help() {
    tce()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("remediate"));
}

#[test]
fn test_cli_version() {
    tce()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_validate_help() {
    tce()
        .arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fk-data"))
        .stdout(predicate::str::contains("delimiter"))
        .stdout(predicate::str::contains("format"));
}
