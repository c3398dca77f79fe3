//! Integration tests for the PQT CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a pqt command
fn pqt() -> Command {
    Command::cargo_bin("pqt").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    pqt().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to register a supply with a fixed id
fn create_supply(tmp: &TempDir, id: &str, name: &str, unit: &str) {
    pqt()
        .current_dir(tmp.path())
        .args([
            "supply", "new", "--id", id, "--name", name, "--unit", unit,
        ])
        .assert()
        .success();
}

/// Helper to register a supplier with a fixed id
fn create_supplier(tmp: &TempDir, id: &str, name: &str) {
    pqt()
        .current_dir(tmp.path())
        .args([
            "sup", "new", "--id", id, "--name", name, "--tax-id", "00.000.000/0001-00",
            "--contact", "sales@example.com",
        ])
        .assert()
        .success();
}

/// Helper to register a quotation
fn create_quotation(tmp: &TempDir, id: &str, supply: &str, supplier: &str, price: &str) {
    pqt()
        .current_dir(tmp.path())
        .args([
            "quote", "new", "--id", id, "--supply", supply, "--supplier", supplier,
            "--price", price,
        ])
        .assert()
        .success();
}

/// Seed the Cement scenario: one item, two suppliers, B is cheaper
fn setup_cement_project() -> TempDir {
    let tmp = setup_test_project();
    create_supply(&tmp, "1", "Cement", "bag");
    create_supplier(&tmp, "1", "A");
    create_supplier(&tmp, "2", "B");
    create_quotation(&tmp, "q1", "1", "1", "20");
    create_quotation(&tmp, "q2", "1", "2", "15");
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    pqt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("procurement tables"));
}

#[test]
fn test_version_displays() {
    pqt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pqt"));
}

#[test]
fn test_unknown_command_fails() {
    pqt().arg("unknown-command").assert().failure();
}

#[test]
fn test_command_without_project_fails() {
    let tmp = TempDir::new().unwrap();
    pqt()
        .current_dir(tmp.path())
        .args(["supply", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pqt init"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_structure() {
    let tmp = setup_test_project();
    assert!(tmp.path().join(".pqt/config.yaml").is_file());
    assert!(tmp.path().join("data/supplies.csv").is_file());
    assert!(tmp.path().join("data/suppliers.csv").is_file());
    assert!(tmp.path().join("data/quotations.csv").is_file());
}

#[test]
fn test_init_twice_warns_without_force() {
    let tmp = setup_test_project();
    pqt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ============================================================================
// Registration and Listing
// ============================================================================

#[test]
fn test_supply_new_and_list() {
    let tmp = setup_test_project();
    create_supply(&tmp, "1", "Cement", "bag");
    create_supply(&tmp, "2", "Sand", "m3");

    pqt()
        .current_dir(tmp.path())
        .args(["supply", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cement").and(predicate::str::contains("Sand")));
}

#[test]
fn test_supply_new_generates_id_when_omitted() {
    let tmp = setup_test_project();
    pqt()
        .current_dir(tmp.path())
        .args(["supply", "new", "--name", "Gravel", "--unit", "m3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SPL-"));
}

#[test]
fn test_supply_new_requires_name() {
    let tmp = setup_test_project();
    pqt()
        .current_dir(tmp.path())
        .args(["supply", "new", "--unit", "kg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name is required"));
}

#[test]
fn test_supply_list_search() {
    let tmp = setup_test_project();
    create_supply(&tmp, "1", "Cement", "bag");
    create_supply(&tmp, "2", "Sand", "m3");

    pqt()
        .current_dir(tmp.path())
        .args(["supply", "list", "--search", "cem"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cement").and(predicate::str::contains("Sand").not()));
}

#[test]
fn test_supply_list_json_format() {
    let tmp = setup_test_project();
    create_supply(&tmp, "1", "Cement", "bag");

    let output = pqt()
        .current_dir(tmp.path())
        .args(["supply", "list", "--format", "json"])
        .output()
        .unwrap();
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("list --format json must emit valid JSON");
    assert_eq!(parsed[0]["name"], "Cement");
}

#[test]
fn test_sup_show_by_name() {
    let tmp = setup_test_project();
    create_supplier(&tmp, "7", "Acme Materials");

    pqt()
        .current_dir(tmp.path())
        .args(["sup", "show", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Materials"));
}

#[test]
fn test_quote_new_warns_on_unknown_supply() {
    let tmp = setup_test_project();
    create_supplier(&tmp, "1", "A");
    pqt()
        .current_dir(tmp.path())
        .args([
            "quote", "new", "--supply", "99", "--supplier", "1", "--price", "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning"));
}

#[test]
fn test_quote_new_rejects_negative_price() {
    let tmp = setup_test_project();
    pqt()
        .current_dir(tmp.path())
        .args([
            "quote", "new", "--supply", "1", "--supplier", "1", "--price", "-3",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn test_quote_list_joins_names() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["quote", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Cement")
                .and(predicate::str::contains("A"))
                .and(predicate::str::contains("B")),
        );
}

#[test]
fn test_quote_list_supplier_filter() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["quote", "list", "--supplier", "B", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn test_quote_list_drops_unresolved_rows() {
    let tmp = setup_cement_project();
    // dangling supply reference: joined view must not include it
    create_quotation(&tmp, "q9", "99", "1", "1");
    pqt()
        .current_dir(tmp.path())
        .args(["quote", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

// ============================================================================
// Best Price
// ============================================================================

#[test]
fn test_quote_best_picks_cheapest_supplier() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["quote", "best"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("15.00")
                .and(predicate::str::contains("B"))
                .and(predicate::str::contains("20.00").not()),
        );
}

#[test]
fn test_quote_best_respects_supplier_filter() {
    let tmp = setup_cement_project();
    // excluding B leaves A's 20.00 as the best price
    pqt()
        .current_dir(tmp.path())
        .args(["quote", "best", "--supplier", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20.00"));
}

#[test]
fn test_quote_best_empty_project() {
    let tmp = setup_test_project();
    pqt()
        .current_dir(tmp.path())
        .args(["quote", "best"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No quotations found."));
}

// ============================================================================
// Order Simulation
// ============================================================================

#[test]
fn test_order_total() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["order", "Cement", "B", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("75.00"));
}

#[test]
fn test_order_quantity_zero() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["order", "Cement", "A", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.00"));
}

#[test]
fn test_order_no_matching_pair_warns_without_failing() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["order", "Cement", "Nobody", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No quotation found"));
}

#[test]
fn test_order_export_writes_timestamped_workbook() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["order", "Cement", "B", "3", "--export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("order-confirmation-"));

    let confirmation = fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .find(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("order-confirmation-")
        });
    assert!(confirmation.is_some());
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_import_replaces_table() {
    let tmp = setup_test_project();
    let upload = tmp.path().join("upload.csv");
    fs::write(
        &upload,
        "id, name ,unit,quantity\n1,Cement,bag,40\n2,Sand,m3,12\n",
    )
    .unwrap();

    pqt()
        .current_dir(tmp.path())
        .args(["import", "supplies", "upload.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 row(s)"));

    pqt()
        .current_dir(tmp.path())
        .args(["supply", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn test_import_missing_column_fails_and_keeps_table() {
    let tmp = setup_cement_project();
    let upload = tmp.path().join("bad.csv");
    fs::write(&upload, "id,supply_id,supplier_id\nq9,1,1\n").unwrap();

    pqt()
        .current_dir(tmp.path())
        .args(["import", "quotations", "bad.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unit_price"));

    // the existing quotations survive the failed import
    pqt()
        .current_dir(tmp.path())
        .args(["quote", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn test_import_dry_run_writes_nothing() {
    let tmp = setup_test_project();
    let upload = tmp.path().join("upload.csv");
    fs::write(&upload, "id,name,unit,quantity\n1,Cement,bag,40\n").unwrap();

    pqt()
        .current_dir(tmp.path())
        .args(["import", "supplies", "upload.csv", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    pqt()
        .current_dir(tmp.path())
        .args(["supply", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_report_averages() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["report", "averages"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Mean Price per Supplier")
                .and(predicate::str::contains("20.00"))
                .and(predicate::str::contains("15.00")),
        );
}

#[test]
fn test_report_history() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args([
            "quote", "new", "--id", "q3", "--supply", "1", "--supplier", "1", "--price",
            "18", "--date", "2024-02-01",
        ])
        .assert()
        .success();

    pqt()
        .current_dir(tmp.path())
        .args(["report", "history", "Cement"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Price History: Cement")
                .and(predicate::str::contains("2024-02-01")),
        );
}

#[test]
fn test_report_export_writes_workbook() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["report", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quotation-report.xlsx"));

    let workbook = tmp.path().join("quotation-report.xlsx");
    assert!(workbook.is_file());
    assert!(fs::metadata(&workbook).unwrap().len() > 0);
}

#[test]
fn test_report_export_email_without_smtp_fails_after_writing() {
    let tmp = setup_cement_project();
    pqt()
        .current_dir(tmp.path())
        .args(["report", "export", "--email", "buyer@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SMTP"));

    // workbook generation succeeded even though the mail stage failed
    assert!(tmp.path().join("quotation-report.xlsx").is_file());
}
