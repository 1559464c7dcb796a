#![allow(clippy::unwrap_used)]

use super::*;
use std::io::Write;

fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

#[test]
fn test_reads_rows_with_header() {
    let (_dir, path) = write_csv(
        "date,category,amount,description\n\
         2024-04-02,재료비,500000,시약 구매\n\
         2024-04-10,인건비,\"1,000,000\",4월 인건비\n",
    );

    let expenses = read_expenses_csv(&path, 7).unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].project_id, 7);
    assert_eq!(expenses[0].category, "재료비");
    assert_eq!(expenses[0].amount, 500_000);
    assert_eq!(expenses[1].amount, 1_000_000);
    assert_eq!(expenses[1].description, "4월 인건비");
}

#[test]
fn test_reads_rows_without_header() {
    let (_dir, path) = write_csv("2024-04-02,재료비,500000,시약 구매\n");
    let expenses = read_expenses_csv(&path, 1).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].date, "2024-04-02");
}

#[test]
fn test_blank_lines_skipped() {
    let (_dir, path) = write_csv("2024-04-02,재료비,500000,시약 구매\n,,,\n");
    let expenses = read_expenses_csv(&path, 1).unwrap();
    assert_eq!(expenses.len(), 1);
}

#[test]
fn test_bad_date_reports_row() {
    let (_dir, path) = write_csv(
        "2024-04-02,재료비,500000,시약 구매\n\
         04/10/2024,인건비,1000,x\n",
    );
    let err = read_expenses_csv(&path, 1).unwrap_err();
    assert!(format!("{err:#}").contains("Row 2"));
}

#[test]
fn test_missing_description_rejected() {
    let (_dir, path) = write_csv("2024-04-02,재료비,500000,\n");
    assert!(read_expenses_csv(&path, 1).is_err());
}

#[test]
fn test_missing_category_rejected() {
    let (_dir, path) = write_csv("2024-04-02,,500000,시약 구매\n");
    assert!(read_expenses_csv(&path, 1).is_err());
}

#[test]
fn test_negative_amount_rejected() {
    let (_dir, path) = write_csv("2024-04-02,재료비,-500,시약 구매\n");
    assert!(read_expenses_csv(&path, 1).is_err());
}

#[test]
fn test_amount_with_won_suffix() {
    let (_dir, path) = write_csv("2024-04-02,재료비,500000원,시약 구매\n");
    let expenses = read_expenses_csv(&path, 1).unwrap();
    assert_eq!(expenses[0].amount, 500_000);
}
