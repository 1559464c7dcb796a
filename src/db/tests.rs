#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn make_project(code: &str) -> Project {
    let mut allocation = Allocation::new();
    allocation.insert("인건비".into(), 32_000_000);
    allocation.insert("학생인건비".into(), 16_000_000);
    allocation.insert("재료비".into(), 16_000_000);
    allocation.insert("연구활동비".into(), 12_000_000);
    allocation.insert("연구수당".into(), 4_000_000);

    Project::new(
        "AI 기반 의료 진단 시스템 개발".into(),
        code.into(),
        "기초연구".into(),
        "한국연구재단".into(),
        "2024-03-01".into(),
        "2025-02-28".into(),
        100_000_000,
        dec!(80),
        allocation,
    )
}

fn make_expense(project_id: i64, category: &str, amount: i64, date: &str) -> Expense {
    Expense::new(
        project_id,
        category.into(),
        amount,
        date.into(),
        "시약 구매".into(),
    )
}

// ── Project CRUD ──────────────────────────────────────────────

#[test]
fn test_project_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    let id = db.insert_project(&make_project("2024R1")).unwrap();

    let fetched = db.get_project_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.title, "AI 기반 의료 진단 시스템 개발");
    assert_eq!(fetched.code, "2024R1");
    assert_eq!(fetched.total_budget, 100_000_000);
    assert_eq!(fetched.direct_cost_ratio, dec!(80));
    assert_eq!(fetched.allocation.len(), 5);
    assert_eq!(fetched.allocated("인건비"), 32_000_000);
    // Store-assigned timestamps
    assert!(!fetched.created_at.is_empty());
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[test]
fn test_project_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_project_by_id(99_999).unwrap().is_none());
}

#[test]
fn test_projects_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    let first = db.insert_project(&make_project("2023R1")).unwrap();
    let second = db.insert_project(&make_project("2024R2")).unwrap();

    let all = db.get_projects().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, Some(second));
    assert_eq!(all[1].id, Some(first));
    // Allocations come back attached for every project
    assert!(all.iter().all(|p| p.allocation.len() == 5));
}

#[test]
fn test_project_by_code() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_project(&make_project("2024R1A1A1234567")).unwrap();

    let found = db.get_project_by_code("2024R1A1A1234567").unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().allocated("재료비"), 16_000_000);

    assert!(db.get_project_by_code("nope").unwrap().is_none());
}

#[test]
fn test_update_project_overwrites() {
    let mut db = Database::open_in_memory().unwrap();
    let id = db.insert_project(&make_project("2024R1")).unwrap();

    let mut edited = db.get_project_by_id(id).unwrap().unwrap();
    edited.title = "수정된 과제".into();
    edited.total_budget = 50_000_000;
    edited.direct_cost_ratio = dec!(70);
    edited.allocation = Allocation::from([("인건비".to_string(), 35_000_000)]);
    db.update_project(&edited).unwrap();

    let fetched = db.get_project_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.title, "수정된 과제");
    assert_eq!(fetched.total_budget, 50_000_000);
    assert_eq!(fetched.direct_cost_ratio, dec!(70));
    // Allocation map is replaced wholesale
    assert_eq!(fetched.allocation.len(), 1);
    assert_eq!(fetched.allocated("인건비"), 35_000_000);
    assert_eq!(fetched.allocated("재료비"), 0);
    assert_eq!(fetched.created_at, edited.created_at);
}

#[test]
fn test_update_unsaved_project_fails() {
    let mut db = Database::open_in_memory().unwrap();
    assert!(db.update_project(&make_project("2024R1")).is_err());
}

#[test]
fn test_nonstandard_type_and_agency_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    let mut project = make_project("2024R1");
    project.project_type = "위탁연구".into();
    project.agency = "서울시".into();
    let id = db.insert_project(&project).unwrap();

    let fetched = db.get_project_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.project_type, "위탁연구");
    assert_eq!(fetched.agency, "서울시");
}

// ── Expense CRUD ──────────────────────────────────────────────

#[test]
fn test_expense_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    let pid = db.insert_project(&make_project("2024R1")).unwrap();
    db.insert_expense(&make_expense(pid, "재료비", 500_000, "2024-04-02"))
        .unwrap();

    let all = db.get_expenses(None, None, None, None).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].project_id, pid);
    assert_eq!(all[0].amount, 500_000);
    assert_eq!(all[0].description, "시약 구매");
    assert!(!all[0].created_at.is_empty());
}

#[test]
fn test_expense_filters() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_expense(&make_expense(1, "재료비", 500_000, "2024-04-02"))
        .unwrap();
    db.insert_expense(&make_expense(1, "인건비", 1_000_000, "2024-04-03"))
        .unwrap();
    db.insert_expense(&make_expense(2, "재료비", 700_000, "2024-04-04"))
        .unwrap();

    assert_eq!(db.get_expenses(None, Some(1), None, None).unwrap().len(), 2);
    assert_eq!(
        db.get_expenses(None, None, Some("재료비"), None).unwrap().len(),
        2
    );
    assert_eq!(
        db.get_expenses(None, Some(1), Some("재료비"), None)
            .unwrap()
            .len(),
        1
    );
    assert_eq!(db.get_expenses(Some(2), None, None, None).unwrap().len(), 2);
}

#[test]
fn test_expense_search_matches_description_and_category() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_expense(&make_expense(1, "재료비", 500_000, "2024-04-02"))
        .unwrap();
    let mut other = make_expense(1, "연구활동비", 200_000, "2024-04-05");
    other.description = "학회 출장".into();
    db.insert_expense(&other).unwrap();

    assert_eq!(
        db.get_expenses(None, None, None, Some("시약")).unwrap().len(),
        1
    );
    assert_eq!(
        db.get_expenses(None, None, None, Some("연구활동")).unwrap().len(),
        1
    );
    assert!(db
        .get_expenses(None, None, None, Some("없는말"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_expenses_ordered_by_date_desc() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_expense(&make_expense(1, "재료비", 1, "2024-04-10"))
        .unwrap();
    db.insert_expense(&make_expense(1, "재료비", 2, "2024-05-01"))
        .unwrap();
    db.insert_expense(&make_expense(1, "재료비", 3, "2024-01-20"))
        .unwrap();

    let dates: Vec<String> = db
        .get_expenses(None, None, None, None)
        .unwrap()
        .into_iter()
        .map(|e| e.date)
        .collect();
    assert_eq!(dates, ["2024-05-01", "2024-04-10", "2024-01-20"]);
}

#[test]
fn test_orphan_expense_is_kept() {
    let mut db = Database::open_in_memory().unwrap();
    // No project 42 exists; the store accepts the expense anyway
    db.insert_expense(&make_expense(42, "재료비", 500_000, "2024-04-02"))
        .unwrap();
    assert_eq!(db.get_expense_count().unwrap(), 1);
}

#[test]
fn test_insert_expenses_batch() {
    let mut db = Database::open_in_memory().unwrap();
    let batch = vec![
        make_expense(1, "재료비", 100, "2024-04-01"),
        make_expense(1, "인건비", 200, "2024-04-02"),
        make_expense(1, "연구수당", 300, "2024-04-03"),
    ];
    let count = db.insert_expenses_batch(&batch).unwrap();
    assert_eq!(count, 3);
    assert_eq!(db.get_expense_count().unwrap(), 3);
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_to_csv() {
    let mut db = Database::open_in_memory().unwrap();
    let pid = db.insert_project(&make_project("2024R1")).unwrap();
    db.insert_expense(&make_expense(pid, "재료비", 500_000, "2024-04-02"))
        .unwrap();
    // Orphan exports with an empty project code
    db.insert_expense(&make_expense(99, "인건비", 1_000, "2024-04-03"))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    let count = db.export_to_csv(path.to_str().unwrap(), None).unwrap();
    assert_eq!(count, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next().unwrap(), "date,project,category,amount,description");
    assert_eq!(lines.next().unwrap(), "2024-04-03,,인건비,1000,시약 구매");
    assert_eq!(lines.next().unwrap(), "2024-04-02,2024R1,재료비,500000,시약 구매");
}

#[test]
fn test_export_single_project() {
    let mut db = Database::open_in_memory().unwrap();
    let pid = db.insert_project(&make_project("2024R1")).unwrap();
    db.insert_expense(&make_expense(pid, "재료비", 500_000, "2024-04-02"))
        .unwrap();
    db.insert_expense(&make_expense(pid + 1, "인건비", 1_000, "2024-04-03"))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.csv");
    let count = db
        .export_to_csv(path.to_str().unwrap(), Some(pid))
        .unwrap();
    assert_eq!(count, 1);
}
