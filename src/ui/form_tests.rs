#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::*;
use super::util::parse_ratio;
use crate::models::PROJECT_TYPES;

fn filled_form() -> ProjectForm {
    let mut form = ProjectForm::new();
    form.title = "AI 기반 의료 진단 시스템 개발".into();
    form.code = "2024R1A1A1234567".into();
    form.start_date = "2024-03-01".into();
    form.end_date = "2025-02-28".into();
    form.total_budget = "100,000,000".into();
    form.direct_cost_ratio = "80".into();
    form
}

#[test]
fn test_build_computes_allocation() {
    // Default splits are 40/20/20/15/5 of an 80M direct cost
    let project = filled_form().validate_and_build().unwrap();

    assert!(project.id.is_none());
    assert_eq!(project.total_budget, 100_000_000);
    assert_eq!(project.direct_cost_ratio, dec!(80));
    assert_eq!(project.allocated("인건비"), 32_000_000);
    assert_eq!(project.allocated("학생인건비"), 16_000_000);
    assert_eq!(project.allocated("재료비"), 16_000_000);
    assert_eq!(project.allocated("연구활동비"), 12_000_000);
    assert_eq!(project.allocated("연구수당"), 4_000_000);
}

#[test]
fn test_unbalanced_ratios_block_the_save() {
    let mut form = filled_form();
    // 40+20+20+15+4 = 99: nothing must be persisted
    form.ratios[4].1 = "4".into();

    let err = form.validate_and_build().unwrap_err();
    assert!(err.contains("99"));
    assert!(err.contains("100"));
}

#[test]
fn test_sum_within_tolerance_is_accepted() {
    let mut form = filled_form();
    form.ratios[4].1 = "5.1".into();
    assert!(form.validate_and_build().is_ok());
}

#[test]
fn test_title_and_code_required() {
    let mut form = filled_form();
    form.title = "  ".into();
    assert!(form.validate_and_build().is_err());

    let mut form = filled_form();
    form.code.clear();
    assert!(form.validate_and_build().is_err());
}

#[test]
fn test_bad_budget_rejected() {
    let mut form = filled_form();
    form.total_budget = "-5".into();
    assert!(form.validate_and_build().is_err());

    form.total_budget = "10억".into();
    assert!(form.validate_and_build().is_err());
}

#[test]
fn test_direct_cost_ratio_range_checked() {
    let mut form = filled_form();
    form.direct_cost_ratio = "120".into();
    assert!(form.validate_and_build().is_err());

    form.direct_cost_ratio = "-1".into();
    assert!(form.validate_and_build().is_err());
}

#[test]
fn test_bad_date_rejected() {
    let mut form = filled_form();
    form.start_date = "2024/03/01".into();
    assert!(form.validate_and_build().is_err());
}

#[test]
fn test_edit_prefills_derived_ratios() {
    let mut project = filled_form().validate_and_build().unwrap();
    project.id = Some(7);

    let form = ProjectForm::edit(&project);
    assert_eq!(form.editing_id, Some(7));
    assert_eq!(form.title, project.title);
    assert_eq!(form.total_budget, "100000000");

    let expected = [dec!(40), dec!(20), dec!(20), dec!(15), dec!(5)];
    for ((_, input), want) in form.ratios.iter().zip(expected) {
        assert_eq!(parse_ratio(input).unwrap(), want);
    }
}

#[test]
fn test_edit_round_trip_keeps_allocation() {
    // Saving an untouched edit form reproduces the stored allocation when
    // the splits divide evenly
    let mut project = filled_form().validate_and_build().unwrap();
    project.id = Some(7);

    let resaved = ProjectForm::edit(&project).validate_and_build().unwrap();
    assert_eq!(resaved.id, Some(7));
    assert_eq!(resaved.allocation, project.allocation);
}

#[test]
fn test_cycle_wraps_through_taxonomy() {
    let mut form = filled_form();
    form.field_index = FIELD_TYPE;
    assert_eq!(form.project_type, PROJECT_TYPES[0]);

    form.cycle_field(1);
    assert_eq!(form.project_type, PROJECT_TYPES[1]);

    form.cycle_field(-2);
    assert_eq!(form.project_type, PROJECT_TYPES[PROJECT_TYPES.len() - 1]);
}

#[test]
fn test_adjust_ratio_clamps_at_zero() {
    let mut form = filled_form();
    form.field_index = SCALAR_FIELDS; // first category row

    form.adjust_field(-1);
    assert_eq!(form.ratios[0].1, "39");

    form.ratios[0].1 = "0".into();
    form.adjust_field(-1);
    assert_eq!(form.ratios[0].1, "0");
}

#[test]
fn test_field_editing_by_index() {
    let mut form = filled_form();
    form.set_value(FIELD_BUDGET, "50,000,000".into());
    assert_eq!(form.total_budget_value(), 50_000_000);

    // Cycle-only fields ignore typed edits
    form.set_value(FIELD_TYPE, "아무거나".into());
    assert_eq!(form.project_type, PROJECT_TYPES[0]);

    assert_eq!(form.value(FIELD_BUDGET), "50,000,000");
    assert_eq!(form.value(form.save_index()), "");
}
