//! End-to-end tests running every stage in pipeline order

use polars::prelude::*;
use recoda::pipeline::{
    apply_collapse, apply_level_labels, classify_columns, normalize_sentinel, set_column_label,
    RecodePlan, SurveyFrame,
};

#[path = "common/mod.rs"]
mod common;

/// Run the full stage sequence the CLI performs, driven by a parsed plan.
fn run_plan(df: DataFrame, plan: &RecodePlan) -> SurveyFrame {
    let frame = SurveyFrame::new(df).unwrap();
    let frame = frame.select(&plan.columns).unwrap();
    let frame = normalize_sentinel(frame, plan.sentinel).unwrap();
    let mut frame = classify_columns(frame, &plan.continuous).unwrap();
    for rule in &plan.collapse {
        frame = apply_collapse(&frame, rule).unwrap();
    }
    let superseded = plan.superseded_columns();
    if !superseded.is_empty() {
        frame = frame.drop_columns(&superseded).unwrap();
    }
    for (column, labels) in &plan.level_labels {
        frame = apply_level_labels(&frame, column, labels).unwrap();
    }
    for (column, label) in &plan.column_labels {
        frame = set_column_label(&frame, column, label).unwrap();
    }
    frame
}

#[test]
fn test_sentinel_row_is_dropped_entirely() {
    // FHWKHRS {5, -1, 3}: the -1 row disappears, it is not merely nulled
    let df = df! {
        "ALLGRADEX" => [2i64, 6, 9],
        "FHWKHRS" => [5i64, -1, 3],
        "SEGRADES" => [1i64, 2, 1],
    }
    .unwrap();
    let plan: RecodePlan = serde_json::from_str(&common::survey_plan_json()).unwrap();
    let frame = run_plan(df, &plan);

    assert_eq!(frame.height(), 2);
    let hours: Vec<Option<i64>> = frame
        .df()
        .column("FHWKHRS")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(hours, vec![Some(5), Some(3)]);
}

#[test]
fn test_gradelevel_derived_row_for_row() {
    let df = df! {
        "ALLGRADEX" => [2i64, 6, 9, 13],
        "FHWKHRS" => [5i64, 4, 3, 8],
        "SEGRADES" => [1i64, 2, 1, 3],
    }
    .unwrap();
    let plan: RecodePlan = serde_json::from_str(&common::survey_plan_json()).unwrap();
    let frame = run_plan(df, &plan);

    let values: Vec<Option<&str>> = frame
        .df()
        .column("gradelevel")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(
        values,
        vec![
            Some("Elementary"),
            Some("Middle"),
            Some("High"),
            Some("College")
        ]
    );
    // The fine-grained source column was superseded and projected away
    assert!(frame.df().column("ALLGRADEX").is_err());
}

#[test]
fn test_labels_applied_after_collapse() {
    let plan: RecodePlan = serde_json::from_str(&common::survey_plan_json()).unwrap();
    let frame = run_plan(common::create_survey_dataframe(), &plan);

    // SEGRADES codes were renamed to display strings
    let codes = frame.kind("SEGRADES").unwrap().codes();
    assert!(codes.contains(&"Mostly A's".to_string()));
    assert!(!codes.contains(&"1".to_string()));

    // Variable labels attached without touching identifiers
    assert_eq!(frame.display_name("FHWKHRS"), "Weekly homework hours");
    assert!(frame.df().column("FHWKHRS").is_ok());
}

#[test]
fn test_final_frame_has_no_absent_cells_outside_collapse_gaps() {
    let plan: RecodePlan = serde_json::from_str(&common::survey_plan_json()).unwrap();
    let frame = run_plan(common::create_survey_dataframe(), &plan);

    // The plan's rule covers every surviving ALLGRADEX code, so the whole
    // table is complete
    for col in frame.df().get_columns() {
        assert_eq!(col.null_count(), 0);
    }
}

#[test]
fn test_plan_validation_catches_overlap_before_any_data_work() {
    let mut plan: RecodePlan = serde_json::from_str(&common::survey_plan_json()).unwrap();
    plan.collapse[0].groups[0].codes.push("6".to_string());
    assert!(plan.validate().is_err());
}
