//! Unit tests for level and variable labeling

use std::collections::BTreeMap;

use polars::prelude::*;
use recoda::pipeline::{apply_level_labels, set_column_label, ColumnKind, SurveyFrame};

#[path = "common/mod.rs"]
mod common;

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_segrades_scenario() {
    let df = df! {
        "SEGRADES" => ["1", "2", "1"],
    }
    .unwrap();
    let frame = SurveyFrame::new(df).unwrap();
    let labeled =
        apply_level_labels(&frame, "SEGRADES", &labels(&[("1", "Mostly A's")])).unwrap();

    let values: Vec<Option<&str>> = labeled
        .df()
        .column("SEGRADES")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(values, vec![Some("Mostly A's"), Some("2"), Some("Mostly A's")]);
}

#[test]
fn test_group_membership_unchanged() {
    let df = df! {
        "SEGRADES" => ["1", "2", "1", "3", "2"],
    }
    .unwrap();
    let frame = SurveyFrame::new(df).unwrap();
    let map = labels(&[("1", "Mostly A's"), ("2", "Mostly B's"), ("3", "Mostly C's")]);
    let labeled = apply_level_labels(&frame, "SEGRADES", &map).unwrap();

    // Injective relabeling: same cardinality, same per-level multiplicities
    let before = frame.kind("SEGRADES").unwrap().codes().len();
    let after = labeled.kind("SEGRADES").unwrap().codes().len();
    assert_eq!(before, after);

    let cells: Vec<Option<&str>> = labeled
        .df()
        .column("SEGRADES")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    let count = |v: &str| cells.iter().filter(|c| **c == Some(v)).count();
    assert_eq!(count("Mostly A's"), 2);
    assert_eq!(count("Mostly B's"), 2);
    assert_eq!(count("Mostly C's"), 1);
}

#[test]
fn test_map_entry_for_absent_code_is_tolerated() {
    let df = df! {
        "SEGRADES" => ["1", "2"],
    }
    .unwrap();
    let frame = SurveyFrame::new(df).unwrap();
    // "5" never occurs; the map still applies cleanly
    let map = labels(&[("1", "Mostly A's"), ("5", "Not graded")]);
    let labeled = apply_level_labels(&frame, "SEGRADES", &map).unwrap();

    assert_eq!(
        labeled.kind("SEGRADES").unwrap().codes(),
        &["Mostly A's".to_string(), "2".to_string()]
    );
}

#[test]
fn test_column_label_changes_nothing_but_display() {
    let frame = SurveyFrame::new(common::create_survey_dataframe()).unwrap();
    let labeled = set_column_label(&frame, "FHWKHRS", "Weekly homework hours").unwrap();

    assert_eq!(labeled.display_name("FHWKHRS"), "Weekly homework hours");
    assert_eq!(labeled.kind("FHWKHRS"), Some(&ColumnKind::Numeric));
    assert!(labeled
        .df()
        .column("FHWKHRS")
        .unwrap()
        .as_materialized_series()
        .equals(frame.df().column("FHWKHRS").unwrap().as_materialized_series()));
    // Column identifier itself is untouched
    assert!(labeled.df().column("FHWKHRS").is_ok());
}

#[test]
fn test_level_labels_on_numeric_column_are_a_noop() {
    let frame = SurveyFrame::new(common::create_survey_dataframe()).unwrap();
    let labeled =
        apply_level_labels(&frame, "FHWKHRS", &labels(&[("5", "five")])).unwrap();
    assert!(labeled.df().equals_missing(frame.df()));
}
