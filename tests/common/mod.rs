//! Shared test utilities and fixture generators
#![allow(dead_code)]

use std::path::PathBuf;

use polars::prelude::*;
use recoda::pipeline::{CollapseGroup, CollapseRule};
use tempfile::TempDir;

/// A small survey extract with the shapes the pipeline cares about:
///
/// - `ALLGRADEX`: child's grade code (fine-grained, to be collapsed)
/// - `FHWKHRS`: weekly homework hours (continuous, contains the -1 sentinel)
/// - `SEGRADES`: self-reported grade band (categorical, contains -1)
pub fn create_survey_dataframe() -> DataFrame {
    df! {
        "ALLGRADEX" => [2i64, 6, 9, 13, 3, 7, 10, 14],
        "FHWKHRS" => [5i64, -1, 3, 8, 2, 4, 6, 7],
        "SEGRADES" => [1i64, 2, 1, 3, -1, 2, 1, 4],
    }
    .unwrap()
}

/// The grade-level collapse rule used across the test suite
pub fn grade_collapse_rule() -> CollapseRule {
    CollapseRule {
        source: "ALLGRADEX".to_string(),
        target: "gradelevel".to_string(),
        groups: vec![
            group("Elementary", &["2", "3", "4", "5"]),
            group("Middle", &["6", "7", "8"]),
            group("High", &["9", "10", "11", "12"]),
            group("College", &["13", "14", "15"]),
        ],
    }
}

pub fn group(name: &str, codes: &[&str]) -> CollapseGroup {
    CollapseGroup {
        name: name.to_string(),
        codes: codes.iter().map(|c| c.to_string()).collect(),
    }
}

/// A complete recode plan as the CLI consumes it
pub fn survey_plan_json() -> String {
    r#"{
        "columns": ["ALLGRADEX", "FHWKHRS", "SEGRADES"],
        "sentinel": -1,
        "continuous": ["FHWKHRS"],
        "collapse": [{
            "source": "ALLGRADEX",
            "target": "gradelevel",
            "groups": [
                { "name": "Elementary", "codes": ["2", "3", "4", "5"] },
                { "name": "Middle", "codes": ["6", "7", "8"] },
                { "name": "High", "codes": ["9", "10", "11", "12"] },
                { "name": "College", "codes": ["13", "14", "15"] }
            ]
        }],
        "level_labels": {
            "SEGRADES": {
                "1": "Mostly A's",
                "2": "Mostly B's",
                "3": "Mostly C's",
                "4": "Mostly D's or lower"
            }
        },
        "column_labels": {
            "SEGRADES": "Student's grades",
            "FHWKHRS": "Weekly homework hours"
        },
        "group_by": "gradelevel",
        "report": {
            "frequency": ["gradelevel"],
            "box_summary": [{ "value": "FHWKHRS", "by": "gradelevel" }],
            "crosstab": [{ "rows": "gradelevel", "cols": "SEGRADES" }]
        },
        "model": {
            "outcome": "SEGRADES",
            "event_value": "Mostly A's",
            "non_event_value": "Mostly B's"
        }
    }"#
    .to_string()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("survey.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Write a plan JSON next to the dataset inside an existing temp directory
pub fn write_plan(temp_dir: &TempDir, json: &str) -> PathBuf {
    let plan_path = temp_dir.path().join("plan.json");
    std::fs::write(&plan_path, json).unwrap();
    plan_path
}
