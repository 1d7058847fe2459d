//! Level and variable labeling.
//!
//! Level labels rewrite raw codes to display strings inside a categorical
//! column: a rename of code identity, never of group membership. Variable
//! labels attach a display string to a column identifier as metadata only.
//! Neither touches column kinds, and variable labels never touch row
//! values at all.

use std::collections::BTreeMap;

use polars::prelude::*;

use super::error::RecodeError;
use super::frame::{render_codes, ColumnKind, SurveyFrame};

/// Rewrite each occurrence of a mapped code to its display string.
///
/// Codes not present in the map keep their raw representation. A map entry
/// whose code never occurs in the column is a tolerated no-op, so label
/// maps can be written once against a full codebook and reused across
/// extracts. Numeric columns are left untouched: labels only apply to
/// categorical code sets.
pub fn apply_level_labels(
    frame: &SurveyFrame,
    column: &str,
    labels: &BTreeMap<String, String>,
) -> Result<SurveyFrame, RecodeError> {
    frame.ensure_column(column)?;

    let codes = match frame.kind(column) {
        Some(ColumnKind::Categorical { codes }) => codes.clone(),
        _ => return Ok(frame.clone()),
    };

    let col = frame.df().column(column)?;
    let relabeled: Vec<Option<String>> = render_codes(col)?
        .into_iter()
        .map(|cell| cell.map(|code| labels.get(&code).cloned().unwrap_or(code)))
        .collect();

    let mut out = frame.clone();
    out.replace_column(Column::new(col.name().clone(), relabeled))?;

    // Rename the code set in place, keeping presentation order. A
    // non-injective map can merge display strings; dedupe so the set stays
    // a set.
    let mut renamed: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes {
        let display = labels.get(&code).cloned().unwrap_or(code);
        if !renamed.contains(&display) {
            renamed.push(display);
        }
    }
    out.set_kind(column, ColumnKind::Categorical { codes: renamed });

    Ok(out)
}

/// Attach a display label to a column identifier.
///
/// Metadata only: row values, code sets and kinds are unchanged.
pub fn set_column_label(
    frame: &SurveyFrame,
    column: &str,
    label: &str,
) -> Result<SurveyFrame, RecodeError> {
    frame.ensure_column(column)?;
    let mut out = frame.clone();
    out.set_label(column, label.to_string());
    Ok(out)
}
