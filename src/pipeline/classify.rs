//! Type reclassification and listwise deletion.
//!
//! Every column not named in the caller's exclusion list becomes
//! categorical: its values are rendered as code strings and its code set is
//! recorded from one scan. Excluded columns stay numeric. Afterwards every
//! row still holding a missing value in any column is dropped, so the
//! result is guaranteed free of absent cells.

use std::collections::BTreeMap;

use polars::prelude::*;

use super::error::RecodeError;
use super::frame::{render_codes, scan_codes, ColumnKind, ColumnMeta, SurveyFrame};

/// Mark columns as categorical/numeric per the exclusion list, then apply
/// listwise deletion.
///
/// `continuous` names the columns to EXCLUDE from reclassification; each
/// must exist (`ColumnNotFound` otherwise). If the deletion removes every
/// row the stage fails with `EmptyResultAfterFiltering` instead of
/// returning an empty table.
pub fn classify_columns(
    frame: SurveyFrame,
    continuous: &[String],
) -> Result<SurveyFrame, RecodeError> {
    for name in continuous {
        frame.ensure_column(name)?;
    }

    let (df, old_meta) = frame.parts();

    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let name = col.name().as_str();
        if continuous.iter().any(|c| c == name) {
            columns.push(col.clone());
        } else {
            let codes = render_codes(col)?;
            columns.push(Column::new(col.name().clone(), codes));
        }
    }
    let reclassified = DataFrame::new(columns)?;

    // Listwise deletion: one full-table scan after all columns are marked.
    let before = reclassified.height();
    let mut keep = BooleanChunked::full("keep".into(), true, before);
    for col in reclassified.get_columns() {
        keep = &keep & &col.as_materialized_series().is_not_null();
    }
    let filtered = reclassified.filter(&keep)?;

    if filtered.height() == 0 && before > 0 {
        return Err(RecodeError::EmptyResultAfterFiltering { dropped: before });
    }

    // Code sets reflect the rows that survived deletion.
    let mut meta = BTreeMap::new();
    for col in filtered.get_columns() {
        let name = col.name().to_string();
        let label = old_meta.get(&name).and_then(|m| m.label.clone());
        let kind = if continuous.iter().any(|c| c == &name) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical {
                codes: scan_codes(col)?,
            }
        };
        meta.insert(name, ColumnMeta { kind, label });
    }

    Ok(SurveyFrame::from_parts(filtered, meta))
}
