//! Sentinel normalization - recodes a reserved raw value to missing.
//!
//! Survey extracts encode "valid skip" / "not applicable" as a reserved
//! value (typically a negative integer). This stage replaces every cell
//! equal to that sentinel with null, uniformly across all columns. There
//! are no column-specific exceptions: a column that legitimately uses the
//! sentinel value must be excluded upstream by column selection.

use polars::prelude::*;
use rayon::prelude::*;

use super::error::RecodeError;
use super::frame::{scan_codes, ColumnKind, SurveyFrame, TOLERANCE};

/// Replace every cell equal to `sentinel` with null.
///
/// Pure and idempotent: after one application no cell still equals the
/// sentinel, so re-applying is a no-op. Columns are independent and are
/// processed in parallel.
pub fn normalize_sentinel(frame: SurveyFrame, sentinel: i64) -> Result<SurveyFrame, RecodeError> {
    let (df, mut meta) = frame.parts();

    let columns: Vec<Column> = df
        .get_columns()
        .par_iter()
        .map(|col| normalize_column(col, sentinel))
        .collect::<Result<_, RecodeError>>()?;

    let df = DataFrame::new(columns)?;

    // Code sets recorded at load may still contain the sentinel rendering;
    // re-scan so metadata matches the normalized values.
    for (name, col_meta) in meta.iter_mut() {
        if col_meta.kind.is_categorical() {
            col_meta.kind = ColumnKind::Categorical {
                codes: scan_codes(df.column(name)?)?,
            };
        }
    }

    Ok(SurveyFrame::from_parts(df, meta))
}

fn normalize_column(col: &Column, sentinel: i64) -> Result<Column, RecodeError> {
    let name = col.name().clone();
    let dtype = col.dtype().clone();

    let normalized = match &dtype {
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            let values: Vec<Option<i64>> = cast
                .i64()?
                .into_iter()
                .map(|v| v.filter(|&n| n != sentinel))
                .collect();
            Column::new(name, values).cast(&dtype)?
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            let values: Vec<Option<u64>> = cast
                .u64()?
                .into_iter()
                .map(|v| v.filter(|&n| sentinel < 0 || n != sentinel as u64))
                .collect();
            Column::new(name, values).cast(&dtype)?
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> = cast
                .f64()?
                .into_iter()
                .map(|v| v.filter(|&x| (x - sentinel as f64).abs() >= TOLERANCE))
                .collect();
            Column::new(name, values).cast(&dtype)?
        }
        DataType::String => {
            let rendered = sentinel.to_string();
            let values: Vec<Option<String>> = col
                .str()?
                .into_iter()
                .map(|v| {
                    v.filter(|s| *s != rendered.as_str())
                        .map(|s| s.to_string())
                })
                .collect();
            Column::new(name, values)
        }
        // Booleans and other dtypes cannot hold an integer sentinel
        _ => col.clone(),
    };

    Ok(normalized)
}
