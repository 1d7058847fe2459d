//! The table value threaded through the pipeline: a polars DataFrame plus
//! per-column kind and label metadata.
//!
//! Column kinds are explicit tagged values rather than inferred on the fly,
//! so every stage can check what it is operating on. The metadata map and
//! the DataFrame are kept in sync by the stage functions; nothing outside
//! this crate mutates one without the other.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;

use super::error::RecodeError;

/// Tolerance for floating point comparison when matching raw codes
pub(crate) const TOLERANCE: f64 = 1e-9;

/// Largest float magnitude still rendered as an integer code
const INTEGRAL_RENDER_LIMIT: f64 = 9.0e15;

/// How a column's values are interpreted downstream
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    /// Continuous numeric values
    Numeric,
    /// A fixed set of discrete codes, stored as strings
    Categorical {
        /// Distinct codes observed (or declared by a collapse rule),
        /// in presentation order
        codes: Vec<String>,
    },
}

impl ColumnKind {
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnKind::Categorical { .. })
    }

    /// The code set, empty for numeric columns
    pub fn codes(&self) -> &[String] {
        match self {
            ColumnKind::Numeric => &[],
            ColumnKind::Categorical { codes } => codes,
        }
    }
}

/// Per-column metadata carried alongside the DataFrame
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    pub kind: ColumnKind,
    /// Display label for the column identifier. Presentation only - never
    /// affects row values, code sets or kinds.
    pub label: Option<String>,
}

/// A survey table: row-aligned named columns plus recoding metadata
#[derive(Debug, Clone)]
pub struct SurveyFrame {
    df: DataFrame,
    meta: BTreeMap<String, ColumnMeta>,
}

impl SurveyFrame {
    /// Wrap a freshly loaded DataFrame.
    ///
    /// Numeric dtypes start as `Numeric`; everything else is categorical
    /// with its code set taken from a single scan of the raw values. The
    /// reclassification stage overrides these kinds per the caller's
    /// exclusion list.
    pub fn new(df: DataFrame) -> Result<Self, RecodeError> {
        let mut meta = BTreeMap::new();
        for col in df.get_columns() {
            let kind = if col.dtype().is_primitive_numeric() {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical {
                    codes: scan_codes(col)?,
                }
            };
            meta.insert(col.name().to_string(), ColumnMeta { kind, label: None });
        }
        Ok(Self { df, meta })
    }

    pub(crate) fn from_parts(df: DataFrame, meta: BTreeMap<String, ColumnMeta>) -> Self {
        Self { df, meta }
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_df(self) -> DataFrame {
        self.df
    }

    pub(crate) fn parts(self) -> (DataFrame, BTreeMap<String, ColumnMeta>) {
        (self.df, self.meta)
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn meta(&self, column: &str) -> Option<&ColumnMeta> {
        self.meta.get(column)
    }

    pub fn kind(&self, column: &str) -> Option<&ColumnKind> {
        self.meta.get(column).map(|m| &m.kind)
    }

    /// Display name for a column: its attached label, or the identifier
    /// itself when no label was set
    pub fn display_name<'a>(&'a self, column: &'a str) -> &'a str {
        self.meta
            .get(column)
            .and_then(|m| m.label.as_deref())
            .unwrap_or(column)
    }

    pub(crate) fn ensure_column(&self, column: &str) -> Result<(), RecodeError> {
        if self.df.column(column).is_ok() {
            Ok(())
        } else {
            Err(RecodeError::ColumnNotFound(column.to_string()))
        }
    }

    /// Project the table to a fixed list of named columns, in that order.
    pub fn select(&self, columns: &[String]) -> Result<SurveyFrame, RecodeError> {
        for name in columns {
            self.ensure_column(name)?;
        }
        let df = self.df.select(columns.iter().map(|s| s.as_str()))?;
        let meta = columns
            .iter()
            .map(|name| (name.clone(), self.meta[name].clone()))
            .collect();
        Ok(SurveyFrame { df, meta })
    }

    /// Remove named columns. Used by the caller to discard source columns
    /// fully superseded by collapse-derived ones; the collapser itself never
    /// removes anything.
    pub fn drop_columns(&self, columns: &[String]) -> Result<SurveyFrame, RecodeError> {
        for name in columns {
            self.ensure_column(name)?;
        }
        let df = self.df.drop_many(columns);
        let mut meta = self.meta.clone();
        for name in columns {
            meta.remove(name);
        }
        Ok(SurveyFrame { df, meta })
    }

    /// Append a derived column with its metadata.
    pub(crate) fn push_column(
        &mut self,
        column: Column,
        meta: ColumnMeta,
    ) -> Result<(), RecodeError> {
        let name = column.name().to_string();
        self.df.with_column(column)?;
        self.meta.insert(name, meta);
        Ok(())
    }

    /// Replace a column's values in place, keeping its position.
    pub(crate) fn replace_column(&mut self, column: Column) -> Result<(), RecodeError> {
        self.df.with_column(column)?;
        Ok(())
    }

    pub(crate) fn set_kind(&mut self, column: &str, kind: ColumnKind) {
        if let Some(meta) = self.meta.get_mut(column) {
            meta.kind = kind;
        }
    }

    pub(crate) fn set_label(&mut self, column: &str, label: String) {
        if let Some(meta) = self.meta.get_mut(column) {
            meta.label = Some(label);
        }
    }
}

/// Render a column's cells as code strings, preserving nulls.
///
/// Integral floats render without a fractional part so the same survey code
/// produces the same string whether schema inference read it as an integer
/// or a float.
pub fn render_codes(col: &Column) -> Result<Vec<Option<String>>, RecodeError> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(format_float_code))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            // For other types, try to cast to string
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

fn format_float_code(v: f64) -> String {
    if v.is_finite() && v.fract().abs() < TOLERANCE && v.abs() < INTEGRAL_RENDER_LIMIT {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Distinct non-null codes of a column from one deterministic scan,
/// in sorted order.
pub fn scan_codes(col: &Column) -> Result<Vec<String>, RecodeError> {
    let distinct: BTreeSet<String> = render_codes(col)?.into_iter().flatten().collect();
    Ok(distinct.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_codes_integral_float() {
        let df = df! {
            "x" => [2.0f64, 6.0, 9.5],
        }
        .unwrap();
        let codes = render_codes(df.column("x").unwrap()).unwrap();
        assert_eq!(
            codes,
            vec![
                Some("2".to_string()),
                Some("6".to_string()),
                Some("9.5".to_string())
            ]
        );
    }

    #[test]
    fn test_scan_codes_sorted_distinct() {
        let df = df! {
            "x" => [Some(3i64), Some(1), None, Some(3), Some(2)],
        }
        .unwrap();
        let codes = scan_codes(df.column("x").unwrap()).unwrap();
        assert_eq!(codes, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_select_unknown_column() {
        let df = df! {
            "a" => [1i64, 2],
        }
        .unwrap();
        let frame = SurveyFrame::new(df).unwrap();
        let err = frame.select(&["a".to_string(), "b".to_string()]).unwrap_err();
        assert!(matches!(err, RecodeError::ColumnNotFound(name) if name == "b"));
    }

    #[test]
    fn test_select_projects_in_order() {
        let df = df! {
            "a" => [1i64, 2],
            "b" => ["x", "y"],
            "c" => [0.5f64, 1.5],
        }
        .unwrap();
        let frame = SurveyFrame::new(df).unwrap();
        let projected = frame.select(&["c".to_string(), "a".to_string()]).unwrap();
        assert_eq!(projected.column_names(), vec!["c", "a"]);
        assert_eq!(projected.width(), 2);
    }

    #[test]
    fn test_string_columns_start_categorical() {
        let df = df! {
            "grade" => ["1", "2", "1"],
            "hours" => [5i64, 3, 7],
        }
        .unwrap();
        let frame = SurveyFrame::new(df).unwrap();
        assert!(frame.kind("grade").unwrap().is_categorical());
        assert_eq!(frame.kind("hours"), Some(&ColumnKind::Numeric));
    }
}
