//! Error types for the recoding pipeline.
//!
//! All variants are structural or configuration errors discovered while
//! building or running the pipeline. None are recoverable internally: any
//! error aborts the remaining stages and the caller re-runs after fixing
//! the plan or the input.

use thiserror::Error;

/// Errors raised by the recoding stages.
#[derive(Debug, Error)]
pub enum RecodeError {
    /// A referenced column does not exist in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A collapse rule assigns one raw code to two different groups.
    ///
    /// Group membership must be a function of the code, so a rule with
    /// overlapping groups is rejected before any row is touched.
    #[error("Code '{code}' is assigned to both group '{first}' and group '{second}'")]
    DuplicateCodeAssignment {
        /// The raw code claimed by two groups
        code: String,
        /// Name of the group that claimed the code first
        first: String,
        /// Name of the group that claimed it again
        second: String,
    },

    /// Listwise deletion removed every row.
    ///
    /// An empty table is never silently returned; downstream summaries and
    /// the model fit are meaningless on zero rows.
    #[error("All {dropped} rows were removed by listwise deletion - no data left to analyze")]
    EmptyResultAfterFiltering {
        /// Number of rows the filter removed
        dropped: usize,
    },

    /// An underlying polars operation failed.
    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),
}
