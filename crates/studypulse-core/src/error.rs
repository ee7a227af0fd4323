//! Core error types.
//!
//! The pipeline fails fast and loudly on structural problems: a table
//! missing required columns, a student with no rows, or an invalid
//! profiling configuration. Failures are deterministic given the same
//! input, so nothing here is retryable.

use thiserror::Error;

/// Errors surfaced by the scoring and profiling pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required column is absent from an input table. Raised before any
    /// aggregation begins; a malformed table is never partially processed.
    #[error("{table} is missing required columns: {columns:?}")]
    MissingColumns {
        /// Name of the offending table (file stem or logical name).
        table: String,
        /// The missing column names, sorted.
        columns: Vec<String>,
    },

    /// A requested student has no rows in the given table. Aborts report
    /// generation for that student only.
    #[error("student_id not found in {table}: {student_id}")]
    StudentNotFound {
        /// Logical table name ("overall summary" or "topic scores").
        table: &'static str,
        /// The student that was requested.
        student_id: String,
    },

    /// The profiling configuration is structurally invalid (band gaps,
    /// overlaps, or inverted thresholds).
    #[error("invalid profiling configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// Returns `true` when the error concerns a single student rather than
    /// the whole batch.
    pub fn is_per_student(&self) -> bool {
        matches!(self, CoreError::StudentNotFound { .. })
    }
}
