//! Ingestion error types.
//!
//! Schema problems reuse the core taxonomy (`CoreError::MissingColumns`);
//! the variants here cover the validation the ingestion boundary owns:
//! malformed values, broken invariants, and question-bank mismatches.

use thiserror::Error;

use studypulse_core::error::CoreError;

/// Errors raised while reading or validating input tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A structural schema problem (missing columns).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A field holds a value outside its contract.
    #[error("invalid value in {table} (question_id {question_id}): {message}")]
    InvalidValue {
        table: String,
        question_id: String,
        message: String,
    },

    /// A correct row carried a non-"none" error type.
    #[error(
        "is_correct=1 requires error_type=none; violated by question_id(s): {question_ids:?}"
    )]
    InconsistentRows { question_ids: Vec<String> },

    /// Manual responses referenced question ids absent from the bank.
    #[error("question_id(s) not present in the question bank: {question_ids:?}")]
    UnknownQuestions { question_ids: Vec<String> },

    /// Row-level CSV parse failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
