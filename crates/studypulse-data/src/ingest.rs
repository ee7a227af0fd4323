//! Flat-table ingestion and persistence.
//!
//! Every reader validates the header against the table's required columns
//! BEFORE deserializing a single row, so a malformed table is rejected
//! whole rather than partially processed.

use std::fs::File;
use std::path::{Path, PathBuf};

use studypulse_core::aggregate::{ErrorShare, OverallSummary, ScoringOutputs, TopicScore};
use studypulse_core::error::CoreError;
use studypulse_core::model::{Attempt, REQUIRED_ATTEMPT_COLUMNS};

use crate::error::IngestError;

/// File names of the three persisted scoring tables.
pub const TOPIC_SCORES_FILE: &str = "student_topic_scores.csv";
pub const OVERALL_SUMMARY_FILE: &str = "student_overall_summary.csv";
pub const ERROR_MATRIX_FILE: &str = "student_topic_error_matrix.csv";

/// Raw attempts file name inside a dataset directory.
pub const ATTEMPTS_FILE: &str = "student_answers.csv";
/// Question bank file name inside a dataset directory.
pub const BANK_FILE: &str = "questions_bank.csv";

const TOPIC_SCORE_COLUMNS: [&str; 6] = [
    "student_id",
    "topic",
    "topic_n_questions",
    "topic_accuracy",
    "topic_avg_time_seconds",
    "topic_avg_confidence",
];

const OVERALL_SUMMARY_COLUMNS: [&str; 5] = [
    "student_id",
    "overall_n_questions",
    "overall_accuracy",
    "overall_avg_time_seconds",
    "overall_avg_confidence",
];

const ERROR_MATRIX_COLUMNS: [&str; 4] = ["student_id", "topic", "error_type", "error_share"];

/// Check that `required` columns are all present in the reader's header.
pub(crate) fn validate_headers(
    reader: &mut csv::Reader<File>,
    table: &str,
    required: &[&str],
) -> Result<(), IngestError> {
    let headers = reader.headers()?;
    let mut missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(CoreError::MissingColumns {
            table: table.to_string(),
            columns: missing,
        }
        .into());
    }
    Ok(())
}

/// Read and schema-check a raw attempts table.
pub fn read_attempts_csv(path: &Path) -> Result<Vec<Attempt>, IngestError> {
    let mut reader = csv::Reader::from_path(path)?;
    validate_headers(&mut reader, "student_answers", &REQUIRED_ATTEMPT_COLUMNS)?;
    let mut attempts = Vec::new();
    for record in reader.deserialize() {
        let attempt: Attempt = record?;
        attempts.push(attempt);
    }
    tracing::debug!(rows = attempts.len(), path = %path.display(), "loaded attempts");
    Ok(attempts)
}

/// Write an attempts table as CSV, creating parent directories.
pub fn write_attempts_csv(path: &Path, attempts: &[Attempt]) -> Result<(), IngestError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for attempt in attempts {
        writer.serialize(attempt)?;
    }
    writer.flush()?;
    Ok(())
}

/// Paths of the three tables written by [`write_scoring_outputs`].
#[derive(Debug, Clone)]
pub struct ScoringPaths {
    pub topic_scores: PathBuf,
    pub overall_summary: PathBuf,
    pub error_shares: PathBuf,
}

/// Persist the three derived tables under `dir`.
pub fn write_scoring_outputs(
    dir: &Path,
    outputs: &ScoringOutputs,
) -> Result<ScoringPaths, IngestError> {
    std::fs::create_dir_all(dir)?;

    let paths = ScoringPaths {
        topic_scores: dir.join(TOPIC_SCORES_FILE),
        overall_summary: dir.join(OVERALL_SUMMARY_FILE),
        error_shares: dir.join(ERROR_MATRIX_FILE),
    };

    let mut writer = csv::Writer::from_path(&paths.topic_scores)?;
    for row in &outputs.topic_scores {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(&paths.overall_summary)?;
    for row in &outputs.overall_summary {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(&paths.error_shares)?;
    for row in &outputs.error_shares {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(paths)
}

/// Load the three derived tables from `dir`. Each table is read and
/// validated independently, matching the persisted-layout contract.
pub fn load_scoring_outputs(dir: &Path) -> Result<ScoringOutputs, IngestError> {
    let mut reader = csv::Reader::from_path(dir.join(TOPIC_SCORES_FILE))?;
    validate_headers(&mut reader, "student_topic_scores", &TOPIC_SCORE_COLUMNS)?;
    let topic_scores = reader
        .deserialize()
        .collect::<Result<Vec<TopicScore>, _>>()?;

    let mut reader = csv::Reader::from_path(dir.join(OVERALL_SUMMARY_FILE))?;
    validate_headers(
        &mut reader,
        "student_overall_summary",
        &OVERALL_SUMMARY_COLUMNS,
    )?;
    let overall_summary = reader
        .deserialize()
        .collect::<Result<Vec<OverallSummary>, _>>()?;

    let mut reader = csv::Reader::from_path(dir.join(ERROR_MATRIX_FILE))?;
    validate_headers(
        &mut reader,
        "student_topic_error_matrix",
        &ERROR_MATRIX_COLUMNS,
    )?;
    let error_shares = reader
        .deserialize()
        .collect::<Result<Vec<ErrorShare>, _>>()?;

    Ok(ScoringOutputs {
        topic_scores,
        overall_summary,
        error_shares,
    })
}

/// Returns `true` if all three processed tables exist under `dir`.
pub fn scoring_outputs_exist(dir: &Path) -> bool {
    dir.join(TOPIC_SCORES_FILE).exists()
        && dir.join(OVERALL_SUMMARY_FILE).exists()
        && dir.join(ERROR_MATRIX_FILE).exists()
}
