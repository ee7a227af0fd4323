//! Manual-entry ingestion: a hand-corrected responses CSV → pipeline attempts.
//!
//! A manual file carries the minimum an instructor records per question
//! (question_id, answer_given, is_correct, error_type, optionally time and
//! confidence); everything else is joined in from the question bank. This is
//! the one place the `is_correct implies error_type=none` invariant is enforced:
//! the core assumes its input already satisfies it.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use studypulse_core::model::{Attempt, ErrorType};

use crate::bank::Question;
use crate::error::IngestError;
use crate::ingest::validate_headers;

/// Default time for responses that omit `time_seconds`.
const DEFAULT_TIME_SECONDS: f64 = 60.0;
/// Default confidence for responses that omit `confidence`.
const DEFAULT_CONFIDENCE: u8 = 3;

const REQUIRED_MANUAL_COLUMNS: [&str; 4] =
    ["question_id", "answer_given", "is_correct", "error_type"];

/// One row of the manual responses file, before validation.
#[derive(Debug, Deserialize)]
struct ManualResponse {
    question_id: String,
    answer_given: f64,
    is_correct: String,
    error_type: String,
    #[serde(default)]
    time_seconds: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
}

fn parse_bool01(raw: &str, question_id: &str) -> Result<bool, IngestError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(IngestError::InvalidValue {
            table: "manual_responses".into(),
            question_id: question_id.to_string(),
            message: format!("is_correct must be 0/1 or true/false, got '{other}'"),
        }),
    }
}

/// Convert a manual responses file into attempts for one (student, test).
///
/// Rules, in order:
/// - correct rows must carry `error_type=none`; violations fail the whole file
/// - wrong rows with `error_type=none` are coerced to `distrazione`
/// - missing time defaults to 60 s, missing confidence to 3
/// - confidence is rounded and clamped to 1..=5
/// - every `question_id` must exist in the bank; unknown ids fail the file
///
/// The caller-provided `student_id` and `test_id` override whatever the bank
/// says, so the operator controls the attribution context.
pub fn build_attempts_from_manual(
    responses_path: &Path,
    student_id: &str,
    test_id: &str,
    bank: &[Question],
) -> Result<Vec<Attempt>, IngestError> {
    let mut reader = csv::Reader::from_path(responses_path)?;
    validate_headers(&mut reader, "manual_responses", &REQUIRED_MANUAL_COLUMNS)?;

    let by_question: HashMap<&str, &Question> =
        bank.iter().map(|q| (q.question_id.as_str(), q)).collect();

    let mut attempts = Vec::new();
    let mut inconsistent: Vec<String> = Vec::new();
    let mut unknown: Vec<String> = Vec::new();

    for record in reader.deserialize() {
        let response: ManualResponse = record?;
        let question_id = response.question_id.trim().to_string();

        let is_correct = parse_bool01(&response.is_correct, &question_id)?;
        let mut error_type: ErrorType = response
            .error_type
            .parse()
            .map_err(|message: String| IngestError::InvalidValue {
                table: "manual_responses".into(),
                question_id: question_id.clone(),
                message,
            })?;

        if is_correct && !error_type.is_none() {
            inconsistent.push(question_id.clone());
            continue;
        }
        if !is_correct && error_type.is_none() {
            // The most neutral reading of "wrong but no category given".
            error_type = ErrorType::Distrazione;
        }

        let Some(question) = by_question.get(question_id.as_str()) else {
            unknown.push(question_id);
            continue;
        };

        let time_seconds = response
            .time_seconds
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(DEFAULT_TIME_SECONDS);
        let confidence = response
            .confidence
            .filter(|c| c.is_finite())
            .map(|c| (c.round() as i64).clamp(1, 5) as u8)
            .unwrap_or(DEFAULT_CONFIDENCE);

        attempts.push(Attempt {
            student_id: student_id.to_string(),
            test_id: test_id.to_string(),
            question_id: question.question_id.clone(),
            topic: question.topic.clone(),
            subskill: question.subskill.clone(),
            difficulty: question.difficulty,
            correct_answer: question.correct_answer,
            answer_given: response.answer_given,
            is_correct,
            error_type,
            time_seconds,
            confidence,
        });
    }

    if !inconsistent.is_empty() {
        return Err(IngestError::InconsistentRows {
            question_ids: inconsistent,
        });
    }
    if !unknown.is_empty() {
        return Err(IngestError::UnknownQuestions {
            question_ids: unknown,
        });
    }

    Ok(attempts)
}
