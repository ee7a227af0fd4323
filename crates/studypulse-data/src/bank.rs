//! Question bank: the static description of every question a test can ask.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::ingest::validate_headers;

/// One question in the bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub test_id: String,
    pub topic: String,
    pub subskill: String,
    pub difficulty: u8,
    pub correct_answer: f64,
}

/// Columns required of a question bank table.
pub const REQUIRED_BANK_COLUMNS: [&str; 6] = [
    "question_id",
    "test_id",
    "topic",
    "subskill",
    "difficulty",
    "correct_answer",
];

/// Read and schema-check `questions_bank.csv`.
pub fn read_question_bank(path: &Path) -> Result<Vec<Question>, IngestError> {
    let mut reader = csv::Reader::from_path(path)?;
    validate_headers(&mut reader, "questions_bank", &REQUIRED_BANK_COLUMNS)?;
    let mut questions = Vec::new();
    for record in reader.deserialize() {
        let question: Question = record?;
        if !(1..=5).contains(&question.difficulty) {
            return Err(IngestError::InvalidValue {
                table: "questions_bank".into(),
                question_id: question.question_id,
                message: format!("difficulty {} outside 1..=5", question.difficulty),
            });
        }
        questions.push(question);
    }
    Ok(questions)
}

/// Write the question bank as CSV, creating parent directories.
pub fn write_question_bank(path: &Path, questions: &[Question]) -> Result<(), IngestError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for question in questions {
        writer.serialize(question)?;
    }
    writer.flush()?;
    Ok(())
}
