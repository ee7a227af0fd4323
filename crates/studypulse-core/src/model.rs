//! Core data model types for studypulse.
//!
//! These are the fundamental types the entire studypulse system uses to
//! represent student attempts and error categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One student's single response to one question.
///
/// Immutable once ingested; one row per (student, question) pair. The
/// invariant `is_correct == true iff error_type == none` is enforced at the
/// ingestion boundary, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// Anonymous student identifier.
    pub student_id: String,
    /// Test the question belongs to.
    pub test_id: String,
    /// Unique question identifier.
    pub question_id: String,
    /// Subject area (e.g. "Algebra").
    pub topic: String,
    /// Sub-skill within the topic.
    pub subskill: String,
    /// Question difficulty, 1..=5.
    pub difficulty: u8,
    /// The expected numeric answer.
    pub correct_answer: f64,
    /// The answer the student gave.
    pub answer_given: f64,
    /// Whether the attempt was marked correct.
    #[serde(deserialize_with = "de_bool01", serialize_with = "ser_bool01")]
    pub is_correct: bool,
    /// Error category ("none" for correct answers).
    pub error_type: ErrorType,
    /// Time spent on the question, in seconds.
    pub time_seconds: f64,
    /// Self-reported confidence, 1..=5.
    pub confidence: u8,
}

/// Error categories assigned to attempts.
///
/// The lowercase names are the wire format used in the flat tables. The
/// declaration order doubles as the deterministic tie-break order when two
/// error types hold an equal share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// Correct answer, no error.
    None,
    /// Careless slip.
    Distrazione,
    /// Sign error (+/-).
    Segno,
    /// Algebraic manipulation error.
    Algebra,
    /// Wrong formula applied.
    Formula,
    /// Conceptual misunderstanding.
    Concetto,
}

impl ErrorType {
    /// All categories, in tie-break order.
    pub const ALL: [ErrorType; 6] = [
        ErrorType::None,
        ErrorType::Distrazione,
        ErrorType::Segno,
        ErrorType::Algebra,
        ErrorType::Formula,
        ErrorType::Concetto,
    ];

    /// Returns `true` for the "none" (correct answer) category.
    pub fn is_none(&self) -> bool {
        matches!(self, ErrorType::None)
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::None => write!(f, "none"),
            ErrorType::Distrazione => write!(f, "distrazione"),
            ErrorType::Segno => write!(f, "segno"),
            ErrorType::Algebra => write!(f, "algebra"),
            ErrorType::Formula => write!(f, "formula"),
            ErrorType::Concetto => write!(f, "concetto"),
        }
    }
}

impl FromStr for ErrorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ErrorType::None),
            "distrazione" => Ok(ErrorType::Distrazione),
            "segno" => Ok(ErrorType::Segno),
            "algebra" => Ok(ErrorType::Algebra),
            "formula" => Ok(ErrorType::Formula),
            "concetto" => Ok(ErrorType::Concetto),
            other => Err(format!("unknown error type: {other}")),
        }
    }
}

/// Column names required of a raw attempt table. Part of the ingestion
/// contract: a table missing any of these is rejected before aggregation.
pub const REQUIRED_ATTEMPT_COLUMNS: [&str; 12] = [
    "student_id",
    "test_id",
    "question_id",
    "topic",
    "subskill",
    "difficulty",
    "correct_answer",
    "answer_given",
    "is_correct",
    "error_type",
    "time_seconds",
    "confidence",
];

// CSV carries is_correct as 0/1; JSON round-trips the same way.
fn de_bool01<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Bool01Visitor;

    impl serde::de::Visitor<'_> for Bool01Visitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("0/1, true/false")
        }

        fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(E::custom(format!("invalid is_correct value: {other}"))),
            }
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(E::custom(format!("invalid is_correct value: {other}"))),
            }
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim().to_lowercase().as_str() {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                other => Err(E::custom(format!("invalid is_correct value: {other}"))),
            }
        }
    }

    deserializer.deserialize_any(Bool01Visitor)
}

fn ser_bool01<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_type_display_and_parse() {
        assert_eq!(ErrorType::Segno.to_string(), "segno");
        assert_eq!(ErrorType::None.to_string(), "none");
        assert_eq!("algebra".parse::<ErrorType>().unwrap(), ErrorType::Algebra);
        assert_eq!(
            " Concetto ".parse::<ErrorType>().unwrap(),
            ErrorType::Concetto
        );
        assert!("typo".parse::<ErrorType>().is_err());
    }

    #[test]
    fn error_type_tie_break_order() {
        // Declaration order is the documented deterministic tie-break.
        let mut sorted = ErrorType::ALL;
        sorted.sort();
        assert_eq!(sorted, ErrorType::ALL);
        assert!(ErrorType::None < ErrorType::Distrazione);
        assert!(ErrorType::Segno < ErrorType::Concetto);
    }

    #[test]
    fn attempt_serde_roundtrip() {
        let attempt = Attempt {
            student_id: "student_0001".into(),
            test_id: "test_01".into(),
            question_id: "test_01_q_01".into(),
            topic: "Algebra".into(),
            subskill: "frazioni".into(),
            difficulty: 3,
            correct_answer: 12.5,
            answer_given: -12.5,
            is_correct: false,
            error_type: ErrorType::Segno,
            time_seconds: 74.2,
            confidence: 2,
        };
        let json = serde_json::to_string(&attempt).unwrap();
        assert!(json.contains("\"segno\""));
        assert!(json.contains("\"is_correct\":0"));
        let back: Attempt = serde_json::from_str(&json).unwrap();
        assert_eq!(back.error_type, ErrorType::Segno);
        assert!(!back.is_correct);
    }
}
