//! Profile classifier: aggregated metrics → leveled, labeled profiles.
//!
//! Scoring measures; this module interprets. Accuracy maps to a coarse
//! level via the configured bands and to a strength/weakness/neutral label
//! via the two thresholds. The gap between the thresholds is deliberately
//! classified neutral to avoid over-labeling students near the middle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate::{OverallSummary, TopicScore};
use crate::config::ProfileConfig;
use crate::error::CoreError;

/// Coarse competency band derived from accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "beginner"),
            Level::Intermediate => write!(f, "intermediate"),
            Level::Advanced => write!(f, "advanced"),
        }
    }
}

/// Strength/weakness/neutral classification of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Strength,
    Weakness,
    Neutral,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Strength => write!(f, "strength"),
            Label::Weakness => write!(f, "weakness"),
            Label::Neutral => write!(f, "neutral"),
        }
    }
}

/// Classified view of one topic's metrics. Purely a projection of a
/// `TopicScore` row; holds no independent state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicProfile {
    pub topic: String,
    pub accuracy: f64,
    pub avg_time_seconds: f64,
    pub n_questions: u64,
    pub level: Level,
    pub label: Label,
}

/// The classified, sorted view of one student's performance. Built fresh
/// per report request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: String,
    pub overall_accuracy: f64,
    pub overall_avg_time_seconds: f64,
    pub overall_n_questions: u64,
    pub overall_level: Level,
    /// Sorted by accuracy descending.
    pub strengths: Vec<TopicProfile>,
    /// Sorted by accuracy ascending: most severe gap first. Downstream
    /// recommendation generation depends on this order.
    pub weaknesses: Vec<TopicProfile>,
    /// Sorted by accuracy descending.
    pub neutrals: Vec<TopicProfile>,
}

/// One row of the class-level overview table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSummaryRow {
    pub student_id: String,
    pub overall_accuracy: f64,
    pub overall_level: Level,
    pub overall_avg_time_seconds: f64,
    pub overall_n_questions: u64,
}

/// Map accuracy to a level via first-match lookup over the ordered bands.
///
/// Falls back to intermediate if nothing matches. With a validated config
/// that path is unreachable; it exists so a misconfigured band list degrades
/// instead of aborting a whole batch.
pub fn level_of(accuracy: f64, config: &ProfileConfig) -> Level {
    for band in &config.bands {
        if band.contains(accuracy) {
            return band.level;
        }
    }
    tracing::warn!(accuracy, "accuracy matched no level band, defaulting to intermediate");
    Level::Intermediate
}

/// Map accuracy to a strength/weakness/neutral label.
pub fn label_of(accuracy: f64, config: &ProfileConfig) -> Label {
    if accuracy >= config.strength_threshold {
        Label::Strength
    } else if accuracy <= config.weakness_threshold {
        Label::Weakness
    } else {
        Label::Neutral
    }
}

/// Build the complete profile for one student from the derived tables.
///
/// Fails with `StudentNotFound` if the student has no overall row or no
/// topic rows; a missing join match must surface, not silently drop.
pub fn build_profile(
    student_id: &str,
    topic_scores: &[TopicScore],
    overall_summary: &[OverallSummary],
    config: &ProfileConfig,
) -> Result<StudentProfile, CoreError> {
    let overall = overall_summary
        .iter()
        .find(|o| o.student_id == student_id)
        .ok_or_else(|| CoreError::StudentNotFound {
            table: "overall summary",
            student_id: student_id.to_string(),
        })?;

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut neutrals = Vec::new();
    let mut topic_count = 0usize;

    for row in topic_scores.iter().filter(|t| t.student_id == student_id) {
        topic_count += 1;
        let profile = TopicProfile {
            topic: row.topic.clone(),
            accuracy: row.accuracy,
            avg_time_seconds: row.avg_time_seconds,
            n_questions: row.n_questions,
            level: level_of(row.accuracy, config),
            label: label_of(row.accuracy, config),
        };
        match profile.label {
            Label::Strength => strengths.push(profile),
            Label::Weakness => weaknesses.push(profile),
            Label::Neutral => neutrals.push(profile),
        }
    }

    if topic_count == 0 {
        return Err(CoreError::StudentNotFound {
            table: "topic scores",
            student_id: student_id.to_string(),
        });
    }

    strengths.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    weaknesses.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
    neutrals.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));

    Ok(StudentProfile {
        student_id: student_id.to_string(),
        overall_accuracy: overall.accuracy,
        overall_avg_time_seconds: overall.avg_time_seconds,
        overall_n_questions: overall.n_questions,
        overall_level: level_of(overall.accuracy, config),
        strengths,
        weaknesses,
        neutrals,
    })
}

/// Quick class-level table: one row per student with their overall level.
pub fn summarize_class(
    overall_summary: &[OverallSummary],
    config: &ProfileConfig,
) -> Vec<ClassSummaryRow> {
    overall_summary
        .iter()
        .map(|o| ClassSummaryRow {
            student_id: o.student_id.clone(),
            overall_accuracy: o.accuracy,
            overall_level: level_of(o.accuracy, config),
            overall_avg_time_seconds: o.avg_time_seconds,
            overall_n_questions: o.n_questions,
        })
        .collect()
}
