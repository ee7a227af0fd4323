//! Aggregation engine: raw attempts → derived metric tables.
//!
//! All three computations are single-pass explicit group-bys: a composite
//! key maps to an accumulator (count + running sums), one iteration over the
//! attempt slice fills the accumulators, and means are finalized at the end.
//! Rows are emitted in ascending key order so repeated runs produce
//! byte-identical tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Attempt, ErrorType};

/// Per (student, topic) metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicScore {
    pub student_id: String,
    pub topic: String,
    #[serde(rename = "topic_n_questions")]
    pub n_questions: u64,
    /// Mean of `is_correct`, rounded to 4 decimals.
    #[serde(rename = "topic_accuracy")]
    pub accuracy: f64,
    /// Mean time per question in seconds, rounded to 2 decimals.
    #[serde(rename = "topic_avg_time_seconds")]
    pub avg_time_seconds: f64,
    /// Mean self-reported confidence, rounded to 2 decimals.
    #[serde(rename = "topic_avg_confidence")]
    pub avg_confidence: f64,
}

/// Per-student metrics collapsed across all topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallSummary {
    pub student_id: String,
    #[serde(rename = "overall_n_questions")]
    pub n_questions: u64,
    #[serde(rename = "overall_accuracy")]
    pub accuracy: f64,
    #[serde(rename = "overall_avg_time_seconds")]
    pub avg_time_seconds: f64,
    #[serde(rename = "overall_avg_confidence")]
    pub avg_confidence: f64,
}

/// Long-form error distribution row for one (student, topic, error type).
///
/// The "none" category (correct answers) is included, so for every
/// (student, topic) the shares sum to 1.0 within rounding tolerance.
/// Error types with zero count are omitted rather than zero-filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorShare {
    pub student_id: String,
    pub topic: String,
    pub error_type: ErrorType,
    /// Fraction of the group's attempts, rounded to 4 decimals.
    #[serde(rename = "error_share")]
    pub share: f64,
}

/// The three derived tables produced by one scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringOutputs {
    pub topic_scores: Vec<TopicScore>,
    pub overall_summary: Vec<OverallSummary>,
    pub error_shares: Vec<ErrorShare>,
}

/// Running sums for one group of attempts.
#[derive(Debug, Default, Clone)]
struct MetricAcc {
    n: u64,
    correct: u64,
    time_sum: f64,
    confidence_sum: f64,
}

impl MetricAcc {
    fn push(&mut self, attempt: &Attempt) {
        self.n += 1;
        self.correct += u64::from(attempt.is_correct);
        self.time_sum += attempt.time_seconds;
        self.confidence_sum += f64::from(attempt.confidence);
    }

    fn accuracy(&self) -> f64 {
        self.correct as f64 / self.n as f64
    }

    fn avg_time(&self) -> f64 {
        self.time_sum / self.n as f64
    }

    fn avg_confidence(&self) -> f64 {
        self.confidence_sum / self.n as f64
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Compute per (student, topic) scores: exactly one row per distinct
/// (student_id, topic) pair present in the input.
pub fn compute_topic_scores(attempts: &[Attempt]) -> Vec<TopicScore> {
    let mut groups: BTreeMap<(String, String), MetricAcc> = BTreeMap::new();
    for a in attempts {
        groups
            .entry((a.student_id.clone(), a.topic.clone()))
            .or_default()
            .push(a);
    }

    groups
        .into_iter()
        .map(|((student_id, topic), acc)| TopicScore {
            student_id,
            topic,
            n_questions: acc.n,
            accuracy: round4(acc.accuracy()),
            avg_time_seconds: round2(acc.avg_time()),
            avg_confidence: round2(acc.avg_confidence()),
        })
        .collect()
}

/// Compute per-student overall summaries.
pub fn compute_overall_summary(attempts: &[Attempt]) -> Vec<OverallSummary> {
    let mut groups: BTreeMap<String, MetricAcc> = BTreeMap::new();
    for a in attempts {
        groups.entry(a.student_id.clone()).or_default().push(a);
    }

    groups
        .into_iter()
        .map(|(student_id, acc)| OverallSummary {
            student_id,
            n_questions: acc.n,
            accuracy: round4(acc.accuracy()),
            avg_time_seconds: round2(acc.avg_time()),
            avg_confidence: round2(acc.avg_confidence()),
        })
        .collect()
}

/// Compute the long-form error distribution per (student, topic).
///
/// Shares are computed from raw counts and only rounded for output, so the
/// sum-to-1 invariant holds against the unrounded values to within 1e-6.
pub fn compute_topic_error_shares(attempts: &[Attempt]) -> Vec<ErrorShare> {
    let mut counts: BTreeMap<(String, String, ErrorType), u64> = BTreeMap::new();
    let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
    for a in attempts {
        *counts
            .entry((a.student_id.clone(), a.topic.clone(), a.error_type))
            .or_default() += 1;
        *totals
            .entry((a.student_id.clone(), a.topic.clone()))
            .or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((student_id, topic, error_type), n)| {
            let total = totals[&(student_id.clone(), topic.clone())];
            ErrorShare {
                student_id,
                topic,
                error_type,
                share: round4(n as f64 / total as f64),
            }
        })
        .collect()
}

/// Run the full scoring pass: one O(n) scan per derived table, shared
/// read-only by all downstream per-student work.
pub fn run_scoring(attempts: &[Attempt]) -> ScoringOutputs {
    ScoringOutputs {
        topic_scores: compute_topic_scores(attempts),
        overall_summary: compute_overall_summary(attempts),
        error_shares: compute_topic_error_shares(attempts),
    }
}
