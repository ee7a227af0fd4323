//! Recommendation engine: weak topics + error distributions → prioritized,
//! deduplicated study advice.
//!
//! Recommendations are explainable by construction: each one cites the
//! topic's accuracy, flags time pressure, and names the prevalent error
//! types that drove the suggested actions. The error-type → action mapping
//! is a fixed rule table, not a model.

use serde::{Deserialize, Serialize};

use crate::aggregate::{ErrorShare, TopicScore};
use crate::model::ErrorType;

/// Threshold above which the why-string mentions time pressure.
const SLOW_ANSWER_SECS: f64 = 90.0;
/// Threshold above which a timed-drill action is appended.
const TIMED_DRILL_SECS: f64 = 120.0;
/// Default cap on recommendations per student.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

/// A prioritized, explainable action bundle targeting one weak topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    /// Explanation referencing accuracy, time, and dominant error types.
    pub why: String,
    /// Distinct action steps, first-occurrence order preserved.
    pub how: Vec<String>,
    /// 1 = highest urgency, 3 = lowest.
    pub priority: u8,
}

/// The k largest error shares for one (student, topic), descending.
///
/// Ties are broken by the fixed `ErrorType` declaration order, so the result
/// is deterministic regardless of input row order.
pub fn top_error_types(
    student_id: &str,
    topic: &str,
    error_shares: &[ErrorShare],
    k: usize,
) -> Vec<(ErrorType, f64)> {
    let mut rows: Vec<(ErrorType, f64)> = error_shares
        .iter()
        .filter(|s| s.student_id == student_id && s.topic == topic)
        .map(|s| (s.error_type, s.share))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(k);
    rows
}

/// Fixed rule table: each error type maps to two actions and a priority
/// contribution. "none" yields nothing since it represents correct answers.
fn actions_for(error_type: ErrorType) -> Option<(&'static [&'static str], u8)> {
    match error_type {
        ErrorType::Segno => Some((
            &[
                "Write out every step and run a final +/- sign check",
                "Do 10 short drills a day focused only on sign handling",
            ],
            1,
        )),
        ErrorType::Algebra => Some((
            &[
                "Review base rules (distributive law, fractions, factoring)",
                "Work guided exercises: with the solution first, then without",
            ],
            1,
        )),
        ErrorType::Formula => Some((
            &[
                "Build a mini formula sheet (max 10) and review it daily",
                "Practice recognizing which formula applies with quick examples",
            ],
            2,
        )),
        ErrorType::Concetto => Some((
            &[
                "Review the theory with 2-3 simple examples, then harder ones",
                "Explain the concept aloud in 60 seconds; if you can't, it isn't clear",
            ],
            1,
        )),
        ErrorType::Distrazione => Some((
            &[
                "Mandatory final check: units, sign, order of magnitude",
                "Slow down 10%: zero mistakes first, speed later",
            ],
            2,
        )),
        ErrorType::None => None,
    }
}

fn build_why(topic: &str, accuracy: f64, avg_time: f64, top_errors: &[(ErrorType, f64)]) -> String {
    let mut parts = vec![format!("accuracy {:.0}%", accuracy * 100.0)];
    if avg_time > SLOW_ANSWER_SECS {
        parts.push(format!("high average time ({avg_time:.0}s)"));
    }
    if !top_errors.is_empty() {
        let names: Vec<String> = top_errors.iter().map(|(e, _)| e.to_string()).collect();
        parts.push(format!("prevalent errors: {}", names.join(", ")));
    }
    format!("In topic **{topic}**: {}.", parts.join("; "))
}

/// Generate up to `max_count` recommendations for a student's weak topics.
///
/// Weak topics are re-derived from `topic_scores` restricted to `weaknesses`
/// and sorted worst-first, rather than trusting the caller's order, so the
/// engine stays usable on its own. The returned list is never empty: with no
/// weaknesses it holds a single "maintain pace" recommendation.
pub fn generate_recommendations(
    student_id: &str,
    weaknesses: &[String],
    error_shares: &[ErrorShare],
    topic_scores: &[TopicScore],
    max_count: usize,
) -> Vec<Recommendation> {
    if weaknesses.is_empty() {
        return vec![Recommendation {
            title: "Maintain your pace".into(),
            why: "No marked gaps emerged: keep consolidating.".into(),
            how: vec![
                "Mixed exercises 3 times a week (across topics)".into(),
                "Add 1 harder exercise per topic to raise the bar".into(),
            ],
            priority: 2,
        }];
    }

    let mut weak_rows: Vec<&TopicScore> = topic_scores
        .iter()
        .filter(|t| t.student_id == student_id && weaknesses.contains(&t.topic))
        .collect();
    weak_rows.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));

    let mut recommendations = Vec::new();

    for row in weak_rows {
        let top_errors = top_error_types(student_id, &row.topic, error_shares, 2);
        let why = build_why(&row.topic, row.accuracy, row.avg_time_seconds, &top_errors);

        let mut how: Vec<String> = Vec::new();
        let mut priorities: Vec<u8> = Vec::new();

        for (error_type, _share) in &top_errors {
            if let Some((actions, priority)) = actions_for(*error_type) {
                how.extend(actions.iter().map(|a| (*a).to_string()));
                priorities.push(priority);
            }
        }

        // All top errors were "none" (or none were found): generic drill.
        if how.is_empty() {
            how = vec![
                "Solve 15 exercises on the topic from easy to medium, marking mistakes".into(),
                "After 2 days, redo the same exercises without looking".into(),
            ];
            priorities.push(2);
        }

        if row.avg_time_seconds > TIMED_DRILL_SECS {
            how.push("Add 5 timed exercises (60-90s timer) to build automaticity".into());
            priorities.push(2);
        }

        let mut seen = std::collections::HashSet::new();
        how.retain(|step| seen.insert(step.clone()));

        recommendations.push(Recommendation {
            title: format!("Improve {}", row.topic),
            why,
            how,
            priority: priorities.iter().copied().min().unwrap_or(2),
        });

        if recommendations.len() >= max_count {
            break;
        }
    }

    // Stable sort: ties keep the worst-topic-first order established above.
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(student: &str, topic: &str, error_type: ErrorType, value: f64) -> ErrorShare {
        ErrorShare {
            student_id: student.into(),
            topic: topic.into(),
            error_type,
            share: value,
        }
    }

    fn topic_score(student: &str, topic: &str, accuracy: f64, avg_time: f64) -> TopicScore {
        TopicScore {
            student_id: student.into(),
            topic: topic.into(),
            n_questions: 10,
            accuracy,
            avg_time_seconds: avg_time,
            avg_confidence: 3.0,
        }
    }

    #[test]
    fn top_error_types_sorted_and_capped() {
        let shares = vec![
            share("s1", "B", ErrorType::None, 0.2),
            share("s1", "B", ErrorType::Segno, 0.5),
            share("s1", "B", ErrorType::Algebra, 0.3),
            share("s2", "B", ErrorType::Formula, 1.0),
        ];
        let top = top_error_types("s1", "B", &shares, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, ErrorType::Segno);
        assert_eq!(top[1].0, ErrorType::Algebra);
    }

    #[test]
    fn top_error_types_tie_breaks_by_declaration_order() {
        let shares = vec![
            share("s1", "B", ErrorType::Concetto, 0.5),
            share("s1", "B", ErrorType::Segno, 0.5),
        ];
        let top = top_error_types("s1", "B", &shares, 2);
        // Equal shares: segno precedes concetto in the fixed order.
        assert_eq!(top[0].0, ErrorType::Segno);
        assert_eq!(top[1].0, ErrorType::Concetto);

        let reversed: Vec<ErrorShare> = shares.into_iter().rev().collect();
        let top_again = top_error_types("s1", "B", &reversed, 2);
        assert_eq!(top_again[0].0, ErrorType::Segno);
    }

    #[test]
    fn no_weaknesses_yields_maintain_pace() {
        let recs = generate_recommendations("s1", &[], &[], &[], 5);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, 2);
        assert!(!recs[0].how.is_empty());
        assert!(recs[0].title.contains("pace"));
    }

    #[test]
    fn worked_example_segno_and_distrazione() {
        // weaknesses = ["B"], shares {segno: 0.6, distrazione: 0.4}
        let shares = vec![
            share("s1", "B", ErrorType::Segno, 0.6),
            share("s1", "B", ErrorType::Distrazione, 0.4),
        ];
        let scores = vec![topic_score("s1", "B", 0.4, 60.0)];
        let recs = generate_recommendations("s1", &["B".into()], &shares, &scores, 5);

        assert_eq!(recs.len(), 1);
        let rec = &recs[0];
        // segno contributes priority 1, distrazione priority 2: min wins.
        assert_eq!(rec.priority, 1);
        assert_eq!(rec.how.len(), 4);
        assert!(rec.how.iter().any(|h| h.contains("sign")));
        assert!(rec.how.iter().any(|h| h.contains("Slow down")));
        assert!(rec.why.contains("40%"));
        assert!(rec.why.contains("segno"));
        assert!(rec.why.contains("distrazione"));
    }

    #[test]
    fn why_mentions_time_pressure_above_90s() {
        let scores = vec![topic_score("s1", "B", 0.3, 95.0)];
        let recs = generate_recommendations("s1", &["B".into()], &[], &scores, 5);
        assert!(recs[0].why.contains("95s"));

        let fast = vec![topic_score("s1", "B", 0.3, 45.0)];
        let recs = generate_recommendations("s1", &["B".into()], &[], &fast, 5);
        assert!(!recs[0].why.contains("average time"));
    }

    #[test]
    fn generic_fallback_when_only_none_errors() {
        // Shares exist but only the "none" category: the action mapping
        // skips it and the generic drill kicks in with priority 2.
        let shares = vec![share("s1", "B", ErrorType::None, 1.0)];
        let scores = vec![topic_score("s1", "B", 0.5, 50.0)];
        let recs = generate_recommendations("s1", &["B".into()], &shares, &scores, 5);
        assert_eq!(recs[0].priority, 2);
        assert_eq!(recs[0].how.len(), 2);
        assert!(recs[0].how[0].contains("15 exercises"));
    }

    #[test]
    fn timed_drill_appended_above_120s() {
        let scores = vec![topic_score("s1", "B", 0.3, 130.0)];
        let recs = generate_recommendations("s1", &["B".into()], &[], &scores, 5);
        assert!(recs[0].how.last().unwrap().contains("timed"));
    }

    #[test]
    fn how_steps_are_deduplicated() {
        // Two topics aren't needed: duplicate steps can only come from the
        // same action list being collected twice, which the tie-broken top-2
        // prevents, so assert the general property instead.
        let shares = vec![
            share("s1", "B", ErrorType::Segno, 0.6),
            share("s1", "B", ErrorType::Algebra, 0.4),
        ];
        let scores = vec![topic_score("s1", "B", 0.2, 150.0)];
        let recs = generate_recommendations("s1", &["B".into()], &shares, &scores, 5);
        let mut unique = recs[0].how.clone();
        unique.dedup();
        assert_eq!(unique.len(), recs[0].how.len());
    }

    #[test]
    fn max_count_caps_output() {
        let scores = vec![
            topic_score("s1", "A", 0.1, 50.0),
            topic_score("s1", "B", 0.2, 50.0),
            topic_score("s1", "C", 0.3, 50.0),
        ];
        let weaknesses: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let recs = generate_recommendations("s1", &weaknesses, &[], &scores, 2);
        assert_eq!(recs.len(), 2);
        // Worst topics are consumed first.
        assert!(recs.iter().any(|r| r.title.contains('A')));
        assert!(recs.iter().any(|r| r.title.contains('B')));
    }

    #[test]
    fn sorted_by_priority_with_stable_severity_ties() {
        let shares = vec![
            // Topic A (worst): distrazione only → priority 2.
            share("s1", "A", ErrorType::Distrazione, 1.0),
            // Topic B: segno → priority 1.
            share("s1", "B", ErrorType::Segno, 1.0),
            // Topic C: formula only → priority 2.
            share("s1", "C", ErrorType::Formula, 1.0),
        ];
        let scores = vec![
            topic_score("s1", "A", 0.1, 50.0),
            topic_score("s1", "B", 0.2, 50.0),
            topic_score("s1", "C", 0.3, 50.0),
        ];
        let weaknesses: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let recs = generate_recommendations("s1", &weaknesses, &shares, &scores, 5);

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].title, "Improve B"); // priority 1 first
        // Among priority-2 ties, severity order (A before C) is preserved.
        assert_eq!(recs[1].title, "Improve A");
        assert_eq!(recs[2].title, "Improve C");
    }

    #[test]
    fn caller_order_of_weaknesses_is_ignored() {
        let scores = vec![
            topic_score("s1", "A", 0.5, 50.0),
            topic_score("s1", "B", 0.1, 50.0),
        ];
        // Caller passes the milder topic first; engine re-sorts worst-first.
        let weaknesses: Vec<String> = vec!["A".into(), "B".into()];
        let recs = generate_recommendations("s1", &weaknesses, &[], &scores, 5);
        assert_eq!(recs[0].title, "Improve B");
    }
}
