//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn studypulse() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("studypulse").unwrap()
}

/// Generate a small dataset into `dir` so the downstream commands have input.
fn generate_small(dir: &TempDir) {
    studypulse()
        .arg("generate")
        .arg("--out-dir")
        .arg(dir.path())
        .arg("--students")
        .arg("6")
        .arg("--tests")
        .arg("2")
        .arg("--questions-per-test")
        .arg("10")
        .arg("--seed")
        .arg("7")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"));
}

#[test]
fn generate_writes_raw_csvs() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    assert!(dir.path().join("raw/questions_bank.csv").exists());
    assert!(dir.path().join("raw/student_answers.csv").exists());
}

#[test]
fn generate_is_reproducible() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    generate_small(&a);
    generate_small(&b);

    let answers_a = std::fs::read_to_string(a.path().join("raw/student_answers.csv")).unwrap();
    let answers_b = std::fs::read_to_string(b.path().join("raw/student_answers.csv")).unwrap();
    assert_eq!(answers_a, answers_b);
}

#[test]
fn score_writes_processed_tables() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    studypulse()
        .arg("score")
        .arg("--answers")
        .arg(dir.path().join("raw/student_answers.csv"))
        .arg("--out-dir")
        .arg(dir.path().join("processed"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Scoring complete"));

    assert!(dir.path().join("processed/student_topic_scores.csv").exists());
    assert!(dir
        .path()
        .join("processed/student_overall_summary.csv")
        .exists());
    assert!(dir
        .path()
        .join("processed/student_topic_error_matrix.csv")
        .exists());
}

#[test]
fn score_nonexistent_answers_fails() {
    studypulse()
        .arg("score")
        .arg("--answers")
        .arg("no_such_answers.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_rejects_missing_columns() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.csv");
    std::fs::write(&bad, "student_id,topic\ns1,algebra\n").unwrap();

    studypulse()
        .arg("score")
        .arg("--answers")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required columns"));
}

#[test]
fn report_scores_on_demand_and_writes_html() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    let reports = dir.path().join("reports");
    studypulse()
        .arg("report")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--student-id")
        .arg("student_0001")
        .arg("--out-dir")
        .arg(&reports)
        .assert()
        .success()
        .stdout(predicate::str::contains("HTML report"));

    let html_path = reports.join("report_student_0001.html");
    assert!(html_path.exists());
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("student_0001"));
    assert!(html.contains("<!DOCTYPE html>"));

    // Scoring on demand also materializes the processed tables.
    assert!(dir.path().join("processed/student_topic_scores.csv").exists());
}

#[test]
fn report_all_formats() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    let reports = dir.path().join("reports");
    studypulse()
        .arg("report")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--student-id")
        .arg("student_0002")
        .arg("--out-dir")
        .arg(&reports)
        .arg("--format")
        .arg("all")
        .assert()
        .success()
        .stdout(predicate::str::contains("HTML report"))
        .stdout(predicate::str::contains("JSON report"));

    assert!(reports.join("report_student_0002.html").exists());
    let json = std::fs::read_to_string(reports.join("report_student_0002.json")).unwrap();
    assert!(json.contains("\"student_id\""));
}

#[test]
fn report_unknown_student_fails() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    studypulse()
        .arg("report")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--student-id")
        .arg("nobody")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nobody"));
}

#[test]
fn report_unknown_format_fails() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    studypulse()
        .arg("report")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--format")
        .arg("pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn report_with_custom_config() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    let config = dir.path().join("studypulse.toml");
    std::fs::write(
        &config,
        r#"
strength_threshold = 0.9
weakness_threshold = 0.3

[[levels]]
level = "beginner"
low = 0.0
high = 0.7

[[levels]]
level = "advanced"
low = 0.7
high = 1.01
"#,
    )
    .unwrap();

    studypulse()
        .arg("report")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();
}

#[test]
fn report_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    let config = dir.path().join("studypulse.toml");
    // Inverted thresholds
    std::fs::write(
        &config,
        r#"
strength_threshold = 0.4
weakness_threshold = 0.6

[[levels]]
level = "beginner"
low = 0.0
high = 1.01
"#,
    )
    .unwrap();

    studypulse()
        .arg("report")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("strength_threshold"));
}

#[test]
fn summary_prints_class_table() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    studypulse()
        .arg("score")
        .arg("--answers")
        .arg(dir.path().join("raw/student_answers.csv"))
        .arg("--out-dir")
        .arg(dir.path().join("processed"))
        .assert()
        .success();

    studypulse()
        .arg("summary")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("6 students"))
        .stdout(predicate::str::contains("student_0001"));
}

#[test]
fn summary_without_processed_tables_fails() {
    let dir = TempDir::new().unwrap();

    studypulse()
        .arg("summary")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("studypulse score"));
}

#[test]
fn ingest_appends_to_answers() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    let bank = dir.path().join("raw/questions_bank.csv");
    let answers = dir.path().join("raw/student_answers.csv");
    let before = std::fs::read_to_string(&answers).unwrap().lines().count();

    // Pick two real question ids out of the generated bank.
    let bank_body = std::fs::read_to_string(&bank).unwrap();
    let ids: Vec<&str> = bank_body
        .lines()
        .skip(1)
        .take(2)
        .map(|l| l.split(',').next().unwrap())
        .collect();

    let responses = dir.path().join("manual.csv");
    std::fs::write(
        &responses,
        format!(
            "question_id,answer_given,is_correct,error_type\n\
             {},42,1,none\n\
             {},17,0,segno\n",
            ids[0], ids[1]
        ),
    )
    .unwrap();

    studypulse()
        .arg("ingest")
        .arg("--responses")
        .arg(&responses)
        .arg("--student-id")
        .arg("manual_student")
        .arg("--test-id")
        .arg("manual_test")
        .arg("--bank")
        .arg(&bank)
        .arg("--out")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ingested 2 attempts"));

    let after = std::fs::read_to_string(&answers).unwrap();
    assert_eq!(after.lines().count(), before + 2);
    assert!(after.contains("manual_student"));
}

#[test]
fn ingest_unknown_question_fails() {
    let dir = TempDir::new().unwrap();
    generate_small(&dir);

    let responses = dir.path().join("manual.csv");
    std::fs::write(
        &responses,
        "question_id,answer_given,is_correct,error_type\nbogus_q,1,1,none\n",
    )
    .unwrap();

    studypulse()
        .arg("ingest")
        .arg("--responses")
        .arg(&responses)
        .arg("--student-id")
        .arg("manual_student")
        .arg("--test-id")
        .arg("manual_test")
        .arg("--bank")
        .arg(dir.path().join("raw/questions_bank.csv"))
        .arg("--out")
        .arg(dir.path().join("raw/student_answers.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus_q"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    studypulse()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created studypulse.toml"));

    assert!(dir.path().join("studypulse.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    studypulse()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    studypulse()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    studypulse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "scoring, profiling, and reports",
        ));
}

#[test]
fn version_output() {
    studypulse()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("studypulse"));
}

#[test]
fn report_help_shows_recommendation_cap_default() {
    studypulse()
        .arg("report")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-recommendations"))
        .stdout(predicate::str::contains("[default: 5]"));
}
