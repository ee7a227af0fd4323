//! The `studypulse generate` command.

use std::path::PathBuf;

use anyhow::Result;

use studypulse_data::generate::{generate_dataset, GeneratorConfig};
use studypulse_data::ingest::{write_attempts_csv, ATTEMPTS_FILE, BANK_FILE};

pub fn execute(
    out_dir: PathBuf,
    students: usize,
    tests: usize,
    questions_per_test: usize,
    seed: u64,
) -> Result<()> {
    anyhow::ensure!(students >= 1, "students must be at least 1");
    anyhow::ensure!(tests >= 1, "tests must be at least 1");
    anyhow::ensure!(
        questions_per_test >= 1,
        "questions-per-test must be at least 1"
    );

    let config = GeneratorConfig {
        n_students: students,
        n_tests: tests,
        questions_per_test,
        seed,
    };

    let (questions, attempts) = generate_dataset(&config);

    let raw_dir = out_dir.join("raw");
    let bank_path = raw_dir.join(BANK_FILE);
    let answers_path = raw_dir.join(ATTEMPTS_FILE);

    studypulse_data::bank::write_question_bank(&bank_path, &questions)?;
    write_attempts_csv(&answers_path, &attempts)?;

    println!("Generated {} questions: {}", questions.len(), bank_path.display());
    println!("Generated {} attempts: {}", attempts.len(), answers_path.display());

    Ok(())
}
