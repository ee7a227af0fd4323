//! The `studypulse ingest` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use studypulse_data::bank::read_question_bank;
use studypulse_data::ingest::{read_attempts_csv, write_attempts_csv};
use studypulse_data::manual::build_attempts_from_manual;

pub fn execute(
    responses: PathBuf,
    student_id: String,
    test_id: String,
    bank_path: PathBuf,
    out: PathBuf,
) -> Result<()> {
    let bank = read_question_bank(&bank_path)
        .with_context(|| format!("failed to load question bank from {}", bank_path.display()))?;

    let new_attempts = build_attempts_from_manual(&responses, &student_id, &test_id, &bank)
        .with_context(|| format!("failed to ingest {}", responses.display()))?;
    anyhow::ensure!(
        !new_attempts.is_empty(),
        "no rows ingested from {}",
        responses.display()
    );

    // Append to an existing answers table so manual entries join the dataset.
    let mut attempts = if out.exists() {
        read_attempts_csv(&out)
            .with_context(|| format!("failed to load existing attempts at {}", out.display()))?
    } else {
        Vec::new()
    };
    let existing = attempts.len();
    attempts.extend(new_attempts);
    write_attempts_csv(&out, &attempts)?;

    println!(
        "Ingested {} attempts for {student_id} ({existing} already present): {}",
        attempts.len() - existing,
        out.display()
    );

    Ok(())
}
