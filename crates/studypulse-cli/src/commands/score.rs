//! The `studypulse score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use studypulse_core::aggregate::run_scoring;
use studypulse_data::ingest::{read_attempts_csv, write_scoring_outputs};

pub fn execute(answers: PathBuf, out_dir: PathBuf) -> Result<()> {
    let attempts = read_attempts_csv(&answers)
        .with_context(|| format!("failed to load attempts from {}", answers.display()))?;
    anyhow::ensure!(!attempts.is_empty(), "attempts table is empty: {}", answers.display());

    let outputs = run_scoring(&attempts);
    let paths = write_scoring_outputs(&out_dir, &outputs)?;

    println!("Scoring complete ({} attempts):", attempts.len());
    println!(" - {}", paths.topic_scores.display());
    println!(" - {}", paths.overall_summary.display());
    println!(" - {}", paths.error_shares.display());

    Ok(())
}
