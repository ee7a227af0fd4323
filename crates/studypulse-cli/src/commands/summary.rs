//! The `studypulse summary` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use studypulse_core::config::ProfileConfig;
use studypulse_core::profile::summarize_class;
use studypulse_data::ingest::load_scoring_outputs;

pub fn execute(data_dir: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = ProfileConfig::load_or_default(config_path.as_deref())?;

    let processed = data_dir.join("processed");
    let outputs = load_scoring_outputs(&processed).with_context(|| {
        format!(
            "failed to load processed tables from {} (run `studypulse score` first)",
            processed.display()
        )
    })?;

    let rows = summarize_class(&outputs.overall_summary, &config);

    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Accuracy",
        "Level",
        "Avg time",
        "Questions",
    ]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(&row.student_id),
            Cell::new(format!("{:.1}%", row.overall_accuracy * 100.0)),
            Cell::new(row.overall_level.to_string()),
            Cell::new(format!("{:.1}s", row.overall_avg_time_seconds)),
            Cell::new(row.overall_n_questions),
        ]);
    }

    println!("{} students", rows.len());
    println!("{table}");

    Ok(())
}
