//! The `studypulse report` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use studypulse_core::aggregate::{run_scoring, ScoringOutputs};
use studypulse_core::config::ProfileConfig;
use studypulse_core::profile::build_profile;
use studypulse_core::recommend::generate_recommendations;
use studypulse_data::ingest::{
    load_scoring_outputs, read_attempts_csv, scoring_outputs_exist, write_scoring_outputs,
    ATTEMPTS_FILE,
};
use studypulse_report::html::write_html_report;
use studypulse_report::StudentReport;

/// Load processed tables, scoring the raw answers on the fly if missing.
fn load_or_score(data_dir: &Path) -> Result<ScoringOutputs> {
    let processed = data_dir.join("processed");
    if scoring_outputs_exist(&processed) {
        return Ok(load_scoring_outputs(&processed)?);
    }

    let answers = data_dir.join("raw").join(ATTEMPTS_FILE);
    tracing::info!(path = %answers.display(), "processed tables missing, scoring raw answers");
    let attempts = read_attempts_csv(&answers).with_context(|| {
        format!(
            "no processed tables under {} and no raw answers at {}",
            processed.display(),
            answers.display()
        )
    })?;
    let outputs = run_scoring(&attempts);
    write_scoring_outputs(&processed, &outputs)?;
    Ok(outputs)
}

pub fn execute(
    data_dir: PathBuf,
    student_id: Option<String>,
    out_dir: PathBuf,
    out_name: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
    max_recommendations: usize,
) -> Result<()> {
    anyhow::ensure!(
        max_recommendations >= 1,
        "max-recommendations must be at least 1"
    );
    let config = ProfileConfig::load_or_default(config_path.as_deref())?;

    let outputs = load_or_score(&data_dir)?;

    let student_id = match student_id {
        Some(id) => id,
        None => outputs
            .overall_summary
            .first()
            .map(|o| o.student_id.clone())
            .context("overall summary is empty, nothing to report on")?,
    };

    let profile = build_profile(
        &student_id,
        &outputs.topic_scores,
        &outputs.overall_summary,
        &config,
    )?;

    let weaknesses: Vec<String> = profile.weaknesses.iter().map(|t| t.topic.clone()).collect();
    let recommendations = generate_recommendations(
        &student_id,
        &weaknesses,
        &outputs.error_shares,
        &outputs.topic_scores,
        max_recommendations,
    );

    print_topic_table(&profile);

    let report = StudentReport::new(profile, recommendations, &outputs.error_shares);
    let stem = out_name.unwrap_or_else(|| format!("report_{student_id}"));

    let formats: Vec<&str> = if format == "all" {
        vec!["html", "json"]
    } else {
        format.split(',').map(|s| s.trim()).collect()
    };

    std::fs::create_dir_all(&out_dir)?;
    for fmt in &formats {
        match *fmt {
            "html" => {
                let path = out_dir.join(format!("{stem}.html"));
                write_html_report(&report, &path)?;
                println!("HTML report: {}", path.display());
            }
            "json" => {
                let path = out_dir.join(format!("{stem}.json"));
                report.save_json(&path)?;
                println!("JSON report: {}", path.display());
            }
            other => anyhow::bail!("unknown format: {other} (expected html, json, or all)"),
        }
    }

    Ok(())
}

fn print_topic_table(profile: &studypulse_core::profile::StudentProfile) {
    let mut table = Table::new();
    table.set_header(vec!["Topic", "Accuracy", "Avg time", "Questions", "Label"]);

    let rows = profile
        .strengths
        .iter()
        .chain(profile.neutrals.iter())
        .chain(profile.weaknesses.iter());
    for topic in rows {
        table.add_row(vec![
            Cell::new(&topic.topic),
            Cell::new(format!("{:.1}%", topic.accuracy * 100.0)),
            Cell::new(format!("{:.1}s", topic.avg_time_seconds)),
            Cell::new(topic.n_questions),
            Cell::new(topic.label.to_string()),
        ]);
    }

    eprintln!(
        "\nStudent {}: overall {:.1}% ({})",
        profile.student_id,
        profile.overall_accuracy * 100.0,
        profile.overall_level
    );
    eprintln!("{table}");
}
