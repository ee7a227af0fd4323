//! HTML report generator.
//!
//! Produces a single self-contained page per student: inlined CSS, KPI
//! cards, SVG charts, topic table, and recommendation cards. No external
//! assets, so the file can be shared as-is.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use studypulse_core::profile::{Label, Level};

use crate::StudentReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn level_pill_class(level: Level) -> &'static str {
    match level {
        Level::Advanced => "ok",
        Level::Intermediate => "warn",
        Level::Beginner => "bad",
    }
}

fn label_pill(label: Label) -> (&'static str, &'static str) {
    match label {
        Label::Strength => ("ok", "Strength"),
        Label::Neutral => ("warn", "Neutral"),
        Label::Weakness => ("bad", "Weakness"),
    }
}

fn priority_pill_class(priority: u8) -> &'static str {
    match priority {
        1 => "bad",
        2 => "warn",
        _ => "ok",
    }
}

/// Generate the full HTML page for one student report.
pub fn generate_html(report: &StudentReport) -> String {
    let profile = &report.profile;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Student report: {}</title>\n",
        html_escape(&profile.student_id)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"wrap\">\n");

    // Header with level pill
    html.push_str("<header class=\"row\">\n<div>\n");
    html.push_str(&format!(
        "<h1>Student report: {}</h1>\n",
        html_escape(&profile.student_id)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Generated by studypulse | {}</p>\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<span class=\"pill {}\">Level: {}</span>\n</header>\n",
        level_pill_class(profile.overall_level),
        profile.overall_level
    ));

    // KPI cards
    html.push_str("<section class=\"grid grid-3\">\n");
    html.push_str(&format!(
        "<div class=\"card kpi\"><div class=\"label\">Overall accuracy</div><div class=\"value\">{:.1}%</div><div class=\"meta\">across {} questions</div></div>\n",
        profile.overall_accuracy * 100.0,
        profile.overall_n_questions
    ));
    html.push_str(&format!(
        "<div class=\"card kpi\"><div class=\"label\">Average time</div><div class=\"value\">{:.1}s</div><div class=\"meta\">per question</div></div>\n",
        profile.overall_avg_time_seconds
    ));
    html.push_str(&format!(
        "<div class=\"card kpi\"><div class=\"label\">Strengths</div><div class=\"value\">{}</div><div class=\"meta\">topics above threshold</div></div>\n",
        profile.strengths.len()
    ));
    html.push_str("</section>\n");

    // Accuracy chart
    html.push_str("<section class=\"card\">\n<h2>Accuracy per topic</h2>\n");
    html.push_str(&accuracy_bar_chart(report));
    html.push_str("</section>\n");

    // Error distribution chart
    if !report.error_shares.is_empty() {
        html.push_str("<section class=\"card\">\n<h2>Error distribution per topic</h2>\n");
        html.push_str(&error_share_chart(report));
        html.push_str(
            "<p class=\"meta\">Includes the <b>none</b> segment (correct answers).</p>\n",
        );
        html.push_str("</section>\n");
    }

    // Topic table
    html.push_str("<section class=\"card\">\n<h2>Topics</h2>\n<table>\n");
    html.push_str(
        "<thead><tr><th>Topic</th><th>Accuracy</th><th>Avg time</th><th>Questions</th><th>Level</th><th>Label</th></tr></thead>\n<tbody>\n",
    );
    for topic in report.topics_for_display() {
        let (pill, text) = label_pill(topic.label);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.1}%</td><td>{:.1}s</td><td>{}</td><td>{}</td><td><span class=\"pill {}\">{}</span></td></tr>\n",
            html_escape(&topic.topic),
            topic.accuracy * 100.0,
            topic.avg_time_seconds,
            topic.n_questions,
            topic.level,
            pill,
            text
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");

    // Recommendations
    html.push_str("<section class=\"card\">\n<h2>Recommendations</h2>\n");
    if report.recommendations.is_empty() {
        html.push_str("<p class=\"meta\">No recommendations available.</p>\n");
    }
    for rec in &report.recommendations {
        html.push_str("<div class=\"rec\">\n");
        html.push_str(&format!(
            "<div class=\"row\"><strong>{}</strong><span class=\"pill {}\">Priority {}</span></div>\n",
            html_escape(&rec.title),
            priority_pill_class(rec.priority),
            rec.priority
        ));
        html.push_str(&format!("<p class=\"meta\">{}</p>\n<ul>\n", html_escape(&rec.why)));
        for step in &rec.how {
            html.push_str(&format!("<li>{}</li>\n", html_escape(step)));
        }
        html.push_str("</ul>\n</div>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"card\">\n<details>\n<summary>Raw JSON data</summary>\n<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n</details>\n</section>\n");

    html.push_str("</div>\n</body>\n</html>");
    html
}

/// Write an HTML report to a file, creating parent directories.
pub fn write_html_report(report: &StudentReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn accuracy_color(label: Label) -> &'static str {
    match label {
        Label::Strength => "#22c55e",
        Label::Neutral => "#eab308",
        Label::Weakness => "#ef4444",
    }
}

/// Horizontal bar chart of accuracy per topic, colored by label.
fn accuracy_bar_chart(report: &StudentReport) -> String {
    let bar_height = 26;
    let max_width = 420;
    let padding = 10;
    let label_width = 180;

    let topics = report.topics_for_display();
    let total_height = topics.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, topic) in topics.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (topic.accuracy * max_width as f64) as usize;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&topic.topic)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width,
            y,
            width,
            bar_height,
            accuracy_color(topic.label)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            topic.accuracy * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const ERROR_COLORS: [(&str, &str); 6] = [
    ("none", "#334155"),
    ("distrazione", "#eab308"),
    ("segno", "#ef4444"),
    ("algebra", "#f97316"),
    ("formula", "#8b5cf6"),
    ("concetto", "#06b6d4"),
];

fn error_color(name: &str) -> &'static str {
    ERROR_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .unwrap_or("#64748b")
}

/// Stacked horizontal bars: one row per topic, segments sized by share.
fn error_share_chart(report: &StudentReport) -> String {
    let bar_height = 26;
    let max_width = 420;
    let padding = 10;
    let label_width = 180;

    // Shares grouped by topic, in stable topic order.
    let mut by_topic: BTreeMap<&str, Vec<(&str, f64)>> = BTreeMap::new();
    let mut names: Vec<String> = Vec::new();
    for share in &report.error_shares {
        let name = share.error_type.to_string();
        if !names.contains(&name) {
            names.push(name.clone());
        }
        by_topic
            .entry(share.topic.as_str())
            .or_default()
            .push((error_color(&name), share.share));
    }

    let legend_height = 24;
    let total_height = by_topic.len() * (bar_height + padding) + padding + legend_height;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 40,
        total_height
    );

    for (i, (topic, segments)) in by_topic.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(topic)
        ));
        let mut x = label_width as f64;
        for (color, share) in segments {
            let width = share * max_width as f64;
            svg.push_str(&format!(
                "  <rect x=\"{:.1}\" y=\"{}\" width=\"{:.1}\" height=\"{}\" fill=\"{}\"/>\n",
                x, y, width, bar_height, color
            ));
            x += width;
        }
    }

    // Legend
    let legend_y = by_topic.len() * (bar_height + padding) + padding + 8;
    let mut x = label_width;
    for name in &names {
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"10\" height=\"10\" fill=\"{}\"/>\n",
            x,
            legend_y,
            error_color(name)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"currentColor\" dominant-baseline=\"hanging\">{}</text>\n",
            x + 14,
            legend_y,
            html_escape(name)
        ));
        x += 14 + 8 * name.len() + 16;
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --card: #f8fafc;
        --ok-bg: #dcfce7; --ok-fg: #166534; --warn-bg: #fef9c3; --warn-fg: #854d0e;
        --bad-bg: #fde2e2; --bad-fg: #991b1b; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --card: #1f2937;
          --ok-bg: #064e3b; --ok-fg: #6ee7b7; --warn-bg: #713f12; --warn-fg: #fde68a;
          --bad-bg: #7f1d1d; --bad-fg: #fca5a5; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
.wrap { max-width: 1000px; margin: 0 auto; }
h1 { font-size: 26px; margin: 0 0 4px; }
h2 { font-size: 16px; margin: 0 0 12px; color: #6b7280; }
.meta { color: #6b7280; font-size: 13px; }
.row { display: flex; align-items: center; justify-content: space-between; gap: 12px; }
.grid { display: grid; gap: 16px; margin: 16px 0; }
.grid-3 { grid-template-columns: repeat(3, minmax(0, 1fr)); }
.card { background: var(--card); border: 1px solid var(--border); border-radius: 12px; padding: 16px; margin: 16px 0; }
.kpi .label { color: #6b7280; font-size: 12px; }
.kpi .value { font-size: 22px; font-weight: 700; }
.pill { display: inline-block; padding: 4px 10px; border-radius: 999px; font-size: 12px; font-weight: 700; }
.pill.ok { background: var(--ok-bg); color: var(--ok-fg); }
.pill.warn { background: var(--warn-bg); color: var(--warn-fg); }
.pill.bad { background: var(--bad-bg); color: var(--bad-fg); }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid var(--border); padding: 8px 10px; text-align: left; font-size: 13px; }
th { color: #6b7280; font-weight: 600; }
.rec { padding: 12px 0; border-bottom: 1px solid var(--border); }
.rec:last-child { border-bottom: none; }
ul { margin: 8px 0 0; padding-left: 18px; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.8rem; }
details summary { cursor: pointer; font-weight: bold; }
svg { margin: 0.5rem 0; }
@media (max-width: 800px) { .grid-3 { grid-template-columns: 1fr; } }
"#;
