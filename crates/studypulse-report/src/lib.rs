//! studypulse-report: per-student report assembly and rendering.

pub mod html;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studypulse_core::aggregate::ErrorShare;
use studypulse_core::profile::{StudentProfile, TopicProfile};
use studypulse_core::recommend::Recommendation;

/// Everything a rendered report needs, bundled with a timestamp so saved
/// reports are self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentReport {
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The classified profile (overall KPIs + sorted topic lists).
    pub profile: StudentProfile,
    /// Prioritized study recommendations.
    pub recommendations: Vec<Recommendation>,
    /// Error distribution rows for this student only, for the error chart.
    pub error_shares: Vec<ErrorShare>,
}

impl StudentReport {
    /// Assemble a report, filtering `error_shares` down to the student.
    pub fn new(
        profile: StudentProfile,
        recommendations: Vec<Recommendation>,
        error_shares: &[ErrorShare],
    ) -> Self {
        let student_shares = error_shares
            .iter()
            .filter(|s| s.student_id == profile.student_id)
            .cloned()
            .collect();
        Self {
            created_at: Utc::now(),
            profile,
            recommendations,
            error_shares: student_shares,
        }
    }

    /// Topics in display order: strengths, then neutrals, then weaknesses.
    pub fn topics_for_display(&self) -> Vec<&TopicProfile> {
        self.profile
            .strengths
            .iter()
            .chain(self.profile.neutrals.iter())
            .chain(self.profile.weaknesses.iter())
            .collect()
    }

    /// Save the report as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: StudentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
