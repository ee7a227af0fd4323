//! Profiling configuration: labeling thresholds and level bands.
//!
//! Loaded from a `studypulse.toml` file or built from defaults. Bands are an
//! explicit ordered list of half-open `[low, high)` intervals checked in
//! order, so the first-match rule is deterministic even if someone edits the
//! file into an odd state. `validate` rejects such states up front.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::profile::Level;

/// One accuracy band mapping `[low, high)` to a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelBand {
    pub level: Level,
    pub low: f64,
    pub high: f64,
}

impl LevelBand {
    /// Half-open membership test.
    pub fn contains(&self, accuracy: f64) -> bool {
        self.low <= accuracy && accuracy < self.high
    }
}

/// Thresholds and bands driving the profile classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Topics with accuracy >= this are strengths.
    pub strength_threshold: f64,
    /// Topics with accuracy <= this are weaknesses.
    pub weakness_threshold: f64,
    /// Ordered, disjoint level bands covering [0, 1].
    #[serde(rename = "levels")]
    pub bands: Vec<LevelBand>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            strength_threshold: 0.80,
            weakness_threshold: 0.55,
            bands: vec![
                LevelBand {
                    level: Level::Beginner,
                    low: 0.0,
                    high: 0.50,
                },
                LevelBand {
                    level: Level::Intermediate,
                    low: 0.50,
                    high: 0.75,
                },
                // Upper bound above 1.0 on purpose, so accuracy = 1.0 lands
                // in the advanced band despite the half-open intervals.
                LevelBand {
                    level: Level::Advanced,
                    low: 0.75,
                    high: 1.01,
                },
            ],
        }
    }
}

impl ProfileConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: ProfileConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Check the structural invariants: thresholds ordered, bands sorted,
    /// non-overlapping, and covering [0, 1] with no gaps.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.strength_threshold <= self.weakness_threshold {
            return Err(CoreError::InvalidConfig(format!(
                "strength_threshold ({}) must exceed weakness_threshold ({})",
                self.strength_threshold, self.weakness_threshold
            )));
        }

        if self.bands.is_empty() {
            return Err(CoreError::InvalidConfig("no level bands defined".into()));
        }

        for band in &self.bands {
            if band.low >= band.high {
                return Err(CoreError::InvalidConfig(format!(
                    "band {} has low ({}) >= high ({})",
                    band.level, band.low, band.high
                )));
            }
        }

        let first = &self.bands[0];
        if first.low > 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "bands do not cover 0.0 (first band starts at {})",
                first.low
            )));
        }

        for pair in self.bands.windows(2) {
            if pair[1].low < pair[0].high {
                return Err(CoreError::InvalidConfig(format!(
                    "bands {} and {} overlap",
                    pair[0].level, pair[1].level
                )));
            }
            if pair[1].low > pair[0].high {
                return Err(CoreError::InvalidConfig(format!(
                    "gap between bands {} and {} ({} to {})",
                    pair[0].level, pair[1].level, pair[0].high, pair[1].low
                )));
            }
        }

        let last = self.bands.last().expect("bands checked non-empty");
        if last.high <= 1.0 {
            return Err(CoreError::InvalidConfig(format!(
                "bands do not cover accuracy = 1.0 (last band ends at {})",
                last.high
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ProfileConfig::default().validate().unwrap();
    }

    #[test]
    fn default_bands_partition_unit_interval() {
        let config = ProfileConfig::default();
        // Dense sweep: every accuracy in [0, 1] matches exactly one band.
        for i in 0..=1000 {
            let acc = i as f64 / 1000.0;
            let matches = config.bands.iter().filter(|b| b.contains(acc)).count();
            assert_eq!(matches, 1, "accuracy {acc} matched {matches} bands");
        }
    }

    #[test]
    fn parse_from_toml() {
        let toml_str = r#"
strength_threshold = 0.85
weakness_threshold = 0.50

[[levels]]
level = "beginner"
low = 0.0
high = 0.6

[[levels]]
level = "advanced"
low = 0.6
high = 1.01
"#;
        let config: ProfileConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();
        assert_eq!(config.bands.len(), 2);
        assert!((config.strength_threshold - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_inverted_thresholds() {
        let config = ProfileConfig {
            strength_threshold: 0.5,
            weakness_threshold: 0.6,
            ..ProfileConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strength_threshold"));
    }

    #[test]
    fn validate_rejects_gap() {
        let mut config = ProfileConfig::default();
        config.bands[1].low = 0.55; // gap between 0.50 and 0.55
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn validate_rejects_overlap() {
        let mut config = ProfileConfig::default();
        config.bands[1].low = 0.45; // overlaps beginner's [0, 0.5)
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn validate_rejects_short_coverage() {
        let mut config = ProfileConfig::default();
        config.bands[2].high = 1.0; // accuracy = 1.0 would fall through
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("1.0"));
    }

    #[test]
    fn load_missing_file_fails_with_path() {
        let err = ProfileConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("exist.toml"));
    }

    #[test]
    fn load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studypulse.toml");
        let body = toml::to_string(&ProfileConfig::default()).unwrap();
        std::fs::write(&path, body).unwrap();
        let config = ProfileConfig::load(&path).unwrap();
        assert_eq!(config.bands.len(), 3);
    }
}
