//! The `studypulse init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("studypulse.toml").exists() {
        println!("studypulse.toml already exists, skipping.");
    } else {
        std::fs::write("studypulse.toml", SAMPLE_CONFIG)?;
        println!("Created studypulse.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: studypulse generate");
    println!("  2. Run: studypulse score --answers data/raw/student_answers.csv");
    println!("  3. Run: studypulse report --config studypulse.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studypulse profiling configuration

# A topic is a strength when its accuracy reaches strength_threshold,
# a weakness when it falls at or below weakness_threshold.
strength_threshold = 0.80
weakness_threshold = 0.55

# Level bands are half-open [low, high) and must tile [0.0, 1.0]
# without gaps or overlaps. The last band's high must exceed 1.0
# so that a perfect score still lands in it.

[[levels]]
level = "beginner"
low = 0.0
high = 0.5

[[levels]]
level = "intermediate"
low = 0.5
high = 0.75

[[levels]]
level = "advanced"
low = 0.75
high = 1.01
"#;
