//! studypulse CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use studypulse_core::recommend::DEFAULT_MAX_RECOMMENDATIONS;

mod commands;

#[derive(Parser)]
#[command(
    name = "studypulse",
    version,
    about = "Student test-performance scoring, profiling, and reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic dataset (question bank + student answers)
    Generate {
        /// Dataset directory (raw CSVs land in <dir>/raw)
        #[arg(long, default_value = "./data")]
        out_dir: PathBuf,

        /// Number of simulated students
        #[arg(long, default_value = "200")]
        students: usize,

        /// Number of tests
        #[arg(long, default_value = "3")]
        tests: usize,

        /// Questions per test
        #[arg(long, default_value = "25")]
        questions_per_test: usize,

        /// RNG seed (same seed reproduces the dataset)
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Aggregate raw answers into the three processed metric tables
    Score {
        /// Raw attempts CSV
        #[arg(long)]
        answers: PathBuf,

        /// Directory for the processed tables
        #[arg(long, default_value = "./data/processed")]
        out_dir: PathBuf,
    },

    /// Build a per-student report (profile + recommendations)
    Report {
        /// Dataset directory holding raw/ and processed/
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Student to report on (default: first in the overall summary)
        #[arg(long)]
        student_id: Option<String>,

        /// Output directory for report files
        #[arg(long, default_value = "./reports")]
        out_dir: PathBuf,

        /// Output file name without extension (default: report_<student_id>)
        #[arg(long)]
        out_name: Option<String>,

        /// Output format: html, json, all
        #[arg(long, default_value = "html")]
        format: String,

        /// Profiling config TOML (defaults used when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum number of recommendations
        #[arg(long, default_value_t = DEFAULT_MAX_RECOMMENDATIONS)]
        max_recommendations: usize,
    },

    /// Convert a manually corrected responses CSV into pipeline attempts
    Ingest {
        /// Manual responses CSV (question_id, answer_given, is_correct, error_type)
        #[arg(long)]
        responses: PathBuf,

        /// Student to attribute the attempts to
        #[arg(long)]
        student_id: String,

        /// Test to attribute the attempts to
        #[arg(long)]
        test_id: String,

        /// Question bank CSV
        #[arg(long, default_value = "./data/raw/questions_bank.csv")]
        bank: PathBuf,

        /// Output attempts CSV (appends if the file exists)
        #[arg(long, default_value = "./data/raw/student_answers.csv")]
        out: PathBuf,
    },

    /// Print a class-level overview table (accuracy and level per student)
    Summary {
        /// Dataset directory holding processed/
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Profiling config TOML (defaults used when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter studypulse.toml with the default thresholds
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studypulse=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            out_dir,
            students,
            tests,
            questions_per_test,
            seed,
        } => commands::generate::execute(out_dir, students, tests, questions_per_test, seed),
        Commands::Score { answers, out_dir } => commands::score::execute(answers, out_dir),
        Commands::Report {
            data_dir,
            student_id,
            out_dir,
            out_name,
            format,
            config,
            max_recommendations,
        } => commands::report::execute(
            data_dir,
            student_id,
            out_dir,
            out_name,
            format,
            config,
            max_recommendations,
        ),
        Commands::Ingest {
            responses,
            student_id,
            test_id,
            bank,
            out,
        } => commands::ingest::execute(responses, student_id, test_id, bank, out),
        Commands::Summary { data_dir, config } => commands::summary::execute(data_dir, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
