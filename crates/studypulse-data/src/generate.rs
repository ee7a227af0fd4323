//! Synthetic dataset generator.
//!
//! Produces an invented but realistic dataset: each student has a latent
//! per-topic skill in (0, 1), each question a difficulty in 1..=5, and the
//! probability of a correct answer follows a sigmoid of (skill - scaled
//! difficulty). Wrong answers get a plausible error type and a perturbed
//! numeric answer consistent with it. Everything flows from one seeded RNG,
//! so a seed fully determines the dataset.

use std::collections::HashMap;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Beta, Normal};

use studypulse_core::model::{Attempt, ErrorType};

use crate::bank::Question;

/// Topics and their subskills.
pub const TOPICS: [(&str, &[&str]); 5] = [
    (
        "Algebra",
        &["frazioni", "segni", "scomposizione", "equazioni_lineari"],
    ),
    ("Funzioni", &["dominio", "grafico", "composizione"]),
    ("Derivate", &["regole_base", "prodotto", "catena"]),
    ("Fisica_Dinamica", &["newton", "attrito", "forze"]),
    ("Fisica_Energia", &["lavoro", "energia_cinetica", "conservazione"]),
];

/// Parameters of the generative model.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub n_students: usize,
    pub n_tests: usize,
    pub questions_per_test: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_students: 200,
            n_tests: 3,
            questions_per_test: 25,
            seed: 42,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Normalize difficulty 1..=5 into 0..=1 (higher = harder).
fn difficulty_to_scale(difficulty: u8) -> f64 {
    f64::from(difficulty - 1) / 4.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Generate the question bank: every test draws questions from all topics.
pub fn generate_questions(config: &GeneratorConfig, rng: &mut ChaCha8Rng) -> Vec<Question> {
    let answer_dist = Normal::new(10.0, 5.0).expect("valid normal parameters");
    let mut questions = Vec::with_capacity(config.n_tests * config.questions_per_test);

    for t in 1..=config.n_tests {
        let test_id = format!("test_{t:02}");
        for q in 1..=config.questions_per_test {
            let (topic, subskills) = TOPICS[rng.gen_range(0..TOPICS.len())];
            let subskill = subskills[rng.gen_range(0..subskills.len())];
            let difficulty = rng.gen_range(1..=5u8);
            let correct_answer = round2(answer_dist.sample(rng));

            questions.push(Question {
                question_id: format!("{test_id}_q_{q:02}"),
                test_id: test_id.clone(),
                topic: topic.to_string(),
                subskill: subskill.to_string(),
                difficulty,
                correct_answer,
            });
        }
    }

    questions
}

/// Per-topic latent skill in (0, 1). Beta(4, 4) gives a realistic bell:
/// many average students, few extremes.
fn sample_student_skills(rng: &mut ChaCha8Rng) -> HashMap<&'static str, f64> {
    let skill_dist = Beta::new(4.0, 4.0).expect("valid beta parameters");
    TOPICS
        .iter()
        .map(|(topic, _)| (*topic, skill_dist.sample(rng)))
        .collect()
}

/// Pick a plausible error type for a wrong answer on this topic. Algebra
/// skews toward segno/algebra, Derivate toward formula/concetto, physics
/// toward concetto.
fn choose_error_type(rng: &mut ChaCha8Rng, topic: &str) -> ErrorType {
    // Probabilities over [none, distrazione, segno, algebra, formula, concetto].
    let probs: [f64; 6] = if topic == "Algebra" {
        [0.0, 0.15, 0.35, 0.35, 0.10, 0.05]
    } else if topic == "Derivate" {
        [0.0, 0.10, 0.10, 0.15, 0.40, 0.25]
    } else if topic.starts_with("Fisica") {
        [0.0, 0.10, 0.05, 0.10, 0.25, 0.50]
    } else {
        [0.0, 0.20, 0.15, 0.20, 0.20, 0.25]
    };

    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (error_type, p) in ErrorType::ALL.iter().zip(probs) {
        cumulative += p;
        if roll < cumulative {
            return *error_type;
        }
    }
    ErrorType::Concetto
}

/// Produce a wrong answer consistent with the error type.
fn perturb_answer(rng: &mut ChaCha8Rng, correct: f64, error_type: ErrorType) -> f64 {
    let normal = |rng: &mut ChaCha8Rng, std: f64| {
        Normal::new(0.0, std).expect("valid normal parameters").sample(rng)
    };
    let perturbed = match error_type {
        ErrorType::Segno => -correct,
        ErrorType::Distrazione => correct + normal(rng, 3.0),
        ErrorType::Algebra => {
            let offsets = [-2.0, -1.0, 1.0, 2.0];
            correct + normal(rng, 2.0) + offsets[rng.gen_range(0..offsets.len())]
        }
        ErrorType::Formula => correct * rng.gen_range(0.6..1.4),
        ErrorType::Concetto => correct + normal(rng, 6.0),
        ErrorType::None => correct + normal(rng, 4.0),
    };
    round2(perturbed)
}

/// Simulate every student answering every question in the bank.
pub fn simulate_answers(
    questions: &[Question],
    config: &GeneratorConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<Attempt> {
    let speed_dist: Normal<f64> = Normal::new(1.0, 0.15).expect("valid normal parameters");
    let time_noise = Normal::new(0.0, 8.0).expect("valid normal parameters");
    let mut attempts = Vec::with_capacity(config.n_students * questions.len());

    for s in 1..=config.n_students {
        let student_id = format!("student_{s:04}");
        let skills = sample_student_skills(rng);
        let speed_factor = speed_dist.sample(rng).clamp(0.7, 1.3);

        for question in questions {
            let skill = skills.get(question.topic.as_str()).copied().unwrap_or(0.5);
            let diff = difficulty_to_scale(question.difficulty);

            // Centered so skill == difficulty gives a coin flip.
            let p_correct = sigmoid((skill - diff) * 4.0);
            let is_correct = rng.gen::<f64>() < p_correct;

            let (error_type, answer_given) = if is_correct {
                (ErrorType::None, question.correct_answer)
            } else {
                let error_type = choose_error_type(rng, &question.topic);
                (
                    error_type,
                    perturb_answer(rng, question.correct_answer, error_type),
                )
            };

            let base_time = 40.0 + 25.0 * diff;
            let time_seconds = (base_time * (1.2 - 0.6 * skill) * speed_factor
                + time_noise.sample(rng))
            .clamp(10.0, 240.0);

            let mut confidence = 1.0 + 4.0 * skill;
            if !is_correct {
                confidence -= 0.8;
            }
            let confidence = (confidence.round() as i64).clamp(1, 5) as u8;

            attempts.push(Attempt {
                student_id: student_id.clone(),
                test_id: question.test_id.clone(),
                question_id: question.question_id.clone(),
                topic: question.topic.clone(),
                subskill: question.subskill.clone(),
                difficulty: question.difficulty,
                correct_answer: question.correct_answer,
                answer_given,
                is_correct,
                error_type,
                time_seconds: round2(time_seconds),
                confidence,
            });
        }
    }

    attempts
}

/// Generate a complete synthetic dataset: question bank + answers.
pub fn generate_dataset(config: &GeneratorConfig) -> (Vec<Question>, Vec<Attempt>) {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let questions = generate_questions(config, &mut rng);
    let attempts = simulate_answers(&questions, config, &mut rng);
    tracing::info!(
        questions = questions.len(),
        attempts = attempts.len(),
        seed = config.seed,
        "generated synthetic dataset"
    );
    (questions, attempts)
}
