use ahash::AHashMap;
use bunki::data::AnswerSheet;
use bunki::survey::{
    AnswerMap, AnswerValue, Branching, ConditionValue, QuestionType, Survey, ValidationMode,
};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;

/// A CLI tool to generate random answer sheets for a survey
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the survey JSON file whose questions should be answered
    survey_path: String,

    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_answers.json")]
    output: String,

    /// Probability (0.0 - 1.0) of leaving a question unanswered
    #[arg(long, default_value_t = 0.1)]
    skip_rate: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.skip_rate) {
        eprintln!(
            "Error: --skip-rate ({}) must be between 0.0 and 1.0",
            cli.skip_rate
        );
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let content = fs::read_to_string(&cli.survey_path)?;
    let sections = bunki::survey::parse_sections(&content)?;
    let survey = Survey::builder(sections)
        .validation(ValidationMode::Skip)
        .build()?;

    println!(
        "Generating answers for {} section(s) (skip rate {})...",
        survey.sections().len(),
        cli.skip_rate
    );

    let targets = collect_condition_values(&survey);
    let mut answers = AnswerMap::new();
    for section in survey.sections() {
        for question in &section.questions {
            if question.kind == QuestionType::Informational || rng.random_bool(cli.skip_rate) {
                continue;
            }
            let value = match targets.get(question.id.as_str()) {
                // Half the time reuse a value some condition compares against, so branches fire.
                Some(values) if rng.random_bool(0.5) => {
                    AnswerValue::Single(values[rng.random_range(0..values.len())].clone())
                }
                _ => generate_answer(&mut rng, question.kind),
            };
            answers.insert(question.id.clone(), value);
        }
    }
    println!("-> Generated {} answer(s).", answers.len());

    let sheet = AnswerSheet {
        current_section_id: survey.first_section().map(|s| s.id.clone()),
        answers,
    };
    let json_output = serde_json::to_string_pretty(&sheet)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved answers to '{}'",
        cli.output
    );

    Ok(())
}

/// Every literal a branching condition compares each question against.
fn collect_condition_values(survey: &Survey) -> AHashMap<&str, Vec<String>> {
    let mut targets: AHashMap<&str, Vec<String>> = AHashMap::new();
    let mut push = |question_id, value: &ConditionValue| {
        let entry = targets.entry(question_id).or_default();
        match value {
            ConditionValue::Empty => {}
            ConditionValue::Range(low, high) => entry.extend([low.clone(), high.clone()]),
            other => entry.push(other.as_text()),
        }
    };

    for section in survey.sections() {
        match &section.branching {
            Some(Branching::Enhanced(config)) => {
                for rule in &config.rules {
                    for group in &rule.condition_groups {
                        for condition in &group.conditions {
                            push(condition.question_id.as_str(), &condition.value);
                        }
                    }
                }
            }
            Some(Branching::Legacy(config)) => {
                for condition in &config.conditions {
                    push(config.question_id.as_str(), &condition.value);
                }
            }
            None => {}
        }
    }
    targets.retain(|_, values| !values.is_empty());
    targets
}

// --- Value Generator Functions for Each Question Type ---

fn generate_answer(rng: &mut StdRng, kind: QuestionType) -> AnswerValue {
    const WORDS: [&str; 6] = ["yes", "no", "maybe", "Often", "never", "Sometimes"];
    const OPTIONS: [&str; 4] = ["a", "b", "c", "d"];

    match kind {
        QuestionType::Checkbox => {
            let picks: Vec<String> = OPTIONS
                .iter()
                .filter(|_| rng.random_bool(0.5))
                .map(|o| o.to_string())
                .collect();
            AnswerValue::Multiple(picks)
        }
        QuestionType::Radio | QuestionType::Select => {
            AnswerValue::Single(OPTIONS[rng.random_range(0..OPTIONS.len())].to_string())
        }
        QuestionType::Scale => AnswerValue::Single(rng.random_range(1..=10).to_string()),
        QuestionType::Date => AnswerValue::Single(format!(
            "2024-{:02}-{:02}",
            rng.random_range(1..=12),
            rng.random_range(1..=28)
        )),
        QuestionType::Time => AnswerValue::Single(format!(
            "{:02}:{:02}",
            rng.random_range(0..24),
            rng.random_range(0..60)
        )),
        QuestionType::Text
        | QuestionType::Paragraph
        | QuestionType::Informational
        | QuestionType::Unknown => {
            AnswerValue::Single(WORDS[rng.random_range(0..WORDS.len())].to_string())
        }
    }
}
