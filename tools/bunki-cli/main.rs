use bunki::prelude::*;
use bunki::survey::branching::decode_lenient;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- JSON Deserialization Structs (Export Format Specific) ---
// These structs match the host's section export, where the branching config is a
// JSON column that may have been exported as text. They are only used here for conversion.

#[derive(Deserialize)]
struct RawSurvey {
    sections: Vec<RawSection>,
}

#[derive(Deserialize)]
struct RawSection {
    id: String,
    #[serde(alias = "orderIndex", alias = "order_index")]
    order: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    questions: Vec<RawQuestion>,
    #[serde(default, alias = "branchingLogic", alias = "branching_logic")]
    branching: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawQuestion {
    id: String,
    #[serde(rename = "type", alias = "questionType", alias = "question_type", default)]
    kind: QuestionType,
    #[serde(default, alias = "questionText", alias = "question_text")]
    title: Option<String>,
}

// --- Converter Implementation ---

impl IntoSurvey for RawSurvey {
    fn into_sections(self) -> std::result::Result<Vec<Section>, SurveyConversionError> {
        self.sections
            .into_iter()
            .map(|raw| {
                if raw.id.trim().is_empty() {
                    return Err(SurveyConversionError::ValidationError(
                        "section with an empty id".to_string(),
                    ));
                }
                Ok(Section {
                    id: raw.id,
                    order: raw.order,
                    title: raw.title,
                    questions: raw
                        .questions
                        .into_iter()
                        .map(|q| Question {
                            id: q.id,
                            kind: q.kind,
                            title: q.title,
                        })
                        .collect(),
                    branching: raw.branching.and_then(decode_lenient),
                })
            })
            .collect()
    }
}

/// Resolve, validate and simulate survey branching from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log every resolution step (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check references and operator/type compatibility of a survey
    Validate {
        /// Path to the survey JSON file
        survey_path: String,
    },
    /// Decide the next section for one set of answers
    Resolve {
        /// Path to the survey JSON file
        survey_path: String,
        /// Path to the answers JSON file
        answers_path: Option<String>,
        /// The section the respondent just submitted (defaults to the sheet's currentSectionId)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Replay the full path a respondent would take
    Simulate {
        /// Path to the survey JSON file
        survey_path: String,
        /// Path to the answers JSON file
        answers_path: Option<String>,
        /// The section to start from (defaults to the lowest order)
        #[arg(long)]
        start: Option<String>,
    },
    /// Take the survey interactively, answering each question at a prompt
    Walk {
        /// Path to the survey JSON file
        survey_path: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Validate { survey_path } => run_validate(&survey_path),
        Command::Resolve {
            survey_path,
            answers_path,
            section,
        } => run_resolve(&survey_path, answers_path.as_deref(), section),
        Command::Simulate {
            survey_path,
            answers_path,
            start,
        } => run_simulate(&survey_path, answers_path.as_deref(), start),
        Command::Walk { survey_path } => run_walk(&survey_path),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_survey(survey_path: &str) -> Survey {
    let json = fs::read_to_string(survey_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read survey file '{}': {}",
            survey_path, e
        ))
    });
    let raw = parse_raw_survey(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse survey JSON: {}", e)));
    Survey::builder(raw)
        .validation(ValidationMode::Skip)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert survey: {}", e)))
}

/// Accepts either `{"sections": [...]}` or a bare array of sections.
fn parse_raw_survey(json: &str) -> serde_json::Result<RawSurvey> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.is_array() {
        Ok(RawSurvey {
            sections: serde_json::from_value(value)?,
        })
    } else {
        serde_json::from_value(value)
    }
}

fn load_answers(answers_path: Option<&str>) -> AnswerSheet {
    match answers_path {
        Some(path) => AnswerSheet::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load answers from '{}': {}", path, e))
        }),
        None => {
            println!("No answers file provided. Resolving with no answers.");
            AnswerSheet::default()
        }
    }
}

fn run_validate(survey_path: &str) {
    let start = Instant::now();
    let survey = load_survey(survey_path);
    let result = survey.validate();
    let duration = start.elapsed();

    println!("\n--- Flow Validation ---");
    println!("Sections:   {}", survey.sections().len());
    if result.is_valid {
        println!("Result:     valid");
    } else {
        println!("Result:     {} error(s)", result.errors.len());
        for error in &result.errors {
            println!("  - {}", error);
        }
    }
    println!("Duration:   {:?}", duration);

    if !result.is_valid {
        std::process::exit(1);
    }
}

fn run_resolve(survey_path: &str, answers_path: Option<&str>, section: Option<String>) {
    let survey = load_survey(survey_path);
    let sheet = load_answers(answers_path);
    let current = section
        .or_else(|| sheet.current_section_id.clone())
        .unwrap_or_else(|| {
            exit_with_error("A current section is required (--section or currentSectionId).")
        });

    let start = Instant::now();
    let decision = survey.resolve(&current, sheet.answers());
    let duration = start.elapsed();

    let json = serde_json::to_string_pretty(&decision)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize decision: {}", e)));
    println!("{}", json);
    println!("\n  -> Reason: {}", decision.via);
    println!("  -> Resolved in {:?}", duration);
}

fn run_simulate(survey_path: &str, answers_path: Option<&str>, start: Option<String>) {
    let survey = load_survey(survey_path);
    let sheet = load_answers(answers_path);
    let start_id = start
        .or_else(|| survey.first_section().map(|s| s.id.clone()))
        .unwrap_or_else(|| exit_with_error("Survey has no sections."));

    let path = survey.simulate(&start_id, sheet.answers()).into_path();

    println!("\n--- Simulated Path ---");
    for (step, section_id) in path.visited.iter().enumerate() {
        println!("  {:>3}. {}", step + 1, section_id);
    }
    match &path.outcome {
        WalkOutcome::Completed => println!("  -> Survey completed"),
        WalkOutcome::DanglingSection { section_id } => {
            println!("  -> Stopped: next section '{}' does not exist", section_id)
        }
        WalkOutcome::UnknownStart { section_id } => {
            println!("  -> Stopped: start section '{}' does not exist", section_id)
        }
        WalkOutcome::Truncated => println!("  -> Stopped: branching rules form a cycle"),
    }
}

/// Walks the survey the way a survey-taking UI would: answer a section, merge
/// the answers, resolve, navigate.
fn run_walk(survey_path: &str) {
    let survey = load_survey(survey_path);
    println!("--- Bunki Interactive Walk ---");

    let mut answers = AnswerMap::new();
    let mut current = survey
        .first_section()
        .cloned()
        .unwrap_or_else(|| exit_with_error("Survey has no sections."));

    // A respondent can revisit sections, but not forever.
    for _ in 0..=survey.sections().len() {
        println!(
            "\n== Section '{}'{} ==",
            current.id,
            current
                .title
                .as_ref()
                .map_or(String::new(), |t| format!(": {}", t))
        );

        let mut submitted = AnswerMap::new();
        for question in &current.questions {
            if question.kind == QuestionType::Informational {
                continue;
            }
            let label = question.title.as_deref().unwrap_or(&question.id);
            let line = prompt_for_input(&format!("{} ({})", label, question.kind), None);
            if line.is_empty() {
                continue;
            }
            if question.kind == QuestionType::Checkbox {
                let picks: Vec<String> = line.split(',').map(|p| p.trim().to_string()).collect();
                submitted.insert(question.id.clone(), picks);
            } else {
                submitted.insert(question.id.clone(), line);
            }
        }
        answers.merge(submitted);

        let decision = survey.resolve(&current.id, &answers);
        println!("  -> {}", decision.via);
        let Some(next_id) = decision.next_section_id else {
            println!("\nEnd of survey. Thank you!");
            return;
        };
        current = survey.section(&next_id).cloned().unwrap_or_else(|| {
            exit_with_error(&format!("Next section '{}' does not exist", next_id))
        });
    }
    exit_with_error("Stopped: branching rules form a cycle");
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    io::stdout().flush().unwrap();

    io::stdin()
        .read_line(&mut line)
        .expect("Failed to read line");
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
