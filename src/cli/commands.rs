//! Command implementations for the PhishGuard CLI.

use std::io::{self, BufRead, Write};

use crate::cli::args::*;
use crate::corpus::bootstrap_corpus;
use crate::detector::PhishingDetector;
use crate::error::{PhishGuardError, Result};
use crate::ml::classifier::Label;
use crate::session::{Challenge, SessionState};
use crate::store::{self, ModelPaths};

/// Execute a CLI command.
pub fn execute_command(args: PhishGuardArgs) -> Result<()> {
    match &args.command {
        Command::Analyze(analyze_args) => analyze_text(analyze_args.clone(), &args),
        Command::Train(train_args) => train_model(train_args.clone(), &args),
        Command::Challenge(challenge_args) => run_challenge(challenge_args.clone(), &args),
    }
}

/// Resolve the artifact paths from the CLI arguments.
fn model_paths(cli_args: &PhishGuardArgs) -> ModelPaths {
    match &cli_args.model_dir {
        Some(dir) => ModelPaths::in_dir(dir),
        None => ModelPaths::default(),
    }
}

/// Classify a single piece of text.
fn analyze_text(args: AnalyzeArgs, cli_args: &PhishGuardArgs) -> Result<()> {
    let detector = PhishingDetector::load_or_train(&bootstrap_corpus(), &model_paths(cli_args))?;
    let prediction = detector.analyze(&args.text)?;

    match cli_args.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        OutputFormat::Human => {
            match prediction.label {
                Label::Phishing => println!("This appears to be a phishing attempt!"),
                Label::Legitimate => println!("This looks legitimate."),
            }
            println!("Confidence: {:.0}%", prediction.confidence * 100.0);
        }
    }

    Ok(())
}

/// Train a fresh model from the bootstrap corpus and persist it.
fn train_model(args: TrainArgs, cli_args: &PhishGuardArgs) -> Result<()> {
    let paths = model_paths(cli_args);

    if (paths.vectorizer.exists() || paths.classifier.exists()) && !args.force {
        return Err(PhishGuardError::invalid_operation(
            "Model artifacts already exist. Use --force to retrain.",
        ));
    }

    let corpus = bootstrap_corpus();
    let (vectorizer, classifier) = store::train(
        &corpus,
        crate::analysis::analyzer::standard_analyzer(),
        Default::default(),
    )?;
    store::save(&vectorizer, &classifier, &paths)?;

    if cli_args.verbosity() > 0 {
        println!(
            "Trained on {} examples ({} vocabulary terms)",
            corpus.len(),
            vectorizer.vocabulary_size()
        );
        if let Some(stats) = classifier.stats() {
            println!(
                "Finished after {} iterations (final loss {:.4})",
                stats.iterations, stats.final_loss
            );
        }
        println!("Artifacts written to {}", paths.classifier.display());
    }

    Ok(())
}

/// Play an interactive spot-the-phish quiz on stdin/stdout.
fn run_challenge(args: ChallengeArgs, cli_args: &PhishGuardArgs) -> Result<()> {
    let corpus = bootstrap_corpus();
    let mut rng = rand::rng();
    let mut state = SessionState::new();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Is each message legitimate or a phishing attempt?");

    for round in 1..=args.rounds {
        let Some(challenge) = Challenge::draw(&corpus, &mut rng) else {
            break;
        };

        println!("\n[{round}/{}] {}", args.rounds, challenge.text);
        print!("Your answer [p=phishing, l=legitimate]: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // Stdin closed; score what we have.
            break;
        };
        let answer = match line?.trim().to_lowercase().as_str() {
            "p" | "phishing" => Label::Phishing,
            "l" | "legit" | "legitimate" => Label::Legitimate,
            other => {
                println!("Unrecognized answer '{other}', skipping this round.");
                continue;
            }
        };

        let (next, outcome) = state.apply_answer(&challenge, answer);
        state = next;

        if outcome.correct {
            println!("Correct! You earned {} points.", outcome.points_awarded);
        } else {
            println!("Oops! That was actually {}.", challenge.answer);
        }
        for badge in &outcome.new_badges {
            println!("Badge earned: {badge}");
        }
    }

    match cli_args.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        OutputFormat::Human => {
            println!("\nFinal score: {}", state.score);
            if !state.badges.is_empty() {
                let names: Vec<String> =
                    state.badges.iter().map(|b| b.to_string()).collect();
                println!("Badges: {}", names.join(", "));
            }
            if let Some((badge, remaining)) = state.next_badge() {
                println!("{remaining} points to next badge ({badge})");
            }
        }
    }

    Ok(())
}
