//! Command line argument parsing for the PhishGuard CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// PhishGuard - a phishing text classifier with a quiz mode
#[derive(Parser, Debug, Clone)]
#[command(name = "phishguard")]
#[command(about = "Classify text as phishing or legitimate, or test your own eye")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PhishGuardArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory holding the persisted model artifacts
    #[arg(long = "model-dir")]
    pub model_dir: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PhishGuardArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify a piece of text
    Analyze(AnalyzeArgs),

    /// Train a fresh model and persist it
    Train(TrainArgs),

    /// Play a few rounds of spot-the-phish
    Challenge(ChallengeArgs),
}

/// Arguments for the analyze command
#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// The email or message text to classify
    pub text: String,
}

/// Arguments for the train command
#[derive(clap::Args, Debug, Clone)]
pub struct TrainArgs {
    /// Overwrite existing model artifacts
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the challenge command
#[derive(clap::Args, Debug, Clone)]
pub struct ChallengeArgs {
    /// Number of rounds to play
    #[arg(long, default_value_t = 5)]
    pub rounds: usize,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
