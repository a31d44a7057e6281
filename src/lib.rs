//! # PhishGuard
//!
//! A small phishing text classifier: TF-IDF bag-of-words features fed into
//! a binary logistic-regression model, trained from a ten-sentence bootstrap
//! corpus and persisted to disk as JSON artifacts.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Configurable text analysis pipeline (tokenizer + filters)
//! - Deterministic gradient-descent training
//! - Load-or-train model persistence with atomic writes
//! - Quiz-style session state with scores and badges
//!
//! ## Quick start
//!
//! ```
//! use phishguard::corpus::bootstrap_corpus;
//! use phishguard::detector::PhishingDetector;
//!
//! let detector = PhishingDetector::train(&bootstrap_corpus()).unwrap();
//! let prediction = detector
//!     .analyze("Congratulations! You've won a gift card. Claim now!")
//!     .unwrap();
//!
//! println!("{} ({:.0}%)", prediction.label, prediction.confidence * 100.0);
//! ```

pub mod analysis;
pub mod cli;
pub mod corpus;
pub mod detector;
pub mod error;
pub mod ml;
pub mod session;
pub mod store;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
