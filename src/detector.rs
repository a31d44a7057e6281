//! The inference entry point used by UI layers.
//!
//! [`PhishingDetector`] pairs a fitted vectorizer with a trained classifier.
//! It is immutable after construction and `Send + Sync`, so a single
//! instance can be shared read-only across concurrent callers without
//! locking.
//!
//! # Examples
//!
//! ```
//! use phishguard::corpus::bootstrap_corpus;
//! use phishguard::detector::PhishingDetector;
//!
//! let detector = PhishingDetector::train(&bootstrap_corpus()).unwrap();
//! let prediction = detector
//!     .analyze("Click here to verify your account details now!")
//!     .unwrap();
//! assert!(prediction.confidence >= 0.5);
//! ```

use crate::analysis::analyzer::standard_analyzer;
use crate::corpus::TrainingExample;
use crate::error::Result;
use crate::ml::classifier::{LogisticRegression, Prediction, TrainConfig};
use crate::ml::vectorizer::TfIdfVectorizer;
use crate::store::{self, ModelPaths, ModelSource};

/// A trained phishing detector: TF-IDF vectorizer plus logistic regression.
#[derive(Debug)]
pub struct PhishingDetector {
    vectorizer: TfIdfVectorizer,
    classifier: LogisticRegression,
    source: ModelSource,
}

impl PhishingDetector {
    /// Load the persisted model from `paths`, or train from `corpus` and
    /// persist the result. Uses the standard analyzer.
    pub fn load_or_train(corpus: &[TrainingExample], paths: &ModelPaths) -> Result<Self> {
        let stored = store::load_or_train(corpus, paths, standard_analyzer())?;
        Ok(Self {
            vectorizer: stored.vectorizer,
            classifier: stored.classifier,
            source: stored.source,
        })
    }

    /// Train a detector in memory without touching the filesystem.
    pub fn train(corpus: &[TrainingExample]) -> Result<Self> {
        let (vectorizer, classifier) =
            store::train(corpus, standard_analyzer(), TrainConfig::default())?;
        Ok(Self {
            vectorizer,
            classifier,
            source: ModelSource::Trained,
        })
    }

    /// Build a detector from already-constructed parts.
    pub fn from_parts(
        vectorizer: TfIdfVectorizer,
        classifier: LogisticRegression,
        source: ModelSource,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            source,
        }
    }

    /// Classify a piece of text.
    ///
    /// Total over all string inputs: an empty string (or one with no known
    /// tokens) produces an all-zero feature vector and the classifier
    /// decides on its bias alone.
    pub fn analyze(&self, text: &str) -> Result<Prediction> {
        let features = self.vectorizer.transform(text)?;
        self.classifier.predict(&features)
    }

    /// Whether this detector was loaded from disk or freshly trained.
    pub fn source(&self) -> ModelSource {
        self.source
    }

    /// The underlying vectorizer.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// The underlying classifier.
    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }
}
