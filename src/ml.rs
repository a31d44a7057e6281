//! Machine learning components: TF-IDF feature extraction and binary
//! logistic-regression classification.
//!
//! The vectorizer and classifier are trained once from a small bootstrap
//! corpus and are read-only afterwards; both are safe to share across
//! threads once training completes.

pub mod classifier;
pub mod vectorizer;

pub use classifier::{Label, LogisticRegression, Prediction, TrainConfig};
pub use vectorizer::{TfIdfState, TfIdfVectorizer};
