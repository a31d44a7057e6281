//! Bootstrap training corpus.
//!
//! Ten fixed example sentences (five phishing, five legitimate) used to
//! train the model on first run. The corpus is immutable at runtime; quiz
//! answers never feed back into it.

use serde::{Deserialize, Serialize};

use crate::ml::classifier::Label;

/// A single labeled training sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Example text.
    pub text: String,
    /// Class label.
    pub label: Label,
}

impl TrainingExample {
    /// Create a new training example.
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

const PHISHING_EXAMPLES: [&str; 5] = [
    "Urgent: Your account will be suspended! Click here to verify your details.",
    "Congratulations! You've won a $1000 Amazon gift card. Claim now!",
    "Security Alert: Unusual login detected. Click to secure your account.",
    "Your PayPal account needs verification. Please update your information.",
    "Limited time offer: Get 50% off all products. Enter your credit card now!",
];

const LEGITIMATE_EXAMPLES: [&str; 5] = [
    "Your monthly statement is ready. Please find it attached.",
    "Meeting reminder: Team sync at 2pm tomorrow in Conference Room B.",
    "Your order #12345 has been shipped and will arrive on Friday.",
    "Thank you for your application. We'll review your materials and get back to you.",
    "The report you requested is now available in the shared drive.",
];

/// The fixed ten-sentence corpus the model is bootstrapped from.
///
/// Phishing examples come first, in a stable order, so repeated calls
/// produce identical corpora and therefore identical trained models.
pub fn bootstrap_corpus() -> Vec<TrainingExample> {
    PHISHING_EXAMPLES
        .iter()
        .map(|text| TrainingExample::new(*text, Label::Phishing))
        .chain(
            LEGITIMATE_EXAMPLES
                .iter()
                .map(|text| TrainingExample::new(*text, Label::Legitimate)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_corpus_shape() {
        let corpus = bootstrap_corpus();
        assert_eq!(corpus.len(), 10);
        assert_eq!(
            corpus.iter().filter(|e| e.label == Label::Phishing).count(),
            5
        );
        assert_eq!(
            corpus
                .iter()
                .filter(|e| e.label == Label::Legitimate)
                .count(),
            5
        );
    }

    #[test]
    fn test_bootstrap_corpus_is_stable() {
        assert_eq!(bootstrap_corpus(), bootstrap_corpus());
    }
}
