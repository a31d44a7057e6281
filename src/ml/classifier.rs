//! Binary logistic-regression classifier.
//!
//! A linear model over TF-IDF features, trained with full-batch gradient
//! descent on the logistic loss. Training starts from a zero initialization
//! and uses no randomness, so a fixed corpus always produces the same
//! parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PhishGuardError, Result};

/// Class label for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Ordinary, non-malicious text.
    Legitimate,
    /// A phishing attempt.
    Phishing,
}

impl Label {
    /// Numeric target used during training (phishing = 1, legitimate = 0).
    pub fn as_target(self) -> f64 {
        match self {
            Label::Legitimate => 0.0,
            Label::Phishing => 1.0,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Legitimate => write!(f, "Legitimate"),
            Label::Phishing => write!(f, "Phishing"),
        }
    }
}

/// Outcome of classifying a single piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The predicted class.
    pub label: Label,
    /// Probability of the predicted class.
    ///
    /// Under the 0.5 decision threshold this is always in `[0.5, 1.0]`.
    pub confidence: f64,
}

/// Hyperparameters for gradient-descent training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Step size for gradient descent.
    pub learning_rate: f64,
    /// Hard cap on the number of gradient steps.
    pub max_iterations: usize,
    /// Stop early once the largest parameter update falls below this.
    pub tolerance: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            max_iterations: 2000,
            tolerance: 1e-6,
        }
    }
}

/// Statistics recorded by the last training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Number of gradient steps performed.
    pub iterations: usize,
    /// Mean logistic loss after the final step.
    pub final_loss: f64,
    /// Whether the tolerance criterion stopped training before the cap.
    pub converged: bool,
}

/// Metadata describing a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Training timestamp.
    pub trained_at: DateTime<Utc>,
    /// Number of training examples used.
    pub training_examples: usize,
}

/// Binary logistic-regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// One weight per feature dimension.
    weights: Vec<f64>,
    /// Bias term.
    bias: f64,
    /// Hyperparameters used for training.
    config: TrainConfig,
    /// Statistics from the last training run, if any.
    stats: Option<TrainingStats>,
    /// Metadata from the last training run, if any.
    metadata: Option<ModelMetadata>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(TrainConfig::default())
    }
}

impl LogisticRegression {
    /// Create a new, untrained model with the given hyperparameters.
    pub fn new(config: TrainConfig) -> Self {
        Self {
            weights: Vec::new(),
            bias: 0.0,
            config,
            stats: None,
            metadata: None,
        }
    }

    /// Train the model on feature vectors and their labels.
    ///
    /// All feature vectors must share the same dimensionality, and there
    /// must be exactly one label per vector. Training is deterministic:
    /// parameters start at zero and the data is visited in order.
    pub fn train(&mut self, features: &[Vec<f64>], labels: &[Label]) -> Result<()> {
        if features.is_empty() {
            return Err(PhishGuardError::invalid_input(
                "training requires at least one example",
            ));
        }
        if features.len() != labels.len() {
            return Err(PhishGuardError::invalid_input(format!(
                "got {} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let n_features = features[0].len();
        if features.iter().any(|f| f.len() != n_features) {
            return Err(PhishGuardError::invalid_input(
                "feature vectors have inconsistent dimensions",
            ));
        }

        let n = features.len() as f64;
        let mut weights = vec![0.0; n_features];
        let mut bias = 0.0;
        let mut iterations = 0;
        let mut converged = false;

        for _ in 0..self.config.max_iterations {
            let mut grad_w = vec![0.0; n_features];
            let mut grad_b = 0.0;

            for (x, label) in features.iter().zip(labels) {
                let p = sigmoid(dot(&weights, x) + bias);
                let residual = p - label.as_target();
                for (g, xi) in grad_w.iter_mut().zip(x) {
                    *g += residual * xi;
                }
                grad_b += residual;
            }

            let mut max_update: f64 = 0.0;
            for (w, g) in weights.iter_mut().zip(&grad_w) {
                let update = self.config.learning_rate * g / n;
                *w -= update;
                max_update = max_update.max(update.abs());
            }
            let bias_update = self.config.learning_rate * grad_b / n;
            bias -= bias_update;
            max_update = max_update.max(bias_update.abs());

            iterations += 1;
            if max_update < self.config.tolerance {
                converged = true;
                break;
            }
        }

        let final_loss = mean_logistic_loss(&weights, bias, features, labels);

        self.weights = weights;
        self.bias = bias;
        self.stats = Some(TrainingStats {
            iterations,
            final_loss,
            converged,
        });
        self.metadata = Some(ModelMetadata {
            trained_at: Utc::now(),
            training_examples: features.len(),
        });

        Ok(())
    }

    /// Classify a feature vector.
    ///
    /// The label is phishing when the sigmoid score reaches 0.5, and the
    /// confidence is the probability of the chosen class. An all-zero
    /// vector is legal; the decision then rests on the bias alone.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction> {
        if !self.is_trained() {
            return Err(PhishGuardError::model("classifier has not been trained"));
        }
        if features.len() != self.weights.len() {
            return Err(PhishGuardError::invalid_input(format!(
                "expected {} features, got {}",
                self.weights.len(),
                features.len()
            )));
        }

        let score = sigmoid(dot(&self.weights, features) + self.bias);
        if score >= 0.5 {
            Ok(Prediction {
                label: Label::Phishing,
                confidence: score,
            })
        } else {
            Ok(Prediction {
                label: Label::Legitimate,
                confidence: 1.0 - score,
            })
        }
    }

    /// Whether the model has been trained.
    pub fn is_trained(&self) -> bool {
        !self.weights.is_empty()
    }

    /// Dimensionality of the feature space this model was trained on.
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Statistics from the last training run.
    pub fn stats(&self) -> Option<&TrainingStats> {
        self.stats.as_ref()
    }

    /// Metadata from the last training run.
    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn mean_logistic_loss(weights: &[f64], bias: f64, features: &[Vec<f64>], labels: &[Label]) -> f64 {
    let mut loss = 0.0;
    for (x, label) in features.iter().zip(labels) {
        // Clamp away from 0 and 1 so the log stays finite.
        let p = sigmoid(dot(weights, x) + bias).clamp(1e-12, 1.0 - 1e-12);
        let y = label.as_target();
        loss -= y * p.ln() + (1.0 - y) * (1.0 - p).ln();
    }
    loss / features.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_training_data() -> (Vec<Vec<f64>>, Vec<Label>) {
        // Two clearly separated clusters in a 2-dimensional feature space.
        let features = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.8, 0.0],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
            vec![0.0, 0.8],
        ];
        let labels = vec![
            Label::Phishing,
            Label::Phishing,
            Label::Phishing,
            Label::Legitimate,
            Label::Legitimate,
            Label::Legitimate,
        ];
        (features, labels)
    }

    #[test]
    fn test_train_and_predict_separable_data() {
        let (features, labels) = toy_training_data();
        let mut model = LogisticRegression::default();
        model.train(&features, &labels).unwrap();

        for (x, expected) in features.iter().zip(&labels) {
            let prediction = model.predict(x).unwrap();
            assert_eq!(prediction.label, *expected);
        }
    }

    #[test]
    fn test_confidence_is_at_least_half() {
        let (features, labels) = toy_training_data();
        let mut model = LogisticRegression::default();
        model.train(&features, &labels).unwrap();

        let probes = [
            vec![1.0, 0.0],
            vec![0.5, 0.5],
            vec![0.0, 0.0],
            vec![0.0, 1.0],
        ];
        for probe in &probes {
            let prediction = model.predict(probe).unwrap();
            assert!(prediction.confidence >= 0.5);
            assert!(prediction.confidence <= 1.0);
        }
    }

    #[test]
    fn test_training_is_deterministic() {
        let (features, labels) = toy_training_data();

        let mut a = LogisticRegression::default();
        a.train(&features, &labels).unwrap();
        let mut b = LogisticRegression::default();
        b.train(&features, &labels).unwrap();

        assert_eq!(a.weights, b.weights);
        assert_eq!(a.bias, b.bias);
    }

    #[test]
    fn test_zero_vector_is_decided_by_bias() {
        let (features, labels) = toy_training_data();
        let mut model = LogisticRegression::default();
        model.train(&features, &labels).unwrap();

        let zero = vec![0.0; model.n_features()];
        let first = model.predict(&zero).unwrap();
        let second = model.predict(&zero).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_untrained_predict_fails() {
        let model = LogisticRegression::default();
        let err = model.predict(&[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, PhishGuardError::Model(_)));
    }

    #[test]
    fn test_empty_training_set_fails() {
        let mut model = LogisticRegression::default();
        let err = model.train(&[], &[]).unwrap_err();
        assert!(matches!(err, PhishGuardError::InvalidInput(_)));
    }

    #[test]
    fn test_mismatched_labels_fail() {
        let mut model = LogisticRegression::default();
        let err = model
            .train(&[vec![1.0, 0.0]], &[Label::Phishing, Label::Legitimate])
            .unwrap_err();
        assert!(matches!(err, PhishGuardError::InvalidInput(_)));
    }

    #[test]
    fn test_dimension_mismatch_at_predict_fails() {
        let (features, labels) = toy_training_data();
        let mut model = LogisticRegression::default();
        model.train(&features, &labels).unwrap();

        let err = model.predict(&[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, PhishGuardError::InvalidInput(_)));
    }

    #[test]
    fn test_training_records_stats() {
        let (features, labels) = toy_training_data();
        let mut model = LogisticRegression::default();
        model.train(&features, &labels).unwrap();

        let stats = model.stats().unwrap();
        assert!(stats.iterations > 0);
        assert!(stats.final_loss < 0.5);
        assert_eq!(model.metadata().unwrap().training_examples, 6);
    }
}
