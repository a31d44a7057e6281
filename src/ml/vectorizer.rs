//! TF-IDF vectorizer for text feature extraction.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::error::{PhishGuardError, Result};

/// TF-IDF vectorizer for text feature extraction.
///
/// Learns a vocabulary and per-term inverse document frequencies from a
/// training corpus, then maps arbitrary text onto a fixed-dimension feature
/// vector. Out-of-vocabulary tokens are silently ignored at transform time.
pub struct TfIdfVectorizer {
    /// Vocabulary: word -> index mapping.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency for each word.
    idf: Vec<f64>,
    /// Total number of documents seen during training.
    n_documents: usize,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
}

/// Serializable snapshot of a fitted vectorizer.
///
/// The analyzer handle is not part of the snapshot; callers reattach one
/// with [`TfIdfVectorizer::from_state`] when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfState {
    /// Vocabulary: word -> index mapping.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency for each word.
    pub idf: Vec<f64>,
    /// Total number of documents seen during training.
    pub n_documents: usize,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a new, unfitted TF-IDF vectorizer with the specified analyzer.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            analyzer,
        }
    }

    /// Rebuild a fitted vectorizer from a persisted snapshot.
    pub fn from_state(state: TfIdfState, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            vocabulary: state.vocabulary,
            idf: state.idf,
            n_documents: state.n_documents,
            analyzer,
        }
    }

    /// Take a serializable snapshot of the fitted state.
    pub fn to_state(&self) -> TfIdfState {
        TfIdfState {
            vocabulary: self.vocabulary.clone(),
            idf: self.idf.clone(),
            n_documents: self.n_documents,
        }
    }

    /// Fit the vectorizer on training documents.
    ///
    /// Vocabulary indices are assigned in first-seen order, so fitting the
    /// same corpus twice produces identical state. An empty corpus is
    /// rejected with an invalid input error.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(PhishGuardError::invalid_input(
                "training corpus must not be empty",
            ));
        }

        self.n_documents = documents.len();
        let mut vocabulary = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        // Build vocabulary and count document frequencies. Iterating tokens
        // in document order keeps index assignment deterministic.
        for doc in documents {
            let tokens = self.tokenize(doc)?;
            let mut seen: HashSet<&String> = HashSet::new();

            for token in &tokens {
                if !vocabulary.contains_key(token) {
                    let idx = vocabulary.len();
                    vocabulary.insert(token.clone(), idx);
                }
                if seen.insert(token) {
                    *document_frequency.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        // IDF = ln((N + 1) / (df + 1)) + 1, smoothed so that terms present
        // in every document (or none) never divide by zero.
        let mut idf = vec![0.0; vocabulary.len()];
        for (word, idx) in &vocabulary {
            let df = document_frequency.get(word).copied().unwrap_or(0);
            idf[*idx] = ((self.n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0;
        }

        self.vocabulary = vocabulary;
        self.idf = idf;

        Ok(())
    }

    /// Transform a document into a TF-IDF feature vector.
    ///
    /// The result has one dimension per vocabulary entry and is
    /// L2-normalized, unless no token of the document is in the vocabulary,
    /// in which case the all-zero vector is returned as-is.
    pub fn transform(&self, document: &str) -> Result<Vec<f64>> {
        let tokens = self.tokenize(document)?;
        let mut features = vec![0.0; self.vocabulary.len()];

        // Raw term frequencies for known tokens only.
        for token in &tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                features[idx] += 1.0;
            }
        }

        // Apply IDF weights.
        for (idx, value) in features.iter_mut().enumerate() {
            *value *= self.idf[idx];
        }

        // L2 normalization.
        let norm: f64 = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        Ok(features)
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether `fit` has been called.
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Tokenize a document using the configured analyzer.
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let tokens: Vec<String> = self.analyzer.analyze(text)?.map(|token| token.text).collect();
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::standard_analyzer;

    fn fitted_vectorizer(documents: &[&str]) -> TfIdfVectorizer {
        let documents: Vec<String> = documents.iter().map(|s| s.to_string()).collect();
        let mut vectorizer = TfIdfVectorizer::new(standard_analyzer());
        vectorizer.fit(&documents).unwrap();
        vectorizer
    }

    #[test]
    fn test_fit_builds_vocabulary() {
        let vectorizer = fitted_vectorizer(&[
            "your account will be suspended",
            "your order has been shipped",
        ]);

        assert!(vectorizer.is_fitted());
        // "your" is shared between the documents, everything else is unique.
        assert_eq!(vectorizer.vocabulary_size(), 9);
    }

    #[test]
    fn test_fit_empty_corpus_fails() {
        let mut vectorizer = TfIdfVectorizer::new(standard_analyzer());
        let err = vectorizer.fit(&[]).unwrap_err();
        assert!(matches!(err, PhishGuardError::InvalidInput(_)));
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let vectorizer = fitted_vectorizer(&[
            "urgent click here to verify your account",
            "meeting reminder for tomorrow afternoon",
        ]);

        let features = vectorizer.transform("urgent urgent verify account").unwrap();
        let norm: f64 = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_tokens_yield_zero_vector() {
        let vectorizer = fitted_vectorizer(&["alpha beta gamma"]);

        let features = vectorizer.transform("delta epsilon").unwrap();
        assert_eq!(features.len(), 3);
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty_document_yields_zero_vector() {
        let vectorizer = fitted_vectorizer(&["alpha beta gamma"]);

        let features = vectorizer.transform("").unwrap();
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_idf_downweights_common_terms() {
        let vectorizer = fitted_vectorizer(&[
            "your account suspended",
            "your order shipped",
            "your statement ready",
        ]);

        // "your" appears in all three documents, "suspended" in one.
        let state = vectorizer.to_state();
        let your_idx = state.vocabulary["your"];
        let suspended_idx = state.vocabulary["suspended"];
        assert!(state.idf[your_idx] < state.idf[suspended_idx]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let documents = [
            "urgent click here to verify your account",
            "the report you requested is attached",
        ];
        let a = fitted_vectorizer(&documents).to_state();
        let b = fitted_vectorizer(&documents).to_state();
        assert_eq!(a, b);
    }

    #[test]
    fn test_state_round_trip() {
        let vectorizer = fitted_vectorizer(&["alpha beta", "beta gamma"]);
        let restored =
            TfIdfVectorizer::from_state(vectorizer.to_state(), standard_analyzer());

        let original = vectorizer.transform("alpha gamma gamma").unwrap();
        let reloaded = restored.transform("alpha gamma gamma").unwrap();
        assert_eq!(original, reloaded);
    }
}
