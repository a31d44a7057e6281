//! Model persistence and load-or-train orchestration.
//!
//! The vectorizer state and classifier parameters are persisted as two JSON
//! artifacts. On startup the store tries to load both; on any failure it
//! trains fresh from the bootstrap corpus and writes new artifacts. Training
//! happens at most once per process lifetime, and the decision is based
//! solely on artifact presence and readability.
//!
//! A missing artifact is a routine first run and is logged at info level; a
//! corrupt or schema-incompatible artifact is logged at warn level so real
//! corruption is not masked as a first run. A failed save is also logged at
//! warn level and does not prevent the in-memory model from being used.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::analysis::analyzer::Analyzer;
use crate::corpus::TrainingExample;
use crate::error::{PhishGuardError, Result};
use crate::ml::classifier::{Label, LogisticRegression, TrainConfig};
use crate::ml::vectorizer::{TfIdfState, TfIdfVectorizer};

/// Filesystem locations of the two model artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    /// Path of the serialized vectorizer state.
    pub vectorizer: PathBuf,
    /// Path of the serialized classifier parameters.
    pub classifier: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            vectorizer: PathBuf::from("vectorizer.json"),
            classifier: PathBuf::from("phishing_model.json"),
        }
    }
}

impl ModelPaths {
    /// Place both artifacts under the given directory, using the default
    /// file names.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            vectorizer: dir.join("vectorizer.json"),
            classifier: dir.join("phishing_model.json"),
        }
    }
}

/// How the returned model was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// Deserialized from existing artifacts.
    Loaded,
    /// Trained fresh from the bootstrap corpus.
    Trained,
}

/// A vectorizer/classifier pair produced by the store.
pub struct StoredModel {
    /// Fitted vectorizer.
    pub vectorizer: TfIdfVectorizer,
    /// Trained classifier.
    pub classifier: LogisticRegression,
    /// Whether the pair was loaded or trained.
    pub source: ModelSource,
}

/// Why loading the persisted artifacts failed.
enum LoadFailure {
    /// At least one artifact file does not exist.
    Missing(PathBuf),
    /// An artifact exists but could not be read or parsed.
    Corrupt(PathBuf, String),
}

/// Load the persisted model pair, or train a fresh one from `corpus` and
/// persist it.
///
/// The analyzer is attached to the loaded vectorizer state and must be the
/// same kind of analyzer the state was fitted with.
pub fn load_or_train(
    corpus: &[TrainingExample],
    paths: &ModelPaths,
    analyzer: Arc<dyn Analyzer>,
) -> Result<StoredModel> {
    match try_load(paths, analyzer.clone()) {
        Ok((vectorizer, classifier)) => {
            info!(
                "loaded model artifacts from {} and {}",
                paths.vectorizer.display(),
                paths.classifier.display()
            );
            return Ok(StoredModel {
                vectorizer,
                classifier,
                source: ModelSource::Loaded,
            });
        }
        Err(LoadFailure::Missing(path)) => {
            info!(
                "no persisted model at {}, training from bootstrap corpus",
                path.display()
            );
        }
        Err(LoadFailure::Corrupt(path, reason)) => {
            warn!(
                "persisted model at {} is unreadable ({reason}), retraining",
                path.display()
            );
        }
    }

    let (vectorizer, classifier) = train(corpus, analyzer, TrainConfig::default())?;

    // A failed save degrades to retraining on the next startup; the
    // in-memory model stays usable either way.
    if let Err(e) = save(&vectorizer, &classifier, paths) {
        warn!("failed to persist trained model: {e}");
    }

    Ok(StoredModel {
        vectorizer,
        classifier,
        source: ModelSource::Trained,
    })
}

/// Train a vectorizer/classifier pair from a labeled corpus.
pub fn train(
    corpus: &[TrainingExample],
    analyzer: Arc<dyn Analyzer>,
    config: TrainConfig,
) -> Result<(TfIdfVectorizer, LogisticRegression)> {
    let documents: Vec<String> = corpus.iter().map(|e| e.text.clone()).collect();
    let labels: Vec<Label> = corpus.iter().map(|e| e.label).collect();

    let mut vectorizer = TfIdfVectorizer::new(analyzer);
    vectorizer.fit(&documents)?;

    let features = documents
        .iter()
        .map(|doc| vectorizer.transform(doc))
        .collect::<Result<Vec<_>>>()?;

    let mut classifier = LogisticRegression::new(config);
    classifier.train(&features, &labels)?;

    Ok((vectorizer, classifier))
}

/// Persist both artifacts, writing each to a temporary sibling path and
/// atomically renaming it into place.
pub fn save(
    vectorizer: &TfIdfVectorizer,
    classifier: &LogisticRegression,
    paths: &ModelPaths,
) -> Result<()> {
    write_artifact(&paths.vectorizer, &vectorizer.to_state())?;
    write_artifact(&paths.classifier, classifier)?;
    Ok(())
}

fn try_load(
    paths: &ModelPaths,
    analyzer: Arc<dyn Analyzer>,
) -> std::result::Result<(TfIdfVectorizer, LogisticRegression), LoadFailure> {
    let state: TfIdfState = read_artifact(&paths.vectorizer)?;
    let classifier: LogisticRegression = read_artifact(&paths.classifier)?;

    // The two artifacts must describe the same feature space; a mismatch
    // means one of them belongs to a different training run.
    if classifier.n_features() != state.idf.len() {
        return Err(LoadFailure::Corrupt(
            paths.classifier.clone(),
            format!(
                "classifier expects {} features but vectorizer provides {}",
                classifier.n_features(),
                state.idf.len()
            ),
        ));
    }

    Ok((TfIdfVectorizer::from_state(state, analyzer), classifier))
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> std::result::Result<T, LoadFailure> {
    if !path.exists() {
        return Err(LoadFailure::Missing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)
        .map_err(|e| LoadFailure::Corrupt(path.to_path_buf(), e.to_string()))?;
    serde_json::from_str(&content)
        .map_err(|e| LoadFailure::Corrupt(path.to_path_buf(), e.to_string()))
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        PhishGuardError::serialization(format!("failed to encode {}: {e}", path.display()))
    })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).map_err(|e| {
        PhishGuardError::serialization(format!("failed to write {}: {e}", tmp.display()))
    })?;
    fs::rename(&tmp, path).map_err(|e| {
        PhishGuardError::serialization(format!("failed to move {} into place: {e}", tmp.display()))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::standard_analyzer;
    use crate::corpus::bootstrap_corpus;

    #[test]
    fn test_first_run_trains_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ModelPaths::in_dir(dir.path());

        let stored =
            load_or_train(&bootstrap_corpus(), &paths, standard_analyzer()).unwrap();
        assert_eq!(stored.source, ModelSource::Trained);
        assert!(paths.vectorizer.exists());
        assert!(paths.classifier.exists());
    }

    #[test]
    fn test_second_run_loads() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ModelPaths::in_dir(dir.path());
        let corpus = bootstrap_corpus();

        let first = load_or_train(&corpus, &paths, standard_analyzer()).unwrap();
        let second = load_or_train(&corpus, &paths, standard_analyzer()).unwrap();

        assert_eq!(first.source, ModelSource::Trained);
        assert_eq!(second.source, ModelSource::Loaded);
        assert_eq!(
            first.vectorizer.to_state(),
            second.vectorizer.to_state()
        );
        assert_eq!(first.classifier, second.classifier);
    }

    #[test]
    fn test_corrupt_artifact_falls_back_to_training() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ModelPaths::in_dir(dir.path());
        let corpus = bootstrap_corpus();

        load_or_train(&corpus, &paths, standard_analyzer()).unwrap();
        fs::write(&paths.vectorizer, "{ not valid json").unwrap();

        let stored = load_or_train(&corpus, &paths, standard_analyzer()).unwrap();
        assert_eq!(stored.source, ModelSource::Trained);

        // The corrupt artifact was replaced and now loads again.
        let reloaded = load_or_train(&corpus, &paths, standard_analyzer()).unwrap();
        assert_eq!(reloaded.source, ModelSource::Loaded);
    }

    #[test]
    fn test_mismatched_artifacts_are_treated_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ModelPaths::in_dir(dir.path());
        let corpus = bootstrap_corpus();

        load_or_train(&corpus, &paths, standard_analyzer()).unwrap();

        // Replace the vectorizer with one fitted on a different corpus.
        let tiny = vec![TrainingExample::new("alpha beta", Label::Phishing)];
        let (other_vectorizer, _) =
            train(&tiny, standard_analyzer(), TrainConfig::default()).unwrap();
        write_artifact(&paths.vectorizer, &other_vectorizer.to_state()).unwrap();

        let stored = load_or_train(&corpus, &paths, standard_analyzer()).unwrap();
        assert_eq!(stored.source, ModelSource::Trained);
    }

    #[test]
    fn test_no_stray_temp_files_after_save() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ModelPaths::in_dir(dir.path());

        load_or_train(&bootstrap_corpus(), &paths, standard_analyzer()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|n| !n.ends_with(".tmp")), "{names:?}");
    }
}
