//! JSON model adapter: Implementation of `Classifier` over an exported artifact.
//!
//! # Integrity
//!
//! The artifact's SHA-256 is checked before it is parsed. The expected digest
//! comes from, in order:
//! 1. `DigestPolicy::pinned` (the `HEARTRISK_MODEL_SHA256` env var)
//! 2. a `model.sha256` file next to the artifact (`sha256sum` format)
//!
//! When neither exists the model loads unverified, unless the policy
//! requires a digest.

mod artifact;

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

pub use artifact::{DecisionTree, Estimator, ModelArtifact, StandardScaler, TreeNode};

use crate::config::Settings;
use crate::domain::FEATURE_NAMES;
use crate::ports::{Classifier, ClassifierError};

/// Artifact file name inside a model directory.
pub const MODEL_FILE: &str = "model.json";

/// Digest sidecar file name.
pub const DIGEST_FILE: &str = "model.sha256";

/// How strictly the artifact digest is enforced.
#[derive(Debug, Clone, Default)]
pub struct DigestPolicy {
    /// Expected lowercase hex digest, overriding any sidecar file.
    pub pinned: Option<String>,
    /// Fail when no expected digest is available.
    pub required: bool,
}

impl DigestPolicy {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            pinned: settings.model_sha256.clone(),
            required: settings.require_model_digest,
        }
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Resolve a model directory or file path to the artifact file.
#[must_use]
pub fn resolve_model_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MODEL_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Path of the digest sidecar for an artifact file.
#[must_use]
pub fn digest_path(model_file: &Path) -> PathBuf {
    model_file.with_file_name(DIGEST_FILE)
}

/// Result of writing a digest sidecar.
#[derive(Debug)]
pub struct DigestRecord {
    pub artifact: ModelArtifact,
    pub digest: String,
    pub digest_file: PathBuf,
}

/// Validate the artifact at `path` and write its `model.sha256` sidecar.
///
/// # Errors
/// Returns error if the artifact cannot be read or fails validation (in
/// which case nothing is written), or if the sidecar cannot be written.
pub fn write_digest(path: &Path) -> Result<DigestRecord, ClassifierError> {
    let model_file = resolve_model_file(path);
    let bytes = fs::read(&model_file)?;
    let artifact = ModelArtifact::from_json_slice(&bytes)?;

    let digest = sha256_hex(&bytes);
    let file_name = model_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| MODEL_FILE.to_string());

    let digest_file = digest_path(&model_file);
    fs::write(&digest_file, format!("{digest}  {file_name}\n"))?;
    tracing::info!("Wrote model digest to {:?}", digest_file);

    Ok(DigestRecord {
        artifact,
        digest,
        digest_file,
    })
}

fn read_sidecar_digest(path: &Path) -> Result<Option<String>, ClassifierError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let token = content
        .split_whitespace()
        .next()
        .ok_or_else(|| ClassifierError::InvalidArtifact(format!("{path:?} is empty")))?;
    if token.len() != 64 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ClassifierError::InvalidArtifact(format!(
            "{path:?} does not contain a SHA-256 hex digest"
        )));
    }
    Ok(Some(token.to_ascii_lowercase()))
}

/// Classifier backed by a JSON artifact, loaded once and never mutated.
#[derive(Debug)]
pub struct JsonClassifier {
    artifact: ModelArtifact,
    digest: String,
    source: PathBuf,
}

impl JsonClassifier {
    /// Load, verify and validate a model artifact.
    ///
    /// `path` may be a model directory (containing `model.json`) or the
    /// artifact file itself.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, the digest does not match,
    /// the artifact is malformed, or its features differ from `FEATURE_NAMES`.
    pub fn load(path: &Path, policy: &DigestPolicy) -> Result<Self, ClassifierError> {
        let model_file = resolve_model_file(path);
        let bytes = fs::read(&model_file)?;
        let digest = sha256_hex(&bytes);

        let expected = match &policy.pinned {
            Some(pinned) => Some(pinned.to_ascii_lowercase()),
            None => read_sidecar_digest(&digest_path(&model_file))?,
        };

        match expected {
            Some(expected) if expected != digest => {
                tracing::error!("Model digest mismatch for {:?}", model_file);
                return Err(ClassifierError::DigestMismatch {
                    expected,
                    actual: digest,
                });
            }
            Some(_) => tracing::info!("Model digest verified"),
            None if policy.required => {
                return Err(ClassifierError::DigestMissing(
                    model_file.display().to_string(),
                ));
            }
            None => tracing::warn!("Loading model without digest verification"),
        }

        let artifact = ModelArtifact::from_json_slice(&bytes)?;
        check_feature_names(&artifact.feature_names)?;

        tracing::info!(
            "Loaded {} model from {:?} (n_features={}, classes={:?})",
            artifact.kind(),
            model_file,
            artifact.n_features(),
            artifact.classes
        );

        Ok(Self {
            artifact,
            digest,
            source: model_file,
        })
    }

    /// SHA-256 of the loaded artifact.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Path the artifact was read from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

fn check_feature_names(names: &[String]) -> Result<(), ClassifierError> {
    if names.len() != FEATURE_NAMES.len() || names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b) {
        return Err(ClassifierError::FeatureMismatch(format!(
            "model expects [{}], form provides [{}]",
            names.join(", "),
            FEATURE_NAMES.join(", ")
        )));
    }
    Ok(())
}

impl Classifier for JsonClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, ClassifierError> {
        self.artifact.predict(features)
    }

    fn n_features(&self) -> usize {
        self.artifact.n_features()
    }

    fn describe(&self) -> String {
        let name = self.artifact.name.as_deref().unwrap_or("unnamed model");
        format!(
            "{name} ({}, sha256 {})",
            self.artifact.kind(),
            &self.digest[..12]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifact_json(feature_names: &[&str]) -> Vec<u8> {
        let n = feature_names.len();
        json!({
            "name": "test-model",
            "kind": "logistic_regression",
            "feature_names": feature_names,
            "classes": [0, 1],
            "coefficients": [vec![0.1; n]],
            "intercepts": [-20.0]
        })
        .to_string()
        .into_bytes()
    }

    fn write_model(dir: &Path, bytes: &[u8]) -> PathBuf {
        let path = dir.join(MODEL_FILE);
        fs::write(&path, bytes).expect("write model");
        path
    }

    #[test]
    fn test_load_from_directory_without_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path(), &artifact_json(&FEATURE_NAMES));

        let model = JsonClassifier::load(dir.path(), &DigestPolicy::default()).expect("Should load");
        assert_eq!(model.n_features(), 9);
        assert_eq!(model.source(), dir.path().join(MODEL_FILE));
        assert!(model.describe().starts_with("test-model (logistic_regression"));
    }

    #[test]
    fn test_sidecar_digest_verified() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bytes = artifact_json(&FEATURE_NAMES);
        let file = write_model(dir.path(), &bytes);
        fs::write(
            digest_path(&file),
            format!("{}  {MODEL_FILE}\n", sha256_hex(&bytes)),
        )
        .expect("write digest");

        let model = JsonClassifier::load(&file, &DigestPolicy::default()).expect("Should load");
        assert_eq!(model.digest(), sha256_hex(&bytes));
    }

    #[test]
    fn test_sidecar_digest_mismatch_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = write_model(dir.path(), &artifact_json(&FEATURE_NAMES));
        fs::write(digest_path(&file), "0".repeat(64)).expect("write digest");

        let err = JsonClassifier::load(dir.path(), &DigestPolicy::default()).unwrap_err();
        assert!(matches!(err, ClassifierError::DigestMismatch { .. }));
    }

    #[test]
    fn test_pinned_digest_overrides_sidecar() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bytes = artifact_json(&FEATURE_NAMES);
        let file = write_model(dir.path(), &bytes);
        fs::write(digest_path(&file), "0".repeat(64)).expect("write digest");

        let policy = DigestPolicy {
            pinned: Some(sha256_hex(&bytes).to_ascii_uppercase()),
            required: true,
        };
        assert!(JsonClassifier::load(dir.path(), &policy).is_ok());
    }

    #[test]
    fn test_required_digest_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path(), &artifact_json(&FEATURE_NAMES));

        let policy = DigestPolicy {
            pinned: None,
            required: true,
        };
        let err = JsonClassifier::load(dir.path(), &policy).unwrap_err();
        assert!(matches!(err, ClassifierError::DigestMissing(_)));
    }

    #[test]
    fn test_feature_order_enforced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut names = FEATURE_NAMES;
        names.swap(0, 1);
        write_model(dir.path(), &artifact_json(&names));

        let err = JsonClassifier::load(dir.path(), &DigestPolicy::default()).unwrap_err();
        assert!(matches!(err, ClassifierError::FeatureMismatch(_)));
    }

    #[test]
    fn test_write_digest_then_required_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bytes = artifact_json(&FEATURE_NAMES);
        write_model(dir.path(), &bytes);

        let record = write_digest(dir.path()).expect("Should write digest");
        assert_eq!(record.digest, sha256_hex(&bytes));
        assert_eq!(record.digest_file, dir.path().join(DIGEST_FILE));
        let sidecar = fs::read_to_string(&record.digest_file).expect("read digest");
        assert_eq!(sidecar, format!("{}  {MODEL_FILE}\n", record.digest));

        let policy = DigestPolicy {
            pinned: None,
            required: true,
        };
        let model = JsonClassifier::load(dir.path(), &policy).expect("Should verify");
        assert_eq!(model.digest(), record.digest);

        // Edits after digesting are caught.
        let mut edited = bytes.clone();
        edited.push(b'\n');
        write_model(dir.path(), &edited);
        let err = JsonClassifier::load(dir.path(), &policy).unwrap_err();
        assert!(matches!(err, ClassifierError::DigestMismatch { .. }));
    }

    #[test]
    fn test_write_digest_refuses_invalid_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path(), br#"{"kind": "logistic_regression"}"#);

        assert!(write_digest(dir.path()).is_err());
        assert!(!dir.path().join(DIGEST_FILE).exists());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = JsonClassifier::load(dir.path(), &DigestPolicy::default()).unwrap_err();
        assert!(matches!(err, ClassifierError::Io(_)));
    }

    #[test]
    fn test_bundled_model_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let model = JsonClassifier::load(&dir, &DigestPolicy::default()).expect("Should load");
        let defaults = crate::domain::ClinicalFeatures::default().to_vec();
        assert_eq!(model.predict(&defaults).expect("Should predict"), 0);
    }
}
