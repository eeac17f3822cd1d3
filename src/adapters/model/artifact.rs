//! Serialized model artifact and its estimators.
//!
//! The artifact is the JSON export of an already-fitted classifier. Two
//! estimator families are supported:
//!
//! - `logistic_regression`: linear decision functions with an optional
//!   standard scaler (multinomial, or binary with a single row)
//! - `tree_ensemble`: a forest of decision trees stored as flat node arrays
//!
//! ```json
//! {
//!   "kind": "logistic_regression",
//!   "feature_names": ["age", "sex", ...],
//!   "classes": [0, 1, 2, 3, 4],
//!   "coefficients": [[...], ...],
//!   "intercepts": [...],
//!   "scaler": { "mean": [...], "scale": [...] }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::ports::ClassifierError;

/// Standardization applied before the linear decision function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// One node of a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights (counts or probabilities).
    Leaf { value: Vec<f64> },
}

/// Decision tree; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// Estimator parameters, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        #[serde(default)]
        scaler: Option<StandardScaler>,
    },
    TreeEnsemble { trees: Vec<DecisionTree> },
}

/// A fitted classifier as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,

    /// Input feature names, in input order
    pub feature_names: Vec<String>,

    /// Class labels, in the order of the estimator's outputs
    pub classes: Vec<i64>,

    #[serde(flatten)]
    pub estimator: Estimator,
}

fn invalid(msg: impl Into<String>) -> ClassifierError {
    ClassifierError::InvalidArtifact(msg.into())
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Index of the first maximum (ties resolve to the lowest index).
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

impl ModelArtifact {
    /// Parse and validate an artifact from JSON bytes.
    ///
    /// # Errors
    /// Returns `Parse` on malformed JSON and `InvalidArtifact` when the
    /// parameters are inconsistent.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ClassifierError> {
        let artifact: Self = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Number of input features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Short label for the estimator family.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.estimator {
            Estimator::LogisticRegression { .. } => "logistic_regression",
            Estimator::TreeEnsemble { .. } => "tree_ensemble",
        }
    }

    /// Check internal consistency of all parameters.
    ///
    /// # Errors
    /// Returns `InvalidArtifact` describing the first problem found.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let n = self.n_features();
        if n == 0 {
            return Err(invalid("feature_names is empty"));
        }
        if self.classes.len() < 2 {
            return Err(invalid(format!(
                "expected at least 2 classes, got {}",
                self.classes.len()
            )));
        }
        let mut sorted = self.classes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != self.classes.len() {
            return Err(invalid("classes contains duplicates"));
        }

        match &self.estimator {
            Estimator::LogisticRegression {
                coefficients,
                intercepts,
                scaler,
            } => {
                let rows = coefficients.len();
                let binary = self.classes.len() == 2 && rows == 1;
                if !binary && rows != self.classes.len() {
                    return Err(invalid(format!(
                        "expected {} coefficient rows, got {rows}",
                        self.classes.len()
                    )));
                }
                if intercepts.len() != rows {
                    return Err(invalid(format!(
                        "expected {rows} intercepts, got {}",
                        intercepts.len()
                    )));
                }
                for (i, row) in coefficients.iter().enumerate() {
                    if row.len() != n {
                        return Err(invalid(format!(
                            "coefficient row {i} has {} entries, expected {n}",
                            row.len()
                        )));
                    }
                    if !all_finite(row) {
                        return Err(invalid(format!("coefficient row {i} is not finite")));
                    }
                }
                if !all_finite(intercepts) {
                    return Err(invalid("intercepts are not finite"));
                }
                if let Some(scaler) = scaler {
                    if scaler.mean.len() != n || scaler.scale.len() != n {
                        return Err(invalid("scaler length does not match feature_names"));
                    }
                    if !all_finite(&scaler.mean) || !all_finite(&scaler.scale) {
                        return Err(invalid("scaler is not finite"));
                    }
                    if scaler.scale.iter().any(|s| *s == 0.0) {
                        return Err(invalid("scaler scale contains zero"));
                    }
                }
            }
            Estimator::TreeEnsemble { trees } => {
                if trees.is_empty() {
                    return Err(invalid("tree ensemble has no trees"));
                }
                for (t, tree) in trees.iter().enumerate() {
                    self.validate_tree(t, tree)?;
                }
            }
        }

        Ok(())
    }

    fn validate_tree(&self, t: usize, tree: &DecisionTree) -> Result<(), ClassifierError> {
        let len = tree.nodes.len();
        if len == 0 {
            return Err(invalid(format!("tree {t} has no nodes")));
        }
        for (i, node) in tree.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= self.n_features() {
                        return Err(invalid(format!(
                            "tree {t} node {i} splits on unknown feature {feature}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(invalid(format!("tree {t} node {i} threshold is not finite")));
                    }
                    // Children must point forward so every walk terminates.
                    for child in [*left, *right] {
                        if child <= i || child >= len {
                            return Err(invalid(format!(
                                "tree {t} node {i} has invalid child index {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != self.classes.len() {
                        return Err(invalid(format!(
                            "tree {t} leaf {i} has {} weights, expected {}",
                            value.len(),
                            self.classes.len()
                        )));
                    }
                    if !all_finite(value) || value.iter().any(|v| *v < 0.0) {
                        return Err(invalid(format!("tree {t} leaf {i} has invalid weights")));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(invalid(format!("tree {t} leaf {i} has zero total weight")));
                    }
                }
            }
        }
        Ok(())
    }

    /// Predict the class label for one feature vector.
    ///
    /// # Errors
    /// Returns `FeatureMismatch` if the vector has the wrong length.
    pub fn predict(&self, x: &[f64]) -> Result<i64, ClassifierError> {
        if x.len() != self.n_features() {
            return Err(ClassifierError::FeatureMismatch(format!(
                "expected {} features, got {}",
                self.n_features(),
                x.len()
            )));
        }

        let index = match &self.estimator {
            Estimator::LogisticRegression {
                coefficients,
                intercepts,
                scaler,
            } => {
                let scaled: Vec<f64> = match scaler {
                    Some(s) => x
                        .iter()
                        .zip(s.mean.iter().zip(&s.scale))
                        .map(|(v, (m, sc))| (v - m) / sc)
                        .collect(),
                    None => x.to_vec(),
                };
                let scores: Vec<f64> = coefficients
                    .iter()
                    .zip(intercepts)
                    .map(|(row, b)| row.iter().zip(&scaled).map(|(w, v)| w * v).sum::<f64>() + b)
                    .collect();

                if scores.len() == 1 && self.classes.len() == 2 {
                    usize::from(scores[0] > 0.0)
                } else {
                    argmax(&scores)
                }
            }
            Estimator::TreeEnsemble { trees } => {
                let mut proba = vec![0.0; self.classes.len()];
                for tree in trees {
                    let leaf = tree.leaf_for(x);
                    let total: f64 = leaf.iter().sum();
                    for (p, v) in proba.iter_mut().zip(leaf) {
                        *p += v / total;
                    }
                }
                argmax(&proba)
            }
        };

        Ok(self.classes[index])
    }
}

impl DecisionTree {
    /// Walk from the root to a leaf. Assumes the tree passed validation.
    fn leaf_for(&self, x: &[f64]) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}
