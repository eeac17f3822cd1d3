//! Assessment service: Orchestrates one risk prediction.
//!
//! validate -> fixed-order feature array -> classifier -> risk tier

use std::sync::Arc;

use crate::domain::{Assessment, ClinicalFeatures};
use crate::ports::Classifier;
use crate::HeartRiskError;

/// Service for running risk assessments against a loaded classifier.
///
/// The classifier is shared read-only for the process lifetime.
pub struct AssessmentService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
}

impl<C: Classifier> AssessmentService<C> {
    /// Create a new assessment service.
    ///
    /// # Errors
    /// Returns error if the classifier's input width differs from the form's.
    pub fn new(classifier: Arc<C>) -> Result<Self, HeartRiskError> {
        let expected = crate::domain::FEATURE_COUNT;
        if classifier.n_features() != expected {
            return Err(HeartRiskError::ModelNotLoaded(format!(
                "classifier expects {} features, form provides {expected}",
                classifier.n_features()
            )));
        }
        Ok(Self { classifier })
    }

    /// Description of the loaded model.
    #[must_use]
    pub fn model_summary(&self) -> String {
        self.classifier.describe()
    }

    /// Run one assessment.
    ///
    /// # Errors
    /// Returns `Validation` if any feature is out of range, or `Model` if
    /// inference fails.
    pub fn assess(&self, features: &ClinicalFeatures) -> Result<Assessment, HeartRiskError> {
        features
            .validate()
            .map_err(|errors| HeartRiskError::Validation(errors.join("; ")))?;

        let input = features.to_vec();
        let prediction = self.classifier.predict(&input)?;
        let assessment = Assessment::from_prediction(prediction);

        if assessment.fallback {
            tracing::warn!(
                "Classifier returned code {} outside the tier table; showing level 0",
                prediction
            );
        }

        tracing::info!(
            "Assessment complete: prediction={}, level={}, severity={}",
            assessment.prediction,
            assessment.level,
            assessment.tier().severity
        );

        Ok(assessment)
    }
}
