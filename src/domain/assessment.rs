//! Assessment result types.
//!
//! Represents the outcome of one prediction: the raw classifier output and
//! the risk tier it resolves to.

use super::risk::{AlertKind, RiskTier, MAX_LEVEL};

/// Outcome of a single risk assessment. Transient, never stored.
#[derive(Debug, Clone)]
pub struct Assessment {
    /// Raw class label returned by the classifier
    pub prediction: i64,

    /// Resolved tier level (0-4)
    pub level: u8,

    /// True when `prediction` was outside the tier table
    pub fallback: bool,

    /// Timestamp of the assessment
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Resolve a raw prediction against the tier table.
    #[must_use]
    pub fn from_prediction(prediction: i64) -> Self {
        let fallback = RiskTier::get(prediction).is_none();
        Self {
            prediction,
            level: RiskTier::lookup(prediction).level,
            fallback,
            assessed_at: chrono::Utc::now(),
        }
    }

    /// The display tier for this assessment.
    #[must_use]
    pub fn tier(&self) -> &'static RiskTier {
        RiskTier::lookup(i64::from(self.level))
    }

    /// Score as shown in the "Risk Score" metric, using the raw prediction.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.prediction, MAX_LEVEL)
    }

    /// Banner styling. Unrecognised predictions are flagged as errors.
    #[must_use]
    pub fn banner(&self) -> AlertKind {
        if self.fallback {
            AlertKind::Error
        } else {
            self.tier().banner()
        }
    }

    /// Only a recognised "no disease" prediction is celebrated.
    #[must_use]
    pub fn celebrates(&self) -> bool {
        !self.fallback && self.tier().celebrates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prediction() {
        let a = Assessment::from_prediction(2);
        assert_eq!(a.level, 2);
        assert!(!a.fallback);
        assert_eq!(a.tier().severity, "Moderate");
    }

    #[test]
    fn test_unknown_prediction_falls_back() {
        let a = Assessment::from_prediction(9);
        assert_eq!(a.prediction, 9);
        assert_eq!(a.level, 0);
        assert!(a.fallback);
        assert_eq!(a.tier().severity, "None");
        assert_eq!(a.score_label(), "9/4");
        assert_eq!(a.banner(), AlertKind::Error);
        assert!(!a.celebrates());
    }

    #[test]
    fn test_known_prediction_display() {
        let a = Assessment::from_prediction(0);
        assert_eq!(a.score_label(), "0/4");
        assert_eq!(a.banner(), AlertKind::Success);
        assert!(a.celebrates());

        let a = Assessment::from_prediction(3);
        assert_eq!(a.banner(), AlertKind::Error);
        assert_eq!(a.score_label(), "3/4");
    }
}
