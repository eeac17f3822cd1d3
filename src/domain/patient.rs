//! Clinical feature types for heart disease risk prediction.
//!
//! Based on the UCI Cleveland heart disease attributes (first 9 columns).

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 9;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
];

/// How a feature is entered and constrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureKind {
    /// Whole number within an inclusive range.
    Integer { min: i64, max: i64 },
    /// One of a fixed set of coded options `(code, label)`.
    Choice { options: &'static [(i64, &'static str)] },
}

/// Static description of one clinical feature.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub description: &'static str,
    pub kind: FeatureKind,
    pub default: i64,
}

impl FeatureSpec {
    /// Check a single value against this feature's constraints.
    ///
    /// # Errors
    /// Returns a human-readable message naming the feature.
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(format!("{}: {} is not a whole number", self.label, value));
        }
        let v = value as i64;
        match self.kind {
            FeatureKind::Integer { min, max } => {
                if !(min..=max).contains(&v) {
                    return Err(format!(
                        "{}: {} out of range [{}, {}]",
                        self.label, v, min, max
                    ));
                }
            }
            FeatureKind::Choice { options } => {
                if !options.iter().any(|(code, _)| *code == v) {
                    let codes: Vec<String> = options.iter().map(|(c, _)| c.to_string()).collect();
                    return Err(format!(
                        "{}: {} must be one of {}",
                        self.label,
                        v,
                        codes.join(", ")
                    ));
                }
            }
        }
        Ok(())
    }

    /// Label of a choice option, if this is a choice feature.
    #[must_use]
    pub fn option_label(&self, code: i64) -> Option<&'static str> {
        match self.kind {
            FeatureKind::Choice { options } => options
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, label)| *label),
            FeatureKind::Integer { .. } => None,
        }
    }
}

const SEX_OPTIONS: &[(i64, &str)] = &[(0, "Female"), (1, "Male")];
const CP_OPTIONS: &[(i64, &str)] = &[
    (0, "Typical angina"),
    (1, "Atypical angina"),
    (2, "Non-anginal pain"),
    (3, "Asymptomatic"),
    (4, "Other"),
];
const YES_NO_OPTIONS: &[(i64, &str)] = &[(0, "No"), (1, "Yes")];
const RESTECG_OPTIONS: &[(i64, &str)] = &[
    (0, "Normal"),
    (1, "ST-T wave abnormality"),
    (2, "Left ventricular hypertrophy"),
];

/// Feature table in model input order.
pub static FEATURE_SPECS: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        name: "age",
        label: "Age",
        hint: "years (1-120)",
        description: "Patient's age in years",
        kind: FeatureKind::Integer { min: 1, max: 120 },
        default: 45,
    },
    FeatureSpec {
        name: "sex",
        label: "Sex",
        hint: "0 = Female, 1 = Male",
        description: "0 = Female, 1 = Male",
        kind: FeatureKind::Choice { options: SEX_OPTIONS },
        default: 0,
    },
    FeatureSpec {
        name: "cp",
        label: "Chest Pain Type (cp)",
        hint: "0-4",
        description: "Type of chest pain experienced",
        kind: FeatureKind::Choice { options: CP_OPTIONS },
        default: 0,
    },
    FeatureSpec {
        name: "trestbps",
        label: "Resting Blood Pressure (trestbps) mm Hg",
        hint: "mm Hg (80-200)",
        description: "Blood pressure at rest (mm Hg)",
        kind: FeatureKind::Integer { min: 80, max: 200 },
        default: 120,
    },
    FeatureSpec {
        name: "chol",
        label: "Serum Cholesterol (chol) mg/dl",
        hint: "mg/dl (100-600)",
        description: "Cholesterol level (mg/dl)",
        kind: FeatureKind::Integer { min: 100, max: 600 },
        default: 200,
    },
    FeatureSpec {
        name: "fbs",
        label: "Fasting Blood Sugar > 120 mg/dl (fbs)",
        hint: "0 = No, 1 = Yes",
        description: "Whether fasting blood sugar > 120 mg/dl",
        kind: FeatureKind::Choice { options: YES_NO_OPTIONS },
        default: 0,
    },
    FeatureSpec {
        name: "restecg",
        label: "Resting ECG Results (restecg)",
        hint: "0-2",
        description: "Resting electrocardiographic results",
        kind: FeatureKind::Choice { options: RESTECG_OPTIONS },
        default: 0,
    },
    FeatureSpec {
        name: "thalach",
        label: "Maximum Heart Rate Achieved (thalach)",
        hint: "bpm (60-220)",
        description: "Maximum heart rate achieved during exercise",
        kind: FeatureKind::Integer { min: 60, max: 220 },
        default: 150,
    },
    FeatureSpec {
        name: "exang",
        label: "Exercise Induced Angina (exang)",
        hint: "0 = No, 1 = Yes",
        description: "Whether exercise causes chest pain",
        kind: FeatureKind::Choice { options: YES_NO_OPTIONS },
        default: 0,
    },
];

/// Clinical features for one submission.
///
/// Consumed immediately by the classifier and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalFeatures {
    /// Age in years
    pub age: f64,
    /// 0 = female, 1 = male
    pub sex: f64,
    /// Chest pain type, 0-4
    pub cp: f64,
    /// Resting blood pressure in mm Hg
    pub trestbps: f64,
    /// Serum cholesterol in mg/dl
    pub chol: f64,
    /// Fasting blood sugar > 120 mg/dl, 0 or 1
    pub fbs: f64,
    /// Resting ECG result, 0-2
    pub restecg: f64,
    /// Maximum heart rate achieved
    pub thalach: f64,
    /// Exercise induced angina, 0 or 1
    pub exang: f64,
}

impl Default for ClinicalFeatures {
    fn default() -> Self {
        let d: Vec<f64> = FEATURE_SPECS.iter().map(|s| s.default as f64).collect();
        Self {
            age: d[0],
            sex: d[1],
            cp: d[2],
            trestbps: d[3],
            chol: d[4],
            fbs: d[5],
            restecg: d[6],
            thalach: d[7],
            exang: d[8],
        }
    }
}

impl ClinicalFeatures {
    /// Convert features to a vector for inference, in `FEATURE_NAMES` order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
        ]
    }

    /// Create features from a vector.
    ///
    /// # Errors
    /// Returns error if vector length is not 9.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        if v.len() != FEATURE_COUNT {
            return Err(format!("Expected {FEATURE_COUNT} features, got {}", v.len()));
        }

        Ok(Self {
            age: v[0],
            sex: v[1],
            cp: v[2],
            trestbps: v[3],
            chol: v[4],
            fbs: v[5],
            restecg: v[6],
            thalach: v[7],
            exang: v[8],
        })
    }

    /// Validate every feature against `FEATURE_SPECS`.
    ///
    /// # Errors
    /// Returns all violations, one message per offending feature.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = FEATURE_SPECS
            .iter()
            .zip(self.to_vec())
            .filter_map(|(spec, value)| spec.check(value).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClinicalFeatures {
        ClinicalFeatures {
            age: 63.0,
            sex: 1.0,
            cp: 3.0,
            trestbps: 145.0,
            chol: 233.0,
            fbs: 1.0,
            restecg: 0.0,
            thalach: 150.0,
            exang: 0.0,
        }
    }

    #[test]
    fn test_spec_table_matches_feature_order() {
        for (spec, name) in FEATURE_SPECS.iter().zip(FEATURE_NAMES) {
            assert_eq!(spec.name, name);
        }
    }

    #[test]
    fn test_form_labels() {
        let labels: Vec<&str> = FEATURE_SPECS.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                "Age",
                "Sex",
                "Chest Pain Type (cp)",
                "Resting Blood Pressure (trestbps) mm Hg",
                "Serum Cholesterol (chol) mg/dl",
                "Fasting Blood Sugar > 120 mg/dl (fbs)",
                "Resting ECG Results (restecg)",
                "Maximum Heart Rate Achieved (thalach)",
                "Exercise Induced Angina (exang)",
            ]
        );
    }

    #[test]
    fn test_defaults_are_valid() {
        let defaults = ClinicalFeatures::default();
        assert!(defaults.validate().is_ok());
        assert!((defaults.age - 45.0).abs() < f64::EPSILON);
        assert!((defaults.thalach - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_features_to_vec_order() {
        let v = sample().to_vec();
        assert_eq!(v, vec![63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0]);
    }

    #[test]
    fn test_features_from_vec() {
        let f = ClinicalFeatures::from_vec(&sample().to_vec()).expect("Should parse");
        assert_eq!(f, sample());
        assert!(ClinicalFeatures::from_vec(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let invalid = ClinicalFeatures {
            age: 0.0,
            cp: 7.0,
            chol: 99.5,
            ..sample()
        };
        let errors = invalid.validate().expect_err("Should fail");
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("Age"));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let age = &FEATURE_SPECS[0];
        assert!(age.check(1.0).is_ok());
        assert!(age.check(120.0).is_ok());
        assert!(age.check(121.0).is_err());
        assert!(age.check(f64::NAN).is_err());
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(FEATURE_SPECS[1].option_label(1), Some("Male"));
        assert_eq!(FEATURE_SPECS[6].option_label(2), Some("Left ventricular hypertrophy"));
        assert_eq!(FEATURE_SPECS[0].option_label(1), None);
    }
}
