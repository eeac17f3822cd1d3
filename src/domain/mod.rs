//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O. Feature validation and the risk tier table
//! live here.

mod assessment;
mod patient;
mod risk;

pub use assessment::Assessment;
pub use patient::{
    ClinicalFeatures, FeatureKind, FeatureSpec, FEATURE_COUNT, FEATURE_NAMES, FEATURE_SPECS,
};
pub use risk::{AlertKind, RiskTier, MAX_LEVEL};
