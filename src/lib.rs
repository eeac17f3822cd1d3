//! # Heartrisk
//!
//! Heart disease risk assessment from nine clinical measurements.
//!
//! This crate provides:
//! - Inference against a pre-trained classifier exported as JSON
//! - A static table mapping prediction codes (0-4) to risk tiers
//! - Terminal UI for entering measurements and reading the result
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (ClinicalFeatures, RiskTier, Assessment)
//! - `ports`: Trait definitions for external operations (Classifier)
//! - `adapters`: Concrete implementations (JSON model, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, ClinicalFeatures, RiskTier};

/// Result type for Heartrisk operations
pub type Result<T> = std::result::Result<T, HeartRiskError>;

/// Main error type for Heartrisk
#[derive(Debug, thiserror::Error)]
pub enum HeartRiskError {
    #[error("Model operation failed: {0}")]
    Model(#[from] ports::ClassifierError),

    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),
}
