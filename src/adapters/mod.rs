//! Adapters layer: Concrete implementations of ports.
//!
//! - `model`: JSON model artifacts (logistic regression, tree ensembles)
//! - `sanitize`: clinical value filtering for logs

pub mod model;
pub mod sanitize;
