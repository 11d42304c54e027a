//! Library root for the `hydra_irrigation` crate
//!
//! Irrigation water requirement prediction from six environmental
//! readings: feature transform, pre-fitted scaler, regression model.

// Core error handling
pub mod errors;

// Readings and derived features
pub mod features;
pub mod radar;
pub mod reading;

// Artifacts and inference
pub mod adapter;
pub mod artifacts;
pub mod model;
pub mod scaler;

// Configuration & logging
pub mod config;
pub mod telemetry;

// CLI and web interface
pub mod cli;
pub mod web;

pub use adapter::{InferenceAdapter, PredictionResult};
pub use errors::{HydraError, HydraResult};
pub use features::{FeatureVector, FEATURE_COUNT};
pub use model::RegressionModel;
pub use reading::RawReading;
