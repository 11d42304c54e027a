//! Inference adapter: RawReading -> FeatureVector -> scaled row -> prediction.
//!
//! The adapter owns the loaded [`Artifacts`] behind an `Arc`, so cloning it
//! is cheap and every clone shares the same read-only model. When the
//! artifacts cannot be loaded the adapter still constructs, but every
//! prediction short-circuits with `ArtifactsMissing`.

use crate::artifacts::{ArtifactPaths, Artifacts};
use crate::config::{load_config, HydraConfig};
use crate::errors::{HydraError, HydraResult};
use crate::features::FeatureVector;
use crate::model::RegressionModel;
use crate::reading::RawReading;
use crate::scaler::Scaler;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

lazy_static! {
    static ref GLOBAL_ADAPTER: InferenceAdapter = {
        let config = load_config(None).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default configuration");
            HydraConfig::default()
        });
        InferenceAdapter::from_config(&config)
    };
}

/// Predicted water requirement for one reading
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub water_requirement: f64,
    pub model_id: String,
    pub features: FeatureVector,
    pub predicted_at: DateTime<Utc>,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} Units", self.water_requirement)
    }
}

/// Why the adapter cannot predict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unavailable {
    pub artifact: String,
    pub path: String,
    pub reason: String,
}

impl Unavailable {
    fn to_error(&self) -> HydraError {
        HydraError::artifacts_missing(&self.artifact, &self.path, &self.reason)
    }
}

#[derive(Debug, Clone)]
enum ArtifactState {
    Ready(Arc<Artifacts>),
    Unavailable(Unavailable),
}

/// Snapshot of the adapter's artifact state for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct AdapterStatus {
    pub ready: bool,
    pub model_id: Option<String>,
    pub unavailable: Option<Unavailable>,
}

#[derive(Debug, Clone)]
pub struct InferenceAdapter {
    state: ArtifactState,
}

impl InferenceAdapter {
    pub fn new(artifacts: Artifacts) -> Self {
        Self {
            state: ArtifactState::Ready(Arc::new(artifacts)),
        }
    }

    /// Build from an in-memory scaler and any model implementation.
    pub fn with_parts(scaler: Scaler, model: Box<dyn RegressionModel>) -> HydraResult<Self> {
        Ok(Self::new(Artifacts::new(scaler, model)?))
    }

    /// An adapter that refuses every prediction with the given reason.
    pub fn unavailable(
        artifact: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            state: ArtifactState::Unavailable(Unavailable {
                artifact: artifact.into(),
                path: path.into(),
                reason: reason.into(),
            }),
        }
    }

    /// Load artifacts from disk, degrading to the unavailable state on any
    /// failure instead of returning an error.
    pub fn from_paths(paths: &ArtifactPaths) -> Self {
        match Artifacts::load(paths) {
            Ok(artifacts) => Self::new(artifacts),
            Err(HydraError::ArtifactsMissing {
                artifact,
                path,
                reason,
            }) => {
                tracing::warn!(%artifact, %path, %reason, "Artifacts unavailable, predictions disabled");
                Self::unavailable(artifact, path, reason)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Artifacts failed to load, predictions disabled");
                Self::unavailable("artifacts", "", e.to_string())
            }
        }
    }

    pub fn from_config(config: &HydraConfig) -> Self {
        Self::from_paths(&config.artifacts)
    }

    /// Process-wide adapter, initialized on first use from the default
    /// configuration and never reloaded.
    pub fn global() -> &'static InferenceAdapter {
        &GLOBAL_ADAPTER
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ArtifactState::Ready(_))
    }

    pub fn status(&self) -> AdapterStatus {
        match &self.state {
            ArtifactState::Ready(artifacts) => AdapterStatus {
                ready: true,
                model_id: Some(artifacts.model.model_id().to_string()),
                unavailable: None,
            },
            ArtifactState::Unavailable(why) => AdapterStatus {
                ready: false,
                model_id: None,
                unavailable: Some(why.clone()),
            },
        }
    }

    /// Predict the water requirement for a reading.
    ///
    /// The reading is not validated here; surfaces validate before calling.
    pub fn predict(&self, reading: &RawReading) -> HydraResult<PredictionResult> {
        let artifacts = self.artifacts()?;
        let features = FeatureVector::from_reading(reading);
        Self::run(artifacts, features)
    }

    pub fn predict_features(&self, features: &FeatureVector) -> HydraResult<PredictionResult> {
        let artifacts = self.artifacts()?;
        Self::run(artifacts, *features)
    }

    fn artifacts(&self) -> HydraResult<&Artifacts> {
        match &self.state {
            ArtifactState::Ready(artifacts) => Ok(artifacts.as_ref()),
            ArtifactState::Unavailable(why) => Err(why.to_error()),
        }
    }

    fn run(artifacts: &Artifacts, features: FeatureVector) -> HydraResult<PredictionResult> {
        tracing::debug!(features = ?features.as_slice(), "Feature vector");

        let scaled = artifacts.scaler.transform(features.as_slice());
        let water_requirement = artifacts.model.predict(&scaled)?;

        tracing::info!(
            model_id = artifacts.model.model_id(),
            water_requirement,
            "Prediction complete"
        );

        Ok(PredictionResult {
            water_requirement,
            model_id: artifacts.model.model_id().to_string(),
            features,
            predicted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;
    use crate::model::LinearRegressor;

    fn identity_scaler() -> Scaler {
        Scaler::Standard {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    #[test]
    fn unavailable_adapter_refuses_every_reading() {
        let adapter = InferenceAdapter::unavailable("model", "missing.onnx", "file not found");
        assert!(!adapter.is_ready());

        for reading in [RawReading::default(), RawReading::new(-5.0, 200.0, 0.0, 0.0, 0.0, 20.0)] {
            let err = adapter.predict(&reading).unwrap_err();
            assert!(err.is_artifacts_missing());
        }
    }

    #[test]
    fn display_uses_two_decimals() {
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[0] = 0.1;
        let adapter = InferenceAdapter::with_parts(
            identity_scaler(),
            Box::new(LinearRegressor::new(0.0, weights)),
        )
        .unwrap();

        let result = adapter.predict(&RawReading::default()).unwrap();
        assert_eq!(result.to_string(), "2.50 Units");
    }

    #[test]
    fn status_reports_model_id() {
        let adapter = InferenceAdapter::with_parts(
            identity_scaler(),
            Box::new(LinearRegressor::new(1.0, vec![0.0; FEATURE_COUNT])),
        )
        .unwrap();
        let status = adapter.status();
        assert!(status.ready);
        assert_eq!(status.model_id.as_deref(), Some("linear_v1"));
    }
}
