use crate::errors::{HydraError, HydraResult};
use crate::features::FEATURE_COUNT;
use crate::model::{load_model, RegressionModel};
use crate::scaler::Scaler;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_PATH: &str = "water_requirement_model.onnx";
pub const DEFAULT_SCALER_PATH: &str = "scaler.json";

/// Where the trained model and fitted scaler live on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            scaler_path: PathBuf::from(DEFAULT_SCALER_PATH),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
        }
    }

    /// Both paths resolved against `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_MODEL_PATH), dir.join(DEFAULT_SCALER_PATH))
    }

    /// First artifact that is not present on disk, if any
    pub fn first_missing(&self) -> Option<(&'static str, &Path)> {
        if !self.model_path.exists() {
            return Some(("model", self.model_path.as_path()));
        }
        if !self.scaler_path.exists() {
            return Some(("scaler", self.scaler_path.as_path()));
        }
        None
    }
}

/// A loaded scaler + model pair, shared read-only across predictions
pub struct Artifacts {
    pub scaler: Scaler,
    pub model: Box<dyn RegressionModel>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("scaler_features", &self.scaler.n_features())
            .field("model_id", &self.model.model_id())
            .finish()
    }
}

impl Artifacts {
    /// Pair an already-built scaler and model, checking they fit the
    /// feature layout.
    pub fn new(scaler: Scaler, model: Box<dyn RegressionModel>) -> HydraResult<Self> {
        if scaler.n_features() != FEATURE_COUNT {
            return Err(HydraError::artifact_load(
                "scaler",
                format!(
                    "fitted on {} features, expected {FEATURE_COUNT}",
                    scaler.n_features()
                ),
            ));
        }
        if let Some(width) = model.n_features() {
            if width != FEATURE_COUNT {
                return Err(HydraError::artifact_load(
                    "model",
                    format!("takes {width} features, expected {FEATURE_COUNT}"),
                ));
            }
        }
        Ok(Self { scaler, model })
    }

    /// Load both artifacts from disk.
    ///
    /// Absent files are reported before anything is parsed. Any failure,
    /// including a file that exists but cannot be parsed, comes back as
    /// `ArtifactsMissing` naming the offending artifact.
    pub fn load(paths: &ArtifactPaths) -> HydraResult<Self> {
        if let Some((artifact, path)) = paths.first_missing() {
            return Err(HydraError::artifacts_missing(
                artifact,
                path.display().to_string(),
                "file not found",
            ));
        }

        let model = load_model(&paths.model_path)
            .map_err(|e| unloadable("model", &paths.model_path, e))?;
        let scaler = Scaler::from_file(&paths.scaler_path)
            .map_err(|e| unloadable("scaler", &paths.scaler_path, e))?;
        let artifacts = Self::new(scaler, model).map_err(|e| {
            let scaler_at_fault =
                matches!(&e, HydraError::ArtifactLoad { artifact, .. } if artifact == "scaler");
            if scaler_at_fault {
                unloadable("scaler", &paths.scaler_path, e)
            } else {
                unloadable("model", &paths.model_path, e)
            }
        })?;

        tracing::info!(
            model = %paths.model_path.display(),
            scaler = %paths.scaler_path.display(),
            model_id = artifacts.model.model_id(),
            "Artifacts loaded"
        );
        Ok(artifacts)
    }
}

fn unloadable(artifact: &str, path: &Path, err: HydraError) -> HydraError {
    HydraError::artifacts_missing(artifact, path.display().to_string(), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearRegressor;

    #[test]
    fn missing_model_is_reported_first() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());

        match Artifacts::load(&paths) {
            Err(HydraError::ArtifactsMissing { artifact, .. }) => assert_eq!(artifact, "model"),
            other => panic!("expected missing model, got {other:?}"),
        }
    }

    #[test]
    fn missing_scaler_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("model.json"), dir.path().join("scaler.json"));
        std::fs::write(&paths.model_path, r#"{"bias":0.0,"weights":[1,1,1,1,1,1,1,1,1,1,1]}"#)
            .unwrap();

        match Artifacts::load(&paths) {
            Err(HydraError::ArtifactsMissing { artifact, .. }) => assert_eq!(artifact, "scaler"),
            other => panic!("expected missing scaler, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_scaler_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("model.json"), dir.path().join("scaler.json"));
        std::fs::write(&paths.model_path, r#"{"bias":0.0,"weights":[1,1,1,1,1,1,1,1,1,1,1]}"#)
            .unwrap();
        std::fs::write(&paths.scaler_path, "{ not json").unwrap();

        match Artifacts::load(&paths) {
            Err(HydraError::ArtifactsMissing { artifact, reason, .. }) => {
                assert_eq!(artifact, "scaler");
                assert!(reason.contains("invalid JSON"));
            }
            other => panic!("expected unloadable scaler, got {other:?}"),
        }
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let scaler = Scaler::Standard {
            mean: vec![0.0; 5],
            scale: vec![1.0; 5],
        };
        let model = Box::new(LinearRegressor::new(0.0, vec![1.0; FEATURE_COUNT]));
        assert!(Artifacts::new(scaler, model).is_err());

        let scaler = Scaler::Standard {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        };
        let model = Box::new(LinearRegressor::new(0.0, vec![1.0; 4]));
        assert!(Artifacts::new(scaler, model).is_err());
    }
}
