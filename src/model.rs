use crate::errors::{HydraError, HydraResult};
use crate::features::FEATURE_COUNT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tract_onnx::prelude::*;

/// Regression model queried with one normalized feature row
pub trait RegressionModel: Send + Sync {
    /// Identifier reported alongside each prediction
    fn model_id(&self) -> &str;

    /// Expected input width, when the model format records it
    fn n_features(&self) -> Option<usize>;

    fn predict(&self, features: &[f64]) -> HydraResult<f64>;
}

/// Load a model, picking the format from the file extension.
pub fn load_model<P: AsRef<Path>>(path: P) -> HydraResult<Box<dyn RegressionModel>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Box::new(LinearRegressor::from_file(path)?)),
        Some("onnx") => Ok(Box::new(OnnxRegressor::from_file(path, FEATURE_COUNT)?)),
        other => Err(HydraError::artifact_load(
            "model",
            format!("unsupported model format: {}", other.unwrap_or("<none>")),
        )),
    }
}

/// Linear regression exported as JSON weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(default = "default_linear_id")]
    pub model_id: String,
    pub bias: f64,
    pub weights: Vec<f64>,
}

fn default_linear_id() -> String {
    "linear_v1".to_string()
}

impl LinearRegressor {
    pub fn new(bias: f64, weights: Vec<f64>) -> Self {
        Self {
            model_id: default_linear_id(),
            bias,
            weights,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> HydraResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HydraError::io(format!("reading model {}", path.display()), e))?;
        let model: LinearRegressor = serde_json::from_str(&content)
            .map_err(|e| HydraError::artifact_load("model", format!("invalid JSON: {e}")))?;

        if model.weights.is_empty() {
            return Err(HydraError::artifact_load("model", "no weights"));
        }
        if !model.bias.is_finite() || model.weights.iter().any(|w| !w.is_finite()) {
            return Err(HydraError::artifact_load("model", "non-finite weight"));
        }
        Ok(model)
    }
}

impl RegressionModel for LinearRegressor {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.weights.len())
    }

    fn predict(&self, features: &[f64]) -> HydraResult<f64> {
        if features.len() != self.weights.len() {
            return Err(HydraError::inference(format!(
                "expected {} features, got {}",
                self.weights.len(),
                features.len()
            )));
        }

        // bias + sum(weight_i * feature_i)
        Ok(self.bias
            + features
                .iter()
                .zip(self.weights.iter())
                .map(|(f, w)| f * w)
                .sum::<f64>())
    }
}

/// Network exported to ONNX, executed with tract
pub struct OnnxRegressor {
    model_id: String,
    n_features: usize,
    plan: TypedRunnableModel<TypedModel>,
}

impl OnnxRegressor {
    /// Load and optimize an ONNX graph taking a `[1, n_features]` f32 input.
    pub fn from_file<P: AsRef<Path>>(path: P, n_features: usize) -> HydraResult<Self> {
        let path = path.as_ref();
        let load_err = |e: TractError| HydraError::artifact_load("model", e.to_string());

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, n_features]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(load_err)?;

        let model_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx")
            .to_string();

        tracing::info!(model_id = %model_id, n_features, "ONNX model loaded");

        Ok(Self {
            model_id,
            n_features,
            plan,
        })
    }
}

impl RegressionModel for OnnxRegressor {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, features: &[f64]) -> HydraResult<f64> {
        if features.len() != self.n_features {
            return Err(HydraError::inference(format!(
                "expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        let row: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, row.len()), row)
            .map_err(|e| HydraError::inference(e.to_string()))?
            .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| HydraError::inference(e.to_string()))?;

        let first = outputs
            .first()
            .ok_or_else(|| HydraError::inference("model produced no outputs"))?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| HydraError::inference(e.to_string()))?;
        let value = view
            .iter()
            .next()
            .copied()
            .ok_or_else(|| HydraError::inference("model produced an empty output"))?;

        if !value.is_finite() {
            return Err(HydraError::inference("model produced a non-finite value"));
        }
        Ok(value as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_model_combines_weights_and_bias() {
        let model = LinearRegressor::new(1.0, vec![2.0, -0.5]);
        let y = model.predict(&[3.0, 4.0]).unwrap();
        assert_eq!(y, 1.0 + 6.0 - 2.0);
    }

    #[test]
    fn linear_model_rejects_wrong_width() {
        let model = LinearRegressor::new(0.0, vec![1.0; 3]);
        assert!(model.predict(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn unknown_extension_is_a_load_error() {
        match load_model("water_requirement_model.h5") {
            Err(HydraError::ArtifactLoad { message, .. }) => assert!(message.contains("h5")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("h5 models are not supported"),
        }
    }

    #[test]
    fn corrupt_onnx_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.onnx");
        std::fs::write(&path, b"not a protobuf").unwrap();
        assert!(OnnxRegressor::from_file(&path, FEATURE_COUNT).is_err());
    }
}
