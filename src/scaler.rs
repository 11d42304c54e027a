//! Pre-fitted normalization applied to the feature vector before inference.
//!
//! The fitted parameters are exported to JSON next to the model, e.g.
//!
//! ```json
//! { "kind": "standard", "mean": [25.0, 5.0], "scale": [8.1, 2.4] }
//! ```

use crate::errors::{HydraError, HydraResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard {
        #[serde(alias = "mean_")]
        mean: Vec<f64>,
        #[serde(alias = "scale_")]
        scale: Vec<f64>,
    },
    /// `x * scale + min`
    MinMax {
        #[serde(alias = "min_")]
        min: Vec<f64>,
        #[serde(alias = "scale_")]
        scale: Vec<f64>,
    },
}

impl Scaler {
    /// Load a fitted scaler from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> HydraResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HydraError::io(format!("reading scaler {}", path.display()), e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> HydraResult<Self> {
        let scaler: Scaler = serde_json::from_str(content)
            .map_err(|e| HydraError::artifact_load("scaler", format!("invalid JSON: {e}")))?;
        scaler.check()?;
        Ok(scaler)
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }

    fn check(&self) -> HydraResult<()> {
        let (offsets, scale) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { min, scale } => (min, scale),
        };

        if offsets.is_empty() {
            return Err(HydraError::artifact_load("scaler", "no fitted features"));
        }
        if offsets.len() != scale.len() {
            return Err(HydraError::artifact_load(
                "scaler",
                format!(
                    "parameter length mismatch: {} offsets vs {} scales",
                    offsets.len(),
                    scale.len()
                ),
            ));
        }
        if offsets.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(HydraError::artifact_load("scaler", "non-finite parameter"));
        }
        Ok(())
    }

    /// Normalize one feature row.
    ///
    /// The caller is responsible for passing exactly `n_features()` values;
    /// the adapter checks this once at load time.
    pub fn transform(&self, features: &[f64]) -> Vec<f64> {
        match self {
            Scaler::Standard { mean, scale } => features
                .iter()
                .zip(mean.iter().zip(scale.iter()))
                .map(|(x, (m, s))| {
                    // constant features are fitted with zero spread
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    (x - m) / s
                })
                .collect(),
            Scaler::MinMax { min, scale } => features
                .iter()
                .zip(min.iter().zip(scale.iter()))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_scaler_centers_and_scales() {
        let scaler = Scaler::Standard {
            mean: vec![10.0, 0.0],
            scale: vec![2.0, 0.0],
        };
        assert_eq!(scaler.transform(&[14.0, 3.0]), vec![2.0, 3.0]);
    }

    #[test]
    fn min_max_scaler_applies_affine_map() {
        let scaler = Scaler::MinMax {
            min: vec![-1.0],
            scale: vec![0.02],
        };
        let out = scaler.transform(&[50.0]);
        assert!((out[0] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn accepts_fitted_attribute_names() {
        let scaler =
            Scaler::from_json(r#"{"kind":"standard","mean_":[1.0,2.0],"scale_":[1.0,1.0]}"#)
                .unwrap();
        assert_eq!(scaler.n_features(), 2);
    }

    #[test]
    fn rejects_mismatched_parameters() {
        let err = Scaler::from_json(r#"{"kind":"standard","mean":[1.0,2.0],"scale":[1.0]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Scaler::from_json(r#"{"kind":"robust","center":[0.0]}"#).is_err());
    }
}
