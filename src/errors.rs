//! Error handling for the HydraAI inference crate
//!
//! Every fallible operation in the library returns [`HydraResult`]. The
//! binaries wrap these in `anyhow` at the top level.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the inference adapter and its surfaces
#[derive(Error, Debug)]
pub enum HydraError {
    #[error("Artifacts unavailable: {artifact} at {path} ({reason})")]
    ArtifactsMissing {
        artifact: String,
        path: String,
        reason: String,
    },

    #[error("Failed to load {artifact}: {message}")]
    ArtifactLoad { artifact: String, message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Inference failed: {message}")]
    Inference { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Type alias for Result with HydraError
pub type HydraResult<T> = Result<T, HydraError>;

impl HydraError {
    /// Create an artifacts-missing error
    pub fn artifacts_missing(
        artifact: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ArtifactsMissing {
            artifact: artifact.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an artifact load error
    pub fn artifact_load(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an inference error
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// True when the error means no prediction can be made until the
    /// artifacts are provided.
    pub fn is_artifacts_missing(&self) -> bool {
        matches!(self, HydraError::ArtifactsMissing { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            HydraError::Validation { .. } => StatusCode::BAD_REQUEST,
            HydraError::ArtifactsMissing { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HydraError::ArtifactLoad { .. }
            | HydraError::Inference { .. }
            | HydraError::Config { .. }
            | HydraError::Io { .. }
            | HydraError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for HydraError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(ErrBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for HydraError {
    fn from(err: serde_json::Error) -> Self {
        HydraError::serialization("json_operation", err)
    }
}

/// Convert from std::io errors
impl From<std::io::Error> for HydraError {
    fn from(err: std::io::Error) -> Self {
        HydraError::io("io_operation", err)
    }
}

/// Convert from figment errors
impl From<figment::Error> for HydraError {
    fn from(err: figment::Error) -> Self {
        HydraError::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let missing = HydraError::artifacts_missing("model", "model.onnx", "file not found");
        assert!(missing.to_string().contains("Artifacts unavailable"));
        assert!(missing.is_artifacts_missing());

        let invalid = HydraError::validation("humidity", "must be within [0, 100]");
        assert!(invalid.to_string().contains("humidity"));
        assert!(!invalid.is_artifacts_missing());
    }

    #[test]
    fn test_error_chaining() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let hydra_err = HydraError::io("reading scaler", io_err);

        assert!(hydra_err.source().is_some());
        assert!(hydra_err.to_string().contains("I/O operation failed"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            HydraError::validation("soilPh", "off grid").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HydraError::artifacts_missing("scaler", "scaler.json", "absent").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HydraError::inference("nan output").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HydraError::config("config file not found: typo.toml").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
