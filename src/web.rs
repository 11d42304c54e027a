use crate::adapter::{AdapterStatus, InferenceAdapter, PredictionResult};
use crate::errors::{HydraError, HydraResult};
use crate::features::FeatureVector;
use crate::radar::RadarProfile;
use crate::reading::RawReading;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub water_requirement: f64,
    pub display: String,
    pub model_id: String,
    pub features: FeatureVector,
    pub radar: RadarProfile,
    pub predicted_at: chrono::DateTime<chrono::Utc>,
}

impl PredictResponse {
    pub fn new(reading: &RawReading, result: PredictionResult) -> Self {
        Self {
            water_requirement: result.water_requirement,
            display: result.to_string(),
            model_id: result.model_id,
            features: result.features,
            radar: RadarProfile::from_reading(reading),
            predicted_at: result.predicted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub names: Vec<&'static str>,
    pub values: FeatureVector,
}

/// Build the router exposing prediction endpoints and health checks
pub fn build_router(adapter: InferenceAdapter) -> Router {
    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/features", post(features))
        .route("/api/radar", post(radar))
        .route("/api/status", get(status))
        // versioned aliases
        .route("/v1/predict", post(predict))
        .route("/v1/status", get(status))
        // health endpoints
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .with_state(adapter)
}

/// Bind and serve until the process is stopped
pub async fn serve(adapter: InferenceAdapter, host: &str, port: u16) -> HydraResult<()> {
    let app = build_router(adapter);
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| HydraError::io(format!("binding {host}:{port}"), e))?;

    tracing::info!(%host, port, "Serving prediction API");
    axum::serve(listener, app)
        .await
        .map_err(|e| HydraError::io("serving HTTP", e))
}

/// A well-formed body that also passes range checks. Malformed JSON,
/// missing fields and wrongly typed fields all answer 400 with the
/// rejection text.
fn checked_reading(payload: Result<Json<RawReading>, JsonRejection>) -> HydraResult<RawReading> {
    let Json(reading) =
        payload.map_err(|rejection| HydraError::validation("body", rejection.body_text()))?;
    reading.validated()
}

#[axum::debug_handler]
async fn predict(
    State(adapter): State<InferenceAdapter>,
    payload: Result<Json<RawReading>, JsonRejection>,
) -> HydraResult<Json<PredictResponse>> {
    let reading = checked_reading(payload)?;
    let result = adapter.predict(&reading)?;
    Ok(Json(PredictResponse::new(&reading, result)))
}

async fn features(
    payload: Result<Json<RawReading>, JsonRejection>,
) -> HydraResult<Json<FeaturesResponse>> {
    let reading = checked_reading(payload)?;
    Ok(Json(FeaturesResponse {
        names: FeatureVector::names().to_vec(),
        values: FeatureVector::from_reading(&reading),
    }))
}

async fn radar(
    payload: Result<Json<RawReading>, JsonRejection>,
) -> HydraResult<Json<RadarProfile>> {
    let reading = checked_reading(payload)?;
    Ok(Json(RadarProfile::from_reading(&reading)))
}

async fn status(State(adapter): State<InferenceAdapter>) -> Json<AdapterStatus> {
    Json(adapter.status())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(State(adapter): State<InferenceAdapter>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ready": adapter.is_ready() }))
}
