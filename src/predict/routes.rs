//! HTTP route handlers for the prediction API.

use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;

use crate::error::Result;
use crate::AppState;

use super::models::{CurveRequest, CurveResponse, PredictResponse, SchemaResponse};
use super::resolver::ResolveError;
use super::service;

/// Create the prediction router with all endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feature-schema", get(feature_schema))
        .route("/predict", post(predict))
        .route("/predict-curve", post(predict_curve))
}

/// Feature names and their defaults.
async fn feature_schema(State(state): State<AppState>) -> Json<SchemaResponse> {
    Json(service::get_schema(&state.schema))
}

/// Parse a JSON body regardless of its declared content type.
fn parse_body(body: &Bytes) -> std::result::Result<Value, ResolveError> {
    serde_json::from_slice(body).map_err(|e| ResolveError::InvalidJson(e.to_string()))
}

/// Predict hydrate formation temperature from (partial) raw fields.
async fn predict(State(state): State<AppState>, body: Bytes) -> Result<Json<PredictResponse>> {
    let payload = parse_body(&body)?;
    let response = service::predict_one(&state.schema, &state.predictor, &payload)?;
    Ok(Json(response))
}

/// Predicted temperature across a linear pressure range.
async fn predict_curve(State(state): State<AppState>, body: Bytes) -> Result<Json<CurveResponse>> {
    let payload = parse_body(&body)?;
    if !payload.is_object() {
        return Err(ResolveError::NotAnObject.into());
    }
    let request: CurveRequest = serde_json::from_value(payload)
        .map_err(|e| ResolveError::InvalidJson(e.to_string()))?;

    let response = service::predict_curve(
        &state.schema,
        &state.predictor,
        &request,
        state.max_curve_points,
    )?;
    Ok(Json(response))
}
