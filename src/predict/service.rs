//! Prediction services behind the HTTP handlers.

use serde_json::{Map, Value};

use super::models::{CurveRequest, CurveResponse, PredictResponse, SchemaResponse, UNITS};
use super::resolver::{resolve, resolve_fields, ResolveError};
use super::sweep::{sweep, PressureRange};
use crate::error::Result;
use crate::features::{FeatureSchema, PRESSURE_FIELD};
use crate::inference::Predictor;

const SCHEMA_NOTE: &str =
    "POST these fields to /api/predict. Missing fields are filled with the defaults.";

pub fn get_schema(schema: &FeatureSchema) -> SchemaResponse {
    SchemaResponse {
        feature_names: schema.feature_names().to_vec(),
        defaults: schema.defaults().clone(),
        note: SCHEMA_NOTE,
    }
}

/// Resolve a raw payload and predict once.
pub fn predict_one(
    schema: &FeatureSchema,
    predictor: &Predictor,
    payload: &Value,
) -> Result<PredictResponse> {
    let resolution = resolve(payload, schema)?;
    let prediction = predictor.predict(&resolution.values)?;

    tracing::debug!(
        prediction,
        defaulted = resolution.missing.len(),
        invalid = resolution.invalid.len(),
        "predicted hydrate temperature"
    );

    Ok(PredictResponse {
        prediction,
        units: UNITS.to_string(),
        used_features: resolution.values,
        filled_with_defaults: resolution.missing,
        coerced_to_defaults_due_to_parse_error: resolution.invalid,
    })
}

/// Validate the range, resolve the composition and sweep pressure.
pub fn predict_curve(
    schema: &FeatureSchema,
    predictor: &Predictor,
    request: &CurveRequest,
    max_points: usize,
) -> Result<CurveResponse> {
    let range = PressureRange::from_json(
        &request.p_min,
        &request.p_max,
        &request.n_points,
        max_points,
    )?;

    let empty = Map::new();
    let fields = match &request.composition {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(ResolveError::NotAnObject.into()),
    };

    let mut resolution = resolve_fields(fields, schema);
    resolution.missing.retain(|f| f != PRESSURE_FIELD);
    resolution.invalid.remove(PRESSURE_FIELD);

    let curve = sweep(predictor, &resolution.values, &range)?;

    tracing::debug!(
        p_min = range.p_min(),
        p_max = range.p_max(),
        n_points = range.n_points(),
        "generated hydrate curve"
    );

    Ok(CurveResponse {
        pressures: curve.pressures,
        temperatures: curve.temperatures,
        p_min: range.p_min(),
        p_max: range.p_max(),
        n_points: range.n_points(),
        units: UNITS.to_string(),
        filled_with_defaults: resolution.missing,
        coerced_to_defaults_due_to_parse_error: resolution.invalid,
    })
}
