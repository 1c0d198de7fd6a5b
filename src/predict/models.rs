//! Request and response payloads for the prediction API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::features::FeatureRecord;

/// Temperature unit reported with every prediction.
pub const UNITS: &str = "C";

/// Response payload for a single prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Hydrate formation temperature
    pub prediction: f64,
    pub units: String,
    /// Raw fields after defaulting and coercion
    pub used_features: FeatureRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filled_with_defaults: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coerced_to_defaults_due_to_parse_error: BTreeMap<String, Value>,
}

/// Request payload for a pressure sweep.
///
/// Range parameters are kept as raw JSON so malformed values surface as sweep
/// validation errors rather than body rejections.
#[derive(Debug, Deserialize)]
pub struct CurveRequest {
    #[serde(default, alias = "features")]
    pub composition: Option<Value>,
    #[serde(default)]
    pub p_min: Value,
    #[serde(default)]
    pub p_max: Value,
    #[serde(default)]
    pub n_points: Value,
}

/// Response payload for a pressure sweep.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurveResponse {
    pub pressures: Vec<f64>,
    pub temperatures: Vec<f64>,
    pub p_min: f64,
    pub p_max: f64,
    pub n_points: usize,
    pub units: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filled_with_defaults: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coerced_to_defaults_due_to_parse_error: BTreeMap<String, Value>,
}

/// Schema introspection payload.
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub feature_names: Vec<String>,
    pub defaults: BTreeMap<String, f64>,
    pub note: &'static str,
}
