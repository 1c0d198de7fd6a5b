//! Merge user-supplied fields with schema defaults.
//!
//! Resolution never fails on an individual field: absent values take the
//! schema default, unparseable ones take the default and are reported back.
//! Only a payload that is not a field map at all is rejected.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::features::{FeatureRecord, FeatureSchema, WATER_CONTENT, WATER_FIELD};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("expected a JSON object of feature values")]
    NotAnObject,
}

/// How a single field got its value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    Supplied(f64),
    /// Absent or empty; schema default used.
    Defaulted(f64),
    /// Could not be read as a number; schema default used.
    Invalid { original: Value, default: f64 },
    /// Overridden regardless of input (water content).
    Forced(f64),
}

impl FieldOutcome {
    pub fn value(&self) -> f64 {
        match self {
            Self::Supplied(v) | Self::Defaulted(v) | Self::Forced(v) => *v,
            Self::Invalid { default, .. } => *default,
        }
    }
}

/// Resolved raw fields plus what had to be filled in.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub values: FeatureRecord,
    /// Fields filled with defaults, in schema order.
    pub missing: Vec<String>,
    /// Original values that failed numeric coercion.
    pub invalid: BTreeMap<String, Value>,
}

/// Read a scalar as a finite number.
///
/// Strings are trimmed and parsed; booleans, arrays, objects and non-finite
/// results are rejected.
pub fn coerce_number(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn is_absent(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

pub fn resolve_field(name: &str, raw: Option<&Value>, default: f64) -> FieldOutcome {
    if name == WATER_FIELD {
        return FieldOutcome::Forced(WATER_CONTENT);
    }

    match raw {
        Some(raw) if !is_absent(raw) => match coerce_number(raw) {
            Some(v) => FieldOutcome::Supplied(v),
            None => FieldOutcome::Invalid {
                original: raw.clone(),
                default,
            },
        },
        _ => FieldOutcome::Defaulted(default),
    }
}

/// Pick the field map out of a payload: either `{"features": {...}}` or the
/// payload object itself.
pub fn field_map(payload: &Value) -> Result<&Map<String, Value>, ResolveError> {
    let object = payload.as_object().ok_or(ResolveError::NotAnObject)?;
    match object.get("features") {
        Some(Value::Object(inner)) => Ok(inner),
        _ => Ok(object),
    }
}

/// Resolve every schema field from a field map. Unknown keys are ignored.
pub fn resolve_fields(fields: &Map<String, Value>, schema: &FeatureSchema) -> Resolution {
    let mut resolution = Resolution::default();

    for (name, default) in schema.fields() {
        let outcome = resolve_field(name, fields.get(name), default);
        resolution.values.insert(name.to_string(), outcome.value());

        match outcome {
            FieldOutcome::Defaulted(_) => resolution.missing.push(name.to_string()),
            FieldOutcome::Invalid { original, .. } => {
                tracing::debug!(field = name, value = %original, "coerced to default");
                resolution.invalid.insert(name.to_string(), original);
            }
            FieldOutcome::Supplied(_) | FieldOutcome::Forced(_) => {}
        }
    }

    resolution
}

/// Resolve a raw request payload against the schema.
pub fn resolve(payload: &Value, schema: &FeatureSchema) -> Result<Resolution, ResolveError> {
    Ok(resolve_fields(field_map(payload)?, schema))
}
