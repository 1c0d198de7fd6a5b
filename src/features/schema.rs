//! Raw feature schema: field names and their defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use super::{COMPOSITION_FIELDS, PRESSURE_FIELD, WATER_FIELD};

/// Failure to load the schema document. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema must be a JSON object of field name to default value")]
    NotAnObject,
    #[error("default for field {field} is not a finite number: {value}")]
    InvalidDefault { field: String, value: Value },
    #[error("schema is missing required field {0}")]
    MissingField(String),
}

/// Ordered raw field names with a default value for each.
///
/// Loaded once and shared read-only for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    defaults: BTreeMap<String, f64>,
}

impl FeatureSchema {
    /// Load the schema from a JSON file such as `data/data_sample.json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaLoadError> {
        let value: Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(SchemaLoadError::NotAnObject)?;

        let mut names = Vec::with_capacity(object.len());
        let mut defaults = BTreeMap::new();

        for (field, raw) in object {
            let default = parse_default(raw).ok_or_else(|| SchemaLoadError::InvalidDefault {
                field: field.clone(),
                value: raw.clone(),
            })?;
            names.push(field.clone());
            defaults.insert(field.clone(), default);
        }

        let required = COMPOSITION_FIELDS
            .iter()
            .copied()
            .chain([WATER_FIELD, PRESSURE_FIELD]);
        for field in required {
            if !defaults.contains_key(field) {
                return Err(SchemaLoadError::MissingField(field.to_string()));
            }
        }

        Ok(Self { names, defaults })
    }

    /// Field names in document order.
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    pub fn defaults(&self) -> &BTreeMap<String, f64> {
        &self.defaults
    }

    /// `(name, default)` pairs in document order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(|name| (name.as_str(), self.defaults[name]))
    }

    pub fn default_for(&self, field: &str) -> Option<f64> {
        self.defaults.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn parse_default(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}
