//! Feature engineering for the hydrate model.
//!
//! Raw inputs are a gas composition (mole fractions), a water content and a
//! pressure. Before every model call the composition is rescaled to sum to one
//! and six ratio/aggregate features are derived from it.

mod composition;
mod derive;
mod schema;

use std::collections::BTreeMap;

pub use composition::{normalize, Composition, COMPOSITION_FIELDS};
pub use derive::{derive, DerivedFeatures, DERIVED_FIELDS};
pub use schema::{FeatureSchema, SchemaLoadError};

/// Named numeric fields handed through the pipeline.
pub type FeatureRecord = BTreeMap<String, f64>;

/// Water content field, always forced to [`WATER_CONTENT`].
pub const WATER_FIELD: &str = "H2O";

/// Fixed water content used for every prediction.
pub const WATER_CONTENT: f64 = 0.07;

/// Pressure field swept by the curve generator.
pub const PRESSURE_FIELD: &str = "Pc";

/// Errors raised while transforming a record into model features.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("composition field {0} is missing")]
    MissingField(String),
    #[error("composition fractions sum to zero; cannot normalize")]
    ZeroComposition,
    #[error("composition fractions do not sum to a finite total ({0})")]
    NonFiniteTotal(f64),
    #[error("composition field {field} is not finite after normalization ({value})")]
    NonFinite { field: String, value: f64 },
}

/// Every name the model may reference: raw schema fields plus derived ones.
pub fn model_input_names(schema: &FeatureSchema) -> Vec<String> {
    schema
        .feature_names()
        .iter()
        .cloned()
        .chain(DERIVED_FIELDS.iter().map(|s| s.to_string()))
        .collect()
}
