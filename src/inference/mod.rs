//! Model inference.
//!
//! The trained model is consumed as an opaque [`HydrateModel`]. Models are
//! exported to a JSON artifact and loaded once at startup; the [`Predictor`]
//! runs normalization and feature derivation before every model call.

mod artifact;
mod linear;
mod pipeline;
mod tree;

pub use artifact::{load_model, LoadedModel, ModelArtifact, ModelLoadError};
pub use linear::{LinearModel, LinearTerm, Transform};
pub use pipeline::{round_for_display, PredictError, Predictor};
pub use tree::{Tree, TreeEnsemble, TreeNode};

use crate::features::FeatureRecord;

/// Errors from a single model evaluation.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model input is missing feature {0}")]
    MissingFeature(String),
    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
    #[error("malformed tree: {0}")]
    MalformedTree(String),
}

/// A trained regression model predicting hydrate formation temperature (°C).
pub trait HydrateModel: Send + Sync {
    /// Predict from a record holding raw and derived features.
    fn predict(&self, features: &FeatureRecord) -> Result<f64, InferenceError>;

    /// Names of the features this model reads.
    fn feature_names(&self) -> Vec<&str>;

    /// Short model family identifier, e.g. `linear`.
    fn kind(&self) -> &'static str;
}

fn lookup(features: &FeatureRecord, name: &str) -> Result<f64, InferenceError> {
    features
        .get(name)
        .copied()
        .ok_or_else(|| InferenceError::MissingFeature(name.to_string()))
}
