//! Normalize → derive → model.

use std::sync::Arc;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{HydrateModel, InferenceError};
use crate::features::{derive, normalize, FeatureError, FeatureRecord};

/// Failure anywhere in the prediction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Wraps the loaded model behind a single predict call.
///
/// The model's feature contract assumes normalized composition plus derived
/// fields, so both transforms always run, in that order, before inference.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn HydrateModel>,
}

impl Predictor {
    pub fn new(model: Arc<dyn HydrateModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn HydrateModel {
        self.model.as_ref()
    }

    /// Predict hydrate formation temperature (°C) for a resolved raw record.
    pub fn predict(&self, raw: &FeatureRecord) -> Result<f64, PredictError> {
        let features = derive(&normalize(raw)?)?;
        let prediction = self.model.predict(&features)?;
        if !prediction.is_finite() {
            return Err(InferenceError::NonFinite(prediction).into());
        }
        Ok(prediction)
    }
}

/// Round a prediction to 2 decimal places for display.
pub fn round_for_display(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
