//! Error type returned by HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::features::FeatureError;
use crate::inference::{InferenceError, PredictError};
use crate::predict::{ResolveError, SweepError};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Malformed(#[from] ResolveError),
    #[error(transparent)]
    InvalidSweep(#[from] SweepError),
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("failed to render template: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Malformed(_) | Self::InvalidSweep(_) => StatusCode::BAD_REQUEST,
            Self::Predict(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed_request",
            Self::InvalidSweep(_) => "invalid_sweep_parameter",
            Self::Predict(PredictError::Feature(FeatureError::ZeroComposition)) => "zero_composition",
            Self::Predict(PredictError::Feature(_)) => "feature_engineering_error",
            Self::Predict(PredictError::Inference(InferenceError::NonFinite(_))) => "non_finite_prediction",
            Self::Predict(PredictError::Inference(_)) => "inference_error",
            Self::Template(_) => "template_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (
            status,
            Json(serde_json::json!({
                "error": self.to_string(),
                "error_type": self.error_type(),
            })),
        )
            .into_response()
    }
}
