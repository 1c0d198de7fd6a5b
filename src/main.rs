//! Hydrate Predictor - Rust/Axum service
//!
//! Serves gas-hydrate formation temperature predictions from a pre-trained
//! regression model, as a JSON API and an HTML form.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
pub mod features;
pub mod inference;
pub mod predict;
mod routes;

use config::Config;
use features::{model_input_names, FeatureSchema};
use inference::{load_model, LoadedModel, Predictor};

/// Application state shared across all handlers.
///
/// Built once before serving starts and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub schema: Arc<FeatureSchema>,
    pub predictor: Predictor,
    pub model_info: Arc<ModelInfo>,
    pub max_curve_points: usize,
}

/// Identity of the loaded model, reported by the health endpoint.
#[derive(Debug, serde::Serialize)]
pub struct ModelInfo {
    pub kind: &'static str,
    pub name: Option<String>,
    pub fingerprint: String,
}

impl AppState {
    pub fn new(schema: FeatureSchema, loaded: LoadedModel, max_curve_points: usize) -> Self {
        let model_info = ModelInfo {
            kind: loaded.model.kind(),
            name: loaded.name,
            fingerprint: loaded.fingerprint,
        };
        Self {
            schema: Arc::new(schema),
            predictor: Predictor::new(loaded.model),
            model_info: Arc::new(model_info),
            max_curve_points,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hydrate_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Schema and model must both load before the first request is served
    tracing::info!("Loading feature schema from {}", config.schema_path.display());
    let schema = FeatureSchema::load(&config.schema_path)
        .with_context(|| format!("loading schema {}", config.schema_path.display()))?;
    tracing::info!("Feature schema loaded: {} fields", schema.len());

    tracing::info!("Loading model from {}", config.model_path.display());
    let loaded = load_model(&config.model_path, &model_input_names(&schema))
        .with_context(|| format!("loading model {}", config.model_path.display()))?;
    tracing::info!(
        kind = loaded.model.kind(),
        name = loaded.name.as_deref().unwrap_or("unnamed"),
        fingerprint = %loaded.fingerprint,
        "Model loaded"
    );

    let state = AppState::new(schema, loaded, config.max_curve_points);
    let app = build_router(state, config.cors);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full router with middleware.
pub fn build_router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // HTML form
        .route("/", get(routes::form::index).post(routes::form::submit))
        // Prediction API
        .nest("/api", predict::router())
        // State and middleware
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "hydrate-predictor",
        "version": env!("CARGO_PKG_VERSION"),
        "model": &*state.model_info,
        "feature_count": state.schema.len(),
    }))
}


#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::test_support::test_app;

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model"]["kind"], "linear");
        assert_eq!(body["feature_count"], 16);
        assert!(body["model"]["fingerprint"].as_str().unwrap().starts_with("sha256:"));
    }
}
