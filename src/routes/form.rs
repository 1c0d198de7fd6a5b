//! Prediction form page.

use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Form, State},
    response::Html,
};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::features::{FeatureRecord, FeatureSchema, WATER_FIELD};
use crate::inference::round_for_display;
use crate::predict::resolve_fields;
use crate::AppState;

/// One input row of the form.
struct FormField {
    name: String,
    value: String,
    default: String,
    readonly: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    fields: Vec<FormField>,
    prediction: Option<String>,
    error: Option<String>,
    filled: Vec<String>,
    invalid: Vec<String>,
}

fn form_fields(schema: &FeatureSchema, values: &FeatureRecord) -> Vec<FormField> {
    schema
        .fields()
        .map(|(name, default)| FormField {
            name: name.to_string(),
            value: values.get(name).copied().unwrap_or(default).to_string(),
            default: default.to_string(),
            readonly: name == WATER_FIELD,
        })
        .collect()
}

/// Empty form pre-filled with the defaults.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let template = IndexTemplate {
        fields: form_fields(&state.schema, state.schema.defaults()),
        prediction: None,
        error: None,
        filled: vec![],
        invalid: vec![],
    };
    Ok(Html(template.render()?))
}

/// Resolve the submitted form, predict and re-render.
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Html<String>> {
    let fields: Map<String, Value> = form
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let resolution = resolve_fields(&fields, &state.schema);

    let (prediction, error) = match state.predictor.predict(&resolution.values) {
        Ok(value) => match round_for_display(value) {
            Some(rounded) => (Some(rounded.to_string()), None),
            None => (None, Some(format!("prediction {value} cannot be displayed"))),
        },
        Err(e) => {
            tracing::warn!("Form prediction failed: {}", e);
            (None, Some(e.to_string()))
        }
    };

    let template = IndexTemplate {
        fields: form_fields(&state.schema, &resolution.values),
        prediction,
        error,
        filled: resolution.missing,
        invalid: resolution.invalid.into_keys().collect(),
    };
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::test_support::test_app;

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_lists_fields() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("name=\"CH4\""));
        assert!(html.contains("name=\"Pc\""));
        assert!(!html.contains("Predicted hydrate formation temperature"));
    }

    #[tokio::test]
    async fn test_submit_renders_prediction() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("Pc=75&CH4=&C2H6=abc"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Predicted hydrate formation temperature"));
        assert!(html.contains("value=\"75\""));
        assert!(html.contains("Could not parse, defaults used: C2H6"));
    }

    #[tokio::test]
    async fn test_submit_zero_composition_shows_error() {
        let body = crate::features::COMPOSITION_FIELDS
            .iter()
            .map(|k| format!("{k}=0"))
            .collect::<Vec<_>>()
            .join("&");
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("sum to zero"));
    }
}
