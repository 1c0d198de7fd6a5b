//! Linear regression over named features.
//!
//! ```text
//! prediction = intercept + Σ weight[i] × transform[i](feature[i])
//! ```

use serde::{Deserialize, Serialize};

use super::{lookup, HydrateModel, InferenceError};
use crate::features::FeatureRecord;

/// Per-term input transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    #[default]
    Identity,
    /// Natural log; non-positive inputs yield a non-finite prediction unless
    /// the term sets a `floor`.
    Ln,
}

impl Transform {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Ln => x.ln(),
        }
    }
}

/// One weighted feature.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinearTerm {
    pub feature: String,
    pub weight: f64,
    #[serde(default)]
    pub transform: Transform,
    /// Inputs below this are raised to it before the transform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
}

impl LinearTerm {
    fn evaluate(&self, x: f64) -> f64 {
        let x = match self.floor {
            Some(floor) => x.max(floor),
            None => x,
        };
        self.weight * self.transform.apply(x)
    }
}

/// Exported linear model.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinearModel {
    #[serde(default)]
    pub name: Option<String>,
    pub intercept: f64,
    pub terms: Vec<LinearTerm>,
}

impl HydrateModel for LinearModel {
    fn predict(&self, features: &FeatureRecord) -> Result<f64, InferenceError> {
        let mut sum = self.intercept;
        for term in &self.terms {
            let x = lookup(features, &term.feature)?;
            sum += term.evaluate(x);
        }
        Ok(sum)
    }

    fn feature_names(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.feature.as_str()).collect()
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        LinearModel {
            name: None,
            intercept: 1.0,
            terms: vec![
                LinearTerm { feature: "a".into(), weight: 2.0, transform: Transform::Identity, floor: None },
                LinearTerm { feature: "b".into(), weight: 3.0, transform: Transform::Ln, floor: None },
            ],
        }
    }

    #[test]
    fn test_weighted_sum() {
        let features: FeatureRecord =
            [("a".to_string(), 4.0), ("b".to_string(), std::f64::consts::E)].into();
        let y = model().predict(&features).unwrap();
        assert!((y - (1.0 + 8.0 + 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_feature() {
        let features: FeatureRecord = [("a".to_string(), 4.0)].into();
        let result = model().predict(&features);
        assert!(matches!(result, Err(InferenceError::MissingFeature(ref f)) if f == "b"));
    }

    #[test]
    fn test_transform_defaults_to_identity() {
        let term: LinearTerm = serde_json::from_str(r#"{"feature": "Pc", "weight": 0.5}"#).unwrap();
        assert_eq!(term.transform, Transform::Identity);
        assert!(term.floor.is_none());
    }

    #[test]
    fn test_floor_keeps_log_finite() {
        let term: LinearTerm =
            serde_json::from_str(r#"{"feature": "Pc", "weight": 2.0, "transform": "ln", "floor": 1.0}"#)
                .unwrap();
        assert_eq!(term.evaluate(0.0), 0.0);
        assert_eq!(term.evaluate(-5.0), 0.0);
        assert!((term.evaluate(std::f64::consts::E) - 2.0).abs() < 1e-12);
    }
}
