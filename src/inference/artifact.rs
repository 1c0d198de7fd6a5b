//! Loading exported model artifacts.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{HydrateModel, LinearModel, TreeEnsemble};

/// Failure to load the trained model. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact is not valid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model references unknown feature {0}")]
    UnknownFeature(String),
    #[error("model has no terms or trees")]
    Empty,
    #[error("tree {index}: {reason}")]
    MalformedTree { index: usize, reason: String },
}

/// On-disk model formats, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    fn name(&self) -> Option<&str> {
        match self {
            Self::Linear(m) => m.name.as_deref(),
            Self::TreeEnsemble(m) => m.name.as_deref(),
        }
    }

    /// Structural checks plus a check that every feature the model reads is one
    /// the pipeline produces.
    fn validate(&self, known_features: &[String]) -> Result<(), ModelLoadError> {
        let model: &dyn HydrateModel = match self {
            Self::Linear(m) => {
                if m.terms.is_empty() {
                    return Err(ModelLoadError::Empty);
                }
                m
            }
            Self::TreeEnsemble(m) => {
                if m.trees.is_empty() {
                    return Err(ModelLoadError::Empty);
                }
                for (index, tree) in m.trees.iter().enumerate() {
                    tree.check_structure()
                        .map_err(|reason| ModelLoadError::MalformedTree { index, reason })?;
                }
                m
            }
        };

        for feature in model.feature_names() {
            if !known_features.iter().any(|k| k == feature) {
                return Err(ModelLoadError::UnknownFeature(feature.to_string()));
            }
        }
        Ok(())
    }

    fn into_model(self) -> Arc<dyn HydrateModel> {
        match self {
            Self::Linear(m) => Arc::new(m),
            Self::TreeEnsemble(m) => Arc::new(m),
        }
    }
}

/// A validated model ready for serving.
#[derive(Clone)]
pub struct LoadedModel {
    pub model: Arc<dyn HydrateModel>,
    pub name: Option<String>,
    /// `sha256:<hex>` of the artifact bytes.
    pub fingerprint: String,
}

impl LoadedModel {
    pub fn from_bytes(bytes: &[u8], known_features: &[String]) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        artifact.validate(known_features)?;

        Ok(Self {
            name: artifact.name().map(str::to_string),
            fingerprint: sha256_hex(bytes),
            model: artifact.into_model(),
        })
    }
}

/// Read, parse and validate the artifact at `path`.
pub fn load_model(
    path: impl AsRef<Path>,
    known_features: &[String],
) -> Result<LoadedModel, ModelLoadError> {
    let bytes = std::fs::read(path)?;
    LoadedModel::from_bytes(&bytes, known_features)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
