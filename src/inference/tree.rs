//! Gradient-boosted regression trees.
//!
//! Each tree is a flat node array rooted at index 0. Split nodes send a sample
//! left when `value <= threshold`. Children always point forward, so traversal
//! terminates.
//!
//! ```text
//! prediction = base_score + learning_rate × Σ tree(x)
//! ```

use serde::{Deserialize, Serialize};

use super::{lookup, HydrateModel, InferenceError};
use crate::features::FeatureRecord;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn evaluate(&self, features: &FeatureRecord) -> Result<f64, InferenceError> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { leaf }) => return Ok(*leaf),
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let next = if lookup(features, feature)? <= *threshold { *left } else { *right };
                    if next <= idx {
                        return Err(InferenceError::MalformedTree(format!(
                            "node {idx} points back to {next}"
                        )));
                    }
                    idx = next;
                }
                None => {
                    return Err(InferenceError::MalformedTree(format!("node {idx} does not exist")))
                }
            }
        }
    }

    /// Check that the tree is non-empty and every child index points forward
    /// inside the node array.
    pub fn check_structure(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = node {
                for child in [*left, *right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {idx} has invalid child index {child}"));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Exported boosted tree ensemble.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

fn default_learning_rate() -> f64 {
    1.0
}

impl HydrateModel for TreeEnsemble {
    fn predict(&self, features: &FeatureRecord) -> Result<f64, InferenceError> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(features)?;
        }
        Ok(self.base_score + self.learning_rate * sum)
    }

    fn feature_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .trees
            .iter()
            .flat_map(|t| t.nodes.iter())
            .filter_map(|n| match n {
                TreeNode::Split { feature, .. } => Some(feature.as_str()),
                TreeNode::Leaf { .. } => None,
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }
}
