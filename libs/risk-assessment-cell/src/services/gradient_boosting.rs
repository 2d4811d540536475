//! Gradient-boosted tree ensemble loaded from a JSON model dump.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::{
    FeatureVector, RiskAssessmentError, RiskCategory, FEATURE_COUNT, RISK_CATEGORY_COUNT,
};
use crate::services::predictor::{check_input_width, RiskPredictor};

const PREDICTOR_NAME: &str = "gradient_boosted_trees";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Objective {
    #[serde(rename = "binary:logistic")]
    BinaryLogistic,
    #[serde(rename = "reg:squarederror")]
    SquaredError,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        split: usize,
        threshold: f64,
        yes: usize,
        no: usize,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk from the root to a leaf. Missing features never occur because the
    /// width is checked before any tree is evaluated.
    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split { split, threshold, yes, no } => {
                    index = if features[*split] < *threshold { *yes } else { *no };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Booster {
    pub category: RiskCategory,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradientBoostedTrees {
    pub num_features: usize,
    pub base_score: f64,
    pub objective: Objective,
    pub outputs: Vec<Booster>,
}

impl GradientBoostedTrees {
    /// Load and validate a model dump from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RiskAssessmentError> {
        let path = path.as_ref();
        let location = path.display().to_string();

        let contents = fs::read_to_string(path).map_err(|e| RiskAssessmentError::ModelLoad {
            path: location.clone(),
            reason: e.to_string(),
        })?;

        let model = Self::from_json(&contents).map_err(|e| match e {
            RiskAssessmentError::ModelLoad { reason, .. } => RiskAssessmentError::ModelLoad {
                path: location.clone(),
                reason,
            },
            other => other,
        })?;

        info!(
            "Loaded gradient-boosted tree model from {} ({} outputs, {} trees)",
            location,
            model.outputs.len(),
            model.tree_count()
        );

        Ok(model)
    }

    /// Parse and validate a model dump.
    pub fn from_json(json: &str) -> Result<Self, RiskAssessmentError> {
        let model: Self = serde_json::from_str(json).map_err(|e| RiskAssessmentError::ModelLoad {
            path: "<inline>".to_string(),
            reason: format!("invalid model JSON: {}", e),
        })?;
        model.validate()?;
        Ok(model)
    }

    pub fn tree_count(&self) -> usize {
        self.outputs.iter().map(|booster| booster.trees.len()).sum()
    }

    fn validate(&self) -> Result<(), RiskAssessmentError> {
        let invalid = |reason: String| RiskAssessmentError::ModelLoad {
            path: "<inline>".to_string(),
            reason,
        };

        if !(0.0..=1.0).contains(&self.base_score) && self.objective == Objective::BinaryLogistic {
            return Err(invalid(format!(
                "base_score {} must be a probability for binary:logistic",
                self.base_score
            )));
        }

        // Output k feeds RiskCategory::ALL[k]; a mislabelled booster would swap scores.
        for (booster, expected) in self.outputs.iter().zip(RiskCategory::ALL) {
            if booster.category != expected {
                return Err(invalid(format!(
                    "booster for {} found where {} was expected",
                    booster.category, expected
                )));
            }
        }

        for booster in &self.outputs {
            for (tree_index, tree) in booster.trees.iter().enumerate() {
                if tree.nodes.is_empty() {
                    return Err(invalid(format!(
                        "{} tree {} has no nodes",
                        booster.category, tree_index
                    )));
                }

                for (node_index, node) in tree.nodes.iter().enumerate() {
                    if let TreeNode::Split { split, yes, no, .. } = node {
                        if *split >= self.num_features {
                            return Err(invalid(format!(
                                "{} tree {} node {} splits on feature {} of {}",
                                booster.category, tree_index, node_index, split, self.num_features
                            )));
                        }
                        // Children must come after their parent so every walk terminates.
                        for child in [*yes, *no] {
                            if child <= node_index || child >= tree.nodes.len() {
                                return Err(invalid(format!(
                                    "{} tree {} node {} has invalid child {}",
                                    booster.category, tree_index, node_index, child
                                )));
                            }
                        }
                    }
                }
            }
        }

        if self.num_features != FEATURE_COUNT {
            warn!(
                "Gradient-boosted tree model expects {} features, encoder produces {}",
                self.num_features, FEATURE_COUNT
            );
        }
        if self.outputs.len() != RISK_CATEGORY_COUNT {
            warn!(
                "Gradient-boosted tree model has {} outputs, expected {}",
                self.outputs.len(),
                RISK_CATEGORY_COUNT
            );
        }

        Ok(())
    }

    fn base_margin(&self) -> f64 {
        match self.objective {
            Objective::BinaryLogistic => {
                let p = self.base_score.clamp(1e-7, 1.0 - 1e-7);
                (p / (1.0 - p)).ln()
            }
            Objective::SquaredError => self.base_score,
        }
    }
}

impl RiskPredictor for GradientBoostedTrees {
    fn name(&self) -> &'static str {
        PREDICTOR_NAME
    }

    fn input_width(&self) -> usize {
        self.num_features
    }

    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, RiskAssessmentError> {
        check_input_width(PREDICTOR_NAME, self.num_features, features)?;

        let values = features.as_slice();
        let base_margin = self.base_margin();

        let predictions: Vec<f64> = self
            .outputs
            .iter()
            .map(|booster| {
                let margin = base_margin
                    + booster.trees.iter().map(|tree| tree.evaluate(values)).sum::<f64>();
                match self.objective {
                    Objective::BinaryLogistic => sigmoid(margin),
                    Objective::SquaredError => margin,
                }
            })
            .collect();

        debug!("{} raw output: {:?}", PREDICTOR_NAME, predictions);
        Ok(predictions)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
