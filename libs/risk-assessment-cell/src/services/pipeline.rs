use std::sync::Arc;

use tracing::{debug, info};

use shared_config::AppConfig;

use crate::models::{
    HealthMetrics, PipelineStatus, RiskAssessmentError, RiskAssessmentResult, RiskCategory,
    FEATURE_COUNT,
};
use crate::services::encoder::encode;
use crate::services::ensemble::RiskScoringEnsemble;
use crate::services::gradient_boosting::GradientBoostedTrees;
use crate::services::normalizer::{health_score, risk_scores};
use crate::services::quantized_network::QuantizedNetwork;
use crate::services::rules::RecommendationRuleEngine;

/// Encode, score, normalize, recommend.
///
/// Holds only read-only state, so one instance is shared by every request.
#[derive(Debug)]
pub struct RiskAssessmentPipeline {
    ensemble: RiskScoringEnsemble,
    rules: RecommendationRuleEngine,
}

impl RiskAssessmentPipeline {
    pub fn new(ensemble: RiskScoringEnsemble, rules: RecommendationRuleEngine) -> Self {
        Self { ensemble, rules }
    }

    /// Load both model artifacts named by the configuration and use the standard rule table.
    ///
    /// # Errors
    /// Returns `RiskAssessmentError::ModelLoad` if either artifact is missing or invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, RiskAssessmentError> {
        let gradient_boosted = GradientBoostedTrees::from_file(&config.gbt_model_path)?;
        let neural_network = QuantizedNetwork::from_file(&config.nn_model_path)?;

        Ok(Self::new(
            RiskScoringEnsemble::new(Arc::new(gradient_boosted), Arc::new(neural_network)),
            RecommendationRuleEngine::standard(),
        ))
    }

    /// Run a full assessment. Any encoding or scoring failure aborts the whole result.
    pub fn assess(&self, metrics: &HealthMetrics) -> Result<RiskAssessmentResult, RiskAssessmentError> {
        let features = encode(metrics);
        debug!("Encoded features: {:?}", features.as_slice());

        let raw = self.ensemble.score(&features)?;

        let scores = risk_scores(&raw);
        let health_score = health_score(&raw);

        let recommendations = self.rules.generate(metrics, &scores);
        let total_available_points = recommendations
            .iter()
            .map(|recommendation| recommendation.potential_points)
            .sum();

        info!(
            "Risk assessment complete: health_score={}, recommendations={}, points={}",
            health_score,
            recommendations.len(),
            total_available_points
        );

        Ok(RiskAssessmentResult {
            health_score,
            risk_scores: scores,
            recommendations,
            total_available_points,
        })
    }

    pub fn status(&self) -> PipelineStatus {
        PipelineStatus {
            status: "healthy".to_string(),
            predictors: self.ensemble.predictor_names(),
            feature_count: FEATURE_COUNT,
            risk_categories: RiskCategory::ALL.to_vec(),
            rule_count: self.rules.rules().len(),
        }
    }
}
