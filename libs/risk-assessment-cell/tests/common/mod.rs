#![allow(dead_code)]

use std::sync::Arc;

use risk_assessment_cell::{
    FeatureVector, HealthMetrics, RecommendationRuleEngine, RiskAssessmentError,
    RiskAssessmentPipeline, RiskPredictor, RiskScoringEnsemble,
};
use shared_config::AppConfig;

/// Predictor that returns a fixed output for every input.
pub struct FixedPredictor {
    pub name: &'static str,
    pub output: Vec<f64>,
}

impl RiskPredictor for FixedPredictor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn input_width(&self) -> usize {
        12
    }

    fn predict(&self, _features: &FeatureVector) -> Result<Vec<f64>, RiskAssessmentError> {
        Ok(self.output.clone())
    }
}

/// Predictor whose inference always fails.
pub struct FailingPredictor;

impl RiskPredictor for FailingPredictor {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn input_width(&self) -> usize {
        12
    }

    fn predict(&self, _features: &FeatureVector) -> Result<Vec<f64>, RiskAssessmentError> {
        Err(RiskAssessmentError::PredictorFailure {
            predictor: "failing".to_string(),
            reason: "tensor allocation failed".to_string(),
        })
    }
}

pub fn stub_pipeline(gbt: Vec<f64>, nn: Vec<f64>) -> RiskAssessmentPipeline {
    RiskAssessmentPipeline::new(
        RiskScoringEnsemble::new(
            Arc::new(FixedPredictor { name: "stub_gbt", output: gbt }),
            Arc::new(FixedPredictor { name: "stub_nn", output: nn }),
        ),
        RecommendationRuleEngine::standard(),
    )
}

pub fn failing_pipeline() -> RiskAssessmentPipeline {
    RiskAssessmentPipeline::new(
        RiskScoringEnsemble::new(
            Arc::new(FixedPredictor { name: "stub_gbt", output: vec![0.1; 4] }),
            Arc::new(FailingPredictor),
        ),
        RecommendationRuleEngine::standard(),
    )
}

/// Config pointing at the model artifacts shipped in the repository.
pub fn bundled_model_config() -> AppConfig {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models");
    AppConfig {
        gbt_model_path: format!("{}/risk_prediction_gbt.json", root),
        nn_model_path: format!("{}/risk_prediction_nn.json", root),
        ..AppConfig::default()
    }
}

pub fn metrics(activity: f64, systolic: f64, diastolic: f64, blood_sugar: f64) -> HealthMetrics {
    HealthMetrics {
        age: 45,
        gender: "Male".to_string(),
        height: 175.0,
        weight: 82.0,
        blood_pressure_systolic: systolic,
        blood_pressure_diastolic: diastolic,
        heart_rate: 72.0,
        blood_sugar,
        cholesterol: 210.0,
        smoking: false,
        alcohol_consumption: 3.0,
        physical_activity_hours: activity,
    }
}
