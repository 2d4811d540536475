// Risk Assessment Cell - health risk scoring and recommendation pipeline
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    FeatureVector,
    HealthMetrics,
    HealthRecommendation,
    RawRiskVector,
    RiskAssessmentError,
    RiskAssessmentResult,
    RiskCategory,
    RiskScores,
    Task,
};

pub use router::risk_assessment_routes;

pub use services::{
    RecommendationRuleEngine,
    RiskAssessmentPipeline,
    RiskPredictor,
    RiskScoringEnsemble,
};
