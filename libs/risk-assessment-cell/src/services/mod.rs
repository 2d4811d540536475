pub mod encoder;
pub mod ensemble;
pub mod gradient_boosting;
pub mod normalizer;
pub mod pipeline;
pub mod predictor;
pub mod quantized_network;
pub mod rules;

pub use encoder::encode;
pub use ensemble::RiskScoringEnsemble;
pub use gradient_boosting::GradientBoostedTrees;
pub use normalizer::{health_score, normalize, risk_scores};
pub use pipeline::RiskAssessmentPipeline;
pub use predictor::RiskPredictor;
pub use quantized_network::QuantizedNetwork;
pub use rules::{RecommendationRule, RecommendationRuleEngine};
