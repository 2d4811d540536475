use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::RiskAssessmentPipeline;

pub fn risk_assessment_routes(pipeline: Arc<RiskAssessmentPipeline>) -> Router {
    Router::new()
        .route("/predict-risk", post(handlers::predict_risk))
        .route("/predict-risk/health", get(handlers::pipeline_status))
        .with_state(pipeline)
}
