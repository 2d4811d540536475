use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use risk_assessment_cell::{risk_assessment_routes, RiskAssessmentPipeline};
use shared_models::error::AppError;

pub fn create_router(pipeline: Arc<RiskAssessmentPipeline>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api", risk_assessment_routes(pipeline))
        .fallback(not_found)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Health Assistant API is running" }))
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
